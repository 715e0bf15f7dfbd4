//! Error types shared across the Ruleta crates.

use thiserror::Error;

/// Message returned to clients when a draw is attempted on an empty roster.
pub const NO_PARTICIPANTS_MESSAGE: &str = "No hay participantes disponibles";

#[derive(Error, Debug)]
pub enum RuletaError {
    #[error("{}", NO_PARTICIPANTS_MESSAGE)]
    NoParticipants,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Notify error: {0}")]
    Notify(String),
}

pub type Result<T> = std::result::Result<T, RuletaError>;
