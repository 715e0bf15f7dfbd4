//! # Ruleta Core
//!
//! Shared building blocks for the cooking roulette: configuration,
//! the common error type and the persisted data model.

pub mod config;
pub mod error;
pub mod types;

pub use config::RuletaConfig;
pub use error::{Result, RuletaError};
pub use types::{Assignment, DrawOutcome, HistoryEntry, Person};
