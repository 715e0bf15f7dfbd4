//! # Ruleta Gateway
//!
//! Axum HTTP surface: participant CRUD, history read/clear, the draw, and
//! the prebuilt single-page frontend for every other path.

pub mod error;
pub mod routes;
pub mod server;
pub mod spa;

pub use error::ApiError;
pub use server::{AppState, build_router, start};
