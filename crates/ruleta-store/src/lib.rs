//! # Ruleta Store
//!
//! Flat-file persistence. The roster and the history each live in their own
//! JSON array file, human-readable and rewritten in full on every change.
//!
//! ```text
//! data/
//!   ├── participants.json   [{ "name", "email" }, ...]        insertion order
//!   └── assignments.json    [{ "name", "date", "month", "week" }, ...]  newest first
//! ```
//!
//! Reads never fail: a missing, unreadable or malformed file is an empty list.

pub mod history;
pub mod json_file;
pub mod participants;

pub use history::HistoryStore;
pub use json_file::{JsonListFile, Records};
pub use participants::ParticipantStore;
