//! # Ruleta Engine
//!
//! The draw: pick a participant uniformly at random, schedule them one week
//! after the latest history entry, record the assignment and remove them
//! from the roster.
//!
//! ```text
//! draw()
//!   ├── roster lock ── empty? → NoParticipants (nothing written)
//!   ├── pick index (shuffle indices, then uniform position)
//!   ├── history lock ── anchor = history[0].date + 7d | today
//!   │                   prepend { name, date, month, week }
//!   └── roster.remove(index)
//! ```

pub mod calendar;
pub mod draw;

pub use calendar::{ScheduleSlot, spanish_month, week_label};
pub use draw::DrawEngine;
