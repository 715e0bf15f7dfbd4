//! # Ruleta Notify
//!
//! Tells a participant which month they cook, by email over an authenticated
//! STARTTLS SMTP relay. Best-effort: every failure becomes `false`.

pub mod email;

pub use email::Mailer;
