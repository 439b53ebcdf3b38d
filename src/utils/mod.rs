//! Shared helpers for text and time handling.

pub mod clock;
pub mod text_processing;

pub use clock::{Clock, FixedClock, SystemClock};
