//! Event handling module.
//!
//! This module contains the handlers that react to list input:
//! - Controller: filter state changes, data loading and redraws
//! - Debounce: coalescing of rapid search keystrokes

pub mod controller;
pub mod debounce;

pub use controller::{ControllerOptions, ListController, PageContext};
pub use debounce::Debouncer;
