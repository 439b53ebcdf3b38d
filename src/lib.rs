//! Client-side filtering, sorting and rendering of portal list pages.
//!
//! A list page arrives with a server-rendered first page. Once the visitor
//! searches, picks a category or unit, the full dataset is loaded once and
//! filtered locally; clearing the filters restores the original page.

pub mod app;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod listing;
pub mod logger;
pub mod state;
pub mod ui;
pub mod utils;
