//! Legacy Flow - arkiv över biologiskt och andligt arv
//!
//! En native desktop-applikation byggd med Rust och egui.

pub mod models;
pub mod services;
pub mod ui;
pub mod utils;

// Re-exports
pub use models::*;
pub use ui::{AppState, View};
