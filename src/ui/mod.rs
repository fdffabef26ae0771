pub mod modals;
pub mod state;
pub mod theme;
pub mod views;
pub mod widgets;

pub use state::{AppState, StatusMessage, StatusType, View};
