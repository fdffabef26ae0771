//! Tjänster för Legacy Flow
//!
//! Trädmodell, layout och interaktion samt klienter mot innehålls- och ljudtjänster.

pub mod audio;
pub mod camera;
pub mod content;
pub mod gemini;
pub mod recitation;
pub mod retry;
pub mod tree_controller;
pub mod tree_layout;
pub mod tree_model;

pub use audio::{AudioOutput, SpeakerOutput};
pub use camera::{Camera, ViewTransform};
pub use content::ContentService;
pub use gemini::GeminiClient;
pub use recitation::{RecitationEvent, ReciteOutcome, Reciter};
pub use retry::RetryPolicy;
pub use tree_controller::{Selection, TreeController};
pub use tree_layout::{LayoutEngine, TreeLayout, ViewportSize};
pub use tree_model::{AncestryTree, Branch, TreeNode, Transition};
