//! # User Interface Module
//!
//! Dear ImGui overlay for the card's presentation shell: the loading
//! placeholder while the model is in flight, and the title/description
//! block once the card is live. The overlay carries no logic beyond
//! mapping the session's loading and hover flags to visuals.

pub mod overlay;

// Re-export main types
pub use overlay::{draw_card, CardOverlay};
