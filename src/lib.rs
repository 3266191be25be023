// src/lib.rs
//! Vitrine
//!
//! An interactive 3D model preview card built on wgpu and winit. One
//! window hosts one rendering session that loads a glTF model
//! asynchronously, normalizes it to a consistent size, plays its
//! animation clips, and spins it while the pointer hovers the card.

pub mod app;
pub mod asset;
pub mod card;
pub mod error;
pub mod gfx;
pub mod session;
pub mod ui;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::VitrineApp;
pub use card::{CameraProfile, CardConfig};
pub use error::VitrineError;

/// Creates a preview card application for the given configuration
pub fn preview(config: CardConfig) -> VitrineApp {
    VitrineApp::new(config)
}
