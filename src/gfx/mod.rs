//! # Graphics Module
//!
//! This module contains the rendering side of the preview card: the
//! forward render engine, the preview camera, GPU mesh and material
//! resources, and the scene that holds the one attached model.
//!
//! ## Architecture Overview
//!
//! - **Camera** ([`camera`]) - Fixed perspective camera with profile-driven placement
//! - **Render Engine** ([`render_engine`]) - Surface, device, and the single forward pipeline
//! - **Scene** ([`scene`]) - The attached model, its animation player, and transform sync
//! - **Resources** ([`mesh`], [`material`], [`texture`], [`bindings`]) - GPU buffer and bind group management
//!
//! All GPU resources are exclusively owned by one session and explicitly
//! destroyed on teardown.

pub mod bindings;
pub mod camera;
pub mod material;
pub mod mesh;
pub mod render_engine;
pub mod scene;
pub mod texture;

// Re-export commonly used types
pub use camera::PreviewCamera;
pub use render_engine::RenderEngine;
pub use scene::PreviewScene;
