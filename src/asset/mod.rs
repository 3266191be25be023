//! # Asset Module
//!
//! Loading and preparation of the card's one model asset: glTF import on
//! a worker thread, bounding-volume normalization, and keyframe animation
//! playback.
//!
//! ## Key Components
//!
//! - [`loader`] - Worker-thread load with a session-lifetime token
//! - [`model`] - CPU-side model data parsed from glTF
//! - [`normalize`] - Center/scale normalization from the bounding box
//! - [`animation`] - Clip extraction and looping playback

pub mod animation;
pub mod loader;
pub mod model;
pub mod normalize;

// Re-export main types
pub use loader::{LoadProgress, LoadToken, PendingLoad};
pub use model::ModelAsset;
pub use normalize::{Aabb, NormalizedTransform};
