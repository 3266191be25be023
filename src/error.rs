//! Error types for the preview card
//!
//! Every failure the card can recover from locally is represented here.
//! None of these errors are allowed to escape a session and take down the
//! embedding program; the worst outcome is an empty preview.

use thiserror::Error;

/// Errors produced while loading, normalizing, or presenting a model
#[derive(Debug, Clone, Error)]
pub enum VitrineError {
    /// The model file could not be read or parsed
    #[error("failed to load model asset: {0}")]
    AssetLoad(String),

    /// The model's bounding box has zero extent in every axis, so no
    /// normalization scale exists
    #[error("model asset has a degenerate bounding box")]
    DegenerateAsset,

    /// The host surface has a zero dimension, so no valid projection exists
    #[error("host viewport has zero size")]
    DegenerateViewport,
}

impl From<gltf::Error> for VitrineError {
    fn from(err: gltf::Error) -> Self {
        VitrineError::AssetLoad(err.to_string())
    }
}

impl From<std::io::Error> for VitrineError {
    fn from(err: std::io::Error) -> Self {
        VitrineError::AssetLoad(err.to_string())
    }
}
