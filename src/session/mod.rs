//! # Session Module
//!
//! The lifecycle core of the preview card. One [`Session`] coordinates
//! the asynchronous model load, the per-frame render loop, the hover
//! interaction state, and host resizes, and guarantees that repeated
//! create/destroy cycles never leak a GPU resource, a scheduled frame
//! callback, or a listener registration.
//!
//! ## Key Components
//!
//! - [`manager`] - [`Session`]: start, frame, resize, stop
//! - [`frame_loop`] - Frame scheduling guard and clamped frame clock
//! - [`interaction`] - Hover flag and hover-driven spin
//! - [`viewport`] - Host size tracking with zero-dimension protection
//!
//! [`Session`]: manager::Session

pub mod frame_loop;
pub mod interaction;
pub mod manager;
pub mod viewport;

// Re-export main types
pub use manager::Session;
