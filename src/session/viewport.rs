//! Host viewport state
//!
//! Tracks the host's current content dimensions. A notification carrying
//! a zero dimension is skipped outright, so a degenerate projection can
//! never be derived from the stored state; the update is deferred until a
//! later non-zero notification.

use crate::error::VitrineError;

/// Current width/height of the host surface
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    width: u32,
    height: u32,
}

impl Viewport {
    /// Records the initial host size. Zero dimensions are accepted here:
    /// the session defers surface configuration until [`Viewport::apply`]
    /// sees a usable size.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Applies a resize notification.
    ///
    /// Returns false and leaves the state untouched when either
    /// dimension is zero.
    pub fn apply(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        self.width = width;
        self.height = height;
        true
    }

    /// True once both dimensions are non-zero
    pub fn is_ready(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Aspect ratio, exactly `width / height`
    ///
    /// Only meaningful when [`Viewport::is_ready`]; callers on the frame
    /// path check readiness first.
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Aspect ratio, or [`VitrineError::DegenerateViewport`] while a
    /// dimension is still zero
    pub fn try_aspect(&self) -> Result<f32, VitrineError> {
        if self.is_ready() {
            Ok(self.aspect())
        } else {
            Err(VitrineError::DegenerateViewport)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_dimension_resize_is_skipped() {
        let mut viewport = Viewport::new(800, 600);

        assert!(!viewport.apply(0, 600));
        assert_eq!(viewport.size(), (800, 600));

        assert!(!viewport.apply(800, 0));
        assert_eq!(viewport.size(), (800, 600));
    }

    #[test]
    fn test_valid_resize_updates_aspect_exactly() {
        let mut viewport = Viewport::new(800, 600);
        assert!(viewport.apply(400, 300));

        // Same ratio, new pixel dimensions
        assert_eq!(viewport.size(), (400, 300));
        assert!((viewport.aspect() - 400.0 / 300.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_size_start_defers() {
        let mut viewport = Viewport::new(0, 0);
        assert!(!viewport.is_ready());
        assert!(matches!(
            viewport.try_aspect(),
            Err(VitrineError::DegenerateViewport)
        ));

        assert!(viewport.apply(640, 480));
        assert!(viewport.is_ready());
        assert!((viewport.try_aspect().unwrap() - 640.0 / 480.0).abs() < 1e-6);
    }
}
