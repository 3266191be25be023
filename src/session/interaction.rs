//! Hover interaction state
//!
//! A single boolean written only by pointer enter/leave signals on the
//! card's host and read once per rendered frame. Rapid enter/leave
//! sequences simply reflect the latest signal; there is no debouncing.

use cgmath::Rad;

/// Hover rotation increment per rendered frame, in radians.
///
/// Deliberately a fixed per-frame step rather than delta-time scaled, so
/// rotation speed tracks the display refresh rate.
pub const SPIN_STEP: f32 = 0.03;

/// The card's interaction state: hovering or not
#[derive(Debug, Default)]
pub struct InteractionTracker {
    hovering: bool,
}

impl InteractionTracker {
    pub fn new() -> Self {
        Self { hovering: false }
    }

    /// Pointer entered the card
    pub fn enter(&mut self) {
        self.hovering = true;
    }

    /// Pointer left the card
    pub fn leave(&mut self) {
        self.hovering = false;
    }

    pub fn is_hovering(&self) -> bool {
        self.hovering
    }
}

/// Accumulated hover-driven rotation about the Y axis
#[derive(Debug, Default)]
pub struct HoverSpin {
    angle: f32,
}

impl HoverSpin {
    pub fn new() -> Self {
        Self { angle: 0.0 }
    }

    /// Advances the spin by one frame's step while hovering; holds the
    /// current angle otherwise.
    pub fn advance(&mut self, hovering: bool) {
        if hovering {
            self.angle += SPIN_STEP;
        }
    }

    pub fn angle(&self) -> Rad<f32> {
        Rad(self.angle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enter_leave_reflect_latest_signal() {
        let mut tracker = InteractionTracker::new();
        assert!(!tracker.is_hovering());

        tracker.enter();
        assert!(tracker.is_hovering());

        tracker.leave();
        assert!(!tracker.is_hovering());

        // Rapid sequences land on the last signal
        tracker.enter();
        tracker.leave();
        tracker.enter();
        assert!(tracker.is_hovering());
    }

    #[test]
    fn test_spin_monotonic_while_hovering() {
        let mut spin = HoverSpin::new();
        let mut previous = spin.angle().0;

        for _ in 0..10 {
            spin.advance(true);
            assert!(spin.angle().0 > previous);
            previous = spin.angle().0;
        }
    }

    #[test]
    fn test_spin_constant_while_not_hovering() {
        let mut spin = HoverSpin::new();
        spin.advance(true);
        let frozen = spin.angle().0;

        for _ in 0..10 {
            spin.advance(false);
            assert_eq!(spin.angle().0, frozen);
        }
    }

    #[test]
    fn test_spin_step_is_fixed_per_frame() {
        let mut spin = HoverSpin::new();
        spin.advance(true);
        assert!((spin.angle().0 - SPIN_STEP).abs() < 1e-6);
        spin.advance(true);
        assert!((spin.angle().0 - 2.0 * SPIN_STEP).abs() < 1e-6);
    }
}
