//! Frame scheduling guard and frame clock
//!
//! The host drives redraws; this module decides whether a delivered
//! redraw still belongs to the live session. Each `begin` hands out a new
//! generation and `cancel` invalidates all prior generations, so a
//! callback scheduled by an earlier session can never execute after that
//! session stopped, even if the underlying scheduling primitive already
//! had one in flight.
//!
//! The clock's per-frame delta is non-negative and clamped, so playback
//! cannot jump wildly after the host was suspended or backgrounded.

use std::time::{Duration, Instant};

/// Upper bound on a single frame's delta
pub const MAX_FRAME_DELTA: Duration = Duration::from_millis(250);

/// Frame loop registration state for one session
#[derive(Debug)]
pub struct FrameLoop {
    generation: u64,
    active: bool,
    last_tick: Option<Instant>,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self {
            generation: 0,
            active: false,
            last_tick: None,
        }
    }

    /// Activates the loop and returns the new generation handle.
    ///
    /// At most one generation is live at any time: beginning again
    /// invalidates the previous handle.
    pub fn begin(&mut self) -> u64 {
        self.generation += 1;
        self.active = true;
        self.last_tick = None;
        self.generation
    }

    /// True when the handle belongs to the live registration
    pub fn is_current(&self, generation: u64) -> bool {
        self.active && generation == self.generation
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Cancels the registration. Idempotent: after the first call no
    /// frame with any previously issued handle runs again.
    pub fn cancel(&mut self) {
        self.active = false;
        self.last_tick = None;
    }

    /// Advances the clock and returns the clamped elapsed time since the
    /// previous tick. The first tick of a generation reports zero.
    pub fn tick(&mut self) -> Duration {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> Duration {
        let delta = match self.last_tick {
            Some(last) => now.saturating_duration_since(last).min(MAX_FRAME_DELTA),
            None => Duration::ZERO,
        };
        self.last_tick = Some(now);
        delta
    }
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_invalidates_issued_handle() {
        let mut frame_loop = FrameLoop::new();
        let handle = frame_loop.begin();
        assert!(frame_loop.is_current(handle));

        frame_loop.cancel();
        assert!(!frame_loop.is_current(handle));
        assert!(!frame_loop.is_active());
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut frame_loop = FrameLoop::new();
        let handle = frame_loop.begin();

        frame_loop.cancel();
        frame_loop.cancel();
        assert!(!frame_loop.is_current(handle));
    }

    #[test]
    fn test_stale_generation_never_current_again() {
        let mut frame_loop = FrameLoop::new();
        let first = frame_loop.begin();
        frame_loop.cancel();

        // A later session gets its own generation; the old handle stays dead
        let second = frame_loop.begin();
        assert!(!frame_loop.is_current(first));
        assert!(frame_loop.is_current(second));
        assert_ne!(first, second);
    }

    #[test]
    fn test_first_tick_reports_zero() {
        let mut frame_loop = FrameLoop::new();
        frame_loop.begin();
        assert_eq!(frame_loop.tick(), Duration::ZERO);
    }

    #[test]
    fn test_delta_is_clamped() {
        let mut frame_loop = FrameLoop::new();
        frame_loop.begin();

        let start = Instant::now();
        frame_loop.tick_at(start);
        // Simulate returning from a long background suspension
        let delta = frame_loop.tick_at(start + Duration::from_secs(60));
        assert_eq!(delta, MAX_FRAME_DELTA);
    }

    #[test]
    fn test_delta_tracks_elapsed_time() {
        let mut frame_loop = FrameLoop::new();
        frame_loop.begin();

        let start = Instant::now();
        frame_loop.tick_at(start);
        let delta = frame_loop.tick_at(start + Duration::from_millis(16));
        assert_eq!(delta, Duration::from_millis(16));
    }

    #[test]
    fn test_begin_resets_clock() {
        let mut frame_loop = FrameLoop::new();
        frame_loop.begin();
        let start = Instant::now();
        frame_loop.tick_at(start);

        frame_loop.cancel();
        frame_loop.begin();
        // No stale last-tick leaks across registrations
        assert_eq!(frame_loop.tick_at(start + Duration::from_secs(5)), Duration::ZERO);
    }
}
