//! Animation frame primitives
//!
//! Everything here is driven by the host calling `tick` once per animation
//! frame. Nothing reads the wall clock, so runs are reproducible in tests.

/// Counts frames and accumulated frame time
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameClock {
    frame: u64,
    elapsed_ms: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by one frame of `dt_ms` milliseconds. Returns the new frame number.
    pub fn tick(&mut self, dt_ms: f32) -> u64 {
        self.frame += 1;
        self.elapsed_ms += dt_ms as f64;
        self.frame
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }
}

/// A resolve-once delay measured in animation frames
///
/// A negative length resolves immediately, without waiting for a frame.
/// Otherwise the delay counts frames and resolves once the counted progress
/// `frames_seen / length` reaches 1, so a length of `0` resolves on the first
/// frame after creation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameDelay {
    length: i32,
    seen: u32,
    resolved: bool,
}

impl FrameDelay {
    pub fn new(length: i32) -> Self {
        Self {
            length,
            seen: 0,
            resolved: length < 0,
        }
    }

    /// Count one frame. Returns `true` exactly once, on the frame the delay
    /// resolves; delays that resolved on construction never report here.
    pub fn tick(&mut self) -> bool {
        if self.resolved {
            return false;
        }
        self.seen += 1;
        if self.progress() >= 1.0 {
            self.resolved = true;
            return true;
        }
        false
    }

    /// Fraction of the delay that has elapsed
    pub fn progress(&self) -> f32 {
        if self.length <= 0 {
            return if self.resolved || self.seen > 0 { 1.0 } else { 0.0 };
        }
        (self.seen as f32 / self.length as f32).min(1.0)
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    pub fn length(&self) -> i32 {
        self.length
    }
}

/// A one-shot request for work on the next animation frame
///
/// The request becomes ready on the first `tick` after it was armed, which
/// is where forced layout reads are taken.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NextFrame {
    armed: bool,
}

impl NextFrame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&mut self) {
        self.armed = true;
    }

    pub fn is_pending(&self) -> bool {
        self.armed
    }

    /// Returns `true` if a request was pending; the request is consumed.
    pub fn tick(&mut self) -> bool {
        std::mem::take(&mut self.armed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick(16.0), 1);
        assert_eq!(clock.tick(16.0), 2);
        assert_eq!(clock.elapsed_ms(), 32.0);
    }

    #[test]
    fn test_negative_delay_resolves_immediately() {
        let mut delay = FrameDelay::new(-1);
        assert!(delay.is_resolved());
        assert!(!delay.tick());
    }

    #[test]
    fn test_zero_delay_resolves_on_first_frame() {
        let mut delay = FrameDelay::new(0);
        assert!(!delay.is_resolved());
        assert!(delay.tick());
        assert!(delay.is_resolved());
        assert!(!delay.tick());
    }

    #[test]
    fn test_frame_count_delay() {
        let mut delay = FrameDelay::new(3);
        assert!(!delay.tick());
        assert!(!delay.tick());
        assert!((delay.progress() - 2.0 / 3.0).abs() < 1e-6);
        assert!(delay.tick());
        assert_eq!(delay.progress(), 1.0);
    }

    #[test]
    fn test_next_frame() {
        let mut next = NextFrame::new();
        assert!(!next.tick());
        next.request();
        assert!(next.is_pending());
        assert!(next.tick());
        assert!(!next.tick());
    }
}
