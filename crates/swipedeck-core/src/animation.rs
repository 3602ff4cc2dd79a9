//! Frame-ticked settle animation for the front card's offset.

use kurbo::Vec2;

/// Duration of the settle animation (swipe exit or bounce back).
pub const SETTLE_DURATION_MS: f64 = 300.0;

/// Interpolates the front card's offset from its release position to a
/// target over a fixed duration with a cubic ease-out.
///
/// This is the cooperative rendering of the settle phase: the controller
/// calls [`SettleAnimation::value`] once per frame and checks
/// [`SettleAnimation::is_finished`]; there is no internal clock. It is
/// cancelled only by a sequence replacement, otherwise it always runs to
/// completion.
#[derive(Debug, Clone, Copy)]
pub struct SettleAnimation {
    from: Vec2,
    to: Vec2,
    start_ms: f64,
    duration_ms: f64,
}

impl SettleAnimation {
    /// Start a settle from `from` to `to` at time `now_ms`.
    pub fn new(from: Vec2, to: Vec2, now_ms: f64) -> Self {
        Self {
            from,
            to,
            start_ms: now_ms,
            duration_ms: SETTLE_DURATION_MS,
        }
    }

    /// Final offset this animation lands on.
    pub fn target(&self) -> Vec2 {
        self.to
    }

    /// Interpolated offset at time `now_ms`, clamped to the endpoints.
    pub fn value(&self, now_ms: f64) -> Vec2 {
        let t = ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0);
        self.from + (self.to - self.from) * ease_out_cubic(t)
    }

    /// Whether the animation has run its full duration at `now_ms`.
    pub fn is_finished(&self, now_ms: f64) -> bool {
        now_ms - self.start_ms >= self.duration_ms
    }
}

fn ease_out_cubic(t: f64) -> f64 {
    let inv = 1.0 - t;
    1.0 - inv * inv * inv
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        let anim = SettleAnimation::new(Vec2::new(40.0, -20.0), Vec2::ZERO, 1000.0);
        assert_eq!(anim.value(1000.0), Vec2::new(40.0, -20.0));
        assert_eq!(anim.value(1000.0 + SETTLE_DURATION_MS), Vec2::ZERO);
        assert!(anim.is_finished(1000.0 + SETTLE_DURATION_MS));
        assert!(!anim.is_finished(1000.0 + SETTLE_DURATION_MS / 2.0));
    }

    #[test]
    fn test_value_clamps_past_end() {
        let anim = SettleAnimation::new(Vec2::ZERO, Vec2::new(100.0, 0.0), 0.0);
        assert_eq!(anim.value(1e9), Vec2::new(100.0, 0.0));
        // Before the start the animation holds its initial value.
        assert_eq!(anim.value(-50.0), Vec2::ZERO);
    }

    #[test]
    fn test_ease_out_front_loads_motion() {
        let anim = SettleAnimation::new(Vec2::ZERO, Vec2::new(100.0, 0.0), 0.0);
        let halfway = anim.value(SETTLE_DURATION_MS / 2.0);
        // Ease-out covers well over half the distance by mid-animation.
        assert!(halfway.x > 80.0);
    }
}
