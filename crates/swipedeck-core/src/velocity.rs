//! Pointer velocity estimation over a trailing sample window.

use kurbo::{Point, Vec2};
use log::trace;
use std::collections::VecDeque;

/// Samples older than this (relative to the newest sample) are discarded.
pub const VELOCITY_WINDOW_MS: f64 = 100.0;

#[derive(Debug, Clone, Copy)]
struct Sample {
    timestamp_ms: f64,
    position: Point,
}

/// Reduces a stream of `(timestamp, position)` samples for one gesture to an
/// instantaneous velocity vector.
///
/// The estimate is the total displacement across the retained window divided
/// by the elapsed time, which is cheap and plenty smooth for swipe
/// classification. A fresh tracker is used per gesture.
#[derive(Debug, Clone, Default)]
pub struct VelocityTracker {
    samples: VecDeque<Sample>,
}

impl VelocityTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a new sample and trim everything that fell out of the window.
    ///
    /// Timestamps must increase monotonically within a gesture; out-of-order
    /// samples are dropped.
    pub fn push(&mut self, timestamp_ms: f64, position: Point) {
        if let Some(last) = self.samples.back() {
            if timestamp_ms < last.timestamp_ms {
                trace!(
                    "ignoring sample at {timestamp_ms}ms earlier than last {}ms",
                    last.timestamp_ms
                );
                return;
            }
        }

        self.samples.push_back(Sample {
            timestamp_ms,
            position,
        });
        self.trim();
    }

    /// Number of samples currently retained.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the tracker holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Drop all samples (gesture start).
    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Current velocity in units per second.
    ///
    /// Returns the zero vector when fewer than two samples remain or the
    /// retained window spans no time.
    pub fn velocity(&self) -> Vec2 {
        let (Some(first), Some(last)) = (self.samples.front(), self.samples.back()) else {
            return Vec2::ZERO;
        };
        let elapsed_s = (last.timestamp_ms - first.timestamp_ms) / 1000.0;
        if self.samples.len() < 2 || elapsed_s <= 0.0 {
            return Vec2::ZERO;
        }
        (last.position - first.position) / elapsed_s
    }

    fn trim(&mut self) {
        let Some(newest) = self.samples.back().map(|s| s.timestamp_ms) else {
            return;
        };
        while let Some(first) = self.samples.front() {
            if newest - first.timestamp_ms <= VELOCITY_WINDOW_MS {
                break;
            }
            self.samples.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_tracker_reports_zero() {
        let tracker = VelocityTracker::new();
        assert_eq!(tracker.velocity(), Vec2::ZERO);
    }

    #[test]
    fn test_single_sample_reports_zero() {
        let mut tracker = VelocityTracker::new();
        tracker.push(0.0, Point::new(10.0, 10.0));
        assert_eq!(tracker.velocity(), Vec2::ZERO);
    }

    #[test]
    fn test_constant_motion() {
        let mut tracker = VelocityTracker::new();
        // 10 px every 10 ms along x: 1000 px/s.
        for i in 0..5 {
            tracker.push(i as f64 * 10.0, Point::new(i as f64 * 10.0, 0.0));
        }
        let v = tracker.velocity();
        assert!((v.x - 1000.0).abs() < 1e-9);
        assert!(v.y.abs() < 1e-9);
    }

    #[test]
    fn test_window_trims_old_samples() {
        let mut tracker = VelocityTracker::new();
        tracker.push(0.0, Point::ZERO);
        tracker.push(50.0, Point::new(5.0, 0.0));
        tracker.push(250.0, Point::new(10.0, 0.0));
        // The first two samples are older than the 100ms window.
        assert_eq!(tracker.len(), 1);
        assert_eq!(tracker.velocity(), Vec2::ZERO);
    }

    #[test]
    fn test_out_of_order_sample_dropped() {
        let mut tracker = VelocityTracker::new();
        tracker.push(20.0, Point::new(10.0, 0.0));
        tracker.push(10.0, Point::new(100.0, 0.0));
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn test_zero_elapsed_reports_zero() {
        let mut tracker = VelocityTracker::new();
        tracker.push(10.0, Point::ZERO);
        tracker.push(10.0, Point::new(50.0, 0.0));
        assert_eq!(tracker.velocity(), Vec2::ZERO);
    }

    #[test]
    fn test_clear_resets() {
        let mut tracker = VelocityTracker::new();
        tracker.push(0.0, Point::ZERO);
        tracker.push(10.0, Point::new(5.0, 0.0));
        tracker.clear();
        assert!(tracker.is_empty());
        assert_eq!(tracker.velocity(), Vec2::ZERO);
    }
}
