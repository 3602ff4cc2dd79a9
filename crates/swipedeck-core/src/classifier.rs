//! Swipe classification: velocity + displacement in, direction + progress out.

use kurbo::Vec2;
use serde::{Deserialize, Serialize};

/// Direction of a swipe, in screen coordinates (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwipeDirection {
    Left,
    Right,
    Up,
    Down,
}

impl SwipeDirection {
    /// True for `Left` and `Right`.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }
}

/// Candidate swipe direction from a release velocity and the cumulative
/// gesture offset.
///
/// The dominant velocity axis picks the candidate axis; velocity and offset
/// must then agree in sign on that axis, otherwise the gesture was not a
/// clean swipe (e.g. a flick back toward the origin) and no direction is
/// reported.
pub fn swipe_direction(velocity: Vec2, offset: Vec2) -> Option<SwipeDirection> {
    let horizontal = velocity.x.abs() > velocity.y.abs();
    if horizontal {
        if velocity.x > 0.0 && offset.x > 0.0 {
            Some(SwipeDirection::Right)
        } else if velocity.x < 0.0 && offset.x < 0.0 {
            Some(SwipeDirection::Left)
        } else {
            None
        }
    } else if velocity.y > 0.0 && offset.y > 0.0 {
        Some(SwipeDirection::Down)
    } else if velocity.y < 0.0 && offset.y < 0.0 {
        Some(SwipeDirection::Up)
    } else {
        None
    }
}

/// Classify a gesture release: a swipe is confirmed only if a direction was
/// found and the dominant velocity component exceeds `threshold` px/s.
pub fn classify_swipe(velocity: Vec2, offset: Vec2, threshold: f64) -> Option<SwipeDirection> {
    let direction = swipe_direction(velocity, offset)?;
    let speed = velocity.x.abs().max(velocity.y.abs());
    (speed > threshold).then_some(direction)
}

/// Continuous signed drag progress in `[-1, 1]`.
///
/// Each offset component is normalized by the swipe threshold and clamped;
/// the axis with the larger magnitude wins. The vertical axis is negated so
/// that dragging the card away from the stack maps to positive progress on
/// both axes.
pub fn swipe_progress(offset: Vec2, threshold: f64) -> f64 {
    if threshold <= 0.0 {
        return 0.0;
    }
    let px = (offset.x / threshold).clamp(-1.0, 1.0);
    let py = (offset.y / threshold).clamp(-1.0, 1.0);
    if px.abs() >= py.abs() { px } else { -py }
}
