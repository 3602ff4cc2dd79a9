//! Pure per-card geometry: resting offsets, scales, drag-driven secondary
//! motion and the compensation that keeps the anchored edge fixed while a
//! card scales about its center.
//!
//! Everything here is a free function of the card's stacking index (0 =
//! front), the stack size, the alignment and the live drag progress, so the
//! controller can recompute every card's transform each frame without any
//! retained state.

use kurbo::{Size, Vec2};

use crate::classifier::SwipeDirection;
use crate::config::CardAlignment;

/// Scale lost per stacking index (card 1 rests at 0.95, card 2 at 0.90, ...).
pub const SCALE_STEP: f64 = 0.05;

/// How far past its own size a swiped card travels before it is considered
/// off screen.
pub const EXIT_DISTANCE_FACTOR: f64 = 1.5;

/// Unit vector along which cards fan out from the anchor.
///
/// Vertically anchored stacks fan along the vertical axis only (a corner
/// anchor does not skew the fan sideways); `Start`/`End` fan horizontally.
fn fan_direction(alignment: CardAlignment) -> Vec2 {
    match alignment {
        CardAlignment::Top | CardAlignment::TopStart | CardAlignment::TopEnd => Vec2::new(0.0, 1.0),
        CardAlignment::Bottom | CardAlignment::BottomStart | CardAlignment::BottomEnd => {
            Vec2::new(0.0, -1.0)
        }
        CardAlignment::Start => Vec2::new(1.0, 0.0),
        CardAlignment::End => Vec2::new(-1.0, 0.0),
    }
}

/// Resting offset of the card at `index`, relative to the front slot.
pub fn base_offset(index: usize, alignment: CardAlignment, spacing: f64) -> Vec2 {
    fan_direction(alignment) * (spacing * index as f64)
}

/// Scale of the card at `index` for the current drag progress.
///
/// The front card is always exactly 1.0 and never progress-modulated. Back
/// cards rest `SCALE_STEP` smaller per index and inflate by up to
/// `SCALE_STEP` as the front card is dragged away, producing the reveal
/// effect.
pub fn card_scale(index: usize, count: usize, progress: f64) -> f64 {
    if index == 0 {
        return 1.0;
    }
    let progress = progress.clamp(-1.0, 1.0);
    let reveal = (SCALE_STEP * count.saturating_sub(index + 1) as f64).min(SCALE_STEP);
    (1.0 - SCALE_STEP * index as f64 + reveal * progress.abs()).max(0.0)
}

/// Hermite smoothstep, clamped to the unit interval.
pub fn smoothstep(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Secondary motion of a back card while the front card is being dragged.
///
/// Cards closer to the front follow more of the drag; at full progress a
/// card has shifted exactly one slot toward the front. The back-most card is
/// special-cased for negative progress: it arrives from behind while the
/// previous card is being pulled back to the front.
pub fn drag_shift(
    index: usize,
    count: usize,
    progress: f64,
    alignment: CardAlignment,
    spacing: f64,
) -> Vec2 {
    if index == 0 || count == 0 {
        return Vec2::ZERO;
    }
    let progress = progress.clamp(-1.0, 1.0);
    let p = if index == count - 1 && progress < 0.0 {
        (-progress).clamp(0.0, 1.0)
    } else {
        (progress * (1.0 - index as f64 / count as f64)).clamp(-1.0, 1.0)
    };
    let eased = smoothstep(p.abs());
    // Toward the front slot, i.e. against the fan direction.
    -fan_direction(alignment) * (spacing * eased * p.signum())
}

/// Translation that keeps the anchored edge/corner visually fixed after a
/// card has been scaled about its geometric center.
pub fn alignment_compensation(alignment: CardAlignment, card_size: Size, scale: f64) -> Vec2 {
    let dx = card_size.width * (1.0 - scale) / 2.0;
    let dy = card_size.height * (1.0 - scale) / 2.0;
    match alignment {
        CardAlignment::Top => Vec2::new(0.0, -dy),
        CardAlignment::TopStart => Vec2::new(-dx, -dy),
        CardAlignment::TopEnd => Vec2::new(dx, -dy),
        CardAlignment::Bottom => Vec2::new(0.0, dy),
        CardAlignment::BottomStart => Vec2::new(-dx, dy),
        CardAlignment::BottomEnd => Vec2::new(dx, dy),
        CardAlignment::Start => Vec2::new(-dx, 0.0),
        CardAlignment::End => Vec2::new(dx, 0.0),
    }
}

/// Target offset for a confirmed swipe: the card leaves along the swiped
/// axis at 1.5× its own size. An upward swipe under a bottom-anchored stack
/// only needs to clear the card's own height, since the card already rests
/// at the bottom edge.
pub fn exit_offset(direction: SwipeDirection, alignment: CardAlignment, card_size: Size) -> Vec2 {
    match direction {
        SwipeDirection::Right => Vec2::new(EXIT_DISTANCE_FACTOR * card_size.width, 0.0),
        SwipeDirection::Left => Vec2::new(-EXIT_DISTANCE_FACTOR * card_size.width, 0.0),
        SwipeDirection::Down => Vec2::new(0.0, EXIT_DISTANCE_FACTOR * card_size.height),
        SwipeDirection::Up => {
            if alignment.is_bottom_family() {
                Vec2::new(0.0, -card_size.height)
            } else {
                Vec2::new(0.0, -EXIT_DISTANCE_FACTOR * card_size.height)
            }
        }
    }
}
