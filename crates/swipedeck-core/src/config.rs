//! Stack configuration: card size, spacing, alignment and drag-axis constraint.

use kurbo::{Size, Vec2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Swipe velocity threshold as a fraction of the smaller viewport dimension.
///
/// A fling has to exceed `0.6 × min(viewport.width, viewport.height)` px/s
/// to count as a swipe, so the gesture feels the same across resolutions.
pub const SWIPE_THRESHOLD_FACTOR: f64 = 0.6;

/// Configuration errors reported at construction time.
///
/// These reflect programmer error, not runtime conditions, so they fail fast
/// instead of being clamped like other out-of-range inputs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Card width and height must both be positive.
    #[error("card size must be positive, got {width}x{height}")]
    NonPositiveCardSize { width: f64, height: f64 },
    /// Spacing ratio must be positive.
    #[error("spacing ratio must be positive, got {ratio}")]
    NonPositiveSpacing { ratio: f64 },
}

/// Where the stack is anchored on screen.
///
/// The anchor fixes one edge or corner of the cards; the stack fans out
/// toward the unanchored direction (e.g. `Bottom` fans upward).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CardAlignment {
    Top,
    TopStart,
    TopEnd,
    #[default]
    Bottom,
    BottomStart,
    BottomEnd,
    Start,
    End,
}

impl CardAlignment {
    /// True for `Top`, `TopStart` and `TopEnd`.
    pub fn is_top_family(self) -> bool {
        matches!(self, Self::Top | Self::TopStart | Self::TopEnd)
    }

    /// True for `Bottom`, `BottomStart` and `BottomEnd`.
    pub fn is_bottom_family(self) -> bool {
        matches!(self, Self::Bottom | Self::BottomStart | Self::BottomEnd)
    }

    /// True for the purely horizontal anchors `Start` and `End`.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::Start | Self::End)
    }
}

/// Which pointer-delta components a drag may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DragAxis {
    /// Only vertical motion; horizontal deltas are zeroed.
    Vertical,
    /// Only horizontal motion; vertical deltas are zeroed.
    Horizontal,
    /// Unconstrained.
    #[default]
    Free,
}

impl DragAxis {
    /// Mask a pointer delta down to the allowed components.
    pub fn mask(self, delta: Vec2) -> Vec2 {
        match self {
            Self::Vertical => Vec2::new(0.0, delta.y),
            Self::Horizontal => Vec2::new(delta.x, 0.0),
            Self::Free => delta,
        }
    }
}

/// Immutable per-stack configuration, validated at construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StackConfiguration {
    /// Size of a single card in pixels.
    pub card_size: Size,
    /// Gap reserved between stacked cards, as a fraction of viewport height.
    pub spacing_ratio: f64,
    /// Anchor point of the stack.
    pub alignment: CardAlignment,
    /// Drag-axis constraint for the front card.
    pub drag_axis: DragAxis,
}

impl StackConfiguration {
    /// Create a validated configuration.
    pub fn new(
        card_size: Size,
        spacing_ratio: f64,
        alignment: CardAlignment,
        drag_axis: DragAxis,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            card_size,
            spacing_ratio,
            alignment,
            drag_axis,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration for out-of-range values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.card_size.width <= 0.0 || self.card_size.height <= 0.0 {
            return Err(ConfigError::NonPositiveCardSize {
                width: self.card_size.width,
                height: self.card_size.height,
            });
        }
        if self.spacing_ratio <= 0.0 {
            return Err(ConfigError::NonPositiveSpacing {
                ratio: self.spacing_ratio,
            });
        }
        Ok(())
    }

    /// Inter-card spacing in pixels for the given viewport.
    pub fn spacing_px(&self, viewport: Size) -> f64 {
        self.spacing_ratio * viewport.height
    }

    /// Swipe velocity threshold in px/s for the given viewport.
    pub fn swipe_threshold(&self, viewport: Size) -> f64 {
        SWIPE_THRESHOLD_FACTOR * viewport.width.min(viewport.height)
    }
}
