//! Swipedeck Core Library
//!
//! Platform-agnostic interaction and geometry engine for swipeable card
//! stacks: pointer samples in, per-card transforms and deterministic
//! reordering out. Rendering and the pointer-event source are external
//! collaborators; see `swipedeck-widgets` for an egui pairing of both.

pub mod animation;
pub mod classifier;
pub mod config;
pub mod geometry;
pub mod stack;
pub mod velocity;

pub use animation::{SettleAnimation, SETTLE_DURATION_MS};
pub use classifier::{classify_swipe, swipe_direction, swipe_progress, SwipeDirection};
pub use config::{
    CardAlignment, ConfigError, DragAxis, StackConfiguration, SWIPE_THRESHOLD_FACTOR,
};
pub use stack::{CardRenderState, CardStack, DragSession, StackPhase, ELEVATION_STEP};
pub use velocity::{VelocityTracker, VELOCITY_WINDOW_MS};
