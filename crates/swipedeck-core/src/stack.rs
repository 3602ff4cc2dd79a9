//! Stack controller: owns the ordered items, the gesture state machine and
//! the per-frame fan-out of card transforms.

use kurbo::{Point, Size, Vec2};
use log::{debug, trace};

use crate::animation::SettleAnimation;
use crate::classifier::{self, SwipeDirection};
use crate::config::{ConfigError, StackConfiguration};
use crate::geometry;
use crate::velocity::VelocityTracker;

/// Elevation gained per step toward the front of the stack.
pub const ELEVATION_STEP: f64 = 4.0;

/// Per-frame derived transform for one card.
///
/// Recomputed every frame from the stack state; never stored. The renderer
/// applies `scale` uniformly about the card center, then `translation`, and
/// composites cards by ascending `z_index` (painter's algorithm).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardRenderState {
    /// Uniform scale factor.
    pub scale: f64,
    /// Translation from the card's anchored resting position.
    pub translation: Vec2,
    /// Shadow/depth hint; larger toward the front.
    pub elevation: f64,
    /// Stacking order; strictly decreases from front to back.
    pub z_index: usize,
}

/// Phase of the gesture state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackPhase {
    /// No active gesture; the front card may accept a new one.
    Idle,
    /// The front card is following the pointer.
    Dragging,
    /// The release animation is running; new gestures are blocked.
    Settling,
}

/// Per-gesture state for the front card.
///
/// Exists only while a drag is active; holds the cumulative axis-masked
/// offset and the velocity sample window.
#[derive(Debug, Clone)]
pub struct DragSession {
    offset: Vec2,
    tracker: VelocityTracker,
}

impl DragSession {
    fn new(now_ms: f64) -> Self {
        let mut tracker = VelocityTracker::new();
        // Anchor the window at the gesture origin so the first move event
        // already yields a velocity.
        tracker.push(now_ms, Point::ZERO);
        Self {
            offset: Vec2::ZERO,
            tracker,
        }
    }

    fn push(&mut self, delta: Vec2, now_ms: f64) {
        self.offset += delta;
        self.tracker.push(now_ms, Point::ZERO + self.offset);
    }

    /// Cumulative pointer offset since the gesture started.
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Current velocity estimate in px/s.
    pub fn velocity(&self) -> Vec2 {
        self.tracker.velocity()
    }
}

/// Ordered stack of cards plus the gesture/settle state machine.
///
/// Items are opaque and owned by the stack; index 0 is the front card, the
/// only one that receives pointer input. All methods are synchronous; the
/// caller drives the settle animation by calling [`CardStack::tick`] once
/// per frame with a monotonically increasing timestamp.
#[derive(Debug)]
pub struct CardStack<T> {
    items: Vec<T>,
    config: StackConfiguration,
    viewport: Size,
    threshold: f64,
    spacing: f64,
    /// Front card offset, driven by the drag session or the settle animation.
    offset: Vec2,
    session: Option<DragSession>,
    settle: Option<SettleAnimation>,
    pending_swipe: Option<SwipeDirection>,
}

impl<T> CardStack<T> {
    /// Create a stack from an initial ordered sequence.
    ///
    /// Fails fast on a malformed configuration; an empty sequence is valid
    /// and simply renders nothing and accepts no gestures.
    pub fn new(
        items: Vec<T>,
        config: StackConfiguration,
        viewport: Size,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut stack = Self {
            items,
            config,
            viewport,
            threshold: 0.0,
            spacing: 0.0,
            offset: Vec2::ZERO,
            session: None,
            settle: None,
            pending_swipe: None,
        };
        stack.recompute_metrics();
        Ok(stack)
    }

    fn recompute_metrics(&mut self) {
        self.threshold = self.config.swipe_threshold(self.viewport);
        self.spacing = self.config.spacing_px(self.viewport);
    }

    /// The stack configuration.
    pub fn config(&self) -> &StackConfiguration {
        &self.config
    }

    /// Items in z-order; index 0 is the front card.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Number of cards.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the stack holds no cards.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The front card, if any.
    pub fn front(&self) -> Option<&T> {
        self.items.first()
    }

    /// Current phase of the gesture state machine.
    pub fn phase(&self) -> StackPhase {
        if self.settle.is_some() {
            StackPhase::Settling
        } else if self.session.is_some() {
            StackPhase::Dragging
        } else {
            StackPhase::Idle
        }
    }

    /// Whether the release animation is still settling.
    pub fn is_animating(&self) -> bool {
        self.settle.is_some()
    }

    /// Current front card offset.
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Swipe velocity threshold in px/s for the current viewport.
    pub fn swipe_threshold(&self) -> f64 {
        self.threshold
    }

    /// Signed global drag progress in `[-1, 1]`, shared by all cards.
    pub fn progress(&self) -> f64 {
        classifier::swipe_progress(self.offset, self.threshold)
    }

    /// Swipe direction decided at release, until the settle lands.
    pub fn pending_swipe(&self) -> Option<SwipeDirection> {
        self.pending_swipe
    }

    /// Update the viewport; re-derives the swipe threshold and spacing.
    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
        self.recompute_metrics();
    }

    /// Begin a gesture on the front card.
    ///
    /// Returns false (and does nothing) while the settle animation is
    /// running, while another session is active, or when the stack is empty.
    pub fn begin_drag(&mut self, now_ms: f64) -> bool {
        if self.is_animating() {
            trace!("drag ignored: settle in progress");
            return false;
        }
        if self.session.is_some() {
            trace!("drag ignored: session already active");
            return false;
        }
        if self.items.is_empty() {
            trace!("drag ignored: empty stack");
            return false;
        }
        self.session = Some(DragSession::new(now_ms));
        self.offset = Vec2::ZERO;
        trace!("drag started at {now_ms}ms");
        true
    }

    /// Feed an incremental pointer delta into the active session.
    ///
    /// The delta is component-masked by the configured drag axis before it
    /// accumulates. No-op outside the `Dragging` phase.
    pub fn drag_by(&mut self, delta: Vec2, now_ms: f64) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.push(self.config.drag_axis.mask(delta), now_ms);
        self.offset = session.offset();
    }

    /// End the gesture: classify the release and start the settle animation
    /// toward the exit target (confirmed swipe) or back to zero.
    pub fn end_drag(&mut self, now_ms: f64) {
        let Some(session) = self.session.take() else {
            return;
        };
        let velocity = session.velocity();
        let confirmed = classifier::classify_swipe(velocity, session.offset(), self.threshold);
        let target = match confirmed {
            Some(direction) => {
                geometry::exit_offset(direction, self.config.alignment, self.config.card_size)
            }
            None => Vec2::ZERO,
        };
        debug!(
            "drag released: velocity=({:.0}, {:.0}) px/s, swipe={confirmed:?}",
            velocity.x, velocity.y
        );
        self.pending_swipe = confirmed;
        self.settle = Some(SettleAnimation::new(self.offset, target, now_ms));
    }

    /// Advance the settle animation to `now_ms`.
    ///
    /// While settling, the animating offset keeps driving the global
    /// progress, so back cards glide continuously into their new slots. When
    /// the animation lands, the reorder policy applies atomically with the
    /// reset: offset exactly zero, progress zero, no longer animating.
    pub fn tick(&mut self, now_ms: f64) {
        let Some(settle) = self.settle else {
            return;
        };
        self.offset = settle.value(now_ms);
        if settle.is_finished(now_ms) {
            if let Some(direction) = self.pending_swipe.take() {
                self.apply_reorder(direction);
            }
            self.settle = None;
            self.offset = Vec2::ZERO;
            trace!("settle finished at {now_ms}ms");
        }
    }

    /// Rotate the sequence for a confirmed swipe.
    ///
    /// RIGHT/UP advance (front card goes to the back); LEFT/DOWN rewind (the
    /// back card returns to the front). Size-preserving in both cases.
    fn apply_reorder(&mut self, direction: SwipeDirection) {
        if self.items.len() < 2 {
            return;
        }
        match direction {
            SwipeDirection::Right | SwipeDirection::Up => self.items.rotate_left(1),
            SwipeDirection::Left | SwipeDirection::Down => self.items.rotate_right(1),
        }
        debug!("stack rotated on {direction:?} swipe");
    }

    /// Replace the item sequence.
    ///
    /// Any active drag or settle is cancelled and the gesture state is
    /// force-reset to `Idle` with a zero offset.
    pub fn replace_items(&mut self, items: Vec<T>) {
        if self.session.is_some() || self.settle.is_some() {
            debug!("sequence replaced mid-gesture, resetting to idle");
        }
        self.session = None;
        self.settle = None;
        self.pending_swipe = None;
        self.offset = Vec2::ZERO;
        self.items = items;
    }

    /// Per-card transforms for the current frame, front first.
    pub fn render_states(&self) -> Vec<CardRenderState> {
        let count = self.items.len();
        let progress = self.progress();
        (0..count)
            .map(|index| self.render_state(index, count, progress))
            .collect()
    }

    /// Iterate items with their current transforms, front first.
    pub fn cards(&self) -> impl Iterator<Item = (&T, CardRenderState)> + '_ {
        let count = self.items.len();
        let progress = self.progress();
        self.items
            .iter()
            .enumerate()
            .map(move |(index, item)| (item, self.render_state(index, count, progress)))
    }

    fn render_state(&self, index: usize, count: usize, progress: f64) -> CardRenderState {
        let alignment = self.config.alignment;
        let scale = geometry::card_scale(index, count, progress);
        let mut translation = geometry::base_offset(index, alignment, self.spacing)
            + geometry::drag_shift(index, count, progress, alignment, self.spacing)
            + geometry::alignment_compensation(alignment, self.config.card_size, scale);
        if index == 0 {
            // The front card follows the pointer (or the settle animation)
            // directly.
            translation += self.offset;
        }
        CardRenderState {
            scale,
            translation,
            elevation: (count - index) as f64 * ELEVATION_STEP,
            z_index: count - index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::SETTLE_DURATION_MS;
    use crate::config::{CardAlignment, DragAxis};

    const VIEWPORT: Size = Size::new(400.0, 800.0);

    fn stack_with(items: Vec<&'static str>, drag_axis: DragAxis) -> CardStack<&'static str> {
        let config = StackConfiguration::new(
            Size::new(300.0, 200.0),
            0.05,
            CardAlignment::Bottom,
            drag_axis,
        )
        .unwrap();
        CardStack::new(items, config, VIEWPORT).unwrap()
    }

    /// Drag the front card with enough speed to cross the 240 px/s threshold.
    fn fling(stack: &mut CardStack<&'static str>, delta: Vec2) {
        assert!(stack.begin_drag(0.0));
        for i in 1..=3 {
            stack.drag_by(delta, i as f64 * 10.0);
        }
        stack.end_drag(30.0);
    }

    fn settle(stack: &mut CardStack<&'static str>, release_ms: f64) {
        stack.tick(release_ms + SETTLE_DURATION_MS);
    }

    #[test]
    fn test_right_swipe_rotates_front_to_back() {
        let mut stack = stack_with(vec!["a", "b", "c"], DragAxis::Free);
        fling(&mut stack, Vec2::new(30.0, 0.0));
        assert_eq!(stack.pending_swipe(), Some(SwipeDirection::Right));
        settle(&mut stack, 30.0);
        assert_eq!(stack.items(), &["b", "c", "a"]);
    }

    #[test]
    fn test_up_swipe_rotates_front_to_back() {
        let mut stack = stack_with(vec!["a", "b", "c"], DragAxis::Free);
        fling(&mut stack, Vec2::new(0.0, -40.0));
        settle(&mut stack, 30.0);
        assert_eq!(stack.items(), &["b", "c", "a"]);
    }

    #[test]
    fn test_left_swipe_brings_back_card_to_front() {
        let mut stack = stack_with(vec!["a", "b", "c"], DragAxis::Free);
        fling(&mut stack, Vec2::new(-30.0, 0.0));
        assert_eq!(stack.pending_swipe(), Some(SwipeDirection::Left));
        settle(&mut stack, 30.0);
        assert_eq!(stack.items(), &["c", "a", "b"]);
    }

    #[test]
    fn test_down_swipe_brings_back_card_to_front() {
        let mut stack = stack_with(vec!["a", "b", "c"], DragAxis::Free);
        fling(&mut stack, Vec2::new(0.0, 40.0));
        settle(&mut stack, 30.0);
        assert_eq!(stack.items(), &["c", "a", "b"]);
    }

    #[test]
    fn test_weak_drag_bounces_back() {
        // Small offset, slow release: order unchanged, offset settles to
        // exactly zero.
        let mut stack = stack_with(vec!["a", "b", "c"], DragAxis::Free);
        assert!(stack.begin_drag(0.0));
        stack.drag_by(Vec2::new(5.0, 0.0), 100.0);
        stack.end_drag(100.0);
        assert_eq!(stack.pending_swipe(), None);
        settle(&mut stack, 100.0);
        assert_eq!(stack.items(), &["a", "b", "c"]);
        assert_eq!(stack.offset(), Vec2::ZERO);
        assert_eq!(stack.phase(), StackPhase::Idle);
    }

    #[test]
    fn test_rotation_preserves_items() {
        let mut stack = stack_with(vec!["a", "b", "c", "d"], DragAxis::Free);
        for delta in [Vec2::new(30.0, 0.0), Vec2::new(-30.0, 0.0), Vec2::new(0.0, -40.0)] {
            fling(&mut stack, delta);
            settle(&mut stack, 30.0);
            let mut sorted = stack.items().to_vec();
            sorted.sort_unstable();
            assert_eq!(sorted, vec!["a", "b", "c", "d"]);
            assert_eq!(stack.len(), 4);
        }
    }

    #[test]
    fn test_reset_after_settle_regardless_of_outcome() {
        for delta in [Vec2::new(30.0, 0.0), Vec2::new(0.2, 0.0)] {
            let mut stack = stack_with(vec!["a", "b"], DragAxis::Free);
            fling(&mut stack, delta);
            settle(&mut stack, 30.0);
            assert_eq!(stack.offset(), Vec2::ZERO);
            assert!(!stack.is_animating());
            assert!(stack.progress().abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_no_gesture_while_settling() {
        let mut stack = stack_with(vec!["a", "b", "c"], DragAxis::Free);
        fling(&mut stack, Vec2::new(30.0, 0.0));
        assert_eq!(stack.phase(), StackPhase::Settling);
        assert!(!stack.begin_drag(40.0));
        // The blocked gesture must not have disturbed the settle.
        assert_eq!(stack.phase(), StackPhase::Settling);
        settle(&mut stack, 30.0);
        assert!(stack.begin_drag(400.0));
    }

    #[test]
    fn test_no_gesture_on_empty_stack() {
        let mut stack = stack_with(vec![], DragAxis::Free);
        assert!(!stack.begin_drag(0.0));
        assert!(stack.render_states().is_empty());
        // end_drag without a session is a no-op.
        stack.end_drag(10.0);
        assert_eq!(stack.phase(), StackPhase::Idle);
    }

    #[test]
    fn test_reorder_is_held_until_settle_lands() {
        let mut stack = stack_with(vec!["a", "b", "c"], DragAxis::Free);
        fling(&mut stack, Vec2::new(30.0, 0.0));
        stack.tick(30.0 + SETTLE_DURATION_MS / 2.0);
        assert_eq!(stack.items(), &["a", "b", "c"]);
        assert!(stack.is_animating());
        settle(&mut stack, 30.0);
        assert_eq!(stack.items(), &["b", "c", "a"]);
    }

    #[test]
    fn test_drag_axis_masks_deltas() {
        let mut stack = stack_with(vec!["a", "b"], DragAxis::Vertical);
        assert!(stack.begin_drag(0.0));
        stack.drag_by(Vec2::new(50.0, 20.0), 10.0);
        assert_eq!(stack.offset(), Vec2::new(0.0, 20.0));
    }

    #[test]
    fn test_replace_items_mid_drag_resets() {
        let mut stack = stack_with(vec!["a", "b", "c"], DragAxis::Free);
        assert!(stack.begin_drag(0.0));
        stack.drag_by(Vec2::new(40.0, 0.0), 10.0);
        stack.replace_items(vec!["x", "y"]);
        assert_eq!(stack.phase(), StackPhase::Idle);
        assert_eq!(stack.offset(), Vec2::ZERO);
        assert_eq!(stack.items(), &["x", "y"]);
        // The new sequence accepts gestures right away.
        assert!(stack.begin_drag(20.0));
    }

    #[test]
    fn test_replace_items_cancels_settle() {
        let mut stack = stack_with(vec!["a", "b", "c"], DragAxis::Free);
        fling(&mut stack, Vec2::new(30.0, 0.0));
        stack.replace_items(vec!["x", "y", "z"]);
        assert!(!stack.is_animating());
        // The cancelled swipe must not reorder the new sequence.
        stack.tick(1000.0);
        assert_eq!(stack.items(), &["x", "y", "z"]);
    }

    #[test]
    fn test_single_item_swipe_keeps_order() {
        let mut stack = stack_with(vec!["only"], DragAxis::Free);
        fling(&mut stack, Vec2::new(30.0, 0.0));
        settle(&mut stack, 30.0);
        assert_eq!(stack.items(), &["only"]);
    }

    #[test]
    fn test_z_index_strictly_decreases() {
        let stack = stack_with(vec!["a", "b", "c", "d"], DragAxis::Free);
        let states = stack.render_states();
        for pair in states.windows(2) {
            assert!(pair[0].z_index > pair[1].z_index);
            assert!(pair[0].elevation > pair[1].elevation);
        }
    }

    #[test]
    fn test_front_card_follows_offset() {
        let mut stack = stack_with(vec!["a", "b", "c"], DragAxis::Free);
        assert!(stack.begin_drag(0.0));
        stack.drag_by(Vec2::new(25.0, -10.0), 10.0);
        let states = stack.render_states();
        // Front card: scale 1, so the bottom-anchor compensation vanishes
        // and the translation is the raw drag offset.
        assert!((states[0].scale - 1.0).abs() < f64::EPSILON);
        assert_eq!(states[0].translation, Vec2::new(25.0, -10.0));
    }

    #[test]
    fn test_resting_geometry_matches_base_offsets() {
        // spacing = 0.05 * 800 = 40px, bottom-anchored: cards fan upward.
        let stack = stack_with(vec!["a", "b", "c"], DragAxis::Free);
        let states = stack.render_states();
        assert_eq!(states[0].translation, Vec2::ZERO);
        // Back cards carry the bottom-edge compensation on top of the fan
        // offset: -40*i + h*(1-scale)/2.
        assert!((states[1].translation.y - (-40.0 + 200.0 * 0.05 / 2.0)).abs() < 1e-9);
        assert!((states[2].translation.y - (-80.0 + 200.0 * 0.10 / 2.0)).abs() < 1e-9);
    }

    #[test]
    fn test_progress_tracks_drag() {
        let mut stack = stack_with(vec!["a", "b"], DragAxis::Free);
        // threshold = 0.6 * 400 = 240.
        assert!(stack.begin_drag(0.0));
        stack.drag_by(Vec2::new(120.0, 0.0), 10.0);
        assert!((stack.progress() - 0.5).abs() < 1e-9);
        // Vertical drags negate: upward motion is positive progress.
        stack.drag_by(Vec2::new(-120.0, -240.0), 20.0);
        assert!((stack.progress() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_set_viewport_rederives_threshold() {
        let mut stack = stack_with(vec!["a"], DragAxis::Free);
        assert!((stack.swipe_threshold() - 240.0).abs() < f64::EPSILON);
        stack.set_viewport(Size::new(1000.0, 500.0));
        assert!((stack.swipe_threshold() - 300.0).abs() < f64::EPSILON);
    }
}
