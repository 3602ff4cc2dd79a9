//! egui widget driving a swipedeck card stack.
//!
//! This crate is the reference pairing of the two collaborators the core
//! engine expects: it feeds egui pointer input into a
//! [`CardStack`](swipedeck_core::CardStack) and hands each card's computed
//! [`CardRenderState`] to a caller-supplied paint closure. No interaction or
//! geometry logic lives here.

use egui::{Pos2, Rect, Sense, Ui, vec2};
use kurbo::{Size, Vec2};
use swipedeck_core::{CardAlignment, CardRenderState, CardStack};

/// Default colors for [`card_frame`].
pub mod theme {
    use egui::Color32;

    /// Card background.
    pub const CARD_BG: Color32 = Color32::from_rgb(250, 250, 252);
    /// Card border.
    pub const CARD_BORDER: Color32 = Color32::from_rgb(220, 220, 220);
    /// Shadow color at full elevation.
    pub const SHADOW: Color32 = Color32::from_black_alpha(40);
}

/// Margin between the stack area edge and the anchored card edge.
pub const ANCHOR_MARGIN: f32 = 16.0;

/// Corner radius used by [`card_frame`].
pub const CARD_RADIUS: u8 = 12;

/// Show a card stack inside the available space.
///
/// Allocates the remaining rect, synchronizes the engine viewport, advances
/// the settle animation with egui's clock, paints cards back to front via
/// `draw_card`, and routes drag input on the front card back into the
/// engine.
pub fn card_stack<T>(
    ui: &mut Ui,
    stack: &mut CardStack<T>,
    mut draw_card: impl FnMut(&mut Ui, &T, &CardRenderState, Rect),
) {
    let container = ui.available_rect_before_wrap();
    let _ = ui.allocate_rect(container, Sense::hover());

    stack.set_viewport(Size::new(
        container.width() as f64,
        container.height() as f64,
    ));
    let now_ms = ui.input(|i| i.time) * 1000.0;
    stack.tick(now_ms);

    let card_size = stack.config().card_size;
    let card = vec2(card_size.width as f32, card_size.height as f32);
    let anchor = anchor_center(stack.config().alignment, container, card);

    let mut front_rect = None;
    let cards: Vec<(&T, CardRenderState)> = stack.cards().collect();
    // Painter's algorithm: the front card (highest z) is drawn last.
    for (item, state) in cards.iter().rev() {
        let center = anchor
            + vec2(
                state.translation.x as f32,
                state.translation.y as f32,
            );
        let rect = Rect::from_center_size(center, card * state.scale as f32);
        draw_card(ui, *item, state, rect);
        if state.z_index == cards.len() {
            front_rect = Some(rect);
        }
    }

    if let Some(front_rect) = front_rect {
        let response = ui.interact(front_rect, ui.id().with("swipedeck-front"), Sense::drag());
        if response.drag_started() {
            stack.begin_drag(now_ms);
        }
        if response.dragged() {
            let delta = response.drag_delta();
            stack.drag_by(Vec2::new(delta.x as f64, delta.y as f64), now_ms);
        }
        if response.drag_stopped() {
            stack.end_drag(now_ms);
        }
    }

    if stack.is_animating() {
        ui.ctx().request_repaint();
    }
}

/// Paint a plain card frame (shadow, background, border) for the given
/// render state. Useful as the base layer of a `draw_card` closure.
pub fn card_frame(ui: &mut Ui, state: &CardRenderState, rect: Rect) {
    let painter = ui.painter();
    let shadow_offset = (state.elevation as f32 / 2.0).min(8.0);
    painter.rect_filled(
        rect.translate(vec2(0.0, shadow_offset)),
        CARD_RADIUS,
        theme::SHADOW,
    );
    painter.rect_filled(rect, CARD_RADIUS, theme::CARD_BG);
    painter.rect_stroke(
        rect,
        CARD_RADIUS,
        egui::Stroke::new(1.0, theme::CARD_BORDER),
        egui::StrokeKind::Inside,
    );
}

/// Resting center of the front card, anchored per alignment inside the
/// container with a fixed margin.
fn anchor_center(alignment: CardAlignment, container: Rect, card: egui::Vec2) -> Pos2 {
    let half = card / 2.0;
    let left = container.left() + ANCHOR_MARGIN + half.x;
    let right = container.right() - ANCHOR_MARGIN - half.x;
    let top = container.top() + ANCHOR_MARGIN + half.y;
    let bottom = container.bottom() - ANCHOR_MARGIN - half.y;
    let center = container.center();
    match alignment {
        CardAlignment::Top => Pos2::new(center.x, top),
        CardAlignment::TopStart => Pos2::new(left, top),
        CardAlignment::TopEnd => Pos2::new(right, top),
        CardAlignment::Bottom => Pos2::new(center.x, bottom),
        CardAlignment::BottomStart => Pos2::new(left, bottom),
        CardAlignment::BottomEnd => Pos2::new(right, bottom),
        CardAlignment::Start => Pos2::new(left, center.y),
        CardAlignment::End => Pos2::new(right, center.y),
    }
}
