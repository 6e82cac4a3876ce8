use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2};
use forcegraph::graph::Category;

pub(super) const MIN_ZOOM: f32 = 0.1;
pub(super) const MAX_ZOOM: f32 = 4.0;

/// World-space radius of a plain node.
pub(super) const NODE_RADIUS: f32 = 12.0;
/// World-space radius of a photo thumbnail; its ring sits just outside.
pub(super) const PHOTO_RADIUS: f32 = 30.0;
pub(super) const PHOTO_RING_RADIUS: f32 = 32.0;

pub(super) fn category_color(category: Category) -> Color32 {
    match category {
        Category::Photo => Color32::from_rgb(0x8b, 0x5c, 0xf6),
        Category::Location => Color32::from_rgb(0x10, 0xb9, 0x81),
        Category::Date => Color32::from_rgb(0xf5, 0x9e, 0x0b),
        Category::Tag => Color32::from_rgb(0x3b, 0x82, 0xf6),
        Category::Description => Color32::from_rgb(0x64, 0x74, 0x8b),
        Category::Other => Color32::WHITE,
    }
}

pub(super) fn link_color() -> Color32 {
    Color32::from_rgba_unmultiplied(0x47, 0x55, 0x69, 102)
}

pub(super) fn label_color() -> Color32 {
    Color32::from_rgb(0xe2, 0xe8, 0xf0)
}

pub(super) fn draw_background(painter: &Painter, rect: Rect, pan: Vec2, zoom: f32) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(15, 23, 42));

    let step = (56.0 * zoom.clamp(0.6, 1.8)).max(20.0);
    let origin = rect.center() + pan;
    let stroke = Stroke::new(1.0, Color32::from_rgba_unmultiplied(51, 65, 85, 60));

    let mut x = rect.left() + (origin.x - rect.left()).rem_euclid(step);
    while x < rect.right() {
        painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], stroke);
        x += step;
    }

    let mut y = rect.top() + (origin.y - rect.top()).rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], stroke);
        y += step;
    }
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

pub(super) fn world_to_screen(rect: Rect, pan: Vec2, zoom: f32, world: Vec2) -> Pos2 {
    rect.center() + pan + world * zoom
}

pub(super) fn screen_to_world(rect: Rect, pan: Vec2, zoom: f32, screen: Pos2) -> Vec2 {
    (screen - rect.center() - pan) / zoom
}

/// Zoom step for a scroll delta, keeping `pointer` over the same world point.
/// Returns the new `(pan, zoom)`.
pub(super) fn zoom_about(
    rect: Rect,
    pan: Vec2,
    zoom: f32,
    pointer: Pos2,
    scroll: f32,
) -> (Vec2, f32) {
    let world_before = screen_to_world(rect, pan, zoom, pointer);
    let zoom_factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
    let zoom = (zoom * zoom_factor).clamp(MIN_ZOOM, MAX_ZOOM);
    let pan = pointer - rect.center() - (world_before * zoom);
    (pan, zoom)
}

#[cfg(test)]
mod tests {
    use eframe::egui::{pos2, vec2};

    use super::*;

    fn viewport() -> Rect {
        Rect::from_min_max(pos2(0.0, 0.0), pos2(800.0, 600.0))
    }

    #[test]
    fn screen_and_world_round_trip() {
        let rect = viewport();
        let pan = vec2(35.0, -12.0);
        let world = vec2(-140.0, 72.5);
        let screen = world_to_screen(rect, pan, 1.7, world);
        let back = screen_to_world(rect, pan, 1.7, screen);
        assert!((back - world).length() < 1e-3);
    }

    #[test]
    fn zoom_keeps_pointer_anchored_and_clamps() {
        let rect = viewport();
        let pointer = pos2(610.0, 140.0);
        let pan = vec2(10.0, 20.0);
        let anchor = screen_to_world(rect, pan, 1.0, pointer);

        let (pan, zoom) = zoom_about(rect, pan, 1.0, pointer, 50.0);
        assert!(zoom > 1.0);
        assert!((screen_to_world(rect, pan, zoom, pointer) - anchor).length() < 1e-3);

        let mut state = (pan, zoom);
        for _ in 0..200 {
            state = zoom_about(rect, state.0, state.1, pointer, -500.0);
        }
        assert_eq!(state.1, MIN_ZOOM);
    }

    #[test]
    fn photo_colour_matches_palette() {
        assert_eq!(category_color(Category::Photo), Color32::from_rgb(139, 92, 246));
        assert_eq!(category_color(Category::Other), Color32::WHITE);
    }
}
