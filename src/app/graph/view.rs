use eframe::egui::{self, Align2, Color32, FontId, Sense, Stroke, Ui, vec2};
use forcegraph::graph::Category;

use super::super::ViewModel;
use super::super::render_utils::{
    NODE_RADIUS, PHOTO_RADIUS, PHOTO_RING_RADIUS, category_color, draw_background, label_color,
    link_color, world_to_screen,
};

impl ViewModel {
    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        draw_background(&painter, rect, self.pan, self.zoom);

        self.handle_graph_zoom(ui, rect, &response);
        self.handle_graph_pan(&response);
        let grab_targets = self.screen_nodes(rect);
        self.handle_node_drag(ui, rect, &response, &grab_targets);

        let ticked = self.simulation.tick().is_some();
        self.collect_diagnostics();
        if ticked || self.dragging.is_some() || response.dragged() {
            ui.ctx().request_repaint();
        }

        let pan = self.pan;
        let zoom = self.zoom;
        let nodes = self.screen_nodes(rect);
        let snapshot = self.simulation.snapshot();

        if self.show_quadtree_overlay {
            for cell in self.simulation.spatial_index().cells() {
                let half = cell.half_extent as f32;
                let center = vec2(cell.center.x as f32, cell.center.y as f32);
                let top_left = world_to_screen(rect, pan, zoom, center - vec2(half, half));
                let top_right = world_to_screen(rect, pan, zoom, center + vec2(half, -half));
                let bottom_right = world_to_screen(rect, pan, zoom, center + vec2(half, half));
                let bottom_left = world_to_screen(rect, pan, zoom, center + vec2(-half, half));

                let alpha = if cell.is_leaf { 110 } else { 55 };
                let line_width: f32 =
                    (1.4_f32 - (cell.depth as f32 * 0.09_f32)).clamp(0.45_f32, 1.4_f32);
                let stroke = Stroke::new(
                    line_width,
                    Color32::from_rgba_unmultiplied(106, 198, 255, alpha),
                );

                painter.line_segment([top_left, top_right], stroke);
                painter.line_segment([top_right, bottom_right], stroke);
                painter.line_segment([bottom_right, bottom_left], stroke);
                painter.line_segment([bottom_left, top_left], stroke);
            }
        }

        let link_stroke = Stroke::new((2.0 * zoom).max(0.5), link_color());
        for link in &snapshot.links {
            let (Some(source), Some(target)) = (
                snapshot.position(&link.source),
                snapshot.position(&link.target),
            ) else {
                continue;
            };
            let start = world_to_screen(rect, pan, zoom, vec2(source.0 as f32, source.1 as f32));
            let end = world_to_screen(rect, pan, zoom, vec2(target.0 as f32, target.1 as f32));
            if rect.intersects(egui::Rect::from_two_pos(start, end)) {
                painter.line_segment([start, end], link_stroke);
            }
        }

        let hovered = ui
            .input(|input| input.pointer.hover_pos())
            .filter(|pointer| rect.contains(*pointer))
            .and_then(|pointer| Self::node_at(&nodes, pointer));
        if hovered.is_some() && self.dragging.is_none() {
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });
        }

        let font_size = (12.0 * zoom).clamp(7.0, 28.0);
        let draw_all_labels = self.show_labels && zoom >= 0.3;
        for screen_node in &nodes {
            let node = &snapshot.nodes[screen_node.index];
            let category = self.category_of(&node.id);
            let position = screen_node.position;
            let is_selected = self.selected.as_deref() == Some(node.id.as_str());
            let is_hovered = hovered == Some(screen_node.index);

            if category == Category::Photo {
                painter.circle_filled(
                    position,
                    PHOTO_RADIUS * zoom,
                    Color32::from_rgb(30, 27, 75),
                );
                painter.circle_stroke(
                    position,
                    PHOTO_RING_RADIUS * zoom,
                    Stroke::new(3.0 * zoom, category_color(Category::Photo)),
                );
            } else {
                painter.circle_filled(position, NODE_RADIUS * zoom, category_color(category));
                painter.circle_stroke(
                    position,
                    NODE_RADIUS * zoom,
                    Stroke::new(2.0 * zoom, Color32::WHITE),
                );
            }

            if is_selected || is_hovered {
                let halo = if is_selected {
                    Color32::from_rgb(245, 206, 93)
                } else {
                    Color32::from_rgba_unmultiplied(226, 232, 240, 140)
                };
                painter.circle_stroke(
                    position,
                    screen_node.radius + 4.0,
                    Stroke::new(1.6, halo),
                );
            }

            if node.pinned {
                painter.circle_filled(position, (2.5 * zoom).max(1.5), Color32::WHITE);
            }

            if draw_all_labels || is_selected || is_hovered {
                let label = self
                    .node_lookup
                    .get(&node.id)
                    .map(|&index| self.document.nodes[index].display_label())
                    .unwrap_or(node.id.as_str());
                painter.text(
                    position + vec2(0.0, 45.0 * zoom),
                    Align2::CENTER_BOTTOM,
                    label,
                    FontId::proportional(font_size),
                    label_color(),
                );
            }
        }

        if let Some(index) = hovered {
            let node = &snapshot.nodes[index];
            let panel_text = format!(
                "{}  |  {}  |  ({:.0}, {:.0})",
                node.id,
                self.category_of(&node.id).label(),
                node.x,
                node.y
            );
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                panel_text,
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );
        }

        if response.clicked_by(egui::PointerButton::Primary) {
            let clicked = hovered.map(|index| snapshot.nodes[index].id.clone());
            self.selected = clicked;
        }
    }
}
