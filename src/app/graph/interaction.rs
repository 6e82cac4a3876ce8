use eframe::egui::{self, Pos2, Rect, Ui, vec2};
use forcegraph::graph::Category;

use super::super::ViewModel;
use super::super::render_utils::{
    NODE_RADIUS, PHOTO_RING_RADIUS, circle_visible, screen_to_world, world_to_screen, zoom_about,
};
use super::ScreenNode;

impl ViewModel {
    pub(in crate::app) fn handle_graph_zoom(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        (self.pan, self.zoom) = zoom_about(rect, self.pan, self.zoom, pointer, scroll);
    }

    pub(in crate::app) fn handle_graph_pan(&mut self, response: &egui::Response) {
        if response.dragged_by(egui::PointerButton::Secondary)
            || response.dragged_by(egui::PointerButton::Middle)
        {
            self.pan += response.drag_delta();
        }
    }

    /// Primary-button drags move nodes through the drag controller, in world
    /// coordinates.
    pub(in crate::app) fn handle_node_drag(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
        nodes: &[ScreenNode],
    ) {
        if response.drag_started_by(egui::PointerButton::Primary) {
            let press_origin = ui.input(|input| input.pointer.press_origin());
            let grabbed = press_origin
                .and_then(|origin| Self::node_at(nodes, origin))
                .map(|index| self.simulation.snapshot().nodes[index].id.clone());
            if let Some(id) = grabbed {
                match self.drag.on_drag_start(&mut self.simulation, &id) {
                    Ok(()) => self.dragging = Some(id),
                    Err(error) => self.last_error = Some(error.to_string()),
                }
            }
        }

        let Some(id) = self.dragging.clone() else {
            return;
        };

        if response.dragged_by(egui::PointerButton::Primary)
            && let Some(pointer) = response.interact_pointer_pos()
        {
            let world = screen_to_world(rect, self.pan, self.zoom, pointer);
            if let Err(error) =
                self.drag
                    .on_drag(&mut self.simulation, &id, world.x as f64, world.y as f64)
            {
                self.last_error = Some(error.to_string());
            }
        }

        if response.drag_stopped_by(egui::PointerButton::Primary) || !response.dragged() {
            if let Err(error) = self.drag.on_drag_end(&mut self.simulation, &id) {
                self.last_error = Some(error.to_string());
            }
            self.dragging = None;
        }
    }

    pub(in crate::app) fn screen_nodes(&self, rect: Rect) -> Vec<ScreenNode> {
        self.simulation
            .snapshot()
            .nodes
            .iter()
            .enumerate()
            .filter_map(|(index, node)| {
                let world = vec2(node.x as f32, node.y as f32);
                let position = world_to_screen(rect, self.pan, self.zoom, world);
                let base_radius = if self.category_of(&node.id) == Category::Photo {
                    PHOTO_RING_RADIUS
                } else {
                    NODE_RADIUS
                };
                let radius = base_radius * self.zoom;
                circle_visible(rect, position, radius).then_some(ScreenNode {
                    index,
                    position,
                    radius,
                })
            })
            .collect()
    }

    /// Topmost node under `pointer`; later nodes are drawn above earlier ones.
    pub(in crate::app) fn node_at(nodes: &[ScreenNode], pointer: Pos2) -> Option<usize> {
        nodes
            .iter()
            .rev()
            .find(|node| node.position.distance(pointer) <= node.radius)
            .map(|node| node.index)
    }

    pub(in crate::app) fn category_of(&self, id: &str) -> Category {
        self.node_lookup
            .get(id)
            .map(|&index| self.document.nodes[index].category)
            .unwrap_or_default()
    }
}
