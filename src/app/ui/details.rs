use eframe::egui::{self, RichText, Ui};
use forcegraph::graph::Category;

use super::super::ViewModel;
use super::super::render_utils::category_color;

const LEGEND: [Category; 5] = [
    Category::Photo,
    Category::Location,
    Category::Date,
    Category::Tag,
    Category::Description,
];

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Selection Details");
        ui.add_space(6.0);
        self.draw_selection(ui);

        ui.separator();
        ui.label(RichText::new("Legend").strong());
        for category in LEGEND {
            ui.horizontal(|ui| {
                ui.label(RichText::new("●").color(category_color(category)));
                ui.label(category.label());
            });
        }

        ui.separator();
        ui.collapsing(format!("Diagnostics ({})", self.diagnostics.len()), |ui| {
            if self.diagnostics.is_empty() {
                ui.label("No problems reported.");
            }
            egui::ScrollArea::vertical()
                .max_height(220.0)
                .show(ui, |ui| {
                    for message in &self.diagnostics {
                        ui.small(message.as_str());
                    }
                });
        });
    }

    fn draw_selection(&mut self, ui: &mut Ui) {
        let Some(selected_id) = self.selected.clone() else {
            ui.label("Click a node in the graph to inspect it.");
            return;
        };

        let Some(position) = self.simulation.snapshot().node(&selected_id).cloned() else {
            ui.label("Selected node no longer exists in the graph.");
            return;
        };

        let node = self
            .node_lookup
            .get(&selected_id)
            .map(|&index| &self.document.nodes[index]);
        let category = node.map(|node| node.category).unwrap_or_default();

        let label = node.map_or(selected_id.as_str(), |node| node.display_label());
        ui.label(RichText::new(label).strong());
        ui.small(selected_id.as_str());
        ui.add_space(6.0);

        ui.horizontal(|ui| {
            ui.label("Type:");
            ui.label(RichText::new(category.label()).color(category_color(category)));
        });
        if let Some(url) = node.and_then(|node| node.image_url.as_deref()) {
            ui.label(format!("Image: {url}"));
        }
        ui.label(format!("Position: ({:.1}, {:.1})", position.x, position.y));

        let degree = self
            .simulation
            .snapshot()
            .links
            .iter()
            .filter(|link| link.source == selected_id || link.target == selected_id)
            .count();
        ui.label(format!("Links: {degree}"));

        let radius = self
            .simulation
            .node(&selected_id)
            .and_then(|state| state.radius)
            .or_else(|| self.simulation.config().collision.map(|collision| collision.radius));
        if let Some(radius) = radius {
            ui.label(format!("Collision radius: {radius:.0}"));
        }

        ui.add_space(6.0);
        if position.pinned {
            ui.label("Pinned");
            if !self.drag.is_dragging(&selected_id) && ui.button("Unpin").clicked() {
                if let Err(error) = self.simulation.unpin(&selected_id) {
                    self.last_error = Some(error.to_string());
                }
                self.simulation.wake();
            }
        } else if ui
            .button("Pin here")
            .on_hover_text("Keep this node fixed at its current position.")
            .clicked()
            && let Err(error) = self.simulation.pin(&selected_id, position.x, position.y)
        {
            self.last_error = Some(error.to_string());
        }

        if ui.button("Clear selection").clicked() {
            self.selected = None;
        }
    }
}
