use eframe::egui::{self, Ui};
use forcegraph::physics::{DragController, Lifecycle};

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Simulation");
        ui.separator();
        ui.add_space(4.0);

        ui.horizontal_wrapped(|ui| {
            let running = self.simulation.lifecycle() == Lifecycle::Running;
            if ui
                .add_enabled(!running, egui::Button::new("Start"))
                .on_hover_text("Resume ticking at the current heat.")
                .clicked()
            {
                self.simulation.start();
            }
            if ui
                .add_enabled(running, egui::Button::new("Stop"))
                .on_hover_text("Halt ticking; positions stay where they are.")
                .clicked()
            {
                self.simulation.stop();
            }
            if ui
                .button("Reheat")
                .on_hover_text("Raise alpha back to 1 and run until the layout settles again.")
                .clicked()
            {
                self.simulation.restart();
            }
            if ui
                .button("Step")
                .on_hover_text("Advance a single tick without changing the lifecycle.")
                .clicked()
            {
                self.simulation.step(1);
            }
        });

        ui.separator();
        ui.checkbox(&mut self.show_labels, "Show labels")
            .on_hover_text("Draw every label; hovered and selected nodes are always labelled.");
        ui.checkbox(&mut self.show_quadtree_overlay, "Show quadtree overlay")
            .on_hover_text("Draw the Barnes-Hut cells built during the last tick.");
        if ui.button("Reset view").clicked() {
            self.pan = egui::Vec2::ZERO;
            self.zoom = 1.0;
        }

        ui.separator();
        let mut changed = false;

        ui.collapsing("Forces", |ui| {
            if let Some(link) = self.tuning.link.as_mut() {
                changed |= ui
                    .add(
                        egui::Slider::new(&mut link.distance, 10.0..=400.0)
                            .text("Link distance")
                            .clamping(egui::SliderClamping::Always),
                    )
                    .on_hover_text("Rest length for links without their own.")
                    .changed();
                changed |= ui
                    .add(
                        egui::Slider::new(&mut link.iterations, 1..=8)
                            .text("Link iterations")
                            .clamping(egui::SliderClamping::Always),
                    )
                    .changed();
            }

            if let Some(charge) = self.tuning.charge.as_mut() {
                changed |= ui
                    .add(
                        egui::Slider::new(&mut charge.strength, -1500.0..=0.0)
                            .text("Charge strength")
                            .clamping(egui::SliderClamping::Always),
                    )
                    .on_hover_text("Negative values push nodes apart.")
                    .changed();
                changed |= ui
                    .add(
                        egui::Slider::new(&mut charge.theta, 0.0..=2.0)
                            .text("Theta")
                            .clamping(egui::SliderClamping::Always),
                    )
                    .on_hover_text("Barnes-Hut accuracy; 0 is exact and slow.")
                    .changed();
            }

            if let Some(center) = self.tuning.center.as_mut() {
                changed |= ui
                    .add(
                        egui::Slider::new(&mut center.strength, 0.0..=1.0)
                            .text("Center strength")
                            .clamping(egui::SliderClamping::Always),
                    )
                    .changed();
            }

            if let Some(collision) = self.tuning.collision.as_mut() {
                changed |= ui
                    .add(
                        egui::Slider::new(&mut collision.radius, 0.0..=120.0)
                            .text("Collision radius")
                            .clamping(egui::SliderClamping::Always),
                    )
                    .on_hover_text("Used for nodes without their own radius.")
                    .changed();
                changed |= ui
                    .add(
                        egui::Slider::new(&mut collision.strength, 0.0..=1.0)
                            .text("Collision strength")
                            .clamping(egui::SliderClamping::Always),
                    )
                    .changed();
            }
        });

        ui.collapsing("Cooling", |ui| {
            changed |= ui
                .add(
                    egui::Slider::new(&mut self.tuning.velocity_decay, 0.05..=0.95)
                        .text("Velocity kept")
                        .clamping(egui::SliderClamping::Always),
                )
                .on_hover_text("Fraction of velocity carried into the next tick.")
                .changed();
            changed |= ui
                .add(
                    egui::Slider::new(&mut self.tuning.alpha_decay, 0.001..=0.2)
                        .text("Alpha decay")
                        .logarithmic(true)
                        .clamping(egui::SliderClamping::Always),
                )
                .changed();
            changed |= ui
                .add(
                    egui::Slider::new(&mut self.tuning.drag_alpha_target, 0.0..=1.0)
                        .text("Drag heat")
                        .clamping(egui::SliderClamping::Always),
                )
                .on_hover_text("Alpha target held while a node is dragged.")
                .changed();
        });

        if changed {
            self.apply_tuning();
            if self.dragging.is_none() {
                self.drag = DragController::for_simulation(&self.simulation);
            }
        }

        if let Some(error) = &self.last_error {
            ui.separator();
            ui.colored_label(egui::Color32::from_rgb(248, 113, 113), error.as_str());
        }
    }
}
