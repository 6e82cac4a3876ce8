use eframe::egui::{self, Align, Context, Layout, Vec2};
use forcegraph::graph::GraphDocument;
use forcegraph::physics::{DragController, Lifecycle};

use super::super::ViewModel;

impl ViewModel {
    const MAX_DIAGNOSTICS: usize = 200;

    pub(in crate::app) fn new(document: GraphDocument) -> Result<Self, String> {
        let mut simulation = document
            .build_simulation()
            .map_err(|error| error.to_string())?;
        simulation.start();

        let node_lookup = document
            .nodes
            .iter()
            .enumerate()
            .map(|(index, node)| (node.id.clone(), index))
            .collect();

        let mut model = Self {
            drag: DragController::for_simulation(&simulation),
            tuning: simulation.config().clone(),
            simulation,
            node_lookup,
            document,
            dragging: None,
            selected: None,
            pan: Vec2::ZERO,
            zoom: 1.0,
            show_labels: true,
            show_quadtree_overlay: false,
            diagnostics: Vec::new(),
            last_error: None,
        };
        model.collect_diagnostics();
        Ok(model)
    }

    pub(in crate::app) fn show(&mut self, ctx: &Context, source: &str, reload_requested: &mut bool) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("forcegraph");
                    ui.separator();
                    ui.label(format!("source: {source}"));
                    ui.label(format!("nodes: {}", self.simulation.snapshot().len()));
                    ui.label(format!("links: {}", self.simulation.snapshot().links.len()));
                    if ui.button("Reload").clicked() {
                        *reload_requested = true;
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(self.status_text());
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default().show(ctx, |ui| self.draw_graph(ui));
    }

    fn status_text(&self) -> String {
        let state = match self.simulation.lifecycle() {
            Lifecycle::Idle => "idle",
            Lifecycle::Running => "running",
            Lifecycle::Converged => "converged",
            Lifecycle::Stopped => "stopped",
        };
        format!(
            "{state}  |  tick {}  |  alpha {:.3}  |  zoom {:.2}",
            self.simulation.ticks(),
            self.simulation.alpha(),
            self.zoom
        )
    }

    pub(in crate::app) fn collect_diagnostics(&mut self) {
        for diagnostic in self.simulation.take_diagnostics() {
            self.diagnostics.push(diagnostic.to_string());
        }
        if self.diagnostics.len() > Self::MAX_DIAGNOSTICS {
            let excess = self.diagnostics.len() - Self::MAX_DIAGNOSTICS;
            self.diagnostics.drain(..excess);
        }
    }

    /// Pushes edited tuning into the simulation and reheats it.
    pub(in crate::app) fn apply_tuning(&mut self) {
        match self.simulation.set_config(self.tuning.clone()) {
            Ok(()) => {
                self.last_error = None;
                self.simulation.restart();
            }
            Err(error) => self.last_error = Some(error.to_string()),
        }
    }
}
