use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};
use std::thread;

use eframe::egui::{self, Context, Vec2};
use forcegraph::graph::{GraphDocument, load_graph, sample_graph};
use forcegraph::physics::{DragController, Simulation, SimulationConfig};

mod graph;
mod render_utils;
mod ui;

pub struct ForceGraphApp {
    input: Option<PathBuf>,
    state: AppState,
}

enum AppState {
    Loading {
        rx: Receiver<Result<GraphDocument, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    document: GraphDocument,
    node_lookup: HashMap<String, usize>,
    simulation: Simulation,
    drag: DragController,
    dragging: Option<String>,
    tuning: SimulationConfig,
    selected: Option<String>,
    pan: Vec2,
    zoom: f32,
    show_labels: bool,
    show_quadtree_overlay: bool,
    diagnostics: Vec<String>,
    last_error: Option<String>,
}

impl ForceGraphApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, input: Option<PathBuf>) -> Self {
        let state = Self::start_load(input.clone());
        Self { input, state }
    }

    fn spawn_load(input: Option<PathBuf>) -> Receiver<Result<GraphDocument, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = match input {
                Some(path) => load_graph(&path).map_err(|error| format!("{error:#}")),
                None => Ok(sample_graph()),
            };
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(input: Option<PathBuf>) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(input),
        }
    }

    fn source_label(&self) -> String {
        match &self.input {
            Some(path) => path.display().to_string(),
            None => "built-in sample".to_owned(),
        }
    }
}

impl eframe::App for ForceGraphApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;
        let source = self.source_label();

        match &mut self.state {
            AppState::Loading { rx } => {
                if let Ok(result) = rx.try_recv() {
                    transition = Some(match result.and_then(ViewModel::new) {
                        Ok(model) => AppState::Ready(Box::new(model)),
                        Err(error) => AppState::Error(error),
                    });
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading graph...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
                ctx.request_repaint();
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load graph");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(self.input.clone()));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                model.show(ctx, &source, &mut reload_requested);
                if reload_requested {
                    transition = Some(Self::start_load(self.input.clone()));
                }
            }
        }

        if let Some(next_state) = transition {
            self.state = next_state;
        }
    }
}
