mod interaction;
mod view;

use eframe::egui::Pos2;

/// A snapshot node placed in screen space for one frame.
pub(in crate::app) struct ScreenNode {
    /// Index into `Snapshot::nodes`.
    index: usize,
    position: Pos2,
    radius: f32,
}
