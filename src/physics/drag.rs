//! Turns drag gestures into pins plus a warm alpha target.
//!
//! Coordinates passed here are world coordinates; the caller undoes any pan
//! or zoom first.

use std::collections::BTreeSet;

use tracing::debug;

use crate::error::{Error, Result};

use super::engine::Simulation;

#[derive(Debug, Clone)]
pub struct DragController {
    active: BTreeSet<String>,
    hold: f64,
    baseline: Option<f64>,
}

impl DragController {
    /// `hold` is the alpha target kept while any drag is active.
    pub fn new(hold: f64) -> Self {
        Self {
            active: BTreeSet::new(),
            hold,
            baseline: None,
        }
    }

    pub fn for_simulation(simulation: &Simulation) -> Self {
        Self::new(simulation.config().drag_alpha_target)
    }

    pub fn is_dragging(&self, id: &str) -> bool {
        self.active.contains(id)
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn on_drag_start(&mut self, simulation: &mut Simulation, id: &str) -> Result<()> {
        let position = simulation
            .node(id)
            .map(|node| node.position)
            .ok_or_else(|| Error::UnknownNode(id.to_owned()))?;
        simulation.pin(id, position.x, position.y)?;

        if self.active.is_empty() {
            self.baseline = Some(simulation.alpha_target());
            simulation.set_alpha_target(self.hold)?;
        }
        self.active.insert(id.to_owned());
        simulation.wake();
        debug!(node = id, active = self.active.len(), "drag started");
        Ok(())
    }

    pub fn on_drag(&mut self, simulation: &mut Simulation, id: &str, x: f64, y: f64) -> Result<()> {
        if !self.active.contains(id) {
            return Err(Error::NotDragging(id.to_owned()));
        }
        simulation.pin(id, x, y)
    }

    /// Releases the node. A node removed mid-drag is simply forgotten.
    pub fn on_drag_end(&mut self, simulation: &mut Simulation, id: &str) -> Result<()> {
        if !self.active.remove(id) {
            return Err(Error::NotDragging(id.to_owned()));
        }
        match simulation.unpin(id) {
            Ok(()) | Err(Error::UnknownNode(_)) => {}
            Err(error) => return Err(error),
        }

        if self.active.is_empty()
            && let Some(baseline) = self.baseline.take()
        {
            simulation.set_alpha_target(baseline)?;
        }
        debug!(node = id, active = self.active.len(), "drag ended");
        Ok(())
    }
}
