//! The stepping loop: lifecycle, mutation, listeners and snapshot publication.
//!
//! [`Simulation`] has no timer. The host calls [`Simulation::tick`] at whatever
//! cadence it likes (a repaint callback, a headless loop) and reads the
//! published [`Snapshot`] between ticks.

use std::collections::HashSet;
use std::sync::mpsc::{self, Receiver};

use tracing::{debug, trace, warn};

use crate::error::{Error, Result, invalid};

use super::config::SimulationConfig;
use super::diagnostic::Diagnostic;
use super::forces::ForceRegistry;
use super::integrator::integrate;
use super::quadtree::SpatialIndex;
use super::queue::{Mutation, Mutator};
use super::snapshot::Snapshot;
use super::state::{Link, NodeSpec, NodeState, SimulationState, Vec2};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Idle,
    Running,
    Converged,
    Stopped,
}

type Listener = Box<dyn FnMut(&Snapshot, &Mutator)>;

pub struct Simulation {
    state: SimulationState,
    config: SimulationConfig,
    forces: ForceRegistry,
    initialized_revision: Option<u64>,
    index: SpatialIndex,
    lifecycle: Lifecycle,
    snapshot: Snapshot,
    queue: Receiver<Mutation>,
    mutator: Mutator,
    diagnostics: Vec<Diagnostic>,
    reported_links: HashSet<(String, String)>,
    tick_listeners: Vec<Listener>,
    end_listeners: Vec<Listener>,
    ticks: u64,
}

impl Simulation {
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        let (sender, queue) = mpsc::channel();
        let state = SimulationState::new(config.cooling());

        Ok(Self {
            snapshot: Snapshot::capture(&state, 0),
            forces: ForceRegistry::from_config(&config),
            state,
            config,
            initialized_revision: None,
            index: SpatialIndex::empty(),
            lifecycle: Lifecycle::Idle,
            queue,
            mutator: Mutator::new(sender),
            diagnostics: Vec::new(),
            reported_links: HashSet::new(),
            tick_listeners: Vec::new(),
            end_listeners: Vec::new(),
            ticks: 0,
        })
    }

    /// Builds a simulation with an initial graph. Links are resolved once,
    /// after every node is in place.
    pub fn with_graph(
        config: SimulationConfig,
        nodes: impl IntoIterator<Item = NodeSpec>,
        links: impl IntoIterator<Item = Link>,
    ) -> Result<Self> {
        let mut simulation = Self::new(config)?;
        let around = simulation.center_point();
        for spec in nodes {
            simulation.state.insert_node(spec, around)?;
        }
        for link in links {
            simulation.state.insert_link(link)?;
        }
        simulation.topology_changed();
        Ok(simulation)
    }

    fn center_point(&self) -> Vec2 {
        let (x, y) = self.config.center_point();
        Vec2::new(x, y)
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn forces(&self) -> &ForceRegistry {
        &self.forces
    }

    /// Quadtree built during the last tick.
    pub fn spatial_index(&self) -> &SpatialIndex {
        &self.index
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn mutator(&self) -> Mutator {
        self.mutator.clone()
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn alpha(&self) -> f64 {
        self.state.cooling.alpha
    }

    pub fn alpha_target(&self) -> f64 {
        self.state.cooling.alpha_target
    }

    pub fn nodes(&self) -> &[NodeState] {
        self.state.nodes()
    }

    pub fn node(&self, id: &str) -> Option<&NodeState> {
        self.state.node(id)
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    pub fn on_tick(&mut self, listener: impl FnMut(&Snapshot, &Mutator) + 'static) {
        self.tick_listeners.push(Box::new(listener));
    }

    pub fn on_end(&mut self, listener: impl FnMut(&Snapshot, &Mutator) + 'static) {
        self.end_listeners.push(Box::new(listener));
    }

    pub fn add_node(&mut self, spec: NodeSpec) -> Result<()> {
        let around = self.center_point();
        self.state.insert_node(spec, around)?;
        self.topology_changed();
        Ok(())
    }

    /// Removes a node. Its links stay registered but drop out of the force
    /// pass until a node with that id returns.
    pub fn remove_node(&mut self, id: &str) -> Result<NodeState> {
        let removed = self
            .state
            .remove_node(id)
            .ok_or_else(|| Error::UnknownNode(id.to_owned()))?;
        self.topology_changed();
        Ok(removed)
    }

    pub fn add_link(&mut self, link: Link) -> Result<()> {
        self.state.insert_link(link)?;
        self.topology_changed();
        Ok(())
    }

    pub fn remove_link(&mut self, source: &str, target: &str) -> usize {
        let removed = self.state.remove_link(source, target);
        if removed > 0 {
            self.reported_links
                .remove(&(source.to_owned(), target.to_owned()));
            self.topology_changed();
        }
        removed
    }

    /// Fixes a node at `(x, y)` until [`Self::unpin`].
    pub fn pin(&mut self, id: &str, x: f64, y: f64) -> Result<()> {
        if !x.is_finite() {
            return Err(invalid(format!("{id}.pin.x"), x, "must be finite"));
        }
        if !y.is_finite() {
            return Err(invalid(format!("{id}.pin.y"), y, "must be finite"));
        }
        let node = self
            .state
            .node_mut(id)
            .ok_or_else(|| Error::UnknownNode(id.to_owned()))?;
        let pin = Vec2::new(x, y);
        node.pin = Some(pin);
        node.position = pin;
        node.velocity = Vec2::zeros();
        node.last_finite = pin;
        self.snapshot.refresh(&self.state, self.ticks);
        Ok(())
    }

    pub fn unpin(&mut self, id: &str) -> Result<()> {
        let node = self
            .state
            .node_mut(id)
            .ok_or_else(|| Error::UnknownNode(id.to_owned()))?;
        node.pin = None;
        self.snapshot.refresh(&self.state, self.ticks);
        Ok(())
    }

    /// Replaces the parameters between ticks. Alpha carries over, and so does
    /// an alpha target currently raised above the old baseline.
    pub fn set_config(&mut self, config: SimulationConfig) -> Result<()> {
        config.validate()?;

        let cooling = &mut self.state.cooling;
        let held = cooling.alpha_target != self.config.alpha_target;
        cooling.alpha_decay = config.alpha_decay;
        cooling.alpha_min = config.alpha_min;
        cooling.velocity_decay = config.velocity_decay;
        if !held {
            cooling.alpha_target = config.alpha_target;
        }

        self.forces = ForceRegistry::from_config(&config);
        self.initialized_revision = None;
        self.config = config;
        debug!("simulation config replaced");
        Ok(())
    }

    pub fn set_alpha_target(&mut self, alpha_target: f64) -> Result<()> {
        if !(0.0..=1.0).contains(&alpha_target) {
            return Err(invalid("alpha_target", alpha_target, "must be within [0, 1]"));
        }
        self.state.cooling.alpha_target = alpha_target;
        Ok(())
    }

    /// Sets alpha directly without touching the lifecycle.
    pub fn reheat(&mut self, alpha: f64) -> Result<()> {
        if !(0.0..=1.0).contains(&alpha) {
            return Err(invalid("alpha", alpha, "must be within [0, 1]"));
        }
        self.state.cooling.alpha = alpha;
        self.snapshot.alpha = alpha;
        Ok(())
    }

    pub fn start(&mut self) {
        if self.lifecycle != Lifecycle::Running {
            debug!(from = ?self.lifecycle, "simulation started");
            self.lifecycle = Lifecycle::Running;
        }
    }

    pub fn stop(&mut self) {
        if self.lifecycle != Lifecycle::Stopped {
            debug!(from = ?self.lifecycle, tick = self.ticks, "simulation stopped");
            self.lifecycle = Lifecycle::Stopped;
        }
    }

    /// Resumes ticking from Idle or Converged. A stopped simulation stays
    /// stopped.
    pub fn wake(&mut self) {
        if matches!(self.lifecycle, Lifecycle::Idle | Lifecycle::Converged) {
            debug!(from = ?self.lifecycle, "simulation woken");
            self.lifecycle = Lifecycle::Running;
        }
    }

    /// Reheats and runs. Full heat normally; while the alpha target is held
    /// above its baseline, alpha only rises to that target.
    pub fn restart(&mut self) {
        let baseline = self.config.alpha_target;
        let cooling = &mut self.state.cooling;
        cooling.alpha = if cooling.alpha_target > baseline {
            cooling.alpha.max(cooling.alpha_target)
        } else {
            1.0
        };
        self.snapshot.alpha = cooling.alpha;
        debug!(alpha = cooling.alpha, "simulation restarted");
        self.lifecycle = Lifecycle::Running;
    }

    /// Advances one tick if running. Returns `None` when nothing ran.
    pub fn tick(&mut self) -> Option<&Snapshot> {
        self.drain_queue();
        if self.lifecycle != Lifecycle::Running {
            return None;
        }

        self.advance();

        let converged = self.state.cooling.is_converged();
        if converged {
            debug!(tick = self.ticks, alpha = self.alpha(), "simulation converged");
            self.lifecycle = Lifecycle::Converged;
        }

        for listener in &mut self.tick_listeners {
            listener(&self.snapshot, &self.mutator);
        }
        if converged {
            for listener in &mut self.end_listeners {
                listener(&self.snapshot, &self.mutator);
            }
        }

        self.drain_queue();
        Some(&self.snapshot)
    }

    /// Advances `count` ticks regardless of lifecycle. No listeners fire and
    /// convergence does not change the lifecycle.
    pub fn step(&mut self, count: usize) -> &Snapshot {
        self.drain_queue();
        for _ in 0..count {
            self.advance();
        }
        &self.snapshot
    }

    /// Starts the simulation and ticks until it leaves Running or `max_ticks`
    /// ticks have run. Returns the number of ticks.
    pub fn run_until_converged(&mut self, max_ticks: usize) -> usize {
        self.start();
        let mut ran = 0;
        while ran < max_ticks && self.tick().is_some() {
            ran += 1;
            if self.lifecycle != Lifecycle::Running {
                break;
            }
        }
        ran
    }

    fn advance(&mut self) {
        if self.initialized_revision != Some(self.state.revision()) {
            self.forces.initialize(&self.state);
            self.initialized_revision = Some(self.state.revision());
        }

        let alpha = self.state.cooling.cool();
        self.index = SpatialIndex::build(self.state.nodes());
        self.forces.apply(&mut self.state, &self.index, alpha);

        let velocity_decay = self.state.cooling.velocity_decay;
        for recovered in integrate(&mut self.state.nodes, velocity_decay) {
            let id = self.state.nodes[recovered].id.clone();
            warn!(node = %id, "non-finite position, restored last finite position");
            self.diagnostics
                .push(Diagnostic::NonFinitePosition { id });
        }

        self.ticks += 1;
        self.snapshot.refresh(&self.state, self.ticks);
        trace!(tick = self.ticks, alpha, "tick");
    }

    fn topology_changed(&mut self) {
        for dangling in self.state.resolve_links() {
            let key = (dangling.source.clone(), dangling.target.clone());
            if !self.reported_links.insert(key) {
                continue;
            }
            warn!(
                source = %dangling.source,
                target = %dangling.target,
                missing = %dangling.missing,
                "skipping link with missing endpoint"
            );
            self.diagnostics.push(Diagnostic::DanglingLink {
                source: dangling.source,
                target: dangling.target,
                missing: dangling.missing,
            });
        }
        self.snapshot.refresh(&self.state, self.ticks);
    }

    fn apply_mutation(&mut self, mutation: Mutation) -> Result<()> {
        match mutation {
            Mutation::AddNode(spec) => self.add_node(spec),
            Mutation::RemoveNode(id) => self.remove_node(&id).map(|_| ()),
            Mutation::AddLink(link) => self.add_link(link),
            Mutation::RemoveLink { source, target } => {
                self.remove_link(&source, &target);
                Ok(())
            }
            Mutation::Pin { id, x, y } => self.pin(&id, x, y),
            Mutation::Unpin(id) => self.unpin(&id),
            Mutation::Stop => {
                self.stop();
                Ok(())
            }
        }
    }

    fn drain_queue(&mut self) {
        while let Ok(mutation) = self.queue.try_recv() {
            if let Err(error) = self.apply_mutation(mutation) {
                warn!(%error, "queued mutation rejected");
                self.diagnostics.push(Diagnostic::RejectedMutation {
                    reason: error.to_string(),
                });
            }
        }
    }
}
