//! Per-node physics records, links and the state shared by the force pipeline.

use std::collections::HashMap;
use std::f64::consts::PI;

use crate::error::{Error, Result, invalid};
use crate::util::stable_hash;

use super::integrator::Cooling;

pub type Vec2 = nalgebra::Vector2<f64>;

const INITIAL_RADIUS: f64 = 10.0;

/// Physics record of one node.
#[derive(Debug, Clone)]
pub struct NodeState {
    pub id: String,
    pub position: Vec2,
    pub velocity: Vec2,
    /// Fixed position; overrides integration while set.
    pub pin: Option<Vec2>,
    /// Radius hint for collision; falls back to the collision default.
    pub radius: Option<f64>,
    pub(crate) seed: u64,
    pub(crate) last_finite: Vec2,
}

impl NodeState {
    pub fn new(id: impl Into<String>, x: f64, y: f64) -> Self {
        let id = id.into();
        let position = Vec2::new(x, y);
        Self {
            seed: stable_hash(&id),
            id,
            position,
            velocity: Vec2::zeros(),
            pin: None,
            radius: None,
            last_finite: position,
        }
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = Some(radius);
        self
    }

    pub fn is_pinned(&self) -> bool {
        self.pin.is_some()
    }
}

/// Request to add a node. Position is seeded on a spiral when absent.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSpec {
    pub id: String,
    pub position: Option<(f64, f64)>,
    pub radius: Option<f64>,
}

impl NodeSpec {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            position: None,
            radius: None,
        }
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Some((x, y));
        self
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = Some(radius);
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if let Some((x, y)) = self.position {
            if !x.is_finite() {
                return Err(invalid(format!("{}.x", self.id), x, "must be finite"));
            }
            if !y.is_finite() {
                return Err(invalid(format!("{}.y", self.id), y, "must be finite"));
            }
        }
        if let Some(radius) = self.radius
            && (!radius.is_finite() || radius < 0.0)
        {
            return Err(invalid(
                format!("{}.radius", self.id),
                radius,
                "must be finite and non-negative",
            ));
        }
        Ok(())
    }
}

/// Edge between two node ids. Orientation is kept for consumers only.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub source: String,
    pub target: String,
    /// Rest length override.
    pub distance: Option<f64>,
    /// Stiffness override.
    pub stiffness: Option<f64>,
}

impl Link {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            distance: None,
            stiffness: None,
        }
    }

    pub fn with_distance(mut self, distance: f64) -> Self {
        self.distance = Some(distance);
        self
    }

    pub fn with_stiffness(mut self, stiffness: f64) -> Self {
        self.stiffness = Some(stiffness);
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        let name = |field: &str| format!("{}->{}.{field}", self.source, self.target);
        if let Some(distance) = self.distance
            && (!distance.is_finite() || distance < 0.0)
        {
            return Err(invalid(name("distance"), distance, "must be finite and non-negative"));
        }
        if let Some(stiffness) = self.stiffness
            && (!stiffness.is_finite() || stiffness < 0.0)
        {
            return Err(invalid(name("stiffness"), stiffness, "must be finite and non-negative"));
        }
        Ok(())
    }
}

/// Link whose endpoints both exist, as node indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedLink {
    /// Position in [`SimulationState::links`].
    pub link: usize,
    pub source: usize,
    pub target: usize,
}

/// Link left out of the force pass because an endpoint is missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DanglingLink {
    pub(crate) source: String,
    pub(crate) target: String,
    pub(crate) missing: String,
}

#[derive(Debug, Clone)]
pub struct SimulationState {
    pub(crate) nodes: Vec<NodeState>,
    pub(crate) index_by_id: HashMap<String, usize>,
    pub(crate) links: Vec<Link>,
    pub(crate) resolved: Vec<ResolvedLink>,
    pub(crate) cooling: Cooling,
    pub(crate) revision: u64,
    placed: usize,
}

impl Default for SimulationState {
    fn default() -> Self {
        Self::new(Cooling::default())
    }
}

impl SimulationState {
    pub fn new(cooling: Cooling) -> Self {
        Self {
            nodes: Vec::new(),
            index_by_id: HashMap::new(),
            links: Vec::new(),
            resolved: Vec::new(),
            cooling,
            revision: 0,
            placed: 0,
        }
    }

    pub fn nodes(&self) -> &[NodeState] {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> &mut [NodeState] {
        &mut self.nodes
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn resolved_links(&self) -> &[ResolvedLink] {
        &self.resolved
    }

    pub fn cooling(&self) -> &Cooling {
        &self.cooling
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    pub fn node(&self, id: &str) -> Option<&NodeState> {
        self.index_of(id).map(|index| &self.nodes[index])
    }

    pub(crate) fn node_mut(&mut self, id: &str) -> Option<&mut NodeState> {
        self.index_of(id).map(|index| &mut self.nodes[index])
    }

    /// Spiral slot for the next node without a caller position.
    fn seed_position(&self, ordinal: usize, around: Vec2) -> Vec2 {
        let golden_angle = PI * (3.0 - 5.0_f64.sqrt());
        let radius = INITIAL_RADIUS * (0.5 + ordinal as f64).sqrt();
        let angle = ordinal as f64 * golden_angle;
        around + Vec2::new(radius * angle.cos(), radius * angle.sin())
    }

    /// Adds a node. Links are not re-resolved until [`Self::resolve_links`].
    pub fn insert_node(&mut self, spec: NodeSpec, around: Vec2) -> Result<usize> {
        spec.validate()?;
        if self.index_by_id.contains_key(&spec.id) {
            return Err(Error::DuplicateNode(spec.id));
        }

        let ordinal = self.placed;
        self.placed += 1;
        let position = match spec.position {
            Some((x, y)) => Vec2::new(x, y),
            None => self.seed_position(ordinal, around),
        };

        let mut node = NodeState::new(spec.id, position.x, position.y);
        node.radius = spec.radius;

        let index = self.nodes.len();
        self.index_by_id.insert(node.id.clone(), index);
        self.nodes.push(node);
        self.revision = self.revision.wrapping_add(1);
        Ok(index)
    }

    /// Adds a fully formed record, keeping its position and velocity.
    pub fn push_node(&mut self, node: NodeState) -> Result<usize> {
        if self.index_by_id.contains_key(&node.id) {
            return Err(Error::DuplicateNode(node.id));
        }
        let index = self.nodes.len();
        self.index_by_id.insert(node.id.clone(), index);
        self.nodes.push(node);
        self.placed += 1;
        self.revision = self.revision.wrapping_add(1);
        Ok(index)
    }

    pub fn remove_node(&mut self, id: &str) -> Option<NodeState> {
        let index = self.index_by_id.remove(id)?;
        let removed = self.nodes.remove(index);
        for (offset, node) in self.nodes.iter().enumerate().skip(index) {
            self.index_by_id.insert(node.id.clone(), offset);
        }
        self.revision = self.revision.wrapping_add(1);
        Some(removed)
    }

    pub fn insert_link(&mut self, link: Link) -> Result<()> {
        link.validate()?;
        self.links.push(link);
        self.revision = self.revision.wrapping_add(1);
        Ok(())
    }

    /// Removes every link with exactly this orientation. Returns how many went.
    pub fn remove_link(&mut self, source: &str, target: &str) -> usize {
        let before = self.links.len();
        self.links
            .retain(|link| !(link.source == source && link.target == target));
        let removed = before - self.links.len();
        if removed > 0 {
            self.revision = self.revision.wrapping_add(1);
        }
        removed
    }

    /// Rebuilds the index pairs used by the force pass. Returns links skipped
    /// for a missing endpoint.
    pub(crate) fn resolve_links(&mut self) -> Vec<DanglingLink> {
        self.resolved.clear();
        let mut dangling = Vec::new();

        for (position, link) in self.links.iter().enumerate() {
            let source = self.index_by_id.get(&link.source).copied();
            let target = self.index_by_id.get(&link.target).copied();
            match (source, target) {
                (Some(source), Some(target)) => {
                    if source != target {
                        self.resolved.push(ResolvedLink {
                            link: position,
                            source,
                            target,
                        });
                    }
                }
                (None, _) => dangling.push(DanglingLink {
                    source: link.source.clone(),
                    target: link.target.clone(),
                    missing: link.source.clone(),
                }),
                (_, None) => dangling.push(DanglingLink {
                    source: link.source.clone(),
                    target: link.target.clone(),
                    missing: link.target.clone(),
                }),
            }
        }

        dangling
    }
}
