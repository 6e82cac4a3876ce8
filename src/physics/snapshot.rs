//! Read-only view of the layout published after each tick.

use std::collections::HashMap;

use serde::Serialize;

use super::state::SimulationState;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodePosition {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub pinned: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkEndpoints {
    pub source: String,
    pub target: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Snapshot {
    pub tick: u64,
    pub alpha: f64,
    pub nodes: Vec<NodePosition>,
    /// Links whose endpoints both exist.
    pub links: Vec<LinkEndpoints>,
    #[serde(skip)]
    revision: Option<u64>,
    #[serde(skip)]
    index_by_id: HashMap<String, usize>,
}

impl Snapshot {
    pub fn capture(state: &SimulationState, tick: u64) -> Self {
        let mut snapshot = Self::default();
        snapshot.refresh(state, tick);
        snapshot
    }

    /// Updates positions in place, rebuilding the node and link lists only
    /// when the topology changed.
    pub(crate) fn refresh(&mut self, state: &SimulationState, tick: u64) {
        self.tick = tick;
        self.alpha = state.cooling().alpha;

        if self.revision != Some(state.revision()) {
            self.nodes = state
                .nodes()
                .iter()
                .map(|node| NodePosition {
                    id: node.id.clone(),
                    x: node.position.x,
                    y: node.position.y,
                    pinned: node.is_pinned(),
                })
                .collect();
            self.index_by_id = self
                .nodes
                .iter()
                .enumerate()
                .map(|(index, node)| (node.id.clone(), index))
                .collect();
            self.links = state
                .resolved_links()
                .iter()
                .map(|resolved| {
                    let link = &state.links()[resolved.link];
                    LinkEndpoints {
                        source: link.source.clone(),
                        target: link.target.clone(),
                    }
                })
                .collect();
            self.revision = Some(state.revision());
            return;
        }

        for (published, node) in self.nodes.iter_mut().zip(state.nodes()) {
            published.x = node.position.x;
            published.y = node.position.y;
            published.pinned = node.is_pinned();
        }
    }

    pub fn node(&self, id: &str) -> Option<&NodePosition> {
        self.index_by_id.get(id).map(|&index| &self.nodes[index])
    }

    pub fn position(&self, id: &str) -> Option<(f64, f64)> {
        self.node(id).map(|node| (node.x, node.y))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
