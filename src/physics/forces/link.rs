use crate::physics::config::LinkConfig;
use crate::physics::quadtree::SpatialIndex;
use crate::physics::state::{SimulationState, Vec2};
use crate::util::{jiggle, pair_seed};

use super::Force;

/// Spring between linked nodes, pulling them toward the rest length.
pub struct LinkForce {
    config: LinkConfig,
    bias: Vec<f64>,
    stiffness: Vec<f64>,
    distance: Vec<f64>,
}

impl LinkForce {
    pub fn new(config: LinkConfig) -> Self {
        Self {
            config,
            bias: Vec::new(),
            stiffness: Vec::new(),
            distance: Vec::new(),
        }
    }

    pub fn config(&self) -> &LinkConfig {
        &self.config
    }
}

impl Force for LinkForce {
    fn name(&self) -> &'static str {
        "link"
    }

    fn initialize(&mut self, state: &SimulationState) {
        let resolved = state.resolved_links();
        let mut degree = vec![0usize; state.len()];
        for link in resolved {
            degree[link.source] += 1;
            degree[link.target] += 1;
        }

        self.bias.clear();
        self.stiffness.clear();
        self.distance.clear();
        for resolved_link in resolved {
            let link = &state.links()[resolved_link.link];
            let source_degree = degree[resolved_link.source] as f64;
            let target_degree = degree[resolved_link.target] as f64;

            self.bias
                .push(source_degree / (source_degree + target_degree));
            self.stiffness.push(
                link.stiffness
                    .or(self.config.stiffness)
                    .unwrap_or_else(|| 1.0 / source_degree.min(target_degree)),
            );
            self.distance
                .push(link.distance.unwrap_or(self.config.distance));
        }
    }

    fn apply(&mut self, state: &mut SimulationState, _index: &SpatialIndex, alpha: f64) {
        let link_count = state.resolved.len();
        if link_count != self.bias.len() {
            self.initialize(state);
        }

        for _ in 0..self.config.iterations {
            for slot in 0..link_count {
                let link = state.resolved[slot];
                let source = &state.nodes[link.source];
                let target = &state.nodes[link.target];

                let mut delta =
                    (target.position + target.velocity) - (source.position + source.velocity);
                if delta.x == 0.0 {
                    delta.x = jiggle(pair_seed(source.seed, target.seed, 0));
                }
                if delta.y == 0.0 {
                    delta.y = jiggle(pair_seed(source.seed, target.seed, 1));
                }

                let length = delta.norm();
                let scale = (length - self.distance[slot]) / length * alpha * self.stiffness[slot];
                let correction: Vec2 = delta * scale;
                let bias = self.bias[slot];

                state.nodes[link.target].velocity -= correction * bias;
                state.nodes[link.source].velocity += correction * (1.0 - bias);
            }
        }
    }
}
