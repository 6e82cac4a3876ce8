use crate::physics::config::CollisionConfig;
use crate::physics::quadtree::SpatialIndex;
use crate::physics::state::{SimulationState, Vec2};
use crate::util::{jiggle, pair_seed};

use super::Force;

/// Pushes apart nodes whose circles overlap. Not scaled by alpha, so overlap
/// keeps resolving after the layout has cooled.
pub struct CollisionForce {
    config: CollisionConfig,
    pairs: Vec<(usize, usize)>,
    radii: Vec<f64>,
}

impl CollisionForce {
    pub fn new(config: CollisionConfig) -> Self {
        Self {
            config,
            pairs: Vec::new(),
            radii: Vec::new(),
        }
    }

    pub fn config(&self) -> &CollisionConfig {
        &self.config
    }
}

impl Force for CollisionForce {
    fn name(&self) -> &'static str {
        "collision"
    }

    fn initialize(&mut self, state: &SimulationState) {
        self.radii = state
            .nodes
            .iter()
            .map(|node| node.radius.unwrap_or(self.config.radius))
            .collect();
    }

    fn apply(&mut self, state: &mut SimulationState, index: &SpatialIndex, _alpha: f64) {
        if state.len() < 2 || index.len() != state.len() || self.config.strength == 0.0 {
            return;
        }
        if self.radii.len() != state.len() {
            self.initialize(state);
        }

        let max_radius = self.radii.iter().copied().fold(0.0_f64, f64::max);
        if max_radius <= 0.0 {
            return;
        }

        for _ in 0..self.config.iterations {
            // The index holds start-of-tick positions; widen the query by how far
            // predicted positions may have drifted from them.
            let max_speed = state
                .nodes
                .iter()
                .map(|node| node.velocity.norm())
                .fold(0.0_f64, f64::max);
            index.candidate_pairs(2.0 * (max_radius + max_speed), &mut self.pairs);

            for &(i, j) in &self.pairs {
                let (radius_i, radius_j) = (self.radii[i], self.radii[j]);
                let reach = radius_i + radius_j;
                if reach <= 0.0 {
                    continue;
                }

                let node_i = &state.nodes[i];
                let node_j = &state.nodes[j];
                let mut delta =
                    (node_i.position + node_i.velocity) - (node_j.position + node_j.velocity);
                if delta.norm_squared() >= reach * reach {
                    continue;
                }
                if delta.x == 0.0 {
                    delta.x = jiggle(pair_seed(node_i.seed, node_j.seed, 0));
                }
                if delta.y == 0.0 {
                    delta.y = jiggle(pair_seed(node_i.seed, node_j.seed, 1));
                }

                let length = delta.norm();
                let push: Vec2 = delta * ((reach - length) / length * self.config.strength);
                let weight_i = radius_i * radius_i;
                let weight_j = radius_j * radius_j;
                let share = weight_j / (weight_i + weight_j);

                state.nodes[i].velocity += push * share;
                state.nodes[j].velocity -= push * (1.0 - share);
            }
        }
    }

    fn needs_index(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::state::NodeSpec;

    fn overlapping(radius_a: f64, radius_b: f64) -> SimulationState {
        let mut state = SimulationState::default();
        state
            .insert_node(
                NodeSpec::new("a").at(0.0, 0.0).with_radius(radius_a),
                Vec2::zeros(),
            )
            .expect("a");
        state
            .insert_node(
                NodeSpec::new("b").at(10.0, 0.0).with_radius(radius_b),
                Vec2::zeros(),
            )
            .expect("b");
        state
    }

    #[test]
    fn overlapping_nodes_separate() {
        let mut state = overlapping(10.0, 10.0);
        let index = SpatialIndex::build(state.nodes());
        let mut force = CollisionForce::new(CollisionConfig::default());
        force.initialize(&state);
        force.apply(&mut state, &index, 0.0);

        // Overlap of 10 split evenly.
        assert!((state.nodes()[0].velocity.x + 5.0).abs() < 1e-6);
        assert!((state.nodes()[1].velocity.x - 5.0).abs() < 1e-6);
    }

    #[test]
    fn larger_node_moves_less() {
        let mut state = overlapping(30.0, 10.0);
        let index = SpatialIndex::build(state.nodes());
        let mut force = CollisionForce::new(CollisionConfig::default());
        force.initialize(&state);
        force.apply(&mut state, &index, 1.0);

        let moved_a = state.nodes()[0].velocity.norm();
        let moved_b = state.nodes()[1].velocity.norm();
        assert!(moved_a < moved_b, "{moved_a} vs {moved_b}");
    }

    #[test]
    fn separated_nodes_are_untouched() {
        let mut state = overlapping(2.0, 2.0);
        let index = SpatialIndex::build(state.nodes());
        let mut force = CollisionForce::new(CollisionConfig::default());
        force.initialize(&state);
        force.apply(&mut state, &index, 1.0);
        assert!(state.nodes().iter().all(|node| node.velocity == Vec2::zeros()));
    }

    #[test]
    fn default_radius_applies_without_hint() {
        let mut state = SimulationState::default();
        state
            .insert_node(NodeSpec::new("a").at(0.0, 0.0), Vec2::zeros())
            .expect("a");
        let mut force = CollisionForce::new(CollisionConfig::default());
        force.initialize(&state);
        assert_eq!(force.radii, vec![60.0]);
    }
}
