use crate::physics::config::ChargeConfig;
use crate::physics::quadtree::{ManyBodyParams, SpatialIndex};
use crate::physics::state::SimulationState;

use super::Force;

/// Many-body repulsion (or attraction) approximated with Barnes-Hut.
pub struct ChargeForce {
    config: ChargeConfig,
    params: ManyBodyParams,
}

impl ChargeForce {
    pub fn new(config: ChargeConfig) -> Self {
        let distance_max_sq = config
            .distance_max
            .map(|distance| distance * distance)
            .unwrap_or(f64::INFINITY);
        Self {
            params: ManyBodyParams {
                theta: config.theta,
                distance_min_sq: config.distance_min * config.distance_min,
                distance_max_sq,
            },
            config,
        }
    }

    pub fn strength(&self) -> f64 {
        self.config.strength
    }

    pub fn config(&self) -> &ChargeConfig {
        &self.config
    }
}

impl Force for ChargeForce {
    fn name(&self) -> &'static str {
        "charge"
    }

    fn apply(&mut self, state: &mut SimulationState, index: &SpatialIndex, alpha: f64) {
        let strength = self.config.strength;
        if strength == 0.0 || state.len() < 2 || index.len() != state.len() {
            return;
        }

        let scale = strength * alpha;
        for (node_index, node) in state.nodes.iter_mut().enumerate() {
            node.velocity += index.accumulate(node_index, &self.params) * scale;
        }
    }

    fn needs_index(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::state::{NodeSpec, Vec2};

    fn pair() -> SimulationState {
        let mut state = SimulationState::default();
        state
            .insert_node(NodeSpec::new("a").at(0.0, 0.0), Vec2::zeros())
            .expect("a");
        state
            .insert_node(NodeSpec::new("b").at(10.0, 0.0), Vec2::zeros())
            .expect("b");
        state
    }

    #[test]
    fn negative_strength_repels() {
        let mut state = pair();
        let index = SpatialIndex::build(state.nodes());
        let mut force = ChargeForce::new(ChargeConfig::default());
        force.apply(&mut state, &index, 1.0);

        assert!(state.nodes()[0].velocity.x < 0.0);
        assert!(state.nodes()[1].velocity.x > 0.0);
        // -400 * 10 / 100
        assert!((state.nodes()[1].velocity.x - 40.0).abs() < 1e-6);
    }

    #[test]
    fn positive_strength_attracts() {
        let mut state = pair();
        let index = SpatialIndex::build(state.nodes());
        let mut force = ChargeForce::new(ChargeConfig {
            strength: 30.0,
            ..ChargeConfig::default()
        });
        force.apply(&mut state, &index, 0.5);
        assert!(state.nodes()[0].velocity.x > 0.0);
        assert!(state.nodes()[1].velocity.x < 0.0);
    }

    #[test]
    fn stale_index_is_ignored() {
        let mut state = pair();
        let mut force = ChargeForce::new(ChargeConfig::default());
        force.apply(&mut state, &SpatialIndex::empty(), 1.0);
        assert!(state.nodes().iter().all(|node| node.velocity == Vec2::zeros()));
    }
}
