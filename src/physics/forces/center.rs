use crate::physics::config::CenterConfig;
use crate::physics::quadtree::SpatialIndex;
use crate::physics::state::{SimulationState, Vec2};

use super::Force;

/// Nudges every free node by the same offset so the centroid drifts to the
/// configured point. Relative layout is untouched.
pub struct CenterForce {
    config: CenterConfig,
}

impl CenterForce {
    pub fn new(config: CenterConfig) -> Self {
        Self { config }
    }

    pub fn target(&self) -> Vec2 {
        Vec2::new(self.config.x, self.config.y)
    }
}

impl Force for CenterForce {
    fn name(&self) -> &'static str {
        "center"
    }

    fn apply(&mut self, state: &mut SimulationState, _index: &SpatialIndex, _alpha: f64) {
        if state.is_empty() || self.config.strength == 0.0 {
            return;
        }

        let centroid = state
            .nodes
            .iter()
            .fold(Vec2::zeros(), |sum, node| sum + node.position)
            / state.len() as f64;
        let shift = (self.target() - centroid) * self.config.strength;

        for node in state.nodes.iter_mut().filter(|node| !node.is_pinned()) {
            node.velocity += shift;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::state::NodeSpec;

    #[test]
    fn shifts_free_nodes_toward_target() {
        let mut state = SimulationState::default();
        for (id, x) in [("a", 10.0), ("b", 30.0)] {
            state
                .insert_node(NodeSpec::new(id).at(x, 0.0), Vec2::zeros())
                .expect("insert");
        }
        state.nodes_mut()[1].pin = Some(Vec2::new(30.0, 0.0));

        let mut force = CenterForce::new(CenterConfig {
            x: 0.0,
            y: 0.0,
            strength: 0.5,
        });
        force.apply(&mut state, &SpatialIndex::empty(), 1.0);

        assert_eq!(state.nodes()[0].velocity, Vec2::new(-10.0, 0.0));
        assert_eq!(state.nodes()[1].velocity, Vec2::zeros());
    }

    #[test]
    fn empty_state_is_a_no_op() {
        let mut state = SimulationState::default();
        CenterForce::new(CenterConfig::default()).apply(&mut state, &SpatialIndex::empty(), 1.0);
        assert!(state.is_empty());
    }
}
