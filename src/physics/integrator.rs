//! Alpha cooling schedule and the friction + semi-implicit Euler step.

use super::state::{NodeState, Vec2};

/// Heat and damping parameters that drive convergence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cooling {
    pub alpha: f64,
    pub alpha_target: f64,
    pub alpha_decay: f64,
    pub alpha_min: f64,
    /// Fraction of velocity kept each tick.
    pub velocity_decay: f64,
}

impl Default for Cooling {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            alpha_target: 0.0,
            alpha_decay: default_alpha_decay(),
            alpha_min: 0.001,
            velocity_decay: 0.6,
        }
    }
}

/// Decay that takes alpha from 1 to `alpha_min` (0.001) in 300 ticks.
pub fn default_alpha_decay() -> f64 {
    1.0 - 0.001_f64.powf(1.0 / 300.0)
}

impl Cooling {
    /// Moves alpha toward `alpha_target` and returns the new value.
    pub fn cool(&mut self) -> f64 {
        self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;
        self.alpha = self.alpha.clamp(0.0, 1.0);
        self.alpha
    }

    pub fn is_converged(&self) -> bool {
        self.alpha < self.alpha_min
    }
}

/// Applies friction and advances positions. Pinned nodes snap to their pin
/// with zero velocity. Returns indices of nodes that went non-finite and were
/// restored to their last finite position.
pub fn integrate(nodes: &mut [NodeState], velocity_decay: f64) -> Vec<usize> {
    let mut recovered = Vec::new();

    for (index, node) in nodes.iter_mut().enumerate() {
        if let Some(pin) = node.pin {
            node.position = pin;
            node.velocity = Vec2::zeros();
            node.last_finite = pin;
            continue;
        }

        node.velocity *= velocity_decay;
        node.position += node.velocity;

        let finite = node.position.iter().all(|value| value.is_finite())
            && node.velocity.iter().all(|value| value.is_finite());
        if finite {
            node.last_finite = node.position;
        } else {
            node.position = node.last_finite;
            node.velocity = Vec2::zeros();
            recovered.push(index);
        }
    }

    recovered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alpha_reaches_min_in_about_300_ticks() {
        let mut cooling = Cooling::default();
        let mut ticks = 0;
        while !cooling.is_converged() {
            cooling.cool();
            ticks += 1;
        }
        assert!((299..=301).contains(&ticks), "took {ticks} ticks");
    }

    #[test]
    fn alpha_moves_toward_raised_target() {
        let mut cooling = Cooling {
            alpha: 0.0005,
            alpha_target: 0.3,
            ..Cooling::default()
        };
        let before = cooling.alpha;
        cooling.cool();
        assert!(cooling.alpha > before);
        for _ in 0..2000 {
            cooling.cool();
        }
        assert!((cooling.alpha - 0.3).abs() < 1e-6);
        assert!(!cooling.is_converged());
    }

    #[test]
    fn free_nodes_apply_friction_then_move() {
        let mut nodes = vec![NodeState::new("a", 1.0, 2.0)];
        nodes[0].velocity = Vec2::new(10.0, -5.0);
        let recovered = integrate(&mut nodes, 0.5);
        assert!(recovered.is_empty());
        assert_eq!(nodes[0].velocity, Vec2::new(5.0, -2.5));
        assert_eq!(nodes[0].position, Vec2::new(6.0, -0.5));
    }

    #[test]
    fn pinned_nodes_snap_and_lose_velocity() {
        let mut nodes = vec![NodeState::new("a", 0.0, 0.0)];
        nodes[0].velocity = Vec2::new(3.0, 3.0);
        nodes[0].pin = Some(Vec2::new(40.0, -7.5));
        integrate(&mut nodes, 0.6);
        assert_eq!(nodes[0].position, Vec2::new(40.0, -7.5));
        assert_eq!(nodes[0].velocity, Vec2::zeros());
    }

    #[test]
    fn non_finite_motion_is_rolled_back() {
        let mut nodes = vec![NodeState::new("a", 4.0, 4.0)];
        nodes[0].velocity = Vec2::new(f64::INFINITY, 0.0);
        let recovered = integrate(&mut nodes, 0.6);
        assert_eq!(recovered, vec![0]);
        assert_eq!(nodes[0].position, Vec2::new(4.0, 4.0));
        assert_eq!(nodes[0].velocity, Vec2::zeros());
    }
}
