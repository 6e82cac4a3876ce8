//! Force contributors and the registry that runs them in a fixed order.
//!
//! Every force writes velocity deltas into [`SimulationState`]; none of them
//! move positions. The integrator turns velocity into motion afterwards.

mod center;
mod charge;
mod collision;
mod link;

pub use center::CenterForce;
pub use charge::ChargeForce;
pub use collision::CollisionForce;
pub use link::LinkForce;

use super::config::SimulationConfig;
use super::quadtree::SpatialIndex;
use super::state::SimulationState;

pub trait Force {
    fn name(&self) -> &'static str;

    /// Called after the node or link set changed, before the next `apply`.
    fn initialize(&mut self, _state: &SimulationState) {}

    fn apply(&mut self, state: &mut SimulationState, index: &SpatialIndex, alpha: f64);

    /// Whether `apply` reads the spatial index.
    fn needs_index(&self) -> bool {
        false
    }
}

pub enum ForceKind {
    Link(LinkForce),
    Charge(ChargeForce),
    Center(CenterForce),
    Collision(CollisionForce),
}

impl ForceKind {
    fn order(&self) -> u8 {
        match self {
            Self::Link(_) => 0,
            Self::Charge(_) => 1,
            Self::Center(_) => 2,
            Self::Collision(_) => 3,
        }
    }

    fn as_force(&self) -> &dyn Force {
        match self {
            Self::Link(force) => force as &dyn Force,
            Self::Charge(force) => force as &dyn Force,
            Self::Center(force) => force as &dyn Force,
            Self::Collision(force) => force as &dyn Force,
        }
    }

    fn as_force_mut(&mut self) -> &mut dyn Force {
        match self {
            Self::Link(force) => force as &mut dyn Force,
            Self::Charge(force) => force as &mut dyn Force,
            Self::Center(force) => force as &mut dyn Force,
            Self::Collision(force) => force as &mut dyn Force,
        }
    }
}

impl Force for ForceKind {
    fn name(&self) -> &'static str {
        self.as_force().name()
    }

    fn initialize(&mut self, state: &SimulationState) {
        self.as_force_mut().initialize(state);
    }

    fn apply(&mut self, state: &mut SimulationState, index: &SpatialIndex, alpha: f64) {
        self.as_force_mut().apply(state, index, alpha);
    }

    fn needs_index(&self) -> bool {
        self.as_force().needs_index()
    }
}

/// Named forces, kept in link, charge, center, collision order.
#[derive(Default)]
pub struct ForceRegistry {
    forces: Vec<ForceKind>,
}

impl ForceRegistry {
    pub fn from_config(config: &SimulationConfig) -> Self {
        let mut registry = Self::default();
        if let Some(link) = config.link {
            registry.insert(ForceKind::Link(LinkForce::new(link)));
        }
        if let Some(charge) = config.charge {
            registry.insert(ForceKind::Charge(ChargeForce::new(charge)));
        }
        if let Some(center) = config.center {
            registry.insert(ForceKind::Center(CenterForce::new(center)));
        }
        if let Some(collision) = config.collision {
            registry.insert(ForceKind::Collision(CollisionForce::new(collision)));
        }
        registry
    }

    /// Adds a force, replacing any force with the same name.
    pub fn insert(&mut self, force: ForceKind) {
        self.forces.retain(|existing| existing.name() != force.name());
        let position = self
            .forces
            .iter()
            .position(|existing| existing.order() > force.order())
            .unwrap_or(self.forces.len());
        self.forces.insert(position, force);
    }

    pub fn remove(&mut self, name: &str) -> Option<ForceKind> {
        let position = self.forces.iter().position(|force| force.name() == name)?;
        Some(self.forces.remove(position))
    }

    pub fn get(&self, name: &str) -> Option<&ForceKind> {
        self.forces.iter().find(|force| force.name() == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.forces.iter().map(|force| force.name())
    }

    pub fn len(&self) -> usize {
        self.forces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forces.is_empty()
    }

    pub fn needs_index(&self) -> bool {
        self.forces.iter().any(|force| force.needs_index())
    }

    pub fn initialize(&mut self, state: &SimulationState) {
        for force in &mut self.forces {
            force.initialize(state);
        }
    }

    pub fn apply(&mut self, state: &mut SimulationState, index: &SpatialIndex, alpha: f64) {
        for force in &mut self.forces {
            force.apply(state, index, alpha);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::config::{CenterConfig, ChargeConfig, CollisionConfig, LinkConfig};

    #[test]
    fn registry_keeps_fixed_order() {
        let mut registry = ForceRegistry::default();
        registry.insert(ForceKind::Collision(CollisionForce::new(
            CollisionConfig::default(),
        )));
        registry.insert(ForceKind::Center(CenterForce::new(CenterConfig::default())));
        registry.insert(ForceKind::Link(LinkForce::new(LinkConfig::default())));
        registry.insert(ForceKind::Charge(ChargeForce::new(ChargeConfig::default())));

        assert_eq!(
            registry.names().collect::<Vec<_>>(),
            vec!["link", "charge", "center", "collision"]
        );
    }

    #[test]
    fn insert_replaces_same_name() {
        let mut registry = ForceRegistry::from_config(&SimulationConfig::default());
        assert_eq!(registry.len(), 4);
        registry.insert(ForceKind::Charge(ChargeForce::new(ChargeConfig {
            strength: -10.0,
            ..ChargeConfig::default()
        })));
        assert_eq!(registry.len(), 4);
        assert!(matches!(
            registry.get("charge"),
            Some(ForceKind::Charge(force)) if force.strength() == -10.0
        ));
    }

    #[test]
    fn disabled_forces_are_absent() {
        let registry = ForceRegistry::from_config(&SimulationConfig::without_forces());
        assert!(registry.is_empty());
        assert!(!registry.needs_index());
        assert!(registry.get("link").is_none());
    }

    #[test]
    fn remove_by_name() {
        let mut registry = ForceRegistry::from_config(&SimulationConfig::default());
        assert!(registry.remove("center").is_some());
        assert!(registry.remove("center").is_none());
        assert_eq!(
            registry.names().collect::<Vec<_>>(),
            vec!["link", "charge", "collision"]
        );
    }
}
