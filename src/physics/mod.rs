//! Force-directed layout engine.

pub mod config;
mod diagnostic;
mod drag;
mod engine;
pub mod forces;
mod integrator;
pub mod quadtree;
mod queue;
mod snapshot;
mod state;

pub use config::{CenterConfig, ChargeConfig, CollisionConfig, LinkConfig, SimulationConfig};
pub use diagnostic::Diagnostic;
pub use drag::DragController;
pub use engine::{Lifecycle, Simulation};
pub use forces::{Force, ForceKind, ForceRegistry};
pub use integrator::{Cooling, default_alpha_decay, integrate};
pub use quadtree::{ManyBodyParams, QuadtreeCell, SpatialIndex};
pub use queue::{Mutation, Mutator};
pub use snapshot::{LinkEndpoints, NodePosition, Snapshot};
pub use state::{Link, NodeSpec, NodeState, ResolvedLink, SimulationState, Vec2};
