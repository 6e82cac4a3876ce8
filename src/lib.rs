pub mod error;
pub mod graph;
pub mod physics;
mod util;

pub use error::{Error, Result};
pub use physics::{DragController, Lifecycle, Simulation, SimulationConfig, Snapshot};
