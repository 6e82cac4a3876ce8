use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use forcegraph::graph::{load_graph, sample_graph};
use forcegraph::physics::Lifecycle;
use tracing::{info, warn};

/// Loads a graph, ticks it until it converges (or `max_ticks` runs out) and
/// writes the final snapshot as pretty JSON.
pub fn run(input: Option<&Path>, max_ticks: usize, output: Option<&Path>) -> Result<()> {
    let document = match input {
        Some(path) => load_graph(path)?,
        None => sample_graph(),
    };

    let mut simulation = document
        .build_simulation()
        .context("failed to set up the simulation")?;
    let ticks = simulation.run_until_converged(max_ticks);

    for diagnostic in simulation.take_diagnostics() {
        warn!("{diagnostic}");
    }
    if simulation.lifecycle() == Lifecycle::Converged {
        info!(ticks, alpha = simulation.alpha(), "layout converged");
    } else {
        warn!(ticks, alpha = simulation.alpha(), "layout stopped before converging");
    }

    let json = serde_json::to_string_pretty(simulation.snapshot())
        .context("failed to serialize snapshot")?;

    match output {
        Some(path) => fs::write(path, json + "\n")
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{json}").context("failed to write to stdout")?;
        }
    }
    Ok(())
}
