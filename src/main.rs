mod app;
mod layout;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Open the interactive viewer.
    View {
        /// Graph JSON file; the built-in sample is used when omitted.
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Run the layout headless and print the final positions as JSON.
    Layout {
        #[arg(long)]
        input: Option<PathBuf>,
        /// Upper bound on ticks before giving up on convergence.
        #[arg(long, default_value_t = 1000)]
        max_ticks: usize,
        /// Write to this file instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match args.command.unwrap_or(Command::View { input: None }) {
        Command::View { input } => run_viewer(input),
        Command::Layout {
            input,
            max_ticks,
            output,
        } => layout::run(input.as_deref(), max_ticks, output.as_deref()),
    }
}

fn run_viewer(input: Option<PathBuf>) -> anyhow::Result<()> {
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "forcegraph",
        options,
        Box::new(move |cc| Ok(Box::new(app::ForceGraphApp::new(cc, input.clone())))),
    )
    .map_err(|error| anyhow::anyhow!("viewer failed: {error}"))
}
