//! Run a rule program on a graph and write one JSON snapshot per step.
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use pcgd::driver::{self, RunConfig};

/// Port graph dynamics: apply a cyclic rule program to a host graph, step by step
#[derive(Parser, Debug)]
#[command(name = "pcgd")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// File containing the input graph
    graph: PathBuf,

    /// File containing the rule program
    program: PathBuf,

    /// Number of steps to run
    steps: usize,

    /// Directory receiving the snapshots
    #[arg(short = 'o', long, default_value = "graphs")]
    output_dir: PathBuf,

    /// File name prefix of the snapshots
    #[arg(short = 'p', long, default_value = "graph")]
    prefix: String,
}

impl Args {
    fn to_config(&self) -> RunConfig {
        RunConfig {
            graph_path: self.graph.clone(),
            program_path: self.program.clone(),
            steps: self.steps,
            output_dir: self.output_dir.clone(),
            prefix: self.prefix.clone(),
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = args.to_config();

    match driver::run(&config) {
        Ok(stats) => {
            info!(
                steps = config.steps,
                replacements = stats.replacements,
                created = stats.vertices_created,
                "run complete"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
