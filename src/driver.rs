//! Running a rule program for a number of steps.
use std::fs;
use std::path::PathBuf;

use thiserror::Error;
use tracing::{info, warn};

use crate::graph::Graph;
use crate::loader::{load_graph, load_program, LoadError};
use crate::rewrite::{self, RewriteFault, RewriteStats};
use crate::rule::Pcgd;
use crate::snapshot::Snapshot;

/// Parameters of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub graph_path: PathBuf,
    pub program_path: PathBuf,
    pub steps: usize,
    /// Directory receiving one snapshot per step.
    pub output_dir: PathBuf,
    /// Snapshot `i` is written to `output_dir/<prefix><i>.json`.
    pub prefix: String,
}

impl RunConfig {
    pub fn snapshot_path(&self, step: usize) -> PathBuf {
        self.output_dir.join(format!("{}{step}.json", self.prefix))
    }
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error("cannot create output directory {}: {source}", .path.display())]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("step {step} aborted: {source}")]
    Rewrite { step: usize, source: RewriteFault },
}

/// A host graph evolving under a rule program.
#[derive(Debug, Clone)]
pub struct Simulation {
    graph: Graph,
    program: Pcgd,
    step: usize,
}

impl Simulation {
    pub fn new(graph: Graph, program: Pcgd) -> Self {
        Simulation {
            graph,
            program,
            step: 0,
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn program(&self) -> &Pcgd {
        &self.program
    }

    /// Number of steps performed so far.
    pub fn step_count(&self) -> usize {
        self.step
    }

    pub fn into_graph(self) -> Graph {
        self.graph
    }

    /// Apply the whole program once.
    pub fn step(&mut self) -> Result<RewriteStats, RunError> {
        let step = self.step + 1;
        let stats = rewrite::apply(&mut self.graph, &self.program)
            .map_err(|source| RunError::Rewrite { step, source })?;
        self.step = step;
        info!(
            step,
            vertices = self.graph.vertex_count(),
            edges = self.graph.edge_count(),
            replacements = stats.replacements,
            "step done"
        );
        Ok(stats)
    }

    /// Perform `steps` steps. `observer` sees the graph before the first step and after each
    /// step, together with the number of steps performed so far.
    pub fn run<F>(&mut self, steps: usize, mut observer: F) -> Result<RewriteStats, RunError>
    where
        F: FnMut(usize, &Graph),
    {
        let mut total = RewriteStats::default();
        observer(self.step, &self.graph);
        for _ in 0..steps {
            total += self.step()?;
            observer(self.step, &self.graph);
        }
        Ok(total)
    }
}

/// Load the inputs named by `config`, run it, and write a snapshot after every step.
///
/// A snapshot that cannot be written is reported and skipped.
pub fn run(config: &RunConfig) -> Result<RewriteStats, RunError> {
    let graph = load_graph(&config.graph_path)?;
    let program = load_program(&config.program_path)?;
    info!(
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        cycles = program.len(),
        "inputs loaded"
    );

    fs::create_dir_all(&config.output_dir).map_err(|source| RunError::OutputDir {
        path: config.output_dir.clone(),
        source,
    })?;

    let mut simulation = Simulation::new(graph, program);
    simulation.run(config.steps, |step, graph| {
        let path = config.snapshot_path(step);
        match Snapshot::of(graph).write_to_path(&path) {
            Ok(()) => info!(step, path = %path.display(), "snapshot written"),
            Err(error) => warn!(step, %error, "snapshot skipped"),
        }
    })
}
