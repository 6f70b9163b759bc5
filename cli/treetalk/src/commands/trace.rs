//! `treetalk trace`: headless random walks.

use std::path::Path;

use anyhow::Result;
use treetalk_graph::DialogGraph;
use treetalk_play::{DialogRunner, TraceStep};
use tracing::warn;

use super::load_graph;

pub fn run(path: &Path, seed: Option<u64>, runs: u32, max_steps: usize) -> Result<()> {
    let (graph, report) = load_graph(path)?;
    if !report.is_clean() {
        warn!(
            dropped = report.issues.len(),
            "some edges were dropped on import; run 'treetalk check' for details"
        );
    }
    for (run, steps) in walks(&graph, seed, runs, max_steps).into_iter().enumerate() {
        if runs > 1 {
            println!("Run {}:", run + 1);
        }
        for step in steps {
            println!("{step}");
        }
    }
    Ok(())
}

/// `runs` walks; with a seed, run `n` uses `seed + n`.
pub(crate) fn walks(
    graph: &DialogGraph,
    seed: Option<u64>,
    runs: u32,
    max_steps: usize,
) -> Vec<Vec<TraceStep>> {
    (0..runs)
        .map(|n| {
            let mut runner = match seed {
                Some(seed) => DialogRunner::seeded(graph, seed.wrapping_add(u64::from(n))),
                None => DialogRunner::from_entropy(graph),
            };
            runner.trace(max_steps)
        })
        .collect()
}
