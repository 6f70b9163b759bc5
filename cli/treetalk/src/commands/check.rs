//! `treetalk check`: import a dialog and re-check every invariant.

use std::path::Path;

use anyhow::{bail, Result};
use treetalk_graph::{DialogGraph, GraphError, ImportReport};

use super::load_graph;

pub fn run(path: &Path) -> Result<()> {
    let (graph, report) = load_graph(path)?;
    let problems = check(&graph, &report);

    println!("{}", path.display());
    println!("  Character:    {}", graph.character().name);
    println!("  Nodes:        {}", graph.node_count());
    println!("  Edges:        {}", graph.edge_count());
    println!("  Roots:        {}", graph.roots().len());
    println!("  Longest path: {}", graph.longest_path());

    if problems.is_empty() {
        println!("OK");
        return Ok(());
    }
    for problem in &problems {
        println!("  - {problem}");
    }
    bail!("{} problem(s) found in {}", problems.len(), path.display())
}

/// Every dropped edge and invariant violation, in a stable order.
pub(crate) fn check(graph: &DialogGraph, report: &ImportReport) -> Vec<String> {
    let mut problems: Vec<String> = report.issues.iter().map(ToString::to_string).collect();
    if let Err(errors) = graph.validate() {
        problems.extend(errors.iter().map(GraphError::to_string));
    }
    if !graph.is_empty() && graph.roots().is_empty() {
        problems.push("no root sentence: playback cannot start".to_string());
    }
    problems
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use treetalk_graph::{DialogDocument, NodeRecord};

    #[test]
    fn sample_is_clean() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("d.json");
        crate::commands::new::run(&path).unwrap();
        run(&path).unwrap();
    }

    #[test]
    fn one_sided_edge_is_reported() {
        let graph = crate::commands::new::sample_graph().unwrap();
        let mut doc = DialogDocument::export(&graph);
        // Forget the back-reference on every sentence child.
        for record in &mut doc.nodes {
            if let NodeRecord::Sentence { parent_ids, .. } = record {
                parent_ids.clear();
            }
        }
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, doc.to_json().unwrap()).unwrap();

        let err = run(&path).unwrap_err();
        assert!(err.to_string().contains("problem(s) found"));

        let (graph, report) = load_graph(&path).unwrap();
        assert!(!check(&graph, &report).is_empty());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(&dir.path().join("nope.json")).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn malformed_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ not json").unwrap();
        let err = run(&path).unwrap_err();
        assert!(format!("{err:#}").contains("parsing"));
    }
}
