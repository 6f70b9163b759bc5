//! CLI command implementations.

pub mod check;
pub mod new;
pub mod play;
pub mod trace;

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use treetalk_graph::{DialogDocument, DialogGraph, ImportReport};

/// Read and import a dialog file. Dropped edges are left in the report for
/// the caller to surface.
pub(crate) fn load_graph(path: &Path) -> Result<(DialogGraph, ImportReport)> {
    if !path.exists() {
        bail!(
            "dialog file not found: {}. Run 'treetalk new' to create one.",
            path.display()
        );
    }
    let json = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let document =
        DialogDocument::from_json(&json).with_context(|| format!("parsing {}", path.display()))?;
    document
        .import()
        .with_context(|| format!("importing {}", path.display()))
}
