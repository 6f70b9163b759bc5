//! `treetalk new`: write a sample dialog.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use treetalk_graph::{DialogBuilder, DialogDocument, DialogGraph, SentenceNode};
use treetalk_play::{PlaybackConfig, CONFIG_FILE_NAME};

/// Write a sample dialog to `path`, plus a `treetalk.toml` beside it unless
/// one already exists.
pub fn run(path: &Path) -> Result<()> {
    if path.exists() {
        bail!("'{}' already exists", path.display());
    }
    let graph = sample_graph()?;
    let json = DialogDocument::export(&graph)
        .to_json()
        .context("serializing sample dialog")?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    println!("Created {}", path.display());

    let config_path = path
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(CONFIG_FILE_NAME);
    if !config_path.exists() {
        fs::write(&config_path, PlaybackConfig::template())
            .with_context(|| format!("writing {}", config_path.display()))?;
        println!("Created {}", config_path.display());
    }
    Ok(())
}

/// A greeting with one branch and a signal on the friendly path.
pub(crate) fn sample_graph() -> Result<DialogGraph> {
    let mut b = DialogBuilder::new("Kulibin");
    let hello = b.sentence("hello", "Hello, traveller.");
    let reply = b.answer("reply", ["Hi!", "Leave me alone.", "..."]);
    let hi = b.add_sentence_node(
        "hi",
        SentenceNode::new("Hi there. Need a map?").with_signal("offer_map"),
    );
    let bye = b.sentence("bye", "Farewell, then.");
    let later = b.sentence("later", "Come back any time.");
    b.link(hello, reply)?;
    b.bind(reply, 0, hi)?;
    b.bind(reply, 1, bye)?;
    b.link(hi, later)?;
    Ok(b.build()?)
}
