//! `treetalk play`: run the playback controller on a simulated clock.

use std::collections::VecDeque;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{info, warn};
use treetalk_graph::DialogGraph;
use treetalk_play::{EventLog, PlaybackConfig, PlaybackController, PlaybackEvent, PlaybackState};

use super::load_graph;

/// Simulated time per host frame.
const FRAME: Duration = Duration::from_millis(16);

pub fn run(
    path: &Path,
    choose: &[usize],
    seed: Option<u64>,
    config_path: Option<&Path>,
    json: bool,
) -> Result<()> {
    let (graph, report) = load_graph(path)?;
    if !report.is_clean() {
        warn!(
            dropped = report.issues.len(),
            "some edges were dropped on import; run 'treetalk check' for details"
        );
    }

    let mut config = resolve_config(path, config_path)?;
    if seed.is_some() {
        config.seed = seed;
    }

    for line in simulate(&graph, config, choose, json)? {
        println!("{line}");
    }
    Ok(())
}

/// `--config` wins, then the nearest `treetalk.toml` above the dialog
/// file, then defaults.
fn resolve_config(path: &Path, explicit: Option<&Path>) -> Result<PlaybackConfig> {
    if let Some(explicit) = explicit {
        return Ok(PlaybackConfig::load(explicit)?);
    }
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => std::env::current_dir().context("resolving current directory")?,
    };
    match PlaybackConfig::find_and_load(&dir)? {
        Some((config, found)) => {
            info!(config = %found.display(), "using playback config");
            Ok(config)
        }
        None => Ok(PlaybackConfig::default()),
    }
}

/// Play `graph` to the end, picking answers from `choose` in order, and
/// return the printed transcript. Running out of choices closes the
/// dialog.
pub(crate) fn simulate(
    graph: &DialogGraph,
    config: PlaybackConfig,
    choose: &[usize],
    json: bool,
) -> Result<Vec<String>> {
    let mut controller = PlaybackController::new(config);
    let log = EventLog::new();
    controller.subscribe(log.clone());
    let mut choices: VecDeque<usize> = choose.iter().copied().collect();
    let mut lines = Vec::new();

    controller.start(graph);
    loop {
        lines.extend(log.take().iter().filter_map(|e| render(e, json)));
        match controller.state() {
            PlaybackState::Closed | PlaybackState::Idle => break,
            PlaybackState::AwaitingChoice if all_presented(&controller) => {
                let Some(answer) = controller.current_node().map(|n| n.id()) else {
                    break;
                };
                match choices.pop_front() {
                    Some(index) => {
                        controller
                            .select_choice(answer, index)
                            .with_context(|| format!("choosing {index}"))?;
                        if !json {
                            lines.push(format!("> {index}"));
                        }
                    }
                    None => {
                        warn!(%answer, "no choice left to pick; closing");
                        controller.close();
                    }
                }
            }
            _ => {
                controller.advance(FRAME);
            }
        }
    }
    Ok(lines)
}

fn all_presented(controller: &PlaybackController<'_>) -> bool {
    controller
        .current_node()
        .and_then(|n| n.as_answer())
        .is_some_and(|a| controller.presented_choices().len() >= a.choice_count())
}

fn render(event: &PlaybackEvent, json: bool) -> Option<String> {
    if json {
        return serde_json::to_string(event).ok();
    }
    match event {
        PlaybackEvent::SentenceEntered { speaker, text, .. } => Some(format!("{speaker}: {text}")),
        PlaybackEvent::Signal { name, .. } => Some(format!("  [signal] {name}")),
        PlaybackEvent::ChoicePresented {
            index, text, bound, ..
        } => Some(if *bound {
            format!("  {index}) {text}")
        } else {
            format!("  {index}) {text} (ends)")
        }),
        PlaybackEvent::Stopped => Some("[end]".to_string()),
        PlaybackEvent::StateChanged { .. } | PlaybackEvent::RevealCompleted { .. } => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::new::sample_graph;
    use std::fs;

    fn fast() -> PlaybackConfig {
        PlaybackConfig {
            char_delay_ms: 1,
            natural_pause_ms: 10,
            choice_delay_ms: 5,
            seed: Some(0),
        }
    }

    #[test]
    fn friendly_path() {
        let graph = sample_graph().unwrap();
        let lines = simulate(&graph, fast(), &[0], false).unwrap();
        assert_eq!(
            lines,
            vec![
                "Kulibin: Hello, traveller.",
                "  0) Hi!",
                "  1) Leave me alone.",
                "  2) ... (ends)",
                "> 0",
                "Kulibin: Hi there. Need a map?",
                "  [signal] offer_map",
                "Kulibin: Come back any time.",
                "[end]",
            ]
        );
    }

    #[test]
    fn running_out_of_choices_closes() {
        let graph = sample_graph().unwrap();
        let lines = simulate(&graph, fast(), &[], false).unwrap();
        assert_eq!(lines.last().map(String::as_str), Some("[end]"));
        assert!(!lines.iter().any(|l| l.starts_with('>')));
    }

    #[test]
    fn unbound_choice_is_an_error() {
        let graph = sample_graph().unwrap();
        let err = simulate(&graph, fast(), &[2], false).unwrap_err();
        assert!(format!("{err:#}").contains("no follow-up sentence"));
    }

    #[test]
    fn json_lines_are_events() {
        let graph = sample_graph().unwrap();
        let lines = simulate(&graph, fast(), &[1], true).unwrap();
        for line in &lines {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            assert!(value["event"].is_string());
        }
        assert_eq!(
            lines.last().map(String::as_str),
            Some(r#"{"event":"stopped"}"#)
        );
    }

    #[test]
    fn explicit_config_is_used() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("d.json");
        crate::commands::new::run(&path).unwrap();
        let custom = dir.path().join("custom.toml");
        fs::write(&custom, "[playback]\nchar_delay_ms = 3\n").unwrap();

        let config = resolve_config(&path, Some(&custom)).unwrap();
        assert_eq!(config.char_delay_ms, 3);

        let nearest = resolve_config(&path, None).unwrap();
        assert_eq!(nearest, PlaybackConfig::default());

        run(&path, &[0], Some(4), None, false).unwrap();
    }
}
