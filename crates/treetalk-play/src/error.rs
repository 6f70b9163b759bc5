//! Error types for traversal, playback and configuration.

use std::path::PathBuf;

use treetalk_graph::NodeId;

use crate::playback::PlaybackState;

/// Errors from [`DialogRunner`](crate::DialogRunner) operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RunnerError {
    #[error("node {0} not found in graph")]
    NodeNotFound(NodeId),

    #[error("node {0} is not a sentence")]
    NotASentence(NodeId),
}

/// Errors from [`PlaybackController`](crate::PlaybackController) calls.
///
/// A failed call never changes controller state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlaybackError {
    #[error("cannot {action} while {state}")]
    NotAccepting {
        state: PlaybackState,
        action: &'static str,
    },

    #[error("node {0} is not the answer being presented")]
    NotCurrentAnswer(NodeId),

    #[error("choice {index} of answer {node} has no follow-up sentence")]
    UnboundChoice { node: NodeId, index: usize },

    #[error(transparent)]
    Runner(#[from] RunnerError),
}

/// Errors loading a `treetalk.toml` file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runner_error_display() {
        let id = NodeId::nil();
        assert_eq!(
            RunnerError::NotASentence(id).to_string(),
            format!("node {id} is not a sentence")
        );
    }

    #[test]
    fn playback_error_wraps_runner() {
        let err: PlaybackError = RunnerError::NodeNotFound(NodeId::nil()).into();
        assert!(matches!(err, PlaybackError::Runner(_)));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn not_accepting_names_state() {
        let err = PlaybackError::NotAccepting {
            state: PlaybackState::Closed,
            action: "skip",
        };
        assert_eq!(err.to_string(), "cannot skip while closed");
    }
}
