//! Headless walk that records what a player would see.

use std::fmt;

use rand::Rng;
use serde::Serialize;
use treetalk_graph::{Node, NodeId, NodeKind};

use crate::runner::DialogRunner;

/// One visited node of a headless walk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TraceStep {
    Sentence { id: NodeId, text: String },
    Answer { id: NodeId, choices: Vec<String> },
}

impl TraceStep {
    fn from_node(node: &Node) -> Self {
        match node.kind() {
            NodeKind::Sentence(s) => TraceStep::Sentence {
                id: node.id(),
                text: s.text.clone(),
            },
            NodeKind::Answer(a) => TraceStep::Answer {
                id: node.id(),
                choices: a.choices().iter().map(|c| c.text.clone()).collect(),
            },
        }
    }

    pub fn id(&self) -> NodeId {
        match self {
            TraceStep::Sentence { id, .. } | TraceStep::Answer { id, .. } => *id,
        }
    }
}

impl fmt::Display for TraceStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceStep::Sentence { text, .. } => write!(f, "Sentence: {text}"),
            TraceStep::Answer { choices, .. } => write!(f, "Answers: {}", choices.join(", ")),
        }
    }
}

impl<R: Rng> DialogRunner<'_, R> {
    /// Walk from a fresh `init` until the dialog ends or `max_steps` nodes
    /// have been recorded.
    pub fn trace(&mut self, max_steps: usize) -> Vec<TraceStep> {
        let mut steps = Vec::new();
        let mut node = self.init();
        while let Some(n) = node {
            if steps.len() >= max_steps {
                break;
            }
            steps.push(TraceStep::from_node(n));
            node = self.next();
        }
        steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use treetalk_graph::{DialogBuilder, DialogGraph};

    fn linear() -> DialogGraph {
        let mut b = DialogBuilder::new("npc");
        let hello = b.sentence("hello", "Hello");
        let reply = b.answer("reply", ["Hi", "Bye"]);
        let bye = b.sentence("bye", "Farewell");
        b.link(hello, reply).unwrap();
        b.bind(reply, 1, bye).unwrap();
        b.build().unwrap()
    }

    #[test]
    fn trace_renders_each_node() {
        let g = linear();
        let mut r = DialogRunner::seeded(&g, 0);
        let lines: Vec<String> = r.trace(16).iter().map(ToString::to_string).collect();
        assert_eq!(
            lines,
            vec!["Sentence: Hello", "Answers: Hi, Bye", "Sentence: Farewell"]
        );
        assert!(r.current().is_none());
    }

    #[test]
    fn trace_respects_step_limit() {
        let g = linear();
        let mut r = DialogRunner::seeded(&g, 0);
        let steps = r.trace(2);
        assert_eq!(steps.len(), 2);
        assert!(matches!(steps[1], TraceStep::Answer { .. }));
    }

    #[test]
    fn trace_of_empty_graph_is_empty() {
        let g = DialogGraph::new();
        assert!(DialogRunner::seeded(&g, 0).trace(8).is_empty());
    }

    #[test]
    fn trace_serializes_tagged() {
        let step = TraceStep::Sentence {
            id: NodeId::nil(),
            text: "x".into(),
        };
        let json = serde_json::to_value(&step).unwrap();
        assert_eq!(json["type"], "sentence");
        assert_eq!(json["text"], "x");
    }
}
