//! Flat JSON exchange format.
//!
//! A [`DialogDocument`] is a list of node records, each carrying its own
//! parent and child references. Import never trusts those references: nodes
//! are created first, then every edge is installed through the graph's
//! connection rules. An edge is kept only when both endpoints declare it and
//! the rules accept it; everything else is dropped and listed in the
//! [`ImportReport`].

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::GraphError;
use crate::graph::rules::EdgeRejection;
use crate::graph::DialogGraph;
use crate::localize::{Character, LocalizedRef};
use crate::node::{AnswerNode, Choice, Node, NodeId, NodeKind, SentenceNode};

/// A serialized dialog graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DialogDocument {
    #[serde(default)]
    pub character: Character,
    #[serde(default)]
    pub nodes: Vec<NodeRecord>,
}

/// One node of a [`DialogDocument`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeRecord {
    Sentence {
        id: NodeId,
        #[serde(default)]
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        localized: Option<LocalizedRef>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        speaker: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        signal: Option<String>,
        #[serde(default)]
        parent_ids: Vec<NodeId>,
        #[serde(default)]
        child_ids: Vec<NodeId>,
        #[serde(default, skip_serializing_if = "HashMap::is_empty")]
        annotations: HashMap<String, String>,
    },
    Answer {
        id: NodeId,
        #[serde(default)]
        choices: Vec<Choice>,
        #[serde(default)]
        parent_ids: Vec<NodeId>,
        #[serde(default)]
        child_by_choice: Vec<ChoiceBinding>,
        #[serde(default, skip_serializing_if = "HashMap::is_empty")]
        annotations: HashMap<String, String>,
    },
}

impl NodeRecord {
    pub fn id(&self) -> NodeId {
        match self {
            NodeRecord::Sentence { id, .. } | NodeRecord::Answer { id, .. } => *id,
        }
    }

    fn parent_ids(&self) -> &[NodeId] {
        match self {
            NodeRecord::Sentence { parent_ids, .. } | NodeRecord::Answer { parent_ids, .. } => {
                parent_ids
            }
        }
    }

    /// Declared outgoing edges as `(choice slot, child)` pairs.
    fn child_edges(&self) -> Vec<(Option<usize>, NodeId)> {
        match self {
            NodeRecord::Sentence { child_ids, .. } => {
                child_ids.iter().map(|c| (None, *c)).collect()
            }
            NodeRecord::Answer {
                child_by_choice, ..
            } => child_by_choice
                .iter()
                .map(|b| (Some(b.choice), b.child))
                .collect(),
        }
    }

    fn from_node(node: &Node) -> Self {
        let annotations = node.annotations.clone();
        match node.kind() {
            NodeKind::Sentence(s) => NodeRecord::Sentence {
                id: node.id(),
                text: s.text.clone(),
                localized: s.localized.clone(),
                speaker: s.speaker.clone(),
                signal: s.signal.clone(),
                parent_ids: s.parents().to_vec(),
                child_ids: s.children().to_vec(),
                annotations,
            },
            NodeKind::Answer(a) => NodeRecord::Answer {
                id: node.id(),
                choices: a.choices().to_vec(),
                parent_ids: a.parents().to_vec(),
                child_by_choice: a
                    .bindings()
                    .map(|(choice, child)| ChoiceBinding { choice, child })
                    .collect(),
                annotations,
            },
        }
    }

    /// Build the node payload without any edges.
    fn to_node(&self) -> Node {
        match self {
            NodeRecord::Sentence {
                id,
                text,
                localized,
                speaker,
                signal,
                annotations,
                ..
            } => {
                let mut sentence = SentenceNode::new(text.clone());
                sentence.localized = localized.clone();
                sentence.speaker = speaker.clone();
                sentence.signal = signal.clone();
                let mut node = Node::with_id(*id, NodeKind::Sentence(sentence));
                node.annotations = annotations.clone();
                node
            }
            NodeRecord::Answer {
                id,
                choices,
                annotations,
                ..
            } => {
                let answer = AnswerNode::new(choices.iter().cloned());
                let mut node = Node::with_id(*id, NodeKind::Answer(answer));
                node.annotations = annotations.clone();
                node
            }
        }
    }
}

/// A choice slot bound to a child sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceBinding {
    pub choice: usize,
    pub child: NodeId,
}

/// An edge dropped during import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportIssue {
    /// The edge names a node that is not in the document.
    DanglingReference { from: NodeId, to: NodeId },
    /// Only one endpoint declares the edge.
    OneSided { from: NodeId, to: NodeId },
    /// Both endpoints declare the edge but the connection rules refuse it.
    Rejected {
        from: NodeId,
        to: NodeId,
        reason: EdgeRejection,
    },
}

impl fmt::Display for ImportIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportIssue::DanglingReference { from, to } => {
                write!(f, "{from} -> {to}: references a missing node")
            }
            ImportIssue::OneSided { from, to } => {
                write!(f, "{from} -> {to}: declared by only one endpoint")
            }
            ImportIssue::Rejected { from, to, reason } => write!(f, "{from} -> {to}: {reason}"),
        }
    }
}

/// Outcome of [`DialogDocument::import`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub issues: Vec<ImportIssue>,
    /// Number of edges installed.
    pub edges: usize,
}

impl ImportReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

impl DialogDocument {
    /// Snapshot a graph. Nodes are written in ascending ID order.
    pub fn export(graph: &DialogGraph) -> Self {
        let nodes = graph
            .node_ids()
            .iter()
            .filter_map(|id| graph.get_node(id))
            .map(NodeRecord::from_node)
            .collect();
        Self {
            character: graph.character().clone(),
            nodes,
        }
    }

    /// Build a graph from this document.
    ///
    /// Duplicate node IDs are fatal. Invalid edges are dropped and reported.
    pub fn import(&self) -> Result<(DialogGraph, ImportReport), GraphError> {
        let mut graph = DialogGraph::with_character(self.character.clone());
        for record in &self.nodes {
            graph.add_node(record.to_node())?;
        }

        let declared_parents: HashMap<NodeId, HashSet<NodeId>> = self
            .nodes
            .iter()
            .map(|r| (r.id(), r.parent_ids().iter().copied().collect()))
            .collect();
        let mut declared_children: HashSet<(NodeId, NodeId)> = HashSet::new();
        let mut report = ImportReport::default();

        for record in &self.nodes {
            let from = record.id();
            for (slot, to) in record.child_edges() {
                declared_children.insert((from, to));
                if !graph.contains(&to) {
                    report.issues.push(ImportIssue::DanglingReference { from, to });
                    continue;
                }
                if !declared_parents
                    .get(&to)
                    .is_some_and(|parents| parents.contains(&from))
                {
                    report.issues.push(ImportIssue::OneSided { from, to });
                    continue;
                }
                match graph.try_connect(from, to, slot) {
                    Ok(()) => report.edges += 1,
                    Err(reason) => report.issues.push(ImportIssue::Rejected { from, to, reason }),
                }
            }
        }

        for record in &self.nodes {
            let to = record.id();
            for from in record.parent_ids() {
                if !graph.contains(from) {
                    report
                        .issues
                        .push(ImportIssue::DanglingReference { from: to, to: *from });
                } else if !declared_children.contains(&(*from, to)) {
                    report.issues.push(ImportIssue::OneSided { from: *from, to });
                }
            }
        }

        for issue in &report.issues {
            warn!(%issue, "dropped edge during import");
        }
        Ok((graph, report))
    }

    pub fn to_json(&self) -> Result<String, GraphError> {
        serde_json::to_string_pretty(self).map_err(|e| GraphError::Serialization(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, GraphError> {
        serde_json::from_str(json).map_err(|e| GraphError::Deserialization(e.to_string()))
    }
}
