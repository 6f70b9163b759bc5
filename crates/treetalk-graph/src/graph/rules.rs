//! Connection capability rules.
//!
//! Each endpoint validates an edge independently: the source decides
//! whether it may adopt the child, the target whether it may accept the
//! parent. Both checks are pure functions over node payloads.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::node::{Node, NodeKind};

/// Node discriminant without payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Sentence,
    Answer,
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeType::Sentence => write!(f, "Sentence"),
            NodeType::Answer => write!(f, "Answer"),
        }
    }
}

/// Why a connection attempt was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EdgeRejection {
    #[error("endpoint does not exist")]
    MissingNode,
    #[error("a node cannot connect to itself")]
    SelfEdge,
    #[error("edge already exists")]
    Duplicate,
    #[error("{from} cannot lead to {to}")]
    Incompatible { from: NodeType, to: NodeType },
    #[error("every choice already has a bound sentence")]
    NoFreeChoice,
    #[error("choice {0} does not exist")]
    ChoiceOutOfRange(usize),
    #[error("choice {0} is already bound")]
    ChoiceTaken(usize),
    #[error("target already leads back to the source")]
    Cycle,
}

/// Sentence→Sentence and Sentence→Answer are allowed, Answer→Sentence is
/// allowed, Answer→Answer never is.
pub fn edge_allowed(from: NodeType, to: NodeType) -> bool {
    !matches!((from, to), (NodeType::Answer, NodeType::Answer))
}

/// Source-side check. `slot` requests a specific choice on answer sources;
/// on success returns the choice index the edge would occupy.
pub fn can_adopt_child(
    parent: &Node,
    child: &Node,
    slot: Option<usize>,
) -> Result<Option<usize>, EdgeRejection> {
    if parent.id() == child.id() {
        return Err(EdgeRejection::SelfEdge);
    }
    if !edge_allowed(parent.node_type(), child.node_type()) {
        return Err(EdgeRejection::Incompatible {
            from: parent.node_type(),
            to: child.node_type(),
        });
    }
    if parent.has_child(child.id()) {
        return Err(EdgeRejection::Duplicate);
    }
    match parent.kind() {
        NodeKind::Sentence(_) => Ok(None),
        NodeKind::Answer(answer) => match slot {
            Some(index) if index >= answer.choice_count() => {
                Err(EdgeRejection::ChoiceOutOfRange(index))
            }
            Some(index) if answer.child_at(index).is_some() => {
                Err(EdgeRejection::ChoiceTaken(index))
            }
            Some(index) => Ok(Some(index)),
            None => answer
                .first_free_slot()
                .map(Some)
                .ok_or(EdgeRejection::NoFreeChoice),
        },
    }
}

/// Target-side check: answers only accept sentence parents, and no node
/// lists the same parent twice.
pub fn can_accept_parent(child: &Node, parent: &Node) -> Result<(), EdgeRejection> {
    if parent.id() == child.id() {
        return Err(EdgeRejection::SelfEdge);
    }
    if !edge_allowed(parent.node_type(), child.node_type()) {
        return Err(EdgeRejection::Incompatible {
            from: parent.node_type(),
            to: child.node_type(),
        });
    }
    if child.parents().contains(&parent.id()) {
        return Err(EdgeRejection::Duplicate);
    }
    Ok(())
}
