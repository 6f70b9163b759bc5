//! Error types for the dialog graph.

use crate::graph::rules::EdgeRejection;
use crate::node::NodeId;

/// Errors that can occur during graph construction, validation or exchange.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("duplicate node id: {0}")]
    DuplicateNode(NodeId),

    #[error("edge {from} -> {to} rejected: {reason}")]
    EdgeRejected {
        from: NodeId,
        to: NodeId,
        reason: EdgeRejection,
    },

    #[error("dangling reference: {from} points at missing node {to}")]
    DanglingReference { from: NodeId, to: NodeId },

    #[error("edge {from} -> {to} is not recorded on both endpoints")]
    AsymmetricEdge { from: NodeId, to: NodeId },

    #[error("node {0} is connected to itself")]
    SelfEdge(NodeId),

    #[error("duplicate edge {from} -> {to}")]
    DuplicateEdge { from: NodeId, to: NodeId },

    #[error("edge {from} -> {to} connects incompatible node types")]
    IncompatibleEdge { from: NodeId, to: NodeId },

    #[error("answer {node} binds choice {index} but only has {choices} choice(s)")]
    BindingOutOfRange {
        node: NodeId,
        index: usize,
        choices: usize,
    },

    #[error("cycle detected involving node {0}")]
    CycleDetected(NodeId),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("deserialization error: {0}")]
    Deserialization(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = GraphError::NodeNotFound(NodeId::nil());
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn rejection_reason_in_message() {
        let err = GraphError::EdgeRejected {
            from: NodeId::nil(),
            to: NodeId::nil(),
            reason: EdgeRejection::SelfEdge,
        };
        assert!(err.to_string().contains("itself"));
    }
}
