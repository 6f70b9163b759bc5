//! Dialog graph model for treetalk.
//!
//! A dialog is a directed acyclic graph of two kinds of nodes: sentences
//! (lines of dialog) and answers (ordered player choices, each bound to at
//! most one follow-up sentence). The [`DialogGraph`] owns every node and is
//! the only place where edges are created or severed, so the bidirectional
//! parent/child records can never drift apart.

pub mod builder;
pub mod error;
pub mod exchange;
pub mod graph;
pub mod localize;
pub mod node;

pub use builder::DialogBuilder;
pub use error::GraphError;
pub use exchange::{ChoiceBinding, DialogDocument, ImportIssue, ImportReport, NodeRecord};
pub use graph::rules::{EdgeRejection, NodeType};
pub use graph::DialogGraph;
pub use localize::{Character, LocalizedRef, Localizer, NoLocalization, StringTable};
pub use node::{AnswerNode, Choice, Node, NodeId, NodeKind, SentenceNode};
