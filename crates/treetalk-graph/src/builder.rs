//! Construction API for building dialog graphs programmatically.
//!
//! `DialogBuilder` names nodes as they are created so tests, tools and
//! the CLI can wire a dialog without juggling UUIDs. Unlike
//! [`DialogGraph::connect`], the builder reports refused edges as errors.
//!
//! # Example
//!
//! ```rust
//! use treetalk_graph::DialogBuilder;
//!
//! let mut b = DialogBuilder::new("Kulibin");
//! let hello = b.sentence("hello", "Hello");
//! let reply = b.answer("reply", ["Hi", "Bye"]);
//! let hi = b.sentence("hi", "Hi there");
//! let bye = b.sentence("bye", "Farewell");
//! b.link(hello, reply).unwrap();
//! b.bind(reply, 0, hi).unwrap();
//! b.bind(reply, 1, bye).unwrap();
//!
//! let graph = b.build().unwrap();
//! assert_eq!(graph.node_count(), 4);
//! assert_eq!(graph.roots(), vec![hello]);
//! ```

use std::collections::HashMap;

use crate::error::GraphError;
use crate::graph::DialogGraph;
use crate::localize::Character;
use crate::node::{AnswerNode, Choice, NodeId, SentenceNode};

/// A builder for dialog graphs with named nodes.
#[derive(Debug, Default)]
pub struct DialogBuilder {
    graph: DialogGraph,
    names: HashMap<String, NodeId>,
}

impl DialogBuilder {
    /// Start a graph for the given character name.
    pub fn new(character: &str) -> Self {
        Self {
            graph: DialogGraph::with_character(Character::new(character)),
            names: HashMap::new(),
        }
    }

    /// Add a sentence node; an empty name leaves it anonymous.
    pub fn sentence(&mut self, name: &str, text: &str) -> NodeId {
        self.add_sentence_node(name, SentenceNode::new(text))
    }

    /// Add a fully configured sentence node (speaker, signal, localization).
    pub fn add_sentence_node(&mut self, name: &str, sentence: SentenceNode) -> NodeId {
        let id = self.graph.add_sentence(sentence);
        self.remember(name, id);
        id
    }

    /// Add an answer node with the given choices.
    pub fn answer<I, C>(&mut self, name: &str, choices: I) -> NodeId
    where
        I: IntoIterator<Item = C>,
        C: Into<Choice>,
    {
        let id = self.graph.add_answer(AnswerNode::new(choices));
        self.remember(name, id);
        id
    }

    fn remember(&mut self, name: &str, id: NodeId) {
        if !name.is_empty() {
            self.names.insert(name.to_string(), id);
        }
    }

    /// Look up a node by name.
    pub fn id(&self, name: &str) -> Option<NodeId> {
        self.names.get(name).copied()
    }

    /// Connect `from -> to`, answers binding their lowest free choice.
    pub fn link(&mut self, from: NodeId, to: NodeId) -> Result<&mut Self, GraphError> {
        self.graph
            .try_connect(from, to, None)
            .map_err(|reason| GraphError::EdgeRejected { from, to, reason })?;
        Ok(self)
    }

    /// Bind choice `index` of `answer` to `sentence`.
    pub fn bind(
        &mut self,
        answer: NodeId,
        index: usize,
        sentence: NodeId,
    ) -> Result<&mut Self, GraphError> {
        self.graph
            .try_connect(answer, sentence, Some(index))
            .map_err(|reason| GraphError::EdgeRejected {
                from: answer,
                to: sentence,
                reason,
            })?;
        Ok(self)
    }

    /// Connect a chain of nodes in order.
    pub fn chain(&mut self, ids: &[NodeId]) -> Result<&mut Self, GraphError> {
        for pair in ids.windows(2) {
            self.link(pair[0], pair[1])?;
        }
        Ok(self)
    }

    /// Validate and return the graph, reporting the first violation.
    pub fn build(self) -> Result<DialogGraph, GraphError> {
        match self.graph.validate() {
            Ok(()) => Ok(self.graph),
            Err(mut errors) => Err(errors.remove(0)),
        }
    }

    /// Return the graph without validation.
    pub fn into_graph(self) -> DialogGraph {
        self.graph
    }
}
