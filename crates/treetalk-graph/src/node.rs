//! Node types and the Node struct.
//!
//! A node is either a sentence (a line of dialog) or an answer (an ordered
//! list of player choices). Adjacency lives on the nodes themselves but is
//! only writable from inside the crate; [`crate::DialogGraph`] keeps both
//! endpoints of every edge in sync.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::graph::rules::NodeType;
use crate::localize::{display_text, LocalizedRef, Localizer};

/// Globally unique node identifier.
pub type NodeId = Uuid;

/// A line of dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentenceNode {
    /// Raw text, the editable source of truth.
    pub text: String,
    /// Optional localized override used for display.
    pub localized: Option<LocalizedRef>,
    /// Per-line speaker name. Falls back to the graph character when unset.
    pub speaker: Option<String>,
    /// Name of an external hook fired once when playback enters this line.
    pub signal: Option<String>,
    pub(crate) parents: Vec<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl SentenceNode {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            localized: None,
            speaker: None,
            signal: None,
            parents: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_speaker(mut self, speaker: impl Into<String>) -> Self {
        self.speaker = Some(speaker.into());
        self
    }

    pub fn with_signal(mut self, signal: impl Into<String>) -> Self {
        self.signal = Some(signal.into());
        self
    }

    pub fn with_localized(mut self, reference: LocalizedRef) -> Self {
        self.localized = Some(reference);
        self
    }

    /// Nodes with an edge into this sentence. May be sentences or answers.
    pub fn parents(&self) -> &[NodeId] {
        &self.parents
    }

    /// Follow-up nodes, in connection order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// A sentence without parents is a dialog entry point.
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    pub fn display_text<'a>(&'a self, localizer: &dyn Localizer) -> Cow<'a, str> {
        display_text(&self.text, self.localized.as_ref(), localizer)
    }
}

/// One selectable answer line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub localized: Option<LocalizedRef>,
}

impl Choice {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            localized: None,
        }
    }

    pub fn with_localized(mut self, reference: LocalizedRef) -> Self {
        self.localized = Some(reference);
        self
    }

    pub fn display_text<'a>(&'a self, localizer: &dyn Localizer) -> Cow<'a, str> {
        display_text(&self.text, self.localized.as_ref(), localizer)
    }
}

impl From<&str> for Choice {
    fn from(text: &str) -> Self {
        Choice::new(text)
    }
}

impl From<String> for Choice {
    fn from(text: String) -> Self {
        Choice::new(text)
    }
}

/// An ordered list of choices, each bound to at most one child sentence.
///
/// Binding keys are always below `choices.len()`, so the number of bound
/// children can never exceed the number of choices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerNode {
    pub(crate) choices: Vec<Choice>,
    pub(crate) parents: Vec<NodeId>,
    pub(crate) bindings: BTreeMap<usize, NodeId>,
}

impl AnswerNode {
    /// Create an answer node. An empty list yields a single empty choice.
    pub fn new<I, C>(choices: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Choice>,
    {
        let mut choices: Vec<Choice> = choices.into_iter().map(Into::into).collect();
        if choices.is_empty() {
            choices.push(Choice::default());
        }
        Self {
            choices,
            parents: Vec::new(),
            bindings: BTreeMap::new(),
        }
    }

    /// Choices in on-screen order.
    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }

    pub fn choice(&self, index: usize) -> Option<&Choice> {
        self.choices.get(index)
    }

    /// Edit an existing choice. The number of choices is changed through the graph.
    pub fn choice_mut(&mut self, index: usize) -> Option<&mut Choice> {
        self.choices.get_mut(index)
    }

    pub fn choice_count(&self) -> usize {
        self.choices.len()
    }

    /// Parent sentences, in connection order.
    pub fn parents(&self) -> &[NodeId] {
        &self.parents
    }

    /// Sentence bound to choice `index`, if any.
    pub fn child_at(&self, index: usize) -> Option<NodeId> {
        self.bindings.get(&index).copied()
    }

    /// `(choice index, child)` pairs in index order.
    pub fn bindings(&self) -> impl Iterator<Item = (usize, NodeId)> + '_ {
        self.bindings.iter().map(|(i, id)| (*i, *id))
    }

    /// Bound child sentences in choice order.
    pub fn bound_children(&self) -> Vec<NodeId> {
        self.bindings.values().copied().collect()
    }

    pub fn bound_count(&self) -> usize {
        self.bindings.len()
    }

    /// Lowest choice index without a bound child.
    pub fn first_free_slot(&self) -> Option<usize> {
        (0..self.choices.len()).find(|i| !self.bindings.contains_key(i))
    }

    pub(crate) fn slot_of(&self, child: NodeId) -> Option<usize> {
        self.bindings
            .iter()
            .find(|(_, c)| **c == child)
            .map(|(i, _)| *i)
    }
}

/// The variant payload of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Sentence(SentenceNode),
    Answer(AnswerNode),
}

/// A node in the dialog graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    id: NodeId,
    kind: NodeKind,
    /// Editor metadata (position, selection, notes). Never read by traversal.
    pub annotations: HashMap<String, String>,
}

impl Node {
    /// Create a new node with a random UUID.
    pub fn new(kind: NodeKind) -> Self {
        Self::with_id(Uuid::new_v4(), kind)
    }

    /// Create a node with a specific ID (for import or testing).
    pub fn with_id(id: NodeId, kind: NodeKind) -> Self {
        Self {
            id,
            kind,
            annotations: HashMap::new(),
        }
    }

    pub fn sentence(text: impl Into<String>) -> Self {
        Self::new(NodeKind::Sentence(SentenceNode::new(text)))
    }

    pub fn answer<I, C>(choices: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Choice>,
    {
        Self::new(NodeKind::Answer(AnswerNode::new(choices)))
    }

    pub fn annotate(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.annotations.insert(key.into(), value.into());
        self
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub(crate) fn kind_mut(&mut self) -> &mut NodeKind {
        &mut self.kind
    }

    pub fn node_type(&self) -> NodeType {
        match self.kind {
            NodeKind::Sentence(_) => NodeType::Sentence,
            NodeKind::Answer(_) => NodeType::Answer,
        }
    }

    pub fn as_sentence(&self) -> Option<&SentenceNode> {
        match &self.kind {
            NodeKind::Sentence(s) => Some(s),
            NodeKind::Answer(_) => None,
        }
    }

    pub fn as_answer(&self) -> Option<&AnswerNode> {
        match &self.kind {
            NodeKind::Answer(a) => Some(a),
            NodeKind::Sentence(_) => None,
        }
    }

    pub fn is_sentence(&self) -> bool {
        matches!(self.kind, NodeKind::Sentence(_))
    }

    pub fn is_answer(&self) -> bool {
        matches!(self.kind, NodeKind::Answer(_))
    }

    pub fn parents(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::Sentence(s) => &s.parents,
            NodeKind::Answer(a) => &a.parents,
        }
    }

    /// Outgoing neighbours. For answers these are the bound children in choice order.
    pub fn children(&self) -> Vec<NodeId> {
        match &self.kind {
            NodeKind::Sentence(s) => s.children.clone(),
            NodeKind::Answer(a) => a.bound_children(),
        }
    }

    pub(crate) fn has_child(&self, child: NodeId) -> bool {
        match &self.kind {
            NodeKind::Sentence(s) => s.children.contains(&child),
            NodeKind::Answer(a) => a.bindings.values().any(|c| *c == child),
        }
    }

    pub(crate) fn parents_mut(&mut self) -> &mut Vec<NodeId> {
        match &mut self.kind {
            NodeKind::Sentence(s) => &mut s.parents,
            NodeKind::Answer(a) => &mut a.parents,
        }
    }

    /// Drop every edge record. Used when a node enters a graph, so edges
    /// only ever come into existence through `DialogGraph::connect`.
    pub(crate) fn clear_adjacency(&mut self) {
        match &mut self.kind {
            NodeKind::Sentence(s) => {
                s.parents.clear();
                s.children.clear();
            }
            NodeKind::Answer(a) => {
                a.parents.clear();
                a.bindings.clear();
            }
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            NodeKind::Sentence(s) => write!(f, "Sentence({}: {:?})", self.id, s.text),
            NodeKind::Answer(a) => write!(f, "Answer({}: {} choice(s))", self.id, a.choices.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_answer_gets_one_choice() {
        let a = AnswerNode::new(Vec::<Choice>::new());
        assert_eq!(a.choice_count(), 1);
        assert_eq!(a.choices()[0].text, "");
    }

    #[test]
    fn free_slot_skips_bound_indices() {
        let mut a = AnswerNode::new(["a", "b", "c"]);
        assert_eq!(a.first_free_slot(), Some(0));
        a.bindings.insert(0, Uuid::new_v4());
        a.bindings.insert(2, Uuid::new_v4());
        assert_eq!(a.first_free_slot(), Some(1));
        a.bindings.insert(1, Uuid::new_v4());
        assert_eq!(a.first_free_slot(), None);
    }

    #[test]
    fn node_type_and_accessors() {
        let s = Node::sentence("Hello");
        assert!(s.is_sentence());
        assert_eq!(s.node_type(), NodeType::Sentence);
        assert_eq!(s.as_sentence().unwrap().text, "Hello");
        assert!(s.as_answer().is_none());

        let a = Node::answer(["Hi", "Bye"]);
        assert!(a.is_answer());
        assert_eq!(a.as_answer().unwrap().choice_count(), 2);
    }

    #[test]
    fn clear_adjacency_keeps_payload() {
        let mut n = Node::sentence("Hi").annotate("editor.x", "120");
        if let NodeKind::Sentence(s) = n.kind_mut() {
            s.children.push(Uuid::new_v4());
            s.parents.push(Uuid::new_v4());
        }
        n.clear_adjacency();
        assert!(n.parents().is_empty());
        assert!(n.children().is_empty());
        assert_eq!(n.as_sentence().unwrap().text, "Hi");
        assert_eq!(n.annotations.get("editor.x").map(String::as_str), Some("120"));
    }
}
