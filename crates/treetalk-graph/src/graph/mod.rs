//! The dialog graph container.
//!
//! Stores nodes by ID and is the sole mutator of adjacency. Every edge is
//! recorded on both endpoints: the parent lists the child (a sentence in
//! `children`, an answer in its choice bindings) and the child lists the
//! parent. Connection attempts that would break an invariant are refused
//! with `false` rather than an error.

pub mod rules;

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::debug;

use self::rules::EdgeRejection;
use crate::error::GraphError;
use crate::localize::Character;
use crate::node::{AnswerNode, Choice, Node, NodeId, NodeKind, SentenceNode};

/// A dialog graph: the node arena plus the character it belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DialogGraph {
    character: Character,
    nodes: HashMap<NodeId, Node>,
}

impl DialogGraph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_character(character: Character) -> Self {
        Self {
            character,
            nodes: HashMap::new(),
        }
    }

    pub fn character(&self) -> &Character {
        &self.character
    }

    pub fn set_character(&mut self, character: Character) {
        self.character = character;
    }

    // --- Nodes ---

    /// Insert a node. Any adjacency the node carries is discarded; edges
    /// are created with [`DialogGraph::connect`].
    pub fn add_node(&mut self, mut node: Node) -> Result<NodeId, GraphError> {
        let id = node.id();
        if self.nodes.contains_key(&id) {
            return Err(GraphError::DuplicateNode(id));
        }
        node.clear_adjacency();
        self.nodes.insert(id, node);
        Ok(id)
    }

    /// Insert a fresh sentence node.
    pub fn add_sentence(&mut self, sentence: SentenceNode) -> NodeId {
        self.insert_fresh(Node::new(NodeKind::Sentence(sentence)))
    }

    /// Insert a fresh answer node.
    pub fn add_answer(&mut self, answer: AnswerNode) -> NodeId {
        self.insert_fresh(Node::new(NodeKind::Answer(answer)))
    }

    fn insert_fresh(&mut self, mut node: Node) -> NodeId {
        node.clear_adjacency();
        let id = node.id();
        self.nodes.insert(id, node);
        id
    }

    /// Look up a node by ID.
    pub fn get_node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn sentence(&self, id: &NodeId) -> Option<&SentenceNode> {
        self.nodes.get(id).and_then(Node::as_sentence)
    }

    pub fn answer(&self, id: &NodeId) -> Option<&AnswerNode> {
        self.nodes.get(id).and_then(Node::as_answer)
    }

    /// Mutable access to a sentence's text, speaker, signal and localization.
    pub fn sentence_mut(&mut self, id: &NodeId) -> Option<&mut SentenceNode> {
        match self.nodes.get_mut(id).map(Node::kind_mut) {
            Some(NodeKind::Sentence(s)) => Some(s),
            _ => None,
        }
    }

    /// Mutable access to an answer's choice texts.
    pub fn answer_mut(&mut self, id: &NodeId) -> Option<&mut AnswerNode> {
        match self.nodes.get_mut(id).map(Node::kind_mut) {
            Some(NodeKind::Answer(a)) => Some(a),
            _ => None,
        }
    }

    pub fn annotations_mut(&mut self, id: &NodeId) -> Option<&mut HashMap<String, String>> {
        self.nodes.get_mut(id).map(|n| &mut n.annotations)
    }

    /// Replace the raw text of a sentence. Returns false if `id` is not a sentence.
    pub fn set_sentence_text(&mut self, id: &NodeId, text: impl Into<String>) -> bool {
        match self.sentence_mut(id) {
            Some(s) => {
                s.text = text.into();
                true
            }
            None => false,
        }
    }

    /// Replace the raw text of choice `index`. Returns false if there is no such choice.
    pub fn set_choice_text(
        &mut self,
        answer: &NodeId,
        index: usize,
        text: impl Into<String>,
    ) -> bool {
        match self.answer_mut(answer).and_then(|a| a.choice_mut(index)) {
            Some(choice) => {
                choice.text = text.into();
                true
            }
            None => false,
        }
    }

    /// Iterate over all nodes.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// All node IDs in ascending order.
    pub fn node_ids(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self.nodes.keys().copied().collect();
        ids.sort();
        ids
    }

    /// Return the total number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Return the total number of edges.
    pub fn edge_count(&self) -> usize {
        self.nodes.values().map(|n| n.children().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Sentences with no parents, in ascending ID order.
    pub fn roots(&self) -> Vec<NodeId> {
        let mut roots: Vec<NodeId> = self
            .nodes
            .values()
            .filter(|n| n.as_sentence().is_some_and(SentenceNode::is_root))
            .map(Node::id)
            .collect();
        roots.sort();
        roots
    }

    /// Outgoing neighbours of a node (empty if the node does not exist).
    pub fn children_of(&self, id: &NodeId) -> Vec<NodeId> {
        self.nodes.get(id).map(Node::children).unwrap_or_default()
    }

    /// Incoming neighbours of a node (empty if the node does not exist).
    pub fn parents_of(&self, id: &NodeId) -> &[NodeId] {
        self.nodes.get(id).map(Node::parents).unwrap_or(&[])
    }

    // --- Edges ---

    /// Whether the directed edge `from -> to` exists.
    pub fn has_edge(&self, from: NodeId, to: NodeId) -> bool {
        self.nodes.get(&from).is_some_and(|n| n.has_child(to))
    }

    /// Whether `target` is reachable from `start` through child edges.
    pub fn reaches(&self, start: NodeId, target: NodeId) -> bool {
        let mut stack = vec![start];
        let mut seen = HashSet::new();
        while let Some(id) = stack.pop() {
            if id == target {
                return true;
            }
            if !seen.insert(id) {
                continue;
            }
            stack.extend(self.children_of(&id));
        }
        false
    }

    /// Validate a prospective edge from both endpoints' perspective.
    ///
    /// On success returns the choice slot the edge would occupy when `from`
    /// is an answer.
    pub fn check_edge(
        &self,
        from: NodeId,
        to: NodeId,
        slot: Option<usize>,
    ) -> Result<Option<usize>, EdgeRejection> {
        let (Some(parent), Some(child)) = (self.nodes.get(&from), self.nodes.get(&to)) else {
            return Err(EdgeRejection::MissingNode);
        };
        let slot = rules::can_adopt_child(parent, child, slot)?;
        rules::can_accept_parent(child, parent)?;
        if self.reaches(to, from) {
            return Err(EdgeRejection::Cycle);
        }
        Ok(slot)
    }

    /// Whether `connect(from, to)` would succeed.
    pub fn can_connect(&self, from: NodeId, to: NodeId) -> bool {
        self.check_edge(from, to, None).is_ok()
    }

    /// Connect `from -> to`. Answer sources bind the lowest free choice.
    /// Returns false and leaves the graph unchanged if the edge is invalid.
    pub fn connect(&mut self, from: NodeId, to: NodeId) -> bool {
        self.try_connect(from, to, None).is_ok()
    }

    /// Bind choice `index` of `answer` to `sentence`.
    pub fn connect_choice(&mut self, answer: NodeId, index: usize, sentence: NodeId) -> bool {
        self.try_connect(answer, sentence, Some(index)).is_ok()
    }

    /// Like [`DialogGraph::connect`], but reports why an edge was refused.
    pub fn try_connect(
        &mut self,
        from: NodeId,
        to: NodeId,
        slot: Option<usize>,
    ) -> Result<(), EdgeRejection> {
        let slot = self.check_edge(from, to, slot).inspect_err(|reason| {
            debug!(%from, %to, %reason, "connection refused");
        })?;
        if let Some(parent) = self.nodes.get_mut(&from) {
            match parent.kind_mut() {
                NodeKind::Sentence(s) => s.children.push(to),
                NodeKind::Answer(a) => {
                    if let Some(index) = slot {
                        a.bindings.insert(index, to);
                    }
                }
            }
        }
        if let Some(child) = self.nodes.get_mut(&to) {
            child.parents_mut().push(from);
        }
        Ok(())
    }

    /// Remove the edge `from -> to` from both endpoints. Returns whether an
    /// edge was removed; a missing edge is a no-op.
    pub fn disconnect(&mut self, from: NodeId, to: NodeId) -> bool {
        let mut removed = false;
        if let Some(parent) = self.nodes.get_mut(&from) {
            match parent.kind_mut() {
                NodeKind::Sentence(s) => {
                    let before = s.children.len();
                    s.children.retain(|c| *c != to);
                    removed |= s.children.len() != before;
                }
                NodeKind::Answer(a) => {
                    if let Some(index) = a.slot_of(to) {
                        a.bindings.remove(&index);
                        removed = true;
                    }
                }
            }
        }
        if let Some(child) = self.nodes.get_mut(&to) {
            let parents = child.parents_mut();
            let before = parents.len();
            parents.retain(|p| *p != from);
            removed |= parents.len() != before;
        }
        removed
    }

    /// Sever every edge touching `id`, then delete the node.
    pub fn remove_node(&mut self, id: &NodeId) -> Option<Node> {
        let node = self.nodes.get(id)?;
        let parents = node.parents().to_vec();
        let children = node.children();
        for parent in parents {
            self.disconnect(parent, *id);
        }
        for child in children {
            self.disconnect(*id, child);
        }
        self.nodes.remove(id)
    }

    // --- Answer choices ---

    /// Append a choice to an answer. Returns the new choice index.
    pub fn add_choice(&mut self, answer: &NodeId, choice: impl Into<Choice>) -> Option<usize> {
        let a = self.answer_mut(answer)?;
        a.choices.push(choice.into());
        Some(a.choices.len() - 1)
    }

    /// Remove the last choice of an answer, disconnecting its bound child
    /// first. An answer always keeps at least one choice.
    pub fn remove_choice(&mut self, answer: &NodeId) -> bool {
        let Some(a) = self.answer(answer) else {
            return false;
        };
        if a.choice_count() <= 1 {
            return false;
        }
        let last = a.choice_count() - 1;
        if let Some(child) = a.child_at(last) {
            self.disconnect(*answer, child);
        }
        match self.answer_mut(answer) {
            Some(a) => a.choices.pop().is_some(),
            None => false,
        }
    }

    // --- Analysis ---

    /// Number of nodes on the longest path through child edges.
    ///
    /// Any traversal that follows child edges yields at most this many nodes.
    /// Nodes caught on a cycle are not counted.
    pub fn longest_path(&self) -> usize {
        let (order, _) = self.topological_order();
        let mut depth: HashMap<NodeId, usize> = HashMap::with_capacity(order.len());
        let mut best = 0;
        for id in order.into_iter().rev() {
            let deepest_child = self
                .children_of(&id)
                .iter()
                .filter_map(|c| depth.get(c))
                .max()
                .copied()
                .unwrap_or(0);
            let d = deepest_child + 1;
            best = best.max(d);
            depth.insert(id, d);
        }
        best
    }

    /// Re-check every graph invariant and report all violations.
    pub fn validate(&self) -> Result<(), Vec<GraphError>> {
        let mut errors = Vec::new();

        for id in self.node_ids() {
            let node = &self.nodes[&id];

            let children = node.children();
            let mut seen = HashSet::new();
            for child in &children {
                if !seen.insert(*child) {
                    errors.push(GraphError::DuplicateEdge { from: id, to: *child });
                }
                if *child == id {
                    errors.push(GraphError::SelfEdge(id));
                    continue;
                }
                match self.nodes.get(child) {
                    None => errors.push(GraphError::DanglingReference { from: id, to: *child }),
                    Some(target) => {
                        if !target.parents().contains(&id) {
                            errors.push(GraphError::AsymmetricEdge { from: id, to: *child });
                        }
                        if !rules::edge_allowed(node.node_type(), target.node_type()) {
                            errors.push(GraphError::IncompatibleEdge { from: id, to: *child });
                        }
                    }
                }
            }

            let mut seen = HashSet::new();
            for parent in node.parents() {
                if !seen.insert(*parent) {
                    errors.push(GraphError::DuplicateEdge { from: *parent, to: id });
                }
                match self.nodes.get(parent) {
                    None => errors.push(GraphError::DanglingReference { from: id, to: *parent }),
                    Some(source) if !source.has_child(id) => {
                        errors.push(GraphError::AsymmetricEdge { from: *parent, to: id });
                    }
                    Some(_) => {}
                }
            }

            if let Some(answer) = node.as_answer() {
                for (index, _) in answer.bindings() {
                    if index >= answer.choice_count() {
                        errors.push(GraphError::BindingOutOfRange {
                            node: id,
                            index,
                            choices: answer.choice_count(),
                        });
                    }
                }
            }
        }

        if let Some(id) = self.find_cycle() {
            errors.push(GraphError::CycleDetected(id));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Returns a node left on a cycle, if any.
    fn find_cycle(&self) -> Option<NodeId> {
        let (order, in_degree) = self.topological_order();
        if order.len() == self.nodes.len() {
            return None;
        }
        in_degree
            .into_iter()
            .filter(|(_, deg)| *deg > 0)
            .map(|(id, _)| id)
            .min()
    }

    /// Kahn's algorithm over child edges. Returns the nodes in topological
    /// order along with the in-degrees left over; nodes on a cycle keep a
    /// positive in-degree and are missing from the order.
    fn topological_order(&self) -> (Vec<NodeId>, HashMap<NodeId, usize>) {
        let mut in_degree: HashMap<NodeId, usize> = self.nodes.keys().map(|id| (*id, 0)).collect();
        for node in self.nodes.values() {
            for child in node.children() {
                if let Some(deg) = in_degree.get_mut(&child) {
                    *deg += 1;
                }
            }
        }
        let mut queue: VecDeque<NodeId> = in_degree
            .iter()
            .filter(|(_, deg)| **deg == 0)
            .map(|(id, _)| *id)
            .collect();
        let mut order = Vec::with_capacity(self.nodes.len());
        while let Some(id) = queue.pop_front() {
            order.push(id);
            for child in self.children_of(&id) {
                if let Some(deg) = in_degree.get_mut(&child) {
                    *deg -= 1;
                    if *deg == 0 {
                        queue.push_back(child);
                    }
                }
            }
        }
        (order, in_degree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentence(g: &mut DialogGraph, text: &str) -> NodeId {
        g.add_sentence(SentenceNode::new(text))
    }

    fn answer(g: &mut DialogGraph, choices: &[&str]) -> NodeId {
        g.add_answer(AnswerNode::new(choices.iter().copied()))
    }

    /// Adjacency snapshot for before/after comparisons.
    fn adjacency(g: &DialogGraph) -> Vec<(NodeId, Vec<NodeId>, Vec<NodeId>)> {
        g.node_ids()
            .into_iter()
            .map(|id| (id, g.parents_of(&id).to_vec(), g.children_of(&id)))
            .collect()
    }

    #[test]
    fn empty_graph() {
        let g = DialogGraph::new();
        assert_eq!(g.node_count(), 0);
        assert_eq!(g.edge_count(), 0);
        assert!(g.roots().is_empty());
        assert!(g.validate().is_ok());
    }

    #[test]
    fn duplicate_node_rejected() {
        let mut g = DialogGraph::new();
        let n = Node::sentence("Hello");
        let copy = n.clone();
        g.add_node(n).unwrap();
        assert!(matches!(g.add_node(copy), Err(GraphError::DuplicateNode(_))));
    }

    #[test]
    fn connect_records_both_sides() {
        let mut g = DialogGraph::new();
        let hello = sentence(&mut g, "Hello");
        let reply = answer(&mut g, &["Hi", "Bye"]);
        assert!(g.connect(hello, reply));

        assert_eq!(g.children_of(&hello), vec![reply]);
        assert_eq!(g.parents_of(&reply), &[hello]);
        assert!(g.has_edge(hello, reply));
        assert_eq!(g.edge_count(), 1);
        assert!(g.validate().is_ok());
    }

    #[test]
    fn answer_binds_lowest_free_choice() {
        let mut g = DialogGraph::new();
        let a = answer(&mut g, &["Hi", "Bye"]);
        let hi = sentence(&mut g, "Hi there");
        let bye = sentence(&mut g, "Farewell");
        assert!(g.connect(a, hi));
        assert!(g.connect(a, bye));
        let node = g.answer(&a).unwrap();
        assert_eq!(node.child_at(0), Some(hi));
        assert_eq!(node.child_at(1), Some(bye));
    }

    #[test]
    fn answer_rejects_when_slots_full() {
        let mut g = DialogGraph::new();
        let a = answer(&mut g, &["Only"]);
        let s1 = sentence(&mut g, "one");
        let s2 = sentence(&mut g, "two");
        assert!(g.connect(a, s1));
        assert!(!g.can_connect(a, s2));
        assert!(!g.connect(a, s2));
        assert_eq!(
            g.check_edge(a, s2, None),
            Err(EdgeRejection::NoFreeChoice)
        );
    }

    #[test]
    fn answer_to_answer_rejected() {
        let mut g = DialogGraph::new();
        let a = answer(&mut g, &["x"]);
        let b = answer(&mut g, &["y"]);
        assert!(!g.can_connect(a, b));
        assert!(!g.connect(a, b));
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn self_and_duplicate_edges_rejected() {
        let mut g = DialogGraph::new();
        let s = sentence(&mut g, "s");
        let t = sentence(&mut g, "t");
        assert!(!g.connect(s, s));
        assert!(g.connect(s, t));
        assert!(!g.connect(s, t));
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn reverse_and_long_cycles_rejected() {
        let mut g = DialogGraph::new();
        let a = sentence(&mut g, "a");
        let b = sentence(&mut g, "b");
        let c = sentence(&mut g, "c");
        assert!(g.connect(a, b));
        assert!(g.connect(b, c));
        assert_eq!(g.check_edge(b, a, None), Err(EdgeRejection::Cycle));
        assert_eq!(g.check_edge(c, a, None), Err(EdgeRejection::Cycle));
        assert!(g.validate().is_ok());
    }

    #[test]
    fn sentence_cannot_bind_back_to_its_answer() {
        let mut g = DialogGraph::new();
        let s = sentence(&mut g, "s");
        let a = answer(&mut g, &["x"]);
        assert!(g.connect(s, a));
        assert!(!g.connect(a, s));
    }

    #[test]
    fn missing_endpoint_rejected() {
        let mut g = DialogGraph::new();
        let s = sentence(&mut g, "s");
        let ghost = NodeId::new_v4();
        assert_eq!(g.check_edge(s, ghost, None), Err(EdgeRejection::MissingNode));
        assert!(!g.connect(ghost, s));
    }

    #[test]
    fn failed_connect_leaves_graph_unchanged() {
        let mut g = DialogGraph::new();
        let a = answer(&mut g, &["x"]);
        let b = answer(&mut g, &["y"]);
        let s = sentence(&mut g, "s");
        g.connect(s, a);
        let before = g.clone();
        for (from, to) in [(a, b), (s, s), (s, a), (a, s)] {
            assert!(!g.can_connect(from, to));
            assert!(!g.connect(from, to));
            assert_eq!(g, before);
        }
    }

    #[test]
    fn connect_then_disconnect_round_trip() {
        let mut g = DialogGraph::new();
        let root = sentence(&mut g, "root");
        let a = answer(&mut g, &["x", "y"]);
        let s1 = sentence(&mut g, "one");
        let s2 = sentence(&mut g, "two");
        g.connect(root, a);
        g.connect(a, s1);
        g.connect(root, s2);

        let before = adjacency(&g);
        assert!(g.connect(a, s2));
        assert!(g.disconnect(a, s2));
        assert_eq!(adjacency(&g), before);

        assert!(g.connect(s1, s2));
        assert!(g.disconnect(s1, s2));
        assert_eq!(adjacency(&g), before);
    }

    #[test]
    fn disconnect_missing_edge_is_noop() {
        let mut g = DialogGraph::new();
        let s = sentence(&mut g, "s");
        let t = sentence(&mut g, "t");
        let before = g.clone();
        assert!(!g.disconnect(s, t));
        assert_eq!(g, before);
    }

    #[test]
    fn remove_node_cascades() {
        let mut g = DialogGraph::new();
        let root = sentence(&mut g, "root");
        let a = answer(&mut g, &["x", "y"]);
        let s1 = sentence(&mut g, "one");
        let s2 = sentence(&mut g, "two");
        g.connect(root, a);
        g.connect(a, s1);
        g.connect(a, s2);
        g.connect(s1, s2);

        let removed = g.remove_node(&a).unwrap();
        assert_eq!(removed.id(), a);
        for node in g.nodes() {
            assert!(!node.parents().contains(&a));
            assert!(!node.children().contains(&a));
        }
        assert!(g.children_of(&root).is_empty());
        assert_eq!(g.parents_of(&s2), &[s1]);
        assert!(g.validate().is_ok());
        assert!(g.remove_node(&a).is_none());
    }

    #[test]
    fn add_choice_leaves_bindings() {
        let mut g = DialogGraph::new();
        let a = answer(&mut g, &["x"]);
        let s = sentence(&mut g, "s");
        g.connect(a, s);
        assert_eq!(g.add_choice(&a, "y"), Some(1));
        let node = g.answer(&a).unwrap();
        assert_eq!(node.choice_count(), 2);
        assert_eq!(node.bound_count(), 1);
        assert_eq!(node.child_at(0), Some(s));
    }

    #[test]
    fn remove_choice_disconnects_last_slot() {
        let mut g = DialogGraph::new();
        let a = answer(&mut g, &["x", "y"]);
        let s1 = sentence(&mut g, "one");
        let s2 = sentence(&mut g, "two");
        g.connect(a, s1);
        g.connect(a, s2);

        assert!(g.remove_choice(&a));
        let node = g.answer(&a).unwrap();
        assert_eq!(node.choice_count(), 1);
        assert_eq!(node.bound_count(), 1);
        assert!(g.parents_of(&s2).is_empty());
        assert!(g.validate().is_ok());

        // never below one choice
        assert!(!g.remove_choice(&a));
        assert_eq!(g.answer(&a).unwrap().choice_count(), 1);
    }

    #[test]
    fn remove_choice_preserves_mid_list_hole() {
        let mut g = DialogGraph::new();
        let a = answer(&mut g, &["x", "y", "z"]);
        let s0 = sentence(&mut g, "zero");
        let s2 = sentence(&mut g, "two");
        assert!(g.connect_choice(a, 0, s0));
        assert!(g.connect_choice(a, 2, s2));

        assert!(g.remove_choice(&a));
        let node = g.answer(&a).unwrap();
        assert_eq!(node.choice_count(), 2);
        assert_eq!(node.child_at(0), Some(s0));
        assert_eq!(node.child_at(1), None);
        assert!(node.bound_count() <= node.choice_count());
    }

    #[test]
    fn connect_choice_rules() {
        let mut g = DialogGraph::new();
        let a = answer(&mut g, &["x", "y"]);
        let s1 = sentence(&mut g, "one");
        let s2 = sentence(&mut g, "two");
        assert!(g.connect_choice(a, 1, s1));
        assert_eq!(g.check_edge(a, s2, Some(1)), Err(EdgeRejection::ChoiceTaken(1)));
        assert_eq!(
            g.check_edge(a, s2, Some(5)),
            Err(EdgeRejection::ChoiceOutOfRange(5))
        );
        assert!(g.connect(a, s2));
        assert_eq!(g.answer(&a).unwrap().child_at(0), Some(s2));
    }

    #[test]
    fn roots_are_parentless_sentences() {
        let mut g = DialogGraph::new();
        let r1 = sentence(&mut g, "r1");
        let r2 = sentence(&mut g, "r2");
        let a = answer(&mut g, &["x"]);
        let child = sentence(&mut g, "child");
        g.connect(r1, child);
        let mut expected = vec![r1, r2];
        expected.sort();
        assert_eq!(g.roots(), expected);
        assert!(!g.roots().contains(&a));
    }

    #[test]
    fn add_node_drops_foreign_adjacency() {
        let mut g = DialogGraph::new();
        let s = sentence(&mut g, "s");
        let t = sentence(&mut g, "t");
        g.connect(s, t);
        let copy = g.get_node(&t).unwrap().clone();

        let mut other = DialogGraph::new();
        other.add_node(copy).unwrap();
        assert!(other.validate().is_ok());
        assert!(other.parents_of(&t).is_empty());
    }

    #[test]
    fn longest_path_counts_nodes() {
        let mut g = DialogGraph::new();
        assert_eq!(g.longest_path(), 0);
        let a = sentence(&mut g, "a");
        let b = answer(&mut g, &["x"]);
        let c = sentence(&mut g, "c");
        let d = sentence(&mut g, "d");
        g.connect(a, b);
        g.connect(b, c);
        g.connect(a, d);
        assert_eq!(g.longest_path(), 3);
    }

    #[test]
    fn long_chain_is_measured_without_recursion() {
        let mut g = DialogGraph::new();
        let mut prev = sentence(&mut g, "0");
        for i in 1..20_000 {
            let next = sentence(&mut g, &i.to_string());
            assert!(g.connect(prev, next));
            prev = next;
        }
        assert_eq!(g.longest_path(), 20_000);
        assert!(g.validate().is_ok());
    }

    #[test]
    fn text_editing() {
        let mut g = DialogGraph::new();
        let s = sentence(&mut g, "draft");
        let a = answer(&mut g, &["x"]);
        assert!(g.set_sentence_text(&s, "final"));
        assert!(!g.set_sentence_text(&a, "nope"));
        assert_eq!(g.sentence(&s).unwrap().text, "final");
        assert!(g.set_choice_text(&a, 0, "edited"));
        assert!(!g.set_choice_text(&a, 1, "missing"));
        assert!(!g.set_choice_text(&s, 0, "not an answer"));
        assert_eq!(g.answer(&a).unwrap().choices()[0].text, "edited");
    }
}
