//! Random walk over a dialog graph.
//!
//! The runner borrows the graph immutably for its whole lifetime and keeps
//! a single cursor. Branching is resolved with the injected RNG, one
//! `gen_range` call per decision, so a seeded runner replays the same path.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};
use treetalk_graph::{DialogGraph, Node, NodeId, NodeKind};

use crate::error::RunnerError;

/// Traversal cursor over a [`DialogGraph`].
#[derive(Debug)]
pub struct DialogRunner<'g, R = StdRng> {
    graph: &'g DialogGraph,
    current: Option<NodeId>,
    rng: R,
}

impl<'g> DialogRunner<'g, StdRng> {
    /// Runner with a deterministic RNG.
    pub fn seeded(graph: &'g DialogGraph, seed: u64) -> Self {
        Self::new(graph, StdRng::seed_from_u64(seed))
    }

    /// Runner seeded from system entropy.
    pub fn from_entropy(graph: &'g DialogGraph) -> Self {
        Self::new(graph, StdRng::from_entropy())
    }
}

impl<'g, R: Rng> DialogRunner<'g, R> {
    pub fn new(graph: &'g DialogGraph, rng: R) -> Self {
        Self {
            graph,
            current: None,
            rng,
        }
    }

    pub fn graph(&self) -> &'g DialogGraph {
        self.graph
    }

    /// The node under the cursor, if any.
    pub fn current(&self) -> Option<&'g Node> {
        self.current.and_then(|id| self.graph.get_node(&id))
    }

    pub fn current_id(&self) -> Option<NodeId> {
        self.current
    }

    /// Clear the cursor without touching the RNG.
    pub fn reset(&mut self) {
        self.current = None;
    }

    /// Place the cursor on a randomly chosen root sentence.
    ///
    /// An empty graph, or one where every sentence has a parent, leaves the
    /// cursor empty.
    pub fn init(&mut self) -> Option<&'g Node> {
        self.current = None;
        if self.graph.is_empty() {
            warn!("dialog graph has no nodes");
            return None;
        }
        let roots = self.graph.roots();
        if roots.is_empty() {
            warn!(nodes = self.graph.node_count(), "dialog graph has no root sentence");
            return None;
        }
        self.current = Some(self.pick(&roots));
        debug!(start = ?self.current, candidates = roots.len(), "runner initialized");
        self.current()
    }

    /// Follow one edge from the current node.
    ///
    /// Sentences pick among their children, answers among their bound
    /// children. A node with nowhere to go ends the walk.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<&'g Node> {
        let node = self.current()?;
        let candidates = match node.kind() {
            NodeKind::Sentence(s) => s.children().to_vec(),
            NodeKind::Answer(a) => a.bound_children(),
        };
        self.current = if candidates.is_empty() {
            None
        } else {
            Some(self.pick(&candidates))
        };
        debug!(from = %node.id(), to = ?self.current, "runner advanced");
        self.current()
    }

    /// Jump straight to a sentence, bypassing random selection.
    ///
    /// Unknown ids and answer ids are refused and leave the cursor alone.
    pub fn goto_node(&mut self, id: NodeId) -> Result<&'g Node, RunnerError> {
        let node = self
            .graph
            .get_node(&id)
            .ok_or(RunnerError::NodeNotFound(id))?;
        if !node.is_sentence() {
            return Err(RunnerError::NotASentence(id));
        }
        self.current = Some(id);
        Ok(node)
    }

    fn pick(&mut self, candidates: &[NodeId]) -> NodeId {
        candidates[self.rng.gen_range(0..candidates.len())]
    }
}
