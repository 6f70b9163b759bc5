//! Integration tests: long edit sequences keep every graph invariant.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use treetalk_graph::{AnswerNode, DialogDocument, DialogGraph, NodeId, SentenceNode};

fn assert_invariants(g: &DialogGraph) {
    if let Err(errors) = g.validate() {
        panic!("graph invariants broken: {errors:?}");
    }
    for node in g.nodes() {
        if let Some(answer) = node.as_answer() {
            assert!(answer.bound_count() <= answer.choice_count());
            assert!(answer.choice_count() >= 1);
            for (index, child) in answer.bindings() {
                assert!(index < answer.choice_count());
                assert!(g.get_node(&child).is_some_and(|c| c.is_sentence()));
            }
        }
    }
}

fn random_edits(seed: u64, steps: usize) -> DialogGraph {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut g = DialogGraph::new();
    let mut ids: Vec<NodeId> = Vec::new();

    for _ in 0..steps {
        match rng.gen_range(0..8) {
            0 | 1 => ids.push(g.add_sentence(SentenceNode::new("line"))),
            2 => ids.push(g.add_answer(AnswerNode::new(["a", "b"]))),
            3 | 4 if ids.len() >= 2 => {
                let from = ids[rng.gen_range(0..ids.len())];
                let to = ids[rng.gen_range(0..ids.len())];
                let before = g.clone();
                if !g.connect(from, to) {
                    assert_eq!(g, before, "refused connect must not change the graph");
                }
            }
            5 if !ids.is_empty() => {
                let from = ids[rng.gen_range(0..ids.len())];
                if let Some(&to) = g.children_of(&from).first() {
                    g.disconnect(from, to);
                }
            }
            6 if !ids.is_empty() => {
                let id = ids.swap_remove(rng.gen_range(0..ids.len()));
                g.remove_node(&id);
                assert!(g
                    .nodes()
                    .all(|n| !n.parents().contains(&id) && !n.children().contains(&id)));
            }
            7 if !ids.is_empty() => {
                let id = ids[rng.gen_range(0..ids.len())];
                if rng.gen_bool(0.5) {
                    g.add_choice(&id, "more");
                } else {
                    g.remove_choice(&id);
                }
            }
            _ => {}
        }
        assert_invariants(&g);
    }
    g
}

#[test]
fn random_edit_sequences_keep_invariants() {
    for seed in 0..20 {
        random_edits(seed, 200);
    }
}

#[test]
fn random_graphs_survive_exchange() {
    for seed in 0..10 {
        let g = random_edits(seed, 120);
        let json = DialogDocument::export(&g).to_json().expect("serialize");
        let (back, report) = DialogDocument::from_json(&json)
            .expect("parse")
            .import()
            .expect("import");
        assert!(report.is_clean(), "seed {seed}: {:?}", report.issues);
        assert_eq!(report.edges, g.edge_count());
        assert_eq!(back.node_ids(), g.node_ids());
        for id in g.node_ids() {
            // Child order is preserved; parent order follows import order.
            assert_eq!(back.children_of(&id), g.children_of(&id));
            let mut expected = g.parents_of(&id).to_vec();
            let mut actual = back.parents_of(&id).to_vec();
            expected.sort();
            actual.sort();
            assert_eq!(actual, expected);
        }
        for answer in g.nodes().filter(|n| n.is_answer()) {
            let before: Vec<_> = g.answer(&answer.id()).unwrap().bindings().collect();
            let imported: Vec<_> = back.answer(&answer.id()).unwrap().bindings().collect();
            assert_eq!(imported, before, "choice slots survive exchange");
        }
    }
}

#[test]
fn connect_disconnect_restores_adjacency() {
    let mut g = DialogGraph::new();
    let a = g.add_sentence(SentenceNode::new("a"));
    let b = g.add_answer(AnswerNode::new(["x", "y"]));
    let c = g.add_sentence(SentenceNode::new("c"));
    g.connect(a, b);
    let before = g.clone();

    assert!(g.connect(b, c));
    assert!(g.disconnect(b, c));
    assert_eq!(g, before);
}
