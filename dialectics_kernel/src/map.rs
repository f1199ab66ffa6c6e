//! The argument map (§3, §4.3): a derived, non-authoritative graph over a
//! debate's arguments, with an edge `A -> B` whenever `A`'s conclusion
//! literal occurs among `B`'s premise literals (support), or its negation
//! does (attack).
//!
//! "Derived" means the map is never itself a source of truth about a
//! debate: it is recomputed from a [Debate] and its [ArgumentStore] on
//! demand, and never consulted by [crate::formula] or [crate::position] —
//! only by collaborators that want a human-facing or graph-analytic view.

use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::argument::ArgumentId;
use crate::debate::{ArgumentStore, Debate};

/// The relation an edge of the argument map records (§3).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum EdgeLabel {
    /// `A`'s conclusion literal occurs, with the same polarity, among `B`'s
    /// premises.
    Support,
    /// `A`'s conclusion literal occurs, negated, among `B`'s premises.
    Attack,
}

/// A debate's argument map: nodes are arguments, edges are derived support
/// and attack relations.
pub struct ArgumentMap {
    graph: DiGraph<ArgumentId, EdgeLabel>,
    node_of: HashMap<ArgumentId, NodeIndex>,
}

impl ArgumentMap {
    pub fn graph(&self) -> &DiGraph<ArgumentId, EdgeLabel> {
        &self.graph
    }

    pub fn node_of(&self, argument: ArgumentId) -> Option<NodeIndex> {
        self.node_of.get(&argument).copied()
    }

    /// The arguments that attack `argument`: those whose conclusion negates
    /// one of `argument`'s premises.
    pub fn attackers_of(&self, argument: ArgumentId) -> Vec<ArgumentId> {
        self.incoming(argument, EdgeLabel::Attack)
    }

    /// The arguments that support `argument`: those whose conclusion matches
    /// one of `argument`'s premises.
    pub fn supporters_of(&self, argument: ArgumentId) -> Vec<ArgumentId> {
        self.incoming(argument, EdgeLabel::Support)
    }

    fn incoming(&self, argument: ArgumentId, label: EdgeLabel) -> Vec<ArgumentId> {
        let Some(node) = self.node_of(argument) else {
            return Vec::new();
        };
        self.graph
            .edges_directed(node, petgraph::Direction::Incoming)
            .filter(|e| *e.weight() == label)
            .map(|e| self.graph[e.source()])
            .collect()
    }
}

/// Build `debate`'s argument map (§3, §4.3).
pub fn build(debate: &Debate, store: &ArgumentStore) -> ArgumentMap {
    let mut graph = DiGraph::new();
    let mut node_of = HashMap::new();

    for &id in debate.arguments() {
        let node = graph.add_node(id);
        node_of.insert(id, node);
    }

    let arguments = debate.arguments();
    for &a_id in arguments {
        let a = store.get(a_id);
        let conclusion = a.conclusion();
        for &b_id in arguments {
            if a_id == b_id {
                continue;
            }
            let b = store.get(b_id);
            if b.premises().contains(&conclusion) {
                graph.add_edge(node_of[&a_id], node_of[&b_id], EdgeLabel::Support);
            } else if b.premises().contains(&conclusion.negate()) {
                graph.add_edge(node_of[&a_id], node_of[&b_id], EdgeLabel::Attack);
            }
        }
    }

    ArgumentMap { graph, node_of }
}
