//! The space of coherent and complete positions (SCCP) and its graph (§3,
//! §4.3).

use std::collections::HashMap;

use petgraph::graph::{NodeIndex, UnGraph};

use super::Position;
use crate::debate::{ArgumentStore, Debate};
use crate::error::KernelError;
use crate::formula::{self, ModelService};

/// The space of coherent and complete positions of a debate: the set of
/// complete positions jointly satisfiable with it, with an edge between any
/// two that are Hamming-1 neighbours (§3).
///
/// Nodes are indexed by [petgraph::graph::NodeIndex]; the corresponding
/// position is recoverable via [Sccp::position], following the "indices
/// instead of pointer graphs" design note (§9).
pub struct Sccp {
    graph: UnGraph<(), ()>,
    positions: Vec<Position>,
    index_of: HashMap<Vec<bool>, NodeIndex>,
}

impl Sccp {
    pub fn graph(&self) -> &UnGraph<(), ()> {
        &self.graph
    }

    pub fn position(&self, node: NodeIndex) -> &Position {
        &self.positions[node.index()]
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn node_of(&self, bits: &[bool]) -> Option<NodeIndex> {
        self.index_of.get(bits).copied()
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }
}

/// Build the SCCP graph of `debate` by enumerating its models and connecting
/// Hamming-1 pairs (§3, §4.3).
pub fn build(
    debate: &Debate,
    store: &ArgumentStore,
    backend: &dyn ModelService,
) -> Result<Sccp, KernelError> {
    let atoms: Vec<_> = debate.atoms().iter().copied().collect();
    let formula = formula::compile(debate, store);

    let mut graph = UnGraph::<(), ()>::new_undirected();
    let mut positions = Vec::new();
    let mut index_of: HashMap<Vec<bool>, NodeIndex> = HashMap::new();

    if atoms.is_empty() {
        return Ok(Sccp {
            graph,
            positions,
            index_of,
        });
    }

    let models = backend.enumerate_models(&formula, &atoms)?;
    let atom_set = debate.atoms().clone();

    for model in &models {
        let position = Position::from_assignment(model);
        let bits = position.as_bits(&atom_set);
        let node = graph.add_node(());
        index_of.insert(bits, node);
        positions.push(position);
    }

    // Connect every pair of models that differ in exactly one proposition.
    let bit_lists: Vec<Vec<bool>> = positions.iter().map(|p| p.as_bits(&atom_set)).collect();
    for i in 0..bit_lists.len() {
        for j in (i + 1)..bit_lists.len() {
            let diff = bit_lists[i]
                .iter()
                .zip(bit_lists[j].iter())
                .filter(|(a, b)| a != b)
                .count();
            if diff == 1 {
                graph.add_edge(NodeIndex::new(i), NodeIndex::new(j), ());
            }
        }
    }

    Ok(Sccp {
        graph,
        positions,
        index_of,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::ExhaustiveBackend;
    use crate::proposition::PropositionPool;

    #[test]
    fn sccp_of_empty_debate_has_all_complete_assignments() {
        let mut pool = PropositionPool::new();
        let p0 = pool.intern("p0");
        let p1 = pool.intern("p1");
        let debate = Debate::empty()
            .with_new_proposition(p0)
            .with_new_proposition(p1);
        let store = ArgumentStore::new();
        let backend = ExhaustiveBackend::default();
        let sccp = build(&debate, &store, &backend).unwrap();
        assert_eq!(sccp.len(), 4);
        // A 2-cube: every node has exactly 2 Hamming-1 neighbours.
        for node in sccp.graph().node_indices() {
            assert_eq!(sccp.graph().neighbors(node).count(), 2);
        }
    }
}
