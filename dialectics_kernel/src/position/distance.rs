//! Distances and neighbourhoods over positions (§4.3).

use std::collections::BTreeSet;

use super::{Position, Trit};
use crate::proposition::Proposition;

/// Hamming distance between `p` and `q`: only defined when their domains are
/// equal; counts propositions where they disagree (§4.3).
pub fn hamming_distance(p: &Position, q: &Position) -> Option<u32> {
    let dom_p: BTreeSet<Proposition> = p.domain().collect();
    let dom_q: BTreeSet<Proposition> = q.domain().collect();
    if dom_p != dom_q {
        return None;
    }
    Some(
        dom_p
            .iter()
            .filter(|&&a| p.get(a) != q.get(a))
            .count() as u32,
    )
}

/// Weights for [edit_distance]; all default to 1 (§4.3).
#[derive(Clone, Copy, Debug)]
pub struct EditWeights {
    pub substitute: f64,
    pub insert: f64,
    pub delete: f64,
}

impl Default for EditWeights {
    fn default() -> Self {
        Self {
            substitute: 1.0,
            insert: 1.0,
            delete: 1.0,
        }
    }
}

impl EditWeights {
    fn max(&self) -> f64 {
        self.substitute.max(self.insert).max(self.delete)
    }
}

/// Edit distance between `p` and `q`: a weighted sum over
/// `domain(p) ∪ domain(q)`, where each atom is in exactly one of four
/// states relative to the pair: agree, substitute, insert (present only in
/// `q`), delete (present only in `p`) (§4.3).
pub fn edit_distance(p: &Position, q: &Position, weights: EditWeights) -> f64 {
    let dom_p: BTreeSet<Proposition> = p.domain().collect();
    let dom_q: BTreeSet<Proposition> = q.domain().collect();
    let union = dom_p.union(&dom_q);

    let mut total = 0.0;
    for &atom in union {
        match (dom_p.contains(&atom), dom_q.contains(&atom)) {
            (true, true) => {
                if p.get(atom) != q.get(atom) {
                    total += weights.substitute;
                }
            }
            (true, false) => total += weights.delete,
            (false, true) => total += weights.insert,
            (false, false) => unreachable!("atom drawn from the union of both domains"),
        }
    }
    total
}

/// `edit_distance` normalised by `(max weight × |domain(p) ∪ domain(q)|)`
/// (§4.3). Zero when the union of domains is empty.
pub fn normalised_edit_distance(p: &Position, q: &Position, weights: EditWeights) -> f64 {
    let dom_p: BTreeSet<Proposition> = p.domain().collect();
    let dom_q: BTreeSet<Proposition> = q.domain().collect();
    let union_size = dom_p.union(&dom_q).count();
    if union_size == 0 {
        return 0.0;
    }
    edit_distance(p, q, weights) / (weights.max() * union_size as f64)
}

/// The Hamming-1 neighbours of a complete position: positions differing in
/// exactly one proposition (§3, §4.3).
pub fn hamming_neighbours(p: &Position) -> Vec<Position> {
    let mut neighbours = Vec::new();
    let props: Vec<Proposition> = p.domain().collect();
    for prop in props {
        if let Some(Trit::True) | Some(Trit::False) = p.get(prop) {
            let mut flipped = p.clone();
            flipped.set(prop, p.get(prop).unwrap().negate());
            neighbours.push(flipped);
        }
    }
    neighbours
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proposition::PropositionPool;

    #[test]
    fn hamming_requires_equal_domains() {
        let mut pool = PropositionPool::new();
        let p = pool.intern("p");
        let q = pool.intern("q");
        let mut pos1 = Position::new();
        pos1.set(p, Trit::True);
        let mut pos2 = Position::new();
        pos2.set(p, Trit::True);
        pos2.set(q, Trit::False);
        assert_eq!(hamming_distance(&pos1, &pos2), None);
    }

    #[test]
    fn hamming_counts_disagreements() {
        let mut pool = PropositionPool::new();
        let p = pool.intern("p");
        let q = pool.intern("q");
        let mut pos1 = Position::new();
        pos1.set(p, Trit::True);
        pos1.set(q, Trit::True);
        let mut pos2 = Position::new();
        pos2.set(p, Trit::True);
        pos2.set(q, Trit::False);
        assert_eq!(hamming_distance(&pos1, &pos2), Some(1));
    }

    #[test]
    fn edit_distance_symmetric_and_zero_iff_equal() {
        let mut pool = PropositionPool::new();
        let p = pool.intern("p");
        let q = pool.intern("q");
        let mut pos1 = Position::new();
        pos1.set(p, Trit::True);
        let mut pos2 = Position::new();
        pos2.set(p, Trit::True);
        pos2.set(q, Trit::False);

        let w = EditWeights::default();
        assert_eq!(edit_distance(&pos1, &pos2, w), edit_distance(&pos2, &pos1, w));
        assert_eq!(edit_distance(&pos1, &pos1, w), 0.0);
        assert!(edit_distance(&pos1, &pos2, w) > 0.0);
    }

    #[test]
    fn hamming_neighbours_of_complete_position() {
        let mut pool = PropositionPool::new();
        let p = pool.intern("p");
        let q = pool.intern("q");
        let mut pos = Position::new();
        pos.set(p, Trit::True);
        pos.set(q, Trit::False);
        let neighbours = hamming_neighbours(&pos);
        assert_eq!(neighbours.len(), 2);
        for n in &neighbours {
            assert_eq!(hamming_distance(&pos, n), Some(1));
        }
    }
}
