//! Positions: partial belief assignments, and the coherence/closedness
//! tests and set-like operations over them (§3, §4.2).

pub mod distance;
pub mod sccp;

use std::collections::{BTreeMap, BTreeSet};

use crate::debate::{ArgumentStore, Debate};
use crate::error::{IncoherenceError, KernelError};
use crate::formula::{self, Assignment, ModelService};
use crate::proposition::{Literal, Proposition};

/// A position's stance on a proposition: true, false, or an explicit "no
/// stance" entry, distinct from the proposition being absent from the
/// position's domain entirely (§3, GLOSSARY).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Trit {
    True,
    False,
    Suspended,
}

impl Trit {
    pub fn from_bool(b: bool) -> Self {
        if b {
            Trit::True
        } else {
            Trit::False
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Trit::True => Some(true),
            Trit::False => Some(false),
            Trit::Suspended => None,
        }
    }

    pub fn negate(&self) -> Self {
        match self {
            Trit::True => Trit::False,
            Trit::False => Trit::True,
            Trit::Suspended => Trit::Suspended,
        }
    }
}

/// A named introduction strategy tag, as carried by a position (§3, §4.4).
pub type StrategyTag = String;

/// A partial mapping from propositions to `{true, false, suspended}` (§3).
///
/// Positions may carry behavioural metadata used by the simulation: an
/// introduction-strategy tag (or list of tags) and an update-strategy tag.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct Position {
    entries: BTreeMap<Proposition, Trit>,
    pub introduction_strategy: Vec<StrategyTag>,
    pub update_strategy: Option<StrategyTag>,
}

impl Position {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: BTreeMap<Proposition, Trit>) -> Self {
        Self {
            entries,
            introduction_strategy: Vec::new(),
            update_strategy: None,
        }
    }

    pub fn get(&self, proposition: Proposition) -> Option<Trit> {
        self.entries.get(&proposition).copied()
    }

    pub fn set(&mut self, proposition: Proposition, value: Trit) {
        self.entries.insert(proposition, value);
    }

    pub fn domain(&self) -> impl Iterator<Item = Proposition> + '_ {
        self.entries.keys().copied()
    }

    pub fn entries(&self) -> &BTreeMap<Proposition, Trit> {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The non-suspended entries of this position, as literals.
    pub fn literals(&self) -> Vec<Literal> {
        self.entries
            .iter()
            .filter_map(|(&p, t)| t.as_bool().map(|b| Literal::new(p, b)))
            .collect()
    }

    /// `complete?(p, D)`: domain(p) equals atoms(D) and no entry is
    /// suspended (§4.2).
    pub fn is_complete(&self, debate: &Debate) -> bool {
        let domain: BTreeSet<Proposition> = self.entries.keys().copied().collect();
        domain == *debate.atoms() && self.entries.values().all(|t| !matches!(t, Trit::Suspended))
    }

    /// `coherent?(p, D)`: `is_satisfiable(conj(literals_of(p), D))` (§4.2).
    pub fn is_coherent(
        &self,
        debate: &Debate,
        store: &ArgumentStore,
        backend: &dyn ModelService,
    ) -> Result<bool, KernelError> {
        let mut f = formula::compile(debate, store);
        for lit in self.literals() {
            if f.atoms().contains(&lit.proposition()) {
                f.assert_literal(lit)
                    .expect("literal proposition checked against formula atoms");
            }
        }
        backend.is_satisfiable(&f)
    }

    /// `closed?(p, D)`: for each argument A of D, if every premise-literal of
    /// A is accepted by p, then the conclusion-literal of A is also
    /// accepted; suspended or absent conclusions count as violations (§4.2).
    ///
    /// This is a purely syntactic check over the debate's arguments, not a
    /// satisfiability query.
    pub fn is_closed(&self, debate: &Debate, store: &ArgumentStore) -> bool {
        for &id in debate.arguments() {
            let argument = store.get(id);
            let premises_accepted = argument
                .premises()
                .iter()
                .all(|lit| self.accepts(*lit));
            if premises_accepted && !self.accepts(argument.conclusion()) {
                return false;
            }
        }
        true
    }

    /// Whether this position accepts `literal`: assigns its proposition
    /// exactly its polarity (never suspended, never absent).
    pub fn accepts(&self, literal: Literal) -> bool {
        self.get(literal.proposition())
            .and_then(|t| t.as_bool())
            .map(|v| v == literal.polarity())
            .unwrap_or(false)
    }

    /// Deterministic completion (§4.2): for each atom where `self` is
    /// silent (absent or suspended), check whether fixing it true and false
    /// are each jointly satisfiable with `self ∧ debate`; adopt the unique
    /// satisfiable polarity, leave it silent if both are satisfiable, and
    /// report incoherence if neither is. Repeats to a fixed point (at most
    /// `|atoms(debate)|` rounds). Idempotent.
    pub fn close(
        &self,
        debate: &Debate,
        store: &ArgumentStore,
        backend: &dyn ModelService,
    ) -> Result<Position, KernelError> {
        let mut current = self.clone();

        if !current.is_coherent(debate, store, backend)? {
            return Err(IncoherenceError::NoModel.into());
        }

        let atoms: Vec<Proposition> = debate.atoms().iter().copied().collect();

        for _round in 0..=atoms.len() {
            let mut changed = false;

            for &atom in &atoms {
                let silent = match current.get(atom) {
                    None | Some(Trit::Suspended) => true,
                    _ => false,
                };
                if !silent {
                    continue;
                }

                let true_ok = current
                    .with_literal(atom, true)
                    .is_coherent(debate, store, backend)?;
                let false_ok = current
                    .with_literal(atom, false)
                    .is_coherent(debate, store, backend)?;

                match (true_ok, false_ok) {
                    (true, false) => {
                        current.set(atom, Trit::True);
                        changed = true;
                    }
                    (false, true) => {
                        current.set(atom, Trit::False);
                        changed = true;
                    }
                    (true, true) => { /* leave silent */ }
                    (false, false) => {
                        return Err(IncoherenceError::CloseFailed(atom).into());
                    }
                }
            }

            if !changed {
                break;
            }
        }

        Ok(current)
    }

    fn with_literal(&self, proposition: Proposition, value: bool) -> Position {
        let mut clone = self.clone();
        clone.set(proposition, Trit::from_bool(value));
        clone
    }

    /// The inverse of a position: flips every non-suspended entry;
    /// suspensions remain suspensions (§4.2).
    pub fn inverse(&self) -> Position {
        let entries = self
            .entries
            .iter()
            .map(|(&p, t)| (p, t.negate()))
            .collect();
        Position {
            entries,
            introduction_strategy: self.introduction_strategy.clone(),
            update_strategy: self.update_strategy.clone(),
        }
    }

    /// `compatible?(p, q, deep)` (§4.2): shallow compatibility requires no
    /// proposition to be assigned opposite (non-suspended) polarities in
    /// both positions; deep compatibility additionally requires the union
    /// assignment to be coherent with the shared debate.
    pub fn compatible(
        &self,
        other: &Position,
        deep: Option<(&Debate, &ArgumentStore, &dyn ModelService)>,
    ) -> Result<bool, KernelError> {
        for (&prop, &mine) in &self.entries {
            if let Some(&theirs) = other.entries.get(&prop) {
                if let (Some(a), Some(b)) = (mine.as_bool(), theirs.as_bool()) {
                    if a != b {
                        return Ok(false);
                    }
                }
            }
        }

        if let Some((debate, store, backend)) = deep {
            let mut merged = self.clone();
            for (&prop, &trit) in &other.entries {
                merged.entries.entry(prop).or_insert(trit);
            }
            return merged.is_coherent(debate, store, backend);
        }

        Ok(true)
    }

    /// The canonical bit-string encoding of a complete position: entries in
    /// proposition order, used as the node key of the SCCP graph (§3, §9).
    pub fn as_bits(&self, atoms: &BTreeSet<Proposition>) -> Vec<bool> {
        atoms
            .iter()
            .map(|p| self.get(*p).and_then(|t| t.as_bool()).unwrap_or(false))
            .collect()
    }

    /// Construct a complete position from a model (as produced by
    /// [ModelService::enumerate_models]) restricted to `atoms`.
    pub fn from_assignment(assignment: &Assignment) -> Position {
        let entries = assignment
            .iter()
            .map(|(&p, &v)| (p, Trit::from_bool(v)))
            .collect();
        Position::from_entries(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::argument::Argument;
    use crate::formula::ExhaustiveBackend;
    use crate::proposition::{Literal, PropositionPool};

    fn debate_p_and_q_implies_r(
        pool: &mut PropositionPool,
    ) -> (Debate, ArgumentStore, Proposition, Proposition, Proposition) {
        let p0 = pool.intern("p0");
        let p1 = pool.intern("p1");
        let p2 = pool.intern("p2");
        let mut store = ArgumentStore::new();
        let arg = Argument::new(
            vec![Literal::positive(p0), Literal::positive(p1)],
            Literal::positive(p2),
        )
        .unwrap();
        let id = store.insert(arg);
        let debate = Debate::empty()
            .with_new_proposition(p0)
            .with_new_proposition(p1)
            .with_new_proposition(p2)
            .with_argument(&store, id);
        (debate, store, p0, p1, p2)
    }

    #[test]
    fn closure_s3() {
        let mut pool = PropositionPool::new();
        let (debate, store, p0, p1, p2) = debate_p_and_q_implies_r(&mut pool);
        let backend = ExhaustiveBackend::default();

        let mut pos = Position::new();
        pos.set(p0, Trit::True);
        pos.set(p1, Trit::True);
        pos.set(p2, Trit::Suspended);

        assert!(!pos.is_closed(&debate, &store));

        let closed = pos.close(&debate, &store, &backend).unwrap();
        assert_eq!(closed.get(p2), Some(Trit::True));
        assert!(closed.is_closed(&debate, &store));
    }

    #[test]
    fn inverse_is_involution_on_definite_entries() {
        let mut pool = PropositionPool::new();
        let p = pool.intern("p");
        let q = pool.intern("q");
        let mut pos = Position::new();
        pos.set(p, Trit::True);
        pos.set(q, Trit::Suspended);
        let back = pos.inverse().inverse();
        assert_eq!(back.get(p), pos.get(p));
        assert_eq!(back.get(q), Some(Trit::Suspended));
    }

    #[test]
    fn closest_coherent_refit_s2() {
        let mut pool = PropositionPool::new();
        let (debate, store, p0, p1, p2) = debate_p_and_q_implies_r(&mut pool);
        let backend = ExhaustiveBackend::default();

        let mut pos = Position::new();
        pos.set(p0, Trit::True);
        pos.set(p1, Trit::True);
        pos.set(p2, Trit::False);

        assert!(!pos.is_coherent(&debate, &store, &backend).unwrap());
    }
}
