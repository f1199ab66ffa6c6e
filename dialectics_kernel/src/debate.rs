//! Debates: ordered collections of arguments, interpreted as their
//! conjunction (§3).
//!
//! Arguments, once committed, are immutable and never removed (§3
//! Lifecycles). They are stored once in an [ArgumentStore] owned by a
//! [crate::simulation::Simulation] and shared by reference (via
//! [ArgumentId]) between the debate stages that mention them and the
//! [argument map](crate::map) derived from a stage. This follows the
//! "indices instead of pointer graphs" design note (§9): stages hold
//! `Vec<ArgumentId>`, never `Vec<Argument>`.

use std::collections::BTreeSet;

use slotmap::SlotMap;

use crate::argument::{Argument, ArgumentId};
use crate::proposition::{Literal, Proposition};

/// The shared, append-only backing store for every argument ever committed
/// during a run.
#[derive(Clone, Debug, Default)]
pub struct ArgumentStore {
    arena: SlotMap<ArgumentId, Argument>,
}

impl ArgumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, argument: Argument) -> ArgumentId {
        self.arena.insert(argument)
    }

    pub fn get(&self, id: ArgumentId) -> &Argument {
        &self.arena[id]
    }
}

/// A debate: the conjunction of a finite set of arguments, plus the atom
/// pool it ranges over (which may outgrow its arguments via `new_sentence`
/// events, §4.7).
///
/// A debate of zero arguments is the distinguished *empty debate*:
/// tautologically satisfied, with inferential density 0 regardless of its
/// atom pool (§3, §8 boundary behaviour).
#[derive(Clone, Debug)]
pub enum Debate {
    /// No arguments have been committed yet (but the atom pool may be
    /// non-empty, e.g. after `new_sentence` events with no introduction).
    Empty {
        atoms: BTreeSet<Proposition>,
        used_premises: BTreeSet<Vec<Literal>>,
    },

    /// At least one argument has been committed.
    NonEmpty {
        atoms: BTreeSet<Proposition>,
        arguments: Vec<ArgumentId>,
        /// Premise sets that have ever successfully entered an argument of
        /// this debate; never reused, independent of conclusion (§4.4, §9(3)).
        used_premises: BTreeSet<Vec<Literal>>,
    },
}

impl Debate {
    /// The distinguished empty debate over an empty atom pool.
    pub fn empty() -> Self {
        Debate::Empty {
            atoms: BTreeSet::new(),
            used_premises: BTreeSet::new(),
        }
    }

    /// The propositions mentioned by this debate's atom pool.
    pub fn atoms(&self) -> &BTreeSet<Proposition> {
        match self {
            Debate::Empty { atoms, .. } => atoms,
            Debate::NonEmpty { atoms, .. } => atoms,
        }
    }

    /// The arguments of this debate, in commitment order.
    pub fn arguments(&self) -> &[ArgumentId] {
        match self {
            Debate::Empty { .. } => &[],
            Debate::NonEmpty { arguments, .. } => arguments,
        }
    }

    pub fn argument_count(&self) -> usize {
        self.arguments().len()
    }

    /// Premise sets already used by this debate's arguments.
    pub fn used_premises(&self) -> &BTreeSet<Vec<Literal>> {
        match self {
            Debate::Empty { used_premises, .. } => used_premises,
            Debate::NonEmpty { used_premises, .. } => used_premises,
        }
    }

    /// Extend the atom pool with a freshly interned proposition, carrying the
    /// debate forward as a new stage with no new argument (the `new_sentence`
    /// event of §4.7).
    pub fn with_new_proposition(&self, proposition: Proposition) -> Self {
        match self {
            Debate::Empty {
                atoms,
                used_premises,
            } => {
                let mut atoms = atoms.clone();
                atoms.insert(proposition);
                Debate::Empty {
                    atoms,
                    used_premises: used_premises.clone(),
                }
            }
            Debate::NonEmpty {
                atoms,
                arguments,
                used_premises,
            } => {
                let mut atoms = atoms.clone();
                atoms.insert(proposition);
                Debate::NonEmpty {
                    atoms,
                    arguments: arguments.clone(),
                    used_premises: used_premises.clone(),
                }
            }
        }
    }

    /// Append `argument` (already validated satisfiable against this debate
    /// by the caller, see [crate::introduction]) as a new stage.
    pub fn with_argument(&self, store: &ArgumentStore, id: ArgumentId) -> Self {
        let argument = store.get(id);
        let mut atoms = self.atoms().clone();
        atoms.extend(argument.atoms());

        let mut arguments = self.arguments().to_vec();
        arguments.push(id);

        let mut used_premises = self.used_premises().clone();
        used_premises.insert(argument.premise_key());

        Debate::NonEmpty {
            atoms,
            arguments,
            used_premises,
        }
    }

    /// Whether `premises` (as a canonical key, see
    /// [Argument::premise_key](crate::argument::Argument::premise_key)) has
    /// already been used in this debate.
    pub fn premises_used(&self, premises: &[Literal]) -> bool {
        let mut key = premises.to_vec();
        key.sort();
        self.used_premises().contains(&key)
    }

    /// Inferential density δ = (|atoms| − log₂ σ)/|atoms|, where σ is the
    /// model count of this debate (§3). An empty atom pool has density 0
    /// (by convention; §3, §8), rather than being undefined.
    pub fn density(
        &self,
        store: &ArgumentStore,
        backend: &dyn crate::formula::ModelService,
    ) -> Result<f64, crate::error::KernelError> {
        let atoms = self.atoms();
        if atoms.is_empty() {
            return Ok(0.0);
        }
        let formula = crate::formula::compile(self, store);
        let sigma = backend.model_count(&formula)?;
        let sigma = sigma.max(1) as f64; // a satisfiable debate always has sigma >= 1
        Ok((atoms.len() as f64 - sigma.log2()) / atoms.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::{ExhaustiveBackend, ModelService};
    use crate::proposition::PropositionPool;

    #[test]
    fn empty_debate_has_zero_density() {
        let mut pool = PropositionPool::new();
        let p0 = pool.intern("p0");
        let p1 = pool.intern("p1");
        let debate = Debate::empty()
            .with_new_proposition(p0)
            .with_new_proposition(p1);
        let store = ArgumentStore::new();
        let backend = ExhaustiveBackend::default();
        assert_eq!(debate.density(&store, &backend).unwrap(), 0.0);
    }

    #[test]
    fn empty_debate_model_count_is_power_of_two() {
        let mut pool = PropositionPool::new();
        let p0 = pool.intern("p0");
        let p1 = pool.intern("p1");
        let p2 = pool.intern("p2");
        let debate = Debate::empty()
            .with_new_proposition(p0)
            .with_new_proposition(p1)
            .with_new_proposition(p2);
        let store = ArgumentStore::new();
        let backend = ExhaustiveBackend::default();
        let formula = crate::formula::compile(&debate, &store);
        assert_eq!(backend.model_count(&formula).unwrap(), 8);
    }
}
