//! Boolean formula and model services (§4.1).
//!
//! A [Formula] is a conjunction of clauses (each a disjunction of
//! [Literal]s) together with the atom pool it ranges over. Debates compile
//! to formulas by turning each argument into a single clause (the negation
//! of its premises, plus its conclusion — the CNF form of an implication);
//! callers may extend the compiled formula with extra unit clauses (e.g. the
//! literals of a position being checked for coherence).
//!
//! The specification does not mandate a particular backend (a BDD-based
//! engine is recommended for tight counting loops, a DPLL-style engine
//! suffices for single satisfiability checks) — only the contracts below.
//! [ModelService] covers both collaborator interfaces of §6: the four
//! SAT/model-enumeration entry points of §4.1, plus the thresholded
//! soft-constraint enumeration the belief-revision engine's MaxSAT search
//! needs (§4.5 strategy c). [ExhaustiveBackend] satisfies all of them by
//! brute-force backtracking search, which is adequate for the atom-pool
//! sizes typical of a single debate in a TDS simulation; see its doc comment
//! for the resource bound it enforces in place of a real BDD package.

use std::collections::{BTreeMap, BTreeSet};

use crate::debate::{ArgumentStore, Debate};
use crate::error::{BackendError, FormulaError, KernelError};
use crate::proposition::{Literal, Proposition};

/// A single clause: a disjunction of literals.
pub type Clause = Vec<Literal>;

/// A complete or partial truth assignment, keyed by proposition.
pub type Assignment = BTreeMap<Proposition, bool>;

/// A conjunction of clauses over a known atom pool.
#[derive(Clone, Debug, Default)]
pub struct Formula {
    atoms: BTreeSet<Proposition>,
    clauses: Vec<Clause>,
}

impl Formula {
    pub fn new(atoms: BTreeSet<Proposition>) -> Self {
        Self {
            atoms,
            clauses: Vec::new(),
        }
    }

    pub fn atoms(&self) -> &BTreeSet<Proposition> {
        &self.atoms
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Add a clause, validating every literal's proposition is in the atom
    /// pool.
    pub fn add_clause(&mut self, clause: Clause) -> Result<(), FormulaError> {
        for lit in &clause {
            if !self.atoms.contains(&lit.proposition()) {
                return Err(FormulaError::UnknownProposition(lit.proposition()));
            }
        }
        self.clauses.push(clause);
        Ok(())
    }

    /// Add a unit clause asserting `literal`.
    pub fn assert_literal(&mut self, literal: Literal) -> Result<(), FormulaError> {
        self.add_clause(vec![literal])
    }

    /// Add a unit clause for every entry of `assignment` that mentions a
    /// known proposition.
    pub fn assert_assignment(&mut self, assignment: &Assignment) -> Result<(), FormulaError> {
        for (&prop, &polarity) in assignment {
            self.assert_literal(Literal::new(prop, polarity))?;
        }
        Ok(())
    }
}

/// Compile a debate into its CNF formula: one clause per argument, over the
/// debate's full atom pool (so atoms mentioned only via `new_sentence`
/// events, with no argument, are still care variables of the formula).
pub fn compile(debate: &Debate, store: &ArgumentStore) -> Formula {
    let mut formula = Formula::new(debate.atoms().clone());
    for &id in debate.arguments() {
        let argument = store.get(id);
        // Arguments are validated against their debate's atom pool when
        // introduced (see crate::introduction), so this cannot fail.
        formula
            .add_clause(argument.as_clause())
            .expect("argument atoms are a subset of the debate's atom pool");
    }
    formula
}

/// The SAT/model service (§4.1).
pub trait ModelService {
    /// True iff `formula` has at least one satisfying assignment.
    fn is_satisfiable(&self, formula: &Formula) -> Result<bool, KernelError>;

    /// Every model of `formula`, each restricted to `care_vars`, with
    /// duplicates arising from that restriction removed. Deterministic for a
    /// given formula and backend configuration.
    fn enumerate_models(
        &self,
        formula: &Formula,
        care_vars: &[Proposition],
    ) -> Result<Vec<Assignment>, KernelError>;

    /// The number of distinct, complete satisfying assignments over
    /// `formula`'s atoms.
    fn model_count(&self, formula: &Formula) -> Result<u64, KernelError>;

    /// The number of complete models of `formula` that extend
    /// `partial_assignment`.
    fn count_under(&self, formula: &Formula, partial_assignment: &Assignment)
        -> Result<u64, KernelError>;

    /// The "MaxSAT service" (§4.5 strategy c, §6): every model of `formula`
    /// whose agreement with `soft` — the number of `soft` entries it
    /// reproduces exactly — is at least `min_agreement`. Additive
    /// soft-constraint maximisation thresholded rather than optimised to a
    /// single best value, since the revision engine wants every model
    /// clearing a bar at a given iteration, not just the top one.
    fn enumerate_models_at_least(
        &self,
        formula: &Formula,
        soft: &Assignment,
        min_agreement: usize,
    ) -> Result<Vec<Assignment>, KernelError>;
}

/// An exhaustive, backtracking model-enumeration backend.
///
/// This plays the role a BDD/DPLL backend would (§4.1), implemented
/// directly rather than via an external solver
/// dependency: TDS simulations operate over debates with at most a few
/// dozen propositions, well within reach of plain backtracking with unit
/// propagation. `atom_limit` is the resource bound a real backend would
/// enforce implicitly through time/memory; here it is explicit and produces
/// [BackendError::TooManyAtoms] rather than hanging.
#[derive(Clone, Debug)]
pub struct ExhaustiveBackend {
    atom_limit: usize,
}

impl Default for ExhaustiveBackend {
    fn default() -> Self {
        Self { atom_limit: 24 }
    }
}

impl ExhaustiveBackend {
    pub fn new(atom_limit: usize) -> Self {
        Self { atom_limit }
    }

    fn check_limit(&self, formula: &Formula) -> Result<(), KernelError> {
        let n = formula.atoms().len();
        if n > self.atom_limit {
            return Err(BackendError::TooManyAtoms {
                atoms: n,
                limit: self.atom_limit,
            }
            .into());
        }
        Ok(())
    }

    /// A clause is violated under `partial` if every literal is assigned and
    /// every one of them is false.
    fn clause_violated(clause: &[Literal], partial: &Assignment) -> bool {
        clause.iter().all(|lit| match partial.get(&lit.proposition()) {
            Some(&v) => v != lit.polarity(),
            None => false,
        })
    }

    fn clause_satisfied(clause: &[Literal], partial: &Assignment) -> bool {
        clause.iter().any(|lit| match partial.get(&lit.proposition()) {
            Some(&v) => v == lit.polarity(),
            None => false,
        })
    }

    /// Depth-first enumeration of every complete model of `formula` that
    /// extends `partial`, invoking `sink` on each. Stops early if `sink`
    /// returns `false`.
    fn search(
        formula: &Formula,
        order: &[Proposition],
        depth: usize,
        partial: &mut Assignment,
        sink: &mut dyn FnMut(&Assignment) -> bool,
    ) -> bool {
        // Prune as soon as some clause is already violated.
        if formula
            .clauses()
            .iter()
            .any(|c| Self::clause_violated(c, partial))
        {
            return true; // pruned, not a stop signal
        }

        if depth == order.len() {
            let all_sat = formula
                .clauses()
                .iter()
                .all(|c| Self::clause_satisfied(c, partial));
            if all_sat {
                return sink(partial);
            }
            return true;
        }

        let atom = order[depth];
        if partial.contains_key(&atom) {
            return Self::search(formula, order, depth + 1, partial, sink);
        }

        for &value in &[true, false] {
            partial.insert(atom, value);
            let keep_going = Self::search(formula, order, depth + 1, partial, sink);
            partial.remove(&atom);
            if !keep_going {
                return false;
            }
        }
        true
    }

    fn enumerate_all(&self, formula: &Formula, seed: &Assignment) -> Result<Vec<Assignment>, KernelError> {
        self.check_limit(formula)?;
        let order: Vec<Proposition> = formula.atoms().iter().copied().collect();
        let mut partial = seed.clone();
        let mut models = Vec::new();
        Self::search(formula, &order, 0, &mut partial, &mut |model| {
            models.push(model.clone());
            true
        });
        Ok(models)
    }
}

impl ModelService for ExhaustiveBackend {
    fn is_satisfiable(&self, formula: &Formula) -> Result<bool, KernelError> {
        self.check_limit(formula)?;
        let order: Vec<Proposition> = formula.atoms().iter().copied().collect();
        let mut partial = Assignment::new();
        let mut found = false;
        Self::search(formula, &order, 0, &mut partial, &mut |_| {
            found = true;
            false // stop at the first model
        });
        Ok(found)
    }

    fn enumerate_models(
        &self,
        formula: &Formula,
        care_vars: &[Proposition],
    ) -> Result<Vec<Assignment>, KernelError> {
        if care_vars.is_empty() {
            return Err(FormulaError::EmptyCareSet.into());
        }
        let full = self.enumerate_all(formula, &Assignment::new())?;
        let mut seen = BTreeSet::new();
        let mut projected = Vec::new();
        for model in full {
            let restricted: Assignment = care_vars
                .iter()
                .filter_map(|p| model.get(p).map(|&v| (*p, v)))
                .collect();
            let key: Vec<(Proposition, bool)> = restricted.iter().map(|(&k, &v)| (k, v)).collect();
            if seen.insert(key) {
                projected.push(restricted);
            }
        }
        Ok(projected)
    }

    fn model_count(&self, formula: &Formula) -> Result<u64, KernelError> {
        self.check_limit(formula)?;
        let order: Vec<Proposition> = formula.atoms().iter().copied().collect();
        let mut partial = Assignment::new();
        let mut count: u64 = 0;
        Self::search(formula, &order, 0, &mut partial, &mut |_| {
            count += 1;
            true
        });
        Ok(count)
    }

    fn count_under(
        &self,
        formula: &Formula,
        partial_assignment: &Assignment,
    ) -> Result<u64, KernelError> {
        self.check_limit(formula)?;
        let order: Vec<Proposition> = formula.atoms().iter().copied().collect();
        let mut partial = partial_assignment.clone();
        let mut count: u64 = 0;
        Self::search(formula, &order, 0, &mut partial, &mut |_| {
            count += 1;
            true
        });
        Ok(count)
    }

    fn enumerate_models_at_least(
        &self,
        formula: &Formula,
        soft: &Assignment,
        min_agreement: usize,
    ) -> Result<Vec<Assignment>, KernelError> {
        let all = self.enumerate_all(formula, &Assignment::new())?;
        Ok(all
            .into_iter()
            .filter(|model| {
                let agreement = soft
                    .iter()
                    .filter(|&(prop, &polarity)| model.get(prop) == Some(&polarity))
                    .count();
                agreement >= min_agreement
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proposition::PropositionPool;

    fn formula_p_and_q(pool: &mut PropositionPool) -> (Formula, Proposition, Proposition) {
        let p = pool.intern("p");
        let q = pool.intern("q");
        let mut atoms = BTreeSet::new();
        atoms.insert(p);
        atoms.insert(q);
        let mut formula = Formula::new(atoms);
        formula.add_clause(vec![Literal::positive(p)]).unwrap();
        formula.add_clause(vec![Literal::positive(q)]).unwrap();
        (formula, p, q)
    }

    #[test]
    fn satisfiable_unit_clauses() {
        let mut pool = PropositionPool::new();
        let (formula, _, _) = formula_p_and_q(&mut pool);
        let backend = ExhaustiveBackend::default();
        assert!(backend.is_satisfiable(&formula).unwrap());
        assert_eq!(backend.model_count(&formula).unwrap(), 1);
    }

    #[test]
    fn contradiction_is_unsatisfiable() {
        let mut pool = PropositionPool::new();
        let p = pool.intern("p");
        let mut atoms = BTreeSet::new();
        atoms.insert(p);
        let mut formula = Formula::new(atoms);
        formula.add_clause(vec![Literal::positive(p)]).unwrap();
        formula.add_clause(vec![Literal::negative(p)]).unwrap();
        let backend = ExhaustiveBackend::default();
        assert!(!backend.is_satisfiable(&formula).unwrap());
        assert_eq!(backend.model_count(&formula).unwrap(), 0);
    }

    #[test]
    fn empty_formula_model_count_is_power_of_two() {
        let mut pool = PropositionPool::new();
        let p0 = pool.intern("p0");
        let p1 = pool.intern("p1");
        let p2 = pool.intern("p2");
        let mut atoms = BTreeSet::new();
        atoms.insert(p0);
        atoms.insert(p1);
        atoms.insert(p2);
        let formula = Formula::new(atoms);
        let backend = ExhaustiveBackend::default();
        assert_eq!(backend.model_count(&formula).unwrap(), 8);
    }

    #[test]
    fn count_under_restricts_to_extensions() {
        let mut pool = PropositionPool::new();
        let p0 = pool.intern("p0");
        let p1 = pool.intern("p1");
        let mut atoms = BTreeSet::new();
        atoms.insert(p0);
        atoms.insert(p1);
        let formula = Formula::new(atoms);
        let backend = ExhaustiveBackend::default();
        let mut partial = Assignment::new();
        partial.insert(p0, true);
        assert_eq!(backend.count_under(&formula, &partial).unwrap(), 2);
    }

    #[test]
    fn enumerate_models_at_least_filters_by_soft_agreement() {
        let mut pool = PropositionPool::new();
        let p0 = pool.intern("p0");
        let p1 = pool.intern("p1");
        let mut atoms = BTreeSet::new();
        atoms.insert(p0);
        atoms.insert(p1);
        let formula = Formula::new(atoms);
        let backend = ExhaustiveBackend::default();

        let mut soft = Assignment::new();
        soft.insert(p0, true);
        soft.insert(p1, true);

        // only one of the four models agrees with both soft entries.
        assert_eq!(
            backend
                .enumerate_models_at_least(&formula, &soft, 2)
                .unwrap()
                .len(),
            1
        );
        // three models agree with at least one of the two soft entries.
        assert_eq!(
            backend
                .enumerate_models_at_least(&formula, &soft, 1)
                .unwrap()
                .len(),
            3
        );
        // every model trivially agrees with at least zero entries.
        assert_eq!(
            backend
                .enumerate_models_at_least(&formula, &soft, 0)
                .unwrap()
                .len(),
            4
        );
    }
}
