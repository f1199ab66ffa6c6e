//! Arguments: the atomic unit of a debate.

use std::collections::BTreeMap;

use crate::proposition::{Literal, Proposition};

slotmap::new_key_type! {
    /// An index into a [crate::debate::ArgumentStore], shared by reference
    /// between a debate and its argument map (§3, §9: "indices instead of
    /// pointer graphs").
    pub struct ArgumentId;
}

/// An ordered pair (premise-set, conclusion), read as the implication
/// "conjunction of premise-literals ⇒ conclusion-literal" (§3).
///
/// Constructing an argument validates that no proposition appears with both
/// polarities among the premises; the conclusion's proposition may or may
/// not occur among the premises.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Argument {
    premises: Vec<Literal>,
    conclusion: Literal,
}

/// The premise set was empty, or assigned a proposition both polarities.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArgumentError {
    EmptyPremises,
    ConflictingPremises(Proposition),
}

impl Argument {
    /// Construct an argument, rejecting premise sets that are empty or that
    /// assign a proposition both polarities (§3).
    pub fn new(mut premises: Vec<Literal>, conclusion: Literal) -> Result<Self, ArgumentError> {
        if premises.is_empty() {
            return Err(ArgumentError::EmptyPremises);
        }
        premises.sort();
        premises.dedup();

        let mut seen: BTreeMap<Proposition, bool> = BTreeMap::new();
        for lit in &premises {
            match seen.get(&lit.proposition()) {
                Some(&polarity) if polarity != lit.polarity() => {
                    return Err(ArgumentError::ConflictingPremises(lit.proposition()));
                }
                _ => {
                    seen.insert(lit.proposition(), lit.polarity());
                }
            }
        }

        Ok(Self {
            premises,
            conclusion,
        })
    }

    pub fn premises(&self) -> &[Literal] {
        &self.premises
    }

    pub fn conclusion(&self) -> Literal {
        self.conclusion
    }

    /// The canonical key under which this argument's premise-set is recorded
    /// in a debate's "used premises" list (§4.4, §9(3)): premise sets are
    /// de-duplicated independently of the conclusion they were paired with.
    pub fn premise_key(&self) -> Vec<Literal> {
        self.premises.clone()
    }

    /// All propositions mentioned by this argument (premises and conclusion).
    pub fn atoms(&self) -> impl Iterator<Item = Proposition> + '_ {
        self.premises
            .iter()
            .map(Literal::proposition)
            .chain(std::iter::once(self.conclusion.proposition()))
    }

    /// The partial truth assignment over this argument's propositions that
    /// makes every premise true and the conclusion true. Used by strategy
    /// filters (§3, §4.4).
    pub fn requirements(&self) -> BTreeMap<Proposition, bool> {
        let mut req: BTreeMap<Proposition, bool> = self
            .premises
            .iter()
            .map(|l| (l.proposition(), l.polarity()))
            .collect();
        req.insert(self.conclusion.proposition(), self.conclusion.polarity());
        req
    }

    /// This argument as a single clause of the CNF compilation of a debate:
    /// the negation of every premise literal, plus the conclusion literal.
    pub fn as_clause(&self) -> Vec<Literal> {
        let mut clause: Vec<Literal> = self.premises.iter().map(Literal::negate).collect();
        clause.push(self.conclusion);
        clause
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proposition::PropositionPool;

    #[test]
    fn rejects_conflicting_premises() {
        let mut pool = PropositionPool::new();
        let p = pool.intern("p");
        let q = pool.intern("q");
        let premises = vec![Literal::positive(p), Literal::negative(p)];
        assert_eq!(
            Argument::new(premises, Literal::positive(q)),
            Err(ArgumentError::ConflictingPremises(p))
        );
    }

    #[test]
    fn rejects_empty_premises() {
        let mut pool = PropositionPool::new();
        let q = pool.intern("q");
        assert_eq!(
            Argument::new(vec![], Literal::positive(q)),
            Err(ArgumentError::EmptyPremises)
        );
    }

    #[test]
    fn as_clause_negates_premises() {
        let mut pool = PropositionPool::new();
        let p0 = pool.intern("p0");
        let p1 = pool.intern("p1");
        let p2 = pool.intern("p2");
        let arg = Argument::new(
            vec![Literal::positive(p0), Literal::positive(p1)],
            Literal::positive(p2),
        )
        .unwrap();
        let clause = arg.as_clause();
        assert!(clause.contains(&Literal::negative(p0)));
        assert!(clause.contains(&Literal::negative(p1)));
        assert!(clause.contains(&Literal::positive(p2)));
    }
}
