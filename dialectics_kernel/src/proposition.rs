//! Propositions and literals.
//!
//! A [Proposition] is an atomic symbol drawn from a finite, append-only pool.
//! Propositions are identified by a stable name and ordered by the order in
//! which they entered the pool, which is also the order used for canonical
//! bit-string encodings of positions (see [crate::position]).

use std::collections::HashMap;
use std::fmt;

/// A proposition, identified by its index into a [PropositionPool].
///
/// Propositions are never removed once interned, so a [Proposition] remains
/// valid for the lifetime of the pool that produced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub struct Proposition(u32);

impl Proposition {
    /// The index of this proposition in its pool's insertion order.
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Proposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The pool of propositions live for a given run.
///
/// Propositions live for the whole run; the pool may only grow (§3).
#[derive(Clone, Debug, Default)]
pub struct PropositionPool {
    names: Vec<String>,
    by_name: HashMap<String, Proposition>,
}

impl PropositionPool {
    /// A fresh, empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern `name`, returning its existing proposition if already known.
    pub fn intern(&mut self, name: impl Into<String>) -> Proposition {
        let name = name.into();
        if let Some(p) = self.by_name.get(&name) {
            return *p;
        }
        let p = Proposition(self.names.len() as u32);
        self.names.push(name.clone());
        self.by_name.insert(name, p);
        p
    }

    /// Look up a proposition by its stable name, without interning.
    pub fn get(&self, name: &str) -> Option<Proposition> {
        self.by_name.get(name).copied()
    }

    /// The stable name of a proposition.
    pub fn name(&self, p: Proposition) -> &str {
        &self.names[p.index()]
    }

    /// The number of propositions interned so far.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// All propositions currently in the pool, in insertion (= canonical) order.
    pub fn all(&self) -> impl Iterator<Item = Proposition> + '_ {
        (0..self.names.len()).map(|i| Proposition(i as u32))
    }
}

/// A proposition together with a polarity (asserted / negated).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Literal {
    proposition: Proposition,
    polarity: bool,
}

impl Literal {
    pub fn new(proposition: Proposition, polarity: bool) -> Self {
        Self {
            proposition,
            polarity,
        }
    }

    /// A positive (asserted) literal of `proposition`.
    pub fn positive(proposition: Proposition) -> Self {
        Self::new(proposition, true)
    }

    /// A negative (negated) literal of `proposition`.
    pub fn negative(proposition: Proposition) -> Self {
        Self::new(proposition, false)
    }

    pub fn proposition(&self) -> Proposition {
        self.proposition
    }

    pub fn polarity(&self) -> bool {
        self.polarity
    }

    /// The negation of this literal.
    pub fn negate(&self) -> Self {
        Self {
            proposition: self.proposition,
            polarity: !self.polarity,
        }
    }
}

// Literals are ordered by proposition, then by polarity (false < true), matching
// the order used for literals throughout the kernel.
impl PartialOrd for Literal {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Literal {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.proposition
            .cmp(&other.proposition)
            .then(self.polarity.cmp(&other.polarity))
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.polarity {
            write!(f, "{}", self.proposition)
        } else {
            write!(f, "-{}", self.proposition)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_is_stable() {
        let mut pool = PropositionPool::new();
        let a = pool.intern("a");
        let b = pool.intern("b");
        let a_again = pool.intern("a");
        assert_eq!(a, a_again);
        assert_ne!(a, b);
        assert!(a < b);
    }

    #[test]
    fn negate_flips_polarity_only() {
        let mut pool = PropositionPool::new();
        let a = pool.intern("a");
        let lit = Literal::positive(a);
        assert_eq!(lit.negate(), Literal::negative(a));
        assert_eq!(lit.negate().negate(), lit);
    }
}
