//! Argumentation strategies (§4.4): the filter a new argument's premises,
//! conclusion, source, and target must pass.

use crate::position::Position;
use crate::proposition::Literal;

/// Which position(s) premises are drawn from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PremiseSource {
    Source,
    Target,
    None,
}

/// A source or target's required stance on the conclusion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Stance {
    /// The position must accept the conclusion literal.
    Accepts,
    /// The position must not deny the conclusion literal: it accepts it or
    /// is silent on it (§4.4: "tolerates").
    Tolerates,
    /// The position must deny the conclusion literal (accept its negation).
    Denies,
    /// No constraint.
    NotApplicable,
}

impl Stance {
    /// Whether `position` satisfies this stance requirement towards
    /// `conclusion`.
    pub fn satisfied_by(&self, position: &Position, conclusion: Literal) -> bool {
        match self {
            Stance::Accepts => position.accepts(conclusion),
            Stance::Tolerates => !position.accepts(conclusion.negate()),
            Stance::Denies => position.accepts(conclusion.negate()),
            Stance::NotApplicable => true,
        }
    }
}

/// A strategy record: exactly the six fields of §4.4.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Strategy {
    pub uses_source: bool,
    pub uses_target: bool,
    pub premises_from: PremiseSource,
    pub source_stance: Stance,
    pub target_stance: Stance,
    pub name: String,
}

impl Strategy {
    /// A completely random strategy: no source or target is required, and
    /// premises are drawn from the free pool of literals.
    pub fn random() -> Self {
        Strategy {
            uses_source: false,
            uses_target: false,
            premises_from: PremiseSource::None,
            source_stance: Stance::NotApplicable,
            target_stance: Stance::NotApplicable,
            name: "random".to_string(),
        }
    }

    /// Premises from source, source accepts the conclusion.
    pub fn fortify() -> Self {
        Strategy {
            uses_source: true,
            uses_target: false,
            premises_from: PremiseSource::Source,
            source_stance: Stance::Accepts,
            target_stance: Stance::NotApplicable,
            name: "fortify".to_string(),
        }
    }

    /// Premises from source, source tolerates, target denies.
    pub fn attack() -> Self {
        Strategy {
            uses_source: true,
            uses_target: true,
            premises_from: PremiseSource::Source,
            source_stance: Stance::Tolerates,
            target_stance: Stance::Denies,
            name: "attack".to_string(),
        }
    }

    /// Premises from target, source accepts the conclusion.
    pub fn convert() -> Self {
        Strategy {
            uses_source: true,
            uses_target: true,
            premises_from: PremiseSource::Target,
            source_stance: Stance::Accepts,
            target_stance: Stance::NotApplicable,
            name: "convert".to_string(),
        }
    }

    /// Premises from target, source tolerates, target denies.
    pub fn undercut() -> Self {
        Strategy {
            uses_source: true,
            uses_target: true,
            premises_from: PremiseSource::Target,
            source_stance: Stance::Tolerates,
            target_stance: Stance::Denies,
            name: "undercut".to_string(),
        }
    }

    pub fn builtin(name: &str) -> Option<Self> {
        match name {
            "random" => Some(Self::random()),
            "fortify" => Some(Self::fortify()),
            "attack" => Some(Self::attack()),
            "convert" => Some(Self::convert()),
            "undercut" => Some(Self::undercut()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Trit;
    use crate::proposition::PropositionPool;

    #[test]
    fn s4_fortify_reads_source_stance() {
        let mut pool = PropositionPool::new();
        let p0 = pool.intern("p0");

        let mut source = Position::new();
        source.set(p0, Trit::True);

        let strategy = Strategy::fortify();
        assert!(strategy
            .source_stance
            .satisfied_by(&source, Literal::positive(p0)));
        assert!(!strategy
            .source_stance
            .satisfied_by(&source, Literal::negative(p0)));
    }

    #[test]
    fn tolerates_accepts_silence_and_acceptance() {
        let mut pool = PropositionPool::new();
        let p0 = pool.intern("p0");
        let silent = Position::new();
        let mut accepting = Position::new();
        accepting.set(p0, Trit::True);
        let mut denying = Position::new();
        denying.set(p0, Trit::False);

        assert!(Stance::Tolerates.satisfied_by(&silent, Literal::positive(p0)));
        assert!(Stance::Tolerates.satisfied_by(&accepting, Literal::positive(p0)));
        assert!(!Stance::Tolerates.satisfied_by(&denying, Literal::positive(p0)));
    }
}
