/*!
Error types used in the kernel.

Names of the error enums overlap with the taxonomy of §7 of the
specification this kernel implements: a formula error, an incoherence
reported at the boundary of the revision engine, strategy exhaustion
(which ends a run cleanly rather than propagating), search-radius
exhaustion, and an opaque backend error.

Most of these are recoverable within a simulation (see
[crate::simulation]); [KernelError::Formula] and [KernelError::Backend]
are always surfaced to the caller.
*/

use crate::proposition::Proposition;

/// A union of the kernel's error kinds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KernelError {
    /// Malformed input to the model-enumeration backend: a literal referred
    /// to a proposition unknown to the formula it was built against.
    Formula(FormulaError),

    /// A caller-supplied position could not be made coherent with respect to
    /// the debate it was checked or revised against.
    IncoherenceAtInput(IncoherenceError),

    /// Argument introduction could not find any candidate under the current
    /// strategy. Not an error in the usual sense: it terminates the current
    /// simulation run with a recorded reason, but is surfaced as a `Result`
    /// so callers outside a simulation can observe it directly.
    StrategyExhaustion(StrategyExhaustionError),

    /// Partial-position revision could not find a closed, coherent candidate
    /// within the configured search radius.
    SearchRadiusExhaustion(SearchRadiusError),

    /// The underlying model-enumeration backend failed or exceeded its
    /// resource bounds. Surfaced as-is.
    Backend(BackendError),
}

impl std::fmt::Display for KernelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KernelError::Formula(e) => write!(f, "formula error: {e:?}"),
            KernelError::IncoherenceAtInput(e) => write!(f, "incoherence at input: {e:?}"),
            KernelError::StrategyExhaustion(e) => write!(f, "strategy exhaustion: {e:?}"),
            KernelError::SearchRadiusExhaustion(e) => write!(f, "search-radius exhaustion: {e:?}"),
            KernelError::Backend(e) => write!(f, "backend error: {e:?}"),
        }
    }
}

impl std::error::Error for KernelError {}

/// An error while compiling or interpreting a Boolean formula.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormulaError {
    /// A literal referenced a proposition not present in the formula's atom
    /// pool.
    UnknownProposition(Proposition),

    /// A care-set passed to model enumeration was empty where at least one
    /// proposition was required.
    EmptyCareSet,
}

impl From<FormulaError> for KernelError {
    fn from(e: FormulaError) -> Self {
        KernelError::Formula(e)
    }
}

/// An error reported when a position cannot be made coherent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IncoherenceError {
    /// The position, conjoined with its reference debate, has no model.
    NoModel,

    /// `close` could not complete the position without contradiction: some
    /// proposition was not satisfiable under either polarity.
    CloseFailed(Proposition),
}

impl From<IncoherenceError> for KernelError {
    fn from(e: IncoherenceError) -> Self {
        KernelError::IncoherenceAtInput(e)
    }
}

/// Reasons argument introduction gave up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StrategyExhaustionError {
    /// Every premise combination admitted by the strategy's filters was
    /// tried (or is already in the debate's "used" list) without success.
    PremisePoolExhausted,

    /// A premise combination was found but no admissible conclusion literal
    /// remained.
    NoConclusionCandidate,

    /// A directed introduction event exhausted its retry budget of
    /// source/target pairs (§4.7).
    SourceTargetRetriesExhausted,
}

impl From<StrategyExhaustionError> for KernelError {
    fn from(e: StrategyExhaustionError) -> Self {
        KernelError::StrategyExhaustion(e)
    }
}

/// Reasons the partial-position revision search gave up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchRadiusError {
    /// No candidate was found even after `k` reached 0 (§4.5c).
    NoCandidateAtZero,
}

impl From<SearchRadiusError> for KernelError {
    fn from(e: SearchRadiusError) -> Self {
        KernelError::SearchRadiusExhaustion(e)
    }
}

/// Errors surfaced from the model-enumeration backend itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BackendError {
    /// The formula's atom count exceeds what the exhaustive backend is
    /// configured to enumerate (see
    /// [ExhaustiveBackend](crate::formula::ExhaustiveBackend)).
    TooManyAtoms { atoms: usize, limit: usize },
}

impl From<BackendError> for KernelError {
    fn from(e: BackendError) -> Self {
        KernelError::Backend(e)
    }
}
