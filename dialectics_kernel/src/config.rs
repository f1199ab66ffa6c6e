//! Configuration records (§6 "External interfaces", §4.6, §4.7): one
//! `#[derive(Serialize, Deserialize)]` struct per subsystem, composed by
//! `dialectics_cli` from a loaded file.

use crate::introduction::GrowthMode;
use crate::mapgen::MapGeneratorConfig;
use crate::position::Position;
use crate::revision::RevisionStrategy;
use crate::strategy::Strategy;

/// The strategy configuration record (§6): exactly the six fields of §4.4.
/// [Strategy] already carries them; this alias gives the record the name
/// the external-interfaces section uses.
pub type StrategyConfig = Strategy;

/// The argument-map generator configuration record (§4.6, §6). [MapGeneratorConfig]
/// already carries the named fields (N, k, size distribution, β, γ, limits).
pub type MapGenConfig = MapGeneratorConfig;

/// Relative weights of the two event kinds a simulation step may draw
/// (§4.7 "Event selection").
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct EventWeights {
    pub introduction: f64,
    pub new_sentence: f64,
}

impl Default for EventWeights {
    fn default() -> Self {
        Self {
            introduction: 0.8,
            new_sentence: 0.2,
        }
    }
}

/// The three conditions that end a run (§4.7 "Termination").
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct TerminationConfig {
    /// Stop once `density(current stage) >= density_ceiling`.
    pub density_ceiling: f64,
    /// Stop once `model_count(current stage) <= sccp_floor`.
    pub sccp_floor: u64,
    /// Stop once the step count reaches `step_cap`.
    pub step_cap: usize,
}

/// The simulation configuration record (§6, §4.7): growth mode, event
/// weights, sentence-pool bounds, initial positions, default strategies,
/// search radius, termination thresholds, and the run's random seed.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct SimulationConfig {
    pub growth: GrowthMode,
    pub event_weights: EventWeights,
    /// Number of propositions interned before the run starts.
    pub initial_sentence_pool: usize,
    /// The sentence pool may grow via `new_sentence` events up to this many
    /// propositions; no further growth once reached.
    pub max_sentence_pool: usize,
    pub initial_positions: Vec<Position>,
    pub default_introduction_strategy: Strategy,
    pub default_update_strategy: RevisionStrategy,
    /// Whether introduction events pick a directed (source, target) pair
    /// (§4.7 "Introduction event").
    pub directed: bool,
    /// Default search radius for positions whose `update_strategy` tag is
    /// `"closest-closed-partial-coherent"` (§4.5c).
    pub search_radius: usize,
    pub termination: TerminationConfig,
    pub seed: u64,
}

/// Uncovering strategy for the fixed-debate simulation variant (§4.7).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum UncoveringStrategy {
    /// Uncover a uniformly random eligible argument.
    Any,
    /// Uncover the eligible argument maximising the count of positions
    /// satisfying the strategy filter.
    Max,
}

/// Configuration specific to the fixed-debate variant (§4.7).
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct FixedDebateConfig {
    pub map_generator: MapGeneratorConfig,
    pub uncovering_strategy: UncoveringStrategy,
}

/// Configuration specific to the social-influence variant (§4.7).
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct SocialInfluenceConfig {
    /// Scales how strongly edit distance to the source dampens the
    /// influence coin.
    pub influence_parameter: f64,
    /// Stop once population-wide mean agreement exceeds this target.
    pub agreement_target: f64,
    pub step_cap: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_weights_default_favours_introduction() {
        let w = EventWeights::default();
        assert!(w.introduction > w.new_sentence);
    }
}
