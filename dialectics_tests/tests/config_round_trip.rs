//! The external-interfaces contract (§6): a [SimulationConfig] built in
//! code survives a round trip through both file formats `dialectics_cli`
//! accepts.

use std::collections::BTreeSet;

use dialectics_kernel::config::{EventWeights, SimulationConfig, TerminationConfig};
use dialectics_kernel::introduction::{GrowthMode, PremiseCardinality};
use dialectics_kernel::position::Position;
use dialectics_kernel::proposition::PropositionPool;
use dialectics_kernel::revision::RevisionStrategy;
use dialectics_kernel::strategy::Strategy;

mod config_round_trip {
    use super::*;

    fn sample_config() -> SimulationConfig {
        let mut pool = PropositionPool::new();
        let key_statement = pool.intern("p0");

        // Positions carry a `BTreeMap<Proposition, Trit>`, which cannot
        // round-trip through TOML's string-keyed tables; the strategy tags
        // exercised here are the part of a position's state that actually
        // travels through a configuration file (§6).
        let mut seed_position = Position::new();
        seed_position.introduction_strategy = vec!["fortify".to_string()];
        seed_position.update_strategy = Some("closest-coherent".to_string());

        SimulationConfig {
            growth: GrowthMode::Tree {
                cardinality: PremiseCardinality::UniformOver(vec![1, 2]),
                beta: 0.75,
                gamma: 0.75,
                key_statements: BTreeSet::from([key_statement]),
            },
            event_weights: EventWeights::default(),
            initial_sentence_pool: 5,
            max_sentence_pool: 10,
            initial_positions: vec![seed_position],
            default_introduction_strategy: Strategy::fortify(),
            default_update_strategy: RevisionStrategy::ClosestClosedPartialCoherent {
                search_radius: 3,
            },
            directed: true,
            search_radius: 3,
            termination: TerminationConfig {
                density_ceiling: 0.6,
                sccp_floor: 2,
                step_cap: 100,
            },
            seed: 42,
        }
    }

    #[test]
    fn survives_toml_round_trip() {
        let config = sample_config();
        let serialized = toml::to_string(&config).unwrap();
        let deserialized: SimulationConfig = toml::from_str(&serialized).unwrap();
        assert_eq!(deserialized.seed, config.seed);
        assert_eq!(deserialized.directed, config.directed);
        assert_eq!(
            deserialized.termination.density_ceiling,
            config.termination.density_ceiling
        );
        assert_eq!(
            deserialized.default_introduction_strategy,
            config.default_introduction_strategy
        );
    }

    #[test]
    fn survives_json_round_trip() {
        let config = sample_config();
        let serialized = serde_json::to_string(&config).unwrap();
        let deserialized: SimulationConfig = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized.initial_sentence_pool, config.initial_sentence_pool);
        assert_eq!(deserialized.max_sentence_pool, config.max_sentence_pool);
        assert_eq!(
            deserialized.initial_positions[0].update_strategy,
            Some("closest-coherent".to_string())
        );
        assert_eq!(
            deserialized.initial_positions[0].introduction_strategy,
            config.initial_positions[0].introduction_strategy
        );
    }
}
