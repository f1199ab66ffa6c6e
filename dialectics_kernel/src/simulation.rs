//! The simulation driver (§4.7): sequences events, coordinates introduction
//! and revision, maintains the trace, and decides termination.
//!
//! Three flavours share this module: the default growth-driven [Simulation],
//! the [FixedDebateSimulation] that uncovers a pre-built debate
//! ([crate::mapgen]), and the [SocialInfluenceSimulation] that never changes
//! its (fixed) debate and instead spreads a source position's entries
//! through the population.

use std::collections::BTreeSet;

use rand::Rng;

use crate::config::{
    FixedDebateConfig, SimulationConfig, SocialInfluenceConfig, UncoveringStrategy,
};
use crate::debate::{ArgumentStore, Debate};
use crate::formula::ModelService;
use crate::introduction::{self, GrowthMode};
use crate::position::distance::{normalised_edit_distance, EditWeights};
use crate::position::{Position, Trit};
use crate::proposition::{Proposition, PropositionPool};
use crate::revision;
use crate::strategy::Strategy;
use crate::trace::{Decision, Trace};

/// Why a run stopped (§4.7 "Termination").
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TerminationReason {
    DensityCeiling,
    SccpFloor,
    StepCap,
    IntroductionExhausted,
    AgreementTarget,
}

fn choose_event(weights: &crate::config::EventWeights, can_grow_pool: bool, rng: &mut impl Rng) -> Event {
    if !can_grow_pool {
        return Event::Introduction;
    }
    let total = weights.introduction + weights.new_sentence;
    if total <= 0.0 {
        return Event::Introduction;
    }
    if rng.gen::<f64>() * total < weights.introduction {
        Event::Introduction
    } else {
        Event::NewSentence
    }
}

#[derive(Clone, Copy, Debug)]
enum Event {
    Introduction,
    NewSentence,
}

/// The default (growth-driven) simulation of §4.7.
pub struct Simulation {
    pool: PropositionPool,
    debate: Debate,
    store: ArgumentStore,
    population: Vec<Position>,
    config: SimulationConfig,
    trace: Trace,
    rng: rand::rngs::StdRng,
    step: usize,
}

impl Simulation {
    /// Build a fresh simulation: interns `max_sentence_pool` propositions
    /// `p0..`, starts the debate with the first `initial_sentence_pool` of
    /// them, and seeds the population from `config.initial_positions`.
    pub fn new(config: SimulationConfig) -> Self {
        let mut pool = PropositionPool::new();
        let all_atoms: Vec<Proposition> = (0..config.max_sentence_pool)
            .map(|i| pool.intern(format!("p{i}")))
            .collect();

        let mut debate = Debate::empty();
        for &atom in all_atoms.iter().take(config.initial_sentence_pool) {
            debate = debate.with_new_proposition(atom);
        }

        let population = config.initial_positions.clone();
        let rng = crate::random::seeded(config.seed);

        Self {
            pool,
            debate,
            store: ArgumentStore::new(),
            population,
            config,
            trace: Trace::new(),
            rng,
            step: 0,
        }
    }

    pub fn pool(&self) -> &PropositionPool {
        &self.pool
    }

    pub fn debate(&self) -> &Debate {
        &self.debate
    }

    /// The backing store for every argument ever committed during this run;
    /// required by callers (e.g. [crate::debate::Debate::density]) that want
    /// to inspect a historical stage recorded in the [Trace].
    pub fn store(&self) -> &ArgumentStore {
        &self.store
    }

    pub fn population(&self) -> &[Position] {
        &self.population
    }

    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    /// Run to completion, recording every stage/population pair and
    /// decision into the trace (§4.7).
    pub fn run(&mut self, backend: &dyn ModelService) -> TerminationReason {
        self.trace.push(self.debate.clone(), self.population.clone());
        loop {
            if let Some(reason) = self.check_termination(backend) {
                self.trace.record(Decision::Terminated {
                    step: self.step,
                    reason: format!("{reason:?}"),
                });
                return reason;
            }

            let can_grow = self.debate.atoms().len() < self.config.max_sentence_pool;
            match choose_event(&self.config.event_weights, can_grow, &mut self.rng) {
                Event::Introduction => {
                    if !self.introduction_event(backend) {
                        let reason = TerminationReason::IntroductionExhausted;
                        self.trace.record(Decision::Terminated {
                            step: self.step,
                            reason: format!("{reason:?}"),
                        });
                        return reason;
                    }
                }
                Event::NewSentence => self.new_sentence_event(),
            }

            self.revise_population(backend);
            self.step += 1;
            self.trace.push(self.debate.clone(), self.population.clone());
        }
    }

    fn check_termination(&self, backend: &dyn ModelService) -> Option<TerminationReason> {
        if self.step >= self.config.termination.step_cap {
            return Some(TerminationReason::StepCap);
        }
        if !self.debate.atoms().is_empty() {
            if let Ok(density) = self.debate.density(&self.store, backend) {
                if density >= self.config.termination.density_ceiling {
                    return Some(TerminationReason::DensityCeiling);
                }
            }
            let formula = crate::formula::compile(&self.debate, &self.store);
            if let Ok(model_count) = backend.model_count(&formula) {
                if model_count <= self.config.termination.sccp_floor {
                    return Some(TerminationReason::SccpFloor);
                }
            }
        }
        None
    }

    /// §4.7 "Introduction event". Returns `false` on irrecoverable
    /// exhaustion.
    fn introduction_event(&mut self, backend: &dyn ModelService) -> bool {
        let cap = ((self.population.len() as f64) / 2.0).ceil() as usize;
        let cap = cap.max(1);

        if self.config.directed && self.population.len() >= 2 {
            for attempt in 0..cap {
                let (source_idx, target_idx) = self.pick_directed_pair();
                let strategy = self.select_strategy(source_idx);
                let source = self.population[source_idx].clone();
                let target = self.population[target_idx].clone();

                match introduction::introduce(
                    &self.debate,
                    &mut self.store,
                    &strategy,
                    &self.config.growth,
                    Some(&source),
                    Some(&target),
                    backend,
                    &mut self.rng,
                ) {
                    Ok(introduced) => {
                        self.debate = introduced.debate;
                        self.trace.record(Decision::ArgumentIntroduced {
                            step: self.step,
                            strategy: strategy.name.clone(),
                        });
                        return true;
                    }
                    Err(e) => {
                        self.trace.record(Decision::IntroductionRetried {
                            step: self.step,
                            attempt,
                            reason: format!("{e:?}"),
                        });
                    }
                }
            }
            false
        } else {
            let strategy = self.config.default_introduction_strategy.clone();
            match introduction::introduce(
                &self.debate,
                &mut self.store,
                &strategy,
                &self.config.growth,
                None,
                None,
                backend,
                &mut self.rng,
            ) {
                Ok(introduced) => {
                    self.debate = introduced.debate;
                    self.trace.record(Decision::ArgumentIntroduced {
                        step: self.step,
                        strategy: strategy.name.clone(),
                    });
                    true
                }
                Err(e) => {
                    self.trace.record(Decision::IntroductionFailed {
                        step: self.step,
                        reason: format!("{e:?}"),
                    });
                    false
                }
            }
        }
    }

    fn pick_directed_pair(&mut self) -> (usize, usize) {
        let n = self.population.len();
        let source = self.rng.gen_range(0..n);
        loop {
            let target = self.rng.gen_range(0..n);
            if target != source {
                return (source, target);
            }
        }
    }

    fn select_strategy(&mut self, source_idx: usize) -> Strategy {
        let tags = &self.population[source_idx].introduction_strategy;
        if tags.is_empty() {
            return self.config.default_introduction_strategy.clone();
        }
        let idx = self.rng.gen_range(0..tags.len());
        Strategy::builtin(&tags[idx]).unwrap_or_else(|| self.config.default_introduction_strategy.clone())
    }

    /// §4.7 "New-sentence event".
    fn new_sentence_event(&mut self) {
        let used: BTreeSet<Proposition> = self.debate.atoms().clone();
        let unused: Vec<Proposition> = self
            .pool
            .all()
            .filter(|a| !used.contains(a))
            .collect();
        if unused.is_empty() {
            return;
        }
        let atom = unused[self.rng.gen_range(0..unused.len())];
        self.debate = self.debate.with_new_proposition(atom);

        for position in &mut self.population {
            if self.rng.gen::<f64>() < 2.0 / 3.0 {
                let polarity: bool = self.rng.gen();
                position.set(atom, Trit::from_bool(polarity));
            } else {
                position.set(atom, Trit::Suspended);
            }
        }

        self.trace.record(Decision::NewSentence { step: self.step });
    }

    fn revise_population(&mut self, backend: &dyn ModelService) {
        let search_radius = self.config.search_radius;
        let default_strategy = self.config.default_update_strategy.clone();
        for (idx, position) in self.population.iter_mut().enumerate() {
            let strategy = position
                .update_strategy
                .as_deref()
                .and_then(|tag| revision::RevisionStrategy::builtin(tag, search_radius))
                .unwrap_or_else(|| default_strategy.clone());
            match revision::revise(position, &self.debate, &self.store, backend, &strategy, &mut self.rng) {
                Ok(revised) => {
                    self.trace.record(Decision::RevisionOutcome {
                        step: self.step,
                        position_index: idx,
                        outcome: "revised".to_string(),
                    });
                    *position = revised;
                }
                Err(e) => {
                    self.trace.record(Decision::RevisionOutcome {
                        step: self.step,
                        position_index: idx,
                        outcome: format!("failed: {e:?}"),
                    });
                }
            }
        }
    }
}

/// The fixed-debate variant (§4.7 "Fixed-debate variant"): the debate is
/// pre-built (typically by [crate::mapgen]) and each step uncovers one of
/// its arguments instead of introducing a new one.
pub struct FixedDebateSimulation {
    full_debate: Debate,
    store: ArgumentStore,
    uncovered: Vec<crate::argument::ArgumentId>,
    debate: Debate,
    population: Vec<Position>,
    config: FixedDebateConfig,
    default_strategy: Strategy,
    trace: Trace,
    rng: rand::rngs::StdRng,
    step: usize,
    step_cap: usize,
}

impl FixedDebateSimulation {
    pub fn new(
        full_debate: Debate,
        store: ArgumentStore,
        population: Vec<Position>,
        config: FixedDebateConfig,
        default_strategy: Strategy,
        seed: u64,
        step_cap: usize,
    ) -> Self {
        let atoms = full_debate.atoms().clone();
        let mut debate = Debate::empty();
        for &atom in &atoms {
            debate = debate.with_new_proposition(atom);
        }
        Self {
            full_debate,
            store,
            uncovered: Vec::new(),
            debate,
            population,
            config,
            default_strategy,
            trace: Trace::new(),
            rng: crate::random::seeded(seed),
            step: 0,
            step_cap,
        }
    }

    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    pub fn run(&mut self, backend: &dyn ModelService) -> TerminationReason {
        self.trace.push(self.debate.clone(), self.population.clone());
        loop {
            if self.step >= self.step_cap {
                return TerminationReason::StepCap;
            }
            let eligible: Vec<crate::argument::ArgumentId> = self
                .full_debate
                .arguments()
                .iter()
                .copied()
                .filter(|id| !self.uncovered.contains(id))
                .collect();
            if eligible.is_empty() {
                return TerminationReason::IntroductionExhausted;
            }

            let chosen = match self.config.uncovering_strategy {
                UncoveringStrategy::Any => eligible[self.rng.gen_range(0..eligible.len())],
                UncoveringStrategy::Max => self.max_eligibility(&eligible),
            };

            self.uncovered.push(chosen);
            self.debate = self.debate.with_argument(&self.store, chosen);
            self.trace.record(Decision::ArgumentIntroduced {
                step: self.step,
                strategy: self.default_strategy.name.clone(),
            });

            for (idx, position) in self.population.iter_mut().enumerate() {
                match revision::revise(
                    position,
                    &self.debate,
                    &self.store,
                    backend,
                    &revision::RevisionStrategy::ClosestCoherent,
                    &mut self.rng,
                ) {
                    Ok(revised) => *position = revised,
                    Err(e) => {
                        self.trace.record(Decision::RevisionOutcome {
                            step: self.step,
                            position_index: idx,
                            outcome: format!("failed: {e:?}"),
                        });
                    }
                }
            }

            self.step += 1;
            self.trace.push(self.debate.clone(), self.population.clone());
        }
    }

    /// The eligible argument maximising the count of positions satisfying
    /// the strategy filter — approximated here as the count of positions
    /// already accepting every premise of the candidate argument (the
    /// positions the strategy's `fortify`-like filter would pass).
    fn max_eligibility(&self, eligible: &[crate::argument::ArgumentId]) -> crate::argument::ArgumentId {
        *eligible
            .iter()
            .max_by_key(|&&id| {
                let argument = self.store.get(id);
                self.population
                    .iter()
                    .filter(|p| argument.premises().iter().all(|lit| p.accepts(*lit)))
                    .count()
            })
            .expect("eligible is non-empty")
    }
}

/// The social-influence variant (§4.7 "Social-influence variant"): the
/// debate never changes. Each step picks a source position and an
/// influence proposition; every other position may drop its entry on that
/// proposition and adopt the source's, with probability scaled by an
/// influence parameter and the pairwise edit distance to the source.
pub struct SocialInfluenceSimulation {
    debate: Debate,
    store: ArgumentStore,
    population: Vec<Position>,
    config: SocialInfluenceConfig,
    trace: Trace,
    rng: rand::rngs::StdRng,
    step: usize,
}

impl SocialInfluenceSimulation {
    pub fn new(
        debate: Debate,
        store: ArgumentStore,
        population: Vec<Position>,
        config: SocialInfluenceConfig,
        seed: u64,
    ) -> Self {
        Self {
            debate,
            store,
            population,
            config,
            trace: Trace::new(),
            rng: crate::random::seeded(seed),
            step: 0,
        }
    }

    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    pub fn run(&mut self, backend: &dyn ModelService) -> TerminationReason {
        self.trace.push(self.debate.clone(), self.population.clone());
        loop {
            if self.step >= self.config.step_cap {
                return TerminationReason::StepCap;
            }
            if self.mean_agreement() >= self.config.agreement_target {
                return TerminationReason::AgreementTarget;
            }

            self.influence_step(backend);
            self.step += 1;
            self.trace.push(self.debate.clone(), self.population.clone());
        }
    }

    fn influence_step(&mut self, backend: &dyn ModelService) {
        if self.population.is_empty() {
            return;
        }
        let source_idx = self.rng.gen_range(0..self.population.len());
        let atoms: Vec<Proposition> = self.debate.atoms().iter().copied().collect();
        if atoms.is_empty() {
            return;
        }
        let proposition = atoms[self.rng.gen_range(0..atoms.len())];

        let source = self.population[source_idx].clone();
        let source_entry = source.get(proposition);

        for idx in 0..self.population.len() {
            if idx == source_idx {
                continue;
            }
            let distance = normalised_edit_distance(&source, &self.population[idx], EditWeights::default());
            let influence = (1.0 - distance * self.config.influence_parameter).clamp(0.0, 1.0);
            if self.rng.gen::<f64>() < influence {
                if let Some(value) = source_entry {
                    self.population[idx].set(proposition, value);
                } else {
                    self.population[idx].set(proposition, Trit::Suspended);
                }
            }
        }

        for (idx, position) in self.population.iter_mut().enumerate() {
            match revision::revise(
                position,
                &self.debate,
                &self.store,
                backend,
                &revision::RevisionStrategy::ClosestCoherent,
                &mut self.rng,
            ) {
                Ok(revised) => *position = revised,
                Err(e) => {
                    self.trace.record(Decision::RevisionOutcome {
                        step: self.step,
                        position_index: idx,
                        outcome: format!("failed: {e:?}"),
                    });
                }
            }
        }
    }

    /// Mean pairwise agreement: the fraction of shared-domain propositions
    /// on which each pair of positions agree, averaged over all pairs.
    fn mean_agreement(&self) -> f64 {
        let n = self.population.len();
        if n < 2 {
            return 1.0;
        }
        let mut total = 0.0;
        let mut pairs = 0.0;
        for i in 0..n {
            for j in (i + 1)..n {
                let a = &self.population[i];
                let b = &self.population[j];
                let shared: Vec<Proposition> = a
                    .domain()
                    .filter(|p| b.domain().any(|q| q == *p))
                    .collect();
                if shared.is_empty() {
                    continue;
                }
                let agreeing = shared.iter().filter(|&&p| a.get(p) == b.get(p)).count();
                total += agreeing as f64 / shared.len() as f64;
                pairs += 1.0;
            }
        }
        if pairs == 0.0 {
            1.0
        } else {
            total / pairs
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EventWeights, TerminationConfig};
    use crate::formula::ExhaustiveBackend;
    use crate::introduction::PremiseCardinality;

    fn tiny_config() -> SimulationConfig {
        SimulationConfig {
            growth: GrowthMode::Random {
                cardinality: PremiseCardinality::Fixed(2),
            },
            event_weights: EventWeights {
                introduction: 1.0,
                new_sentence: 0.0,
            },
            initial_sentence_pool: 4,
            max_sentence_pool: 4,
            initial_positions: vec![Position::new(), Position::new()],
            default_introduction_strategy: Strategy::random(),
            default_update_strategy: revision::RevisionStrategy::ClosestCoherent,
            directed: false,
            search_radius: 2,
            termination: TerminationConfig {
                density_ceiling: 0.95,
                sccp_floor: 1,
                step_cap: 5,
            },
            seed: 99,
        }
    }

    #[test]
    fn growth_simulation_terminates_and_records_a_trace() {
        let backend = ExhaustiveBackend::default();
        let mut sim = Simulation::new(tiny_config());
        let reason = sim.run(&backend);
        assert!(matches!(
            reason,
            TerminationReason::DensityCeiling
                | TerminationReason::SccpFloor
                | TerminationReason::StepCap
                | TerminationReason::IntroductionExhausted
        ));
        assert!(sim.trace().stages().len() >= 1);
        assert_eq!(sim.trace().stages().len(), sim.trace().populations().len());
    }

    #[test]
    fn revise_population_preserves_update_strategy_tags() {
        // tiny_config interns atoms p0.. in the same order as this pool, so
        // the index `pool.intern("p0")` yields matches the simulation's own.
        let mut pool = PropositionPool::new();
        let p0 = pool.intern("p0");
        let backend = ExhaustiveBackend::default();

        let mut pos = Position::new();
        pos.set(p0, Trit::True);
        pos.update_strategy = Some("closest-coherent".to_string());

        let mut config = tiny_config();
        config.initial_positions = vec![pos];
        let mut sim = Simulation::new(config);

        sim.revise_population(&backend);
        sim.revise_population(&backend);

        assert_eq!(
            sim.population()[0].update_strategy.as_deref(),
            Some("closest-coherent")
        );
    }

    #[test]
    fn fixed_debate_simulation_uncovers_until_exhausted_or_cap() {
        use crate::mapgen::MapGeneratorConfig;

        let gen_config = MapGeneratorConfig {
            proposition_count: 5,
            key_statement_count: 2,
            size_distribution: vec![(1, 1.0)],
            beta: 0.75,
            gamma: 0.75,
            max_arguments: 3,
            max_density: 0.99,
        };
        let backend = ExhaustiveBackend::default();
        let mut rng = crate::random::seeded(5);
        let (_pool, full_debate, store) = crate::mapgen::generate(&gen_config, &backend, &mut rng).unwrap();

        let fixed_config = FixedDebateConfig {
            map_generator: gen_config,
            uncovering_strategy: UncoveringStrategy::Any,
        };
        let mut sim = FixedDebateSimulation::new(
            full_debate,
            store,
            vec![Position::new(), Position::new()],
            fixed_config,
            Strategy::random(),
            7,
            10,
        );
        let reason = sim.run(&backend);
        assert!(matches!(
            reason,
            TerminationReason::StepCap | TerminationReason::IntroductionExhausted
        ));
    }

    #[test]
    fn social_influence_simulation_terminates_on_step_cap_or_agreement() {
        let mut pool = PropositionPool::new();
        let p0 = pool.intern("p0");
        let debate = Debate::empty().with_new_proposition(p0);
        let store = ArgumentStore::new();
        let backend = ExhaustiveBackend::default();

        let mut a = Position::new();
        a.set(p0, Trit::True);
        let b = Position::new();

        let config = SocialInfluenceConfig {
            influence_parameter: 1.0,
            agreement_target: 0.999,
            step_cap: 10,
        };
        let mut sim = SocialInfluenceSimulation::new(debate, store, vec![a, b], config, 3);
        let reason = sim.run(&backend);
        assert!(matches!(
            reason,
            TerminationReason::StepCap | TerminationReason::AgreementTarget
        ));
    }

    #[test]
    fn social_influence_step_never_updates_at_maximal_distance_and_full_influence() {
        // Source and target disagree on the only shared atom, so their
        // normalised edit distance is 1.0; at influence_parameter 1.0 the
        // coin's probability of updating is `1.0 - 1.0 * 1.0 == 0.0`, so the
        // target must stay put across every step regardless of the rng draw
        // (a reciprocal-shaped coin would instead update about half the
        // time).
        let mut pool = PropositionPool::new();
        let p0 = pool.intern("p0");
        let debate = Debate::empty().with_new_proposition(p0);
        let store = ArgumentStore::new();
        let backend = ExhaustiveBackend::default();

        let mut a = Position::new();
        a.set(p0, Trit::True);
        let mut b = Position::new();
        b.set(p0, Trit::False);

        let config = SocialInfluenceConfig {
            influence_parameter: 1.0,
            agreement_target: 0.999,
            step_cap: 10,
        };
        let mut sim = SocialInfluenceSimulation::new(debate, store, vec![a, b], config, 7);
        let reason = sim.run(&backend);
        assert_eq!(reason, TerminationReason::StepCap);
        assert_eq!(sim.population()[0].get(p0), Some(Trit::True));
        assert_eq!(sim.population()[1].get(p0), Some(Trit::False));
    }
}
