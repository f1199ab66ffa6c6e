//! Argument introduction (§4.4): proposing the next argument of a debate
//! under an argumentation strategy.

use std::collections::{BTreeSet, HashMap, HashSet};

use rand::Rng;

use crate::argument::{Argument, ArgumentId};
use crate::debate::{ArgumentStore, Debate};
use crate::error::{KernelError, StrategyExhaustionError};
use crate::formula::{self, ModelService};
use crate::position::Position;
use crate::proposition::{Literal, Proposition};
use crate::strategy::{PremiseSource, Strategy};

/// How many premise literals a new argument should have.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub enum PremiseCardinality {
    Fixed(usize),
    UniformOver(Vec<usize>),
}

impl PremiseCardinality {
    fn sample(&self, rng: &mut impl Rng) -> usize {
        match self {
            PremiseCardinality::Fixed(n) => *n,
            PremiseCardinality::UniformOver(options) => {
                options[rng.gen_range(0..options.len())]
            }
        }
    }
}

/// The growth mode an introduction event uses (§4.4).
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub enum GrowthMode {
    /// Random growth: a uniformly-sampled admissible premise combination and
    /// conclusion.
    Random { cardinality: PremiseCardinality },

    /// Tree-like growth: conclusions weighted towards low proposition
    /// levels, premises weighted towards low usage counts.
    Tree {
        cardinality: PremiseCardinality,
        /// β, the conclusion-level base (default ≈ 0.75).
        beta: f64,
        /// γ, the premise-usage base (default ≈ 0.75).
        gamma: f64,
        key_statements: BTreeSet<Proposition>,
    },
}

const MAX_INTRODUCTION_ATTEMPTS: usize = 256;

/// A candidate premise atom, with a polarity forced by the strategy's
/// source/target filter, or unconstrained.
#[derive(Clone, Copy, Debug)]
pub(crate) struct PremiseCandidate {
    pub(crate) atom: Proposition,
    pub(crate) forced_polarity: Option<bool>,
}

/// The literals a strategy's `premises_from` filter admits as premises,
/// derived from `source`/`target`'s current stance (§4.4).
fn premise_candidates(
    strategy: &Strategy,
    source: Option<&Position>,
    target: Option<&Position>,
    atoms: &BTreeSet<Proposition>,
) -> Vec<PremiseCandidate> {
    match strategy.premises_from {
        PremiseSource::None => atoms
            .iter()
            .map(|&atom| PremiseCandidate {
                atom,
                forced_polarity: None,
            })
            .collect(),
        PremiseSource::Source => stance_candidates(source, atoms),
        PremiseSource::Target => stance_candidates(target, atoms),
    }
}

fn stance_candidates(position: Option<&Position>, atoms: &BTreeSet<Proposition>) -> Vec<PremiseCandidate> {
    let Some(position) = position else {
        return Vec::new();
    };
    atoms
        .iter()
        .filter_map(|&atom| {
            position
                .get(atom)
                .and_then(|t| t.as_bool())
                .map(|polarity| PremiseCandidate {
                    atom,
                    forced_polarity: Some(polarity),
                })
        })
        .collect()
}

/// Weighted sampling without replacement of `n` items from `candidates`.
pub(crate) fn weighted_sample(
    candidates: &[(PremiseCandidate, f64)],
    n: usize,
    rng: &mut impl Rng,
) -> Vec<PremiseCandidate> {
    let mut pool: Vec<(PremiseCandidate, f64)> = candidates.to_vec();
    let mut chosen = Vec::new();
    for _ in 0..n {
        if pool.is_empty() {
            break;
        }
        let total: f64 = pool.iter().map(|(_, w)| w).sum();
        if total <= 0.0 {
            let idx = rng.gen_range(0..pool.len());
            chosen.push(pool.remove(idx).0);
            continue;
        }
        let mut draw = rng.gen::<f64>() * total;
        let mut idx = pool.len() - 1;
        for (i, (_, w)) in pool.iter().enumerate() {
            if draw < *w {
                idx = i;
                break;
            }
            draw -= w;
        }
        chosen.push(pool.remove(idx).0);
    }
    chosen
}

pub(crate) fn resolve_polarity(candidate: PremiseCandidate, rng: &mut impl Rng) -> Literal {
    let polarity = candidate.forced_polarity.unwrap_or_else(|| rng.gen());
    Literal::new(candidate.atom, polarity)
}

/// Whether `literal` passes `stance` for `position`, treating an absent
/// required position as an automatic pass (the caller is responsible for
/// supplying source/target whenever a strategy's `uses_source`/
/// `uses_target` flags require it).
fn stance_ok(
    stance: crate::strategy::Stance,
    position: Option<&Position>,
    literal: Literal,
) -> bool {
    match position {
        Some(p) => stance.satisfied_by(p, literal),
        None => true,
    }
}

fn conclusion_candidates(
    strategy: &Strategy,
    source: Option<&Position>,
    target: Option<&Position>,
    candidate_atoms: impl Iterator<Item = Proposition>,
) -> Vec<Literal> {
    let mut out = Vec::new();
    for atom in candidate_atoms {
        for &polarity in &[true, false] {
            let lit = Literal::new(atom, polarity);
            if stance_ok(strategy.source_stance, source, lit)
                && stance_ok(strategy.target_stance, target, lit)
            {
                out.push(lit);
            }
        }
    }
    out
}

/// Proposition levels for tree-like growth (§4.4): key statements are level
/// 0; a proposition already used as a conclusion takes that conclusion's
/// level; the premises of an argument take the conclusion's level plus one.
/// Atoms never reached by this propagation (not yet linked to a key
/// statement through any argument) are assigned one level past the deepest
/// reached level, so they remain selectable but are deprioritised.
pub fn proposition_levels(
    debate: &Debate,
    store: &ArgumentStore,
    key_statements: &BTreeSet<Proposition>,
) -> HashMap<Proposition, u32> {
    let mut level: HashMap<Proposition, u32> = key_statements.iter().map(|&p| (p, 0)).collect();

    let mut changed = true;
    let mut rounds = 0;
    let max_rounds = debate.argument_count() + 1;
    while changed && rounds <= max_rounds {
        changed = false;
        for &id in debate.arguments() {
            let argument = store.get(id);
            let Some(&concl_level) = level.get(&argument.conclusion().proposition()) else {
                continue;
            };
            for premise in argument.premises() {
                let candidate = concl_level + 1;
                match level.get(&premise.proposition()) {
                    Some(&existing) if existing <= candidate => {}
                    _ => {
                        level.insert(premise.proposition(), candidate);
                        changed = true;
                    }
                }
            }
        }
        rounds += 1;
    }

    let max_seen = level.values().copied().max().unwrap_or(0);
    for &atom in debate.atoms() {
        level.entry(atom).or_insert(max_seen + 1);
    }

    level
}

/// Usage counts of each proposition as a premise across `debate`'s
/// arguments, for the inverse-usage weighting of tree growth (§4.4).
pub(crate) fn premise_usage_counts(debate: &Debate, store: &ArgumentStore) -> HashMap<Proposition, u32> {
    let mut usage = HashMap::new();
    for &id in debate.arguments() {
        for premise in store.get(id).premises() {
            *usage.entry(premise.proposition()).or_insert(0) += 1;
        }
    }
    usage
}

/// The result of a successful introduction: the new debate stage and the id
/// of the argument that was appended.
pub struct Introduced {
    pub debate: Debate,
    pub argument: ArgumentId,
}

/// Propose and commit the next argument of `debate` under `strategy` and
/// `growth` (§4.4). `source`/`target` are consulted when the strategy's
/// `premises_from`/stance filters require them.
pub fn introduce(
    debate: &Debate,
    store: &mut ArgumentStore,
    strategy: &Strategy,
    growth: &GrowthMode,
    source: Option<&Position>,
    target: Option<&Position>,
    backend: &dyn ModelService,
    rng: &mut impl Rng,
) -> Result<Introduced, KernelError> {
    match growth {
        GrowthMode::Random { cardinality } => {
            introduce_random(debate, store, strategy, cardinality, source, target, backend, rng)
        }
        GrowthMode::Tree {
            cardinality,
            beta,
            gamma,
            key_statements,
        } => introduce_tree(
            debate,
            store,
            strategy,
            cardinality,
            *beta,
            *gamma,
            key_statements,
            source,
            target,
            backend,
            rng,
        ),
    }
}

fn try_commit(
    debate: &Debate,
    store: &mut ArgumentStore,
    premises: Vec<Literal>,
    conclusion: Literal,
    backend: &dyn ModelService,
) -> Option<Introduced> {
    let argument = Argument::new(premises, conclusion).ok()?;
    let mut formula = formula::compile(debate, store);
    formula.add_clause(argument.as_clause()).ok()?;
    if !backend.is_satisfiable(&formula).ok()? {
        return None;
    }
    let id = store.insert(argument);
    let new_debate = debate.with_argument(store, id);
    Some(Introduced {
        debate: new_debate,
        argument: id,
    })
}

#[allow(clippy::too_many_arguments)]
fn introduce_random(
    debate: &Debate,
    store: &mut ArgumentStore,
    strategy: &Strategy,
    cardinality: &PremiseCardinality,
    source: Option<&Position>,
    target: Option<&Position>,
    backend: &dyn ModelService,
    rng: &mut impl Rng,
) -> Result<Introduced, KernelError> {
    let atoms = debate.atoms().clone();
    let candidates = premise_candidates(strategy, source, target, &atoms);
    let weighted: Vec<(PremiseCandidate, f64)> = candidates.into_iter().map(|c| (c, 1.0)).collect();

    let mut seen: HashSet<Vec<Literal>> = HashSet::new();

    for _ in 0..MAX_INTRODUCTION_ATTEMPTS {
        let n = cardinality.sample(rng);
        if weighted.len() < n || n == 0 {
            break;
        }
        let picked = weighted_sample(&weighted, n, rng);
        let premise_atoms: BTreeSet<Proposition> = picked.iter().map(|c| c.atom).collect();
        let mut premises: Vec<Literal> = picked.into_iter().map(|c| resolve_polarity(c, rng)).collect();
        premises.sort();

        if debate.premises_used(&premises) || seen.contains(&premises) {
            seen.insert(premises);
            continue;
        }

        let remaining = atoms.iter().copied().filter(|a| !premise_atoms.contains(a));
        let conclusions = conclusion_candidates(strategy, source, target, remaining);
        if conclusions.is_empty() {
            seen.insert(premises);
            continue;
        }
        let conclusion = conclusions[rng.gen_range(0..conclusions.len())];

        match try_commit(debate, store, premises.clone(), conclusion, backend) {
            Some(introduced) => return Ok(introduced),
            None => {
                seen.insert(premises);
                continue;
            }
        }
    }

    Err(StrategyExhaustionError::PremisePoolExhausted.into())
}

#[allow(clippy::too_many_arguments)]
fn introduce_tree(
    debate: &Debate,
    store: &mut ArgumentStore,
    strategy: &Strategy,
    cardinality: &PremiseCardinality,
    beta: f64,
    gamma: f64,
    key_statements: &BTreeSet<Proposition>,
    source: Option<&Position>,
    target: Option<&Position>,
    backend: &dyn ModelService,
    rng: &mut impl Rng,
) -> Result<Introduced, KernelError> {
    let atoms = debate.atoms().clone();
    let levels = proposition_levels(debate, store, key_statements);
    let usage = premise_usage_counts(debate, store);

    let mut seen: HashSet<Vec<Literal>> = HashSet::new();

    for _ in 0..MAX_INTRODUCTION_ATTEMPTS {
        let conclusion_pool = conclusion_candidates(strategy, source, target, atoms.iter().copied());
        if conclusion_pool.is_empty() {
            break;
        }
        let weights: Vec<f64> = conclusion_pool
            .iter()
            .map(|lit| beta.powi(*levels.get(&lit.proposition()).unwrap_or(&0) as i32))
            .collect();
        let total: f64 = weights.iter().sum();
        let mut draw = rng.gen::<f64>() * total.max(f64::MIN_POSITIVE);
        let mut chosen_index = conclusion_pool.len() - 1;
        for (i, w) in weights.iter().enumerate() {
            if draw < *w {
                chosen_index = i;
                break;
            }
            draw -= w;
        }
        let conclusion = conclusion_pool[chosen_index];

        let n = cardinality.sample(rng);
        let premise_atoms: BTreeSet<Proposition> = atoms
            .iter()
            .copied()
            .filter(|&a| a != conclusion.proposition())
            .collect();
        let candidates = premise_candidates(strategy, source, target, &premise_atoms);
        let weighted: Vec<(PremiseCandidate, f64)> = candidates
            .into_iter()
            .map(|c| {
                let u = *usage.get(&c.atom).unwrap_or(&0);
                (c, gamma.powi(u as i32))
            })
            .collect();

        if weighted.len() < n || n == 0 {
            continue;
        }
        let picked = weighted_sample(&weighted, n, rng);
        let mut premises: Vec<Literal> = picked.into_iter().map(|c| resolve_polarity(c, rng)).collect();
        premises.sort();

        if debate.premises_used(&premises) || seen.contains(&premises) {
            seen.insert(premises);
            continue;
        }

        match try_commit(debate, store, premises.clone(), conclusion, backend) {
            Some(introduced) => return Ok(introduced),
            None => {
                seen.insert(premises);
                continue;
            }
        }
    }

    Err(StrategyExhaustionError::PremisePoolExhausted.into())
}
