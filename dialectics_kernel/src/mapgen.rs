//! The hierarchical argument-map generator (§4.6): produces a pre-built
//! debate whose argument map is a bounded-depth tree, for the fixed-debate
//! simulation flavour (§4.7).

use std::collections::BTreeSet;

use rand::Rng;

use crate::argument::Argument;
use crate::debate::{ArgumentStore, Debate};
use crate::error::KernelError;
use crate::formula::{self, ModelService};
use crate::introduction::{self, PremiseCandidate};
use crate::proposition::{Literal, Proposition, PropositionPool};

/// Configuration for [generate] (§4.6, §6 "Argument-map generator
/// configuration").
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct MapGeneratorConfig {
    /// Total number of propositions to create.
    pub proposition_count: usize,
    /// Number of key statements (level 0 for tree-growth weighting).
    pub key_statement_count: usize,
    /// Premise-count -> sampling weight.
    pub size_distribution: Vec<(usize, f64)>,
    /// β, the conclusion-level base.
    pub beta: f64,
    /// γ, the premise-usage base.
    pub gamma: f64,
    /// Stop once this many arguments have been committed.
    pub max_arguments: usize,
    /// Stop once the debate's density reaches this ceiling.
    pub max_density: f64,
}

const MAX_ATTEMPTS_PER_ARGUMENT: usize = 128;

/// Generate a fresh proposition pool of `config.proposition_count` atoms
/// named `p0, p1, ...` and a debate built over them per §4.6's algorithm.
pub fn generate(
    config: &MapGeneratorConfig,
    backend: &dyn ModelService,
    rng: &mut impl Rng,
) -> Result<(PropositionPool, Debate, ArgumentStore), KernelError> {
    let mut pool = PropositionPool::new();
    let atoms: Vec<Proposition> = (0..config.proposition_count)
        .map(|i| pool.intern(format!("p{i}")))
        .collect();

    let key_statements: BTreeSet<Proposition> = atoms
        .iter()
        .take(config.key_statement_count)
        .copied()
        .collect();

    let mut debate = Debate::empty();
    for &atom in &atoms {
        debate = debate.with_new_proposition(atom);
    }
    let mut store = ArgumentStore::new();

    loop {
        if debate.argument_count() >= config.max_arguments {
            break;
        }
        if !debate.atoms().is_empty() {
            let density = debate.density(&store, backend)?;
            if density >= config.max_density {
                break;
            }
        }

        match try_grow_one(config, &debate, &mut store, &key_statements, backend, rng) {
            Some(id) => {
                debate = debate.with_argument(&store, id);
            }
            None => break, // exhausted this round's attempt budget; stop growing
        }
    }

    Ok((pool, debate, store))
}

fn sample_cardinality(distribution: &[(usize, f64)], rng: &mut impl Rng) -> usize {
    let total: f64 = distribution.iter().map(|(_, w)| w).sum();
    if total <= 0.0 {
        return distribution.first().map(|(n, _)| *n).unwrap_or(1);
    }
    let mut draw = rng.gen::<f64>() * total;
    for &(n, w) in distribution {
        if draw < w {
            return n;
        }
        draw -= w;
    }
    distribution.last().map(|(n, _)| *n).unwrap_or(1)
}

fn try_grow_one(
    config: &MapGeneratorConfig,
    debate: &Debate,
    store: &mut ArgumentStore,
    key_statements: &BTreeSet<Proposition>,
    backend: &dyn ModelService,
    rng: &mut impl Rng,
) -> Option<crate::argument::ArgumentId> {
    let atoms = debate.atoms().clone();
    let levels = introduction::proposition_levels(debate, store, key_statements);

    for _ in 0..MAX_ATTEMPTS_PER_ARGUMENT {
        // Step 2: sample a conclusion weighted by beta^level over all
        // literal candidates.
        let conclusion_candidates: Vec<Literal> = atoms
            .iter()
            .flat_map(|&a| [Literal::new(a, true), Literal::new(a, false)])
            .collect();
        if conclusion_candidates.is_empty() {
            return None;
        }
        let weights: Vec<f64> = conclusion_candidates
            .iter()
            .map(|lit| config.beta.powi(*levels.get(&lit.proposition()).unwrap_or(&0) as i32))
            .collect();
        let total: f64 = weights.iter().sum();
        let mut draw = rng.gen::<f64>() * total.max(f64::MIN_POSITIVE);
        let mut idx = conclusion_candidates.len() - 1;
        for (i, w) in weights.iter().enumerate() {
            if draw < *w {
                idx = i;
                break;
            }
            draw -= w;
        }
        let conclusion = conclusion_candidates[idx];

        // Step 3 & 4: sample a premise count, then that many distinct
        // premise atoms (excluding the conclusion's atom), weighted by
        // gamma^usage.
        let n = sample_cardinality(&config.size_distribution, rng);
        let usage = introduction::premise_usage_counts(debate, store);
        let candidate_atoms: Vec<Proposition> = atoms
            .iter()
            .copied()
            .filter(|&a| a != conclusion.proposition())
            .collect();
        let weighted: Vec<(PremiseCandidate, f64)> = candidate_atoms
            .into_iter()
            .map(|atom| {
                let u = *usage.get(&atom).unwrap_or(&0);
                (
                    PremiseCandidate {
                        atom,
                        forced_polarity: None,
                    },
                    config.gamma.powi(u as i32),
                )
            })
            .collect();
        if weighted.len() < n || n == 0 {
            continue;
        }
        let picked = introduction::weighted_sample(&weighted, n, rng);
        let mut premises: Vec<Literal> = picked
            .into_iter()
            .map(|c| introduction::resolve_polarity(c, rng))
            .collect();
        premises.sort();

        if debate.premises_used(&premises) {
            continue;
        }

        // Step 5: verify satisfiability; commit or retry.
        let Ok(argument) = Argument::new(premises, conclusion) else {
            continue;
        };
        let mut formula = formula::compile(debate, store);
        if formula.add_clause(argument.as_clause()).is_err() {
            continue;
        }
        match backend.is_satisfiable(&formula) {
            Ok(true) => return Some(store.insert(argument)),
            _ => continue,
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::ExhaustiveBackend;
    use rand::SeedableRng;

    #[test]
    fn generate_respects_max_arguments() {
        let config = MapGeneratorConfig {
            proposition_count: 6,
            key_statement_count: 2,
            size_distribution: vec![(1, 0.5), (2, 0.5)],
            beta: 0.75,
            gamma: 0.75,
            max_arguments: 3,
            max_density: 0.99,
        };
        let backend = ExhaustiveBackend::default();
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);

        let (_pool, debate, _store) = generate(&config, &backend, &mut rng).unwrap();
        assert!(debate.argument_count() <= config.max_arguments);
    }
}
