//! Belief revision (§4.5): producing a new position for a debater whose
//! current position has fallen out of step with the debate (typically
//! because an argument was introduced that it does not accept).

use rand::Rng;

use crate::debate::{ArgumentStore, Debate};
use crate::error::{KernelError, SearchRadiusError};
use crate::formula::{Assignment, ModelService};
use crate::position::distance::{edit_distance, hamming_distance, EditWeights};
use crate::position::sccp::{self, Sccp};
use crate::position::{Position, Trit};
use crate::proposition::Proposition;

/// The three revision strategies of §4.5.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub enum RevisionStrategy {
    /// Discard the current position entirely and adopt a uniformly random
    /// complete coherent position (§4.5a).
    RandomRefit,

    /// Adopt the complete coherent position closest to the current one in
    /// Hamming distance, breaking ties uniformly at random (§4.5b).
    ClosestCoherent,

    /// A MaxSAT search over the current position's entries for the closest
    /// closed, coherent completion, bounding how many of a candidate
    /// model's differences from the position may be adopted at once
    /// (§4.5c).
    ClosestClosedPartialCoherent { search_radius: usize },
}

impl RevisionStrategy {
    /// Resolve a position's `update_strategy` tag to a strategy, defaulting
    /// `search_radius` for the partial-coherent variant since the tag alone
    /// does not carry one.
    pub fn builtin(tag: &str, default_search_radius: usize) -> Option<Self> {
        match tag {
            "random-refit" => Some(RevisionStrategy::RandomRefit),
            "closest-coherent" => Some(RevisionStrategy::ClosestCoherent),
            "closest-closed-partial-coherent" => Some(RevisionStrategy::ClosestClosedPartialCoherent {
                search_radius: default_search_radius,
            }),
            _ => None,
        }
    }
}

/// Revise `position` under `strategy` with respect to `debate` (§4.5).
pub fn revise(
    position: &Position,
    debate: &Debate,
    store: &ArgumentStore,
    backend: &dyn ModelService,
    strategy: &RevisionStrategy,
    rng: &mut impl Rng,
) -> Result<Position, KernelError> {
    match strategy {
        RevisionStrategy::RandomRefit => random_refit(position, debate, store, backend, rng),
        RevisionStrategy::ClosestCoherent => closest_coherent(position, debate, store, backend, rng),
        RevisionStrategy::ClosestClosedPartialCoherent { search_radius } => {
            closest_closed_partial_coherent(position, debate, store, backend, *search_radius, rng)
        }
    }
}

/// Carry `source`'s behavioural metadata onto `candidate`; every revision
/// strategy below rebuilds its result from a bare model or a mixed
/// assignment, neither of which knows the reviser's own strategy tags.
fn with_tags(mut candidate: Position, source: &Position) -> Position {
    candidate.introduction_strategy = source.introduction_strategy.clone();
    candidate.update_strategy = source.update_strategy.clone();
    candidate
}

/// §4.5a: if `position` is already coherent, keep it; otherwise uniformly
/// sample a complete coherent position of `debate`, i.e. a node of its SCCP.
fn random_refit(
    position: &Position,
    debate: &Debate,
    store: &ArgumentStore,
    backend: &dyn ModelService,
    rng: &mut impl Rng,
) -> Result<Position, KernelError> {
    if position.is_coherent(debate, store, backend)? {
        return Ok(position.clone());
    }
    let sccp = sccp::build(debate, store, backend)?;
    let picked = pick_uniform(&sccp, rng).ok_or(SearchRadiusError::NoCandidateAtZero)?;
    Ok(with_tags(picked, position))
}

fn pick_uniform(sccp: &Sccp, rng: &mut impl Rng) -> Option<Position> {
    if sccp.is_empty() {
        return None;
    }
    let idx = rng.gen_range(0..sccp.len());
    Some(sccp.positions()[idx].clone())
}

/// §4.5b: adopt the SCCP node at minimal Hamming distance from `position`;
/// ties are broken uniformly at random.
fn closest_coherent(
    position: &Position,
    debate: &Debate,
    store: &ArgumentStore,
    backend: &dyn ModelService,
    rng: &mut impl Rng,
) -> Result<Position, KernelError> {
    let sccp = sccp::build(debate, store, backend)?;
    if sccp.is_empty() {
        return Err(SearchRadiusError::NoCandidateAtZero.into());
    }

    let padded = pad_to(position, debate);
    let mut best_distance = u32::MAX;
    let mut best: Vec<&Position> = Vec::new();
    for candidate in sccp.positions() {
        let Some(distance) = hamming_distance(&padded, candidate) else {
            continue;
        };
        if distance < best_distance {
            best_distance = distance;
            best = vec![candidate];
        } else if distance == best_distance {
            best.push(candidate);
        }
    }

    if best.is_empty() {
        return Err(SearchRadiusError::NoCandidateAtZero.into());
    }
    let idx = rng.gen_range(0..best.len());
    Ok(with_tags(best[idx].clone(), position))
}

/// Fill in every atom of `debate` absent from `position` as suspended, so it
/// can be Hamming-compared against a complete SCCP node.
fn pad_to(position: &Position, debate: &Debate) -> Position {
    let mut padded = position.clone();
    for &atom in debate.atoms() {
        if padded.get(atom).is_none() {
            padded.set(atom, Trit::Suspended);
        }
    }
    padded
}

/// §4.5c: a MaxSAT search preserving as many of `position`'s entries as
/// possible. `d = 0` (i.e. `position` already closed and coherent) is
/// returned unchanged — the common case after a `new_sentence` event that
/// did not touch any argument `position` had already closed over. Otherwise,
/// starting from `k = |entries of position|`, at each iteration the backend
/// is asked for every model of `debate` agreeing with at least `k` of
/// `position`'s entries (§4.5, §6 "MaxSAT service"); each such model
/// contributes two kinds of candidate: the model itself (closed, though a
/// complete model is closed by construction), and, for every subset of its
/// differences from `position` up to `search_radius` in size, the mixed
/// assignment "`position` on the agreeing atoms ∪ the model on the chosen
/// differences", closed to completion. The closed, coherent candidate of
/// least edit distance to `position` across every iteration tried wins,
/// ties broken uniformly at random; `k` decrements to 0 before giving up, so
/// only an unsatisfiable debate can exhaust the search.
fn closest_closed_partial_coherent(
    position: &Position,
    debate: &Debate,
    store: &ArgumentStore,
    backend: &dyn ModelService,
    search_radius: usize,
    rng: &mut impl Rng,
) -> Result<Position, KernelError> {
    if position.is_closed(debate, store) && position.is_coherent(debate, store, backend)? {
        return Ok(position.clone());
    }

    let soft: Assignment = position
        .literals()
        .iter()
        .map(|lit| (lit.proposition(), lit.polarity()))
        .collect();
    let formula = crate::formula::compile(debate, store);

    let mut best_distance = f64::INFINITY;
    let mut best: Vec<Position> = Vec::new();
    let mut k = soft.len();

    loop {
        let models = backend.enumerate_models_at_least(&formula, &soft, k)?;
        for model in &models {
            for candidate in mixed_candidates(position, model, search_radius) {
                let Ok(closed) = candidate.close(debate, store, backend) else {
                    continue;
                };
                if !closed.is_coherent(debate, store, backend)? {
                    continue;
                }
                let distance = edit_distance(position, &closed, EditWeights::default());
                if distance < best_distance {
                    best_distance = distance;
                    best = vec![closed];
                } else if distance == best_distance {
                    best.push(closed);
                }
            }
        }

        if best_distance == 0.0 || k == 0 {
            break;
        }
        k -= 1;
    }

    if best.is_empty() {
        return Err(SearchRadiusError::NoCandidateAtZero.into());
    }
    let idx = rng.gen_range(0..best.len());
    Ok(with_tags(best.swap_remove(idx), position))
}

/// The candidates a single MaxSAT model `model` contributes at one
/// iteration: the model itself, plus "`position` on agreeing atoms ∪
/// `model` on a chosen subset of the differences" for every subset of the
/// differences up to `search_radius` in size.
fn mixed_candidates(position: &Position, model: &Assignment, search_radius: usize) -> Vec<Position> {
    let diffs: Vec<Proposition> = model
        .iter()
        .filter(|&(&atom, &value)| position.get(atom).and_then(|t| t.as_bool()) != Some(value))
        .map(|(&atom, _)| atom)
        .collect();

    let bound = diffs.len().min(search_radius);
    let mut candidates = Vec::with_capacity(1);
    for subset_size in 0..=bound {
        for subset in combinations(&diffs, subset_size) {
            let mut candidate = position.clone();
            for atom in subset {
                candidate.set(atom, Trit::from_bool(model[&atom]));
            }
            candidates.push(candidate);
        }
    }
    candidates.push(Position::from_assignment(model));
    candidates
}

/// Every `k`-element subset of `items`, order-preserving.
fn combinations(items: &[Proposition], k: usize) -> Vec<Vec<Proposition>> {
    if k == 0 {
        return vec![Vec::new()];
    }
    match items.split_first() {
        None => Vec::new(),
        Some((&first, rest)) => {
            let mut with_first = combinations(rest, k - 1);
            for combo in &mut with_first {
                combo.insert(0, first);
            }
            with_first.extend(combinations(rest, k));
            with_first
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::argument::Argument;
    use crate::formula::ExhaustiveBackend;
    use crate::proposition::{Literal, PropositionPool};
    use rand::SeedableRng;

    fn debate_p_and_q_implies_r(
        pool: &mut PropositionPool,
    ) -> (Debate, ArgumentStore, crate::proposition::Proposition, crate::proposition::Proposition, crate::proposition::Proposition)
    {
        let p0 = pool.intern("p0");
        let p1 = pool.intern("p1");
        let p2 = pool.intern("p2");
        let mut store = ArgumentStore::new();
        let arg = Argument::new(
            vec![Literal::positive(p0), Literal::positive(p1)],
            Literal::positive(p2),
        )
        .unwrap();
        let id = store.insert(arg);
        let debate = Debate::empty()
            .with_new_proposition(p0)
            .with_new_proposition(p1)
            .with_new_proposition(p2)
            .with_argument(&store, id);
        (debate, store, p0, p1, p2)
    }

    #[test]
    fn closest_coherent_repairs_incoherent_position() {
        let mut pool = PropositionPool::new();
        let (debate, store, p0, p1, p2) = debate_p_and_q_implies_r(&mut pool);
        let backend = ExhaustiveBackend::default();
        let mut rng = rand::rngs::StdRng::seed_from_u64(3);

        let mut pos = Position::new();
        pos.set(p0, Trit::True);
        pos.set(p1, Trit::True);
        pos.set(p2, Trit::False); // incoherent: p0 & p1 => p2

        let revised = closest_coherent(&pos, &debate, &store, &backend, &mut rng).unwrap();
        assert!(revised.is_coherent(&debate, &store, &backend).unwrap());
        assert!(revised.is_complete(&debate));
    }

    #[test]
    fn closest_closed_partial_coherent_finds_s3_closure_at_distance_one() {
        let mut pool = PropositionPool::new();
        let (debate, store, p0, p1, p2) = debate_p_and_q_implies_r(&mut pool);
        let backend = ExhaustiveBackend::default();
        let mut rng = rand::rngs::StdRng::seed_from_u64(4);

        let mut pos = Position::new();
        pos.set(p0, Trit::True);
        pos.set(p1, Trit::True);
        pos.set(p2, Trit::Suspended);

        let revised =
            closest_closed_partial_coherent(&pos, &debate, &store, &backend, 2, &mut rng).unwrap();
        assert!(revised.is_closed(&debate, &store));
        assert!(revised.is_coherent(&debate, &store, &backend).unwrap());
        assert_eq!(revised.get(p2), Some(Trit::True));
    }

    #[test]
    fn closest_closed_partial_coherent_at_radius_zero_closes_directly() {
        let mut pool = PropositionPool::new();
        let (debate, store, p0, p1, p2) = debate_p_and_q_implies_r(&mut pool);
        let backend = ExhaustiveBackend::default();
        let mut rng = rand::rngs::StdRng::seed_from_u64(5);

        let mut pos = Position::new();
        pos.set(p0, Trit::True);
        pos.set(p1, Trit::True);
        pos.set(p2, Trit::Suspended);

        // no diff-mixing budget at all: the only route to a closed,
        // coherent result is completing p2 directly from the sole model
        // that agrees with p0/p1's existing entries.
        let revised =
            closest_closed_partial_coherent(&pos, &debate, &store, &backend, 0, &mut rng).unwrap();
        assert!(revised.is_closed(&debate, &store));
        assert!(revised.is_coherent(&debate, &store, &backend).unwrap());
        assert_eq!(revised.get(p0), Some(Trit::True));
        assert_eq!(revised.get(p1), Some(Trit::True));
        assert_eq!(revised.get(p2), Some(Trit::True));
    }

    #[test]
    fn random_refit_keeps_an_already_coherent_position_unchanged() {
        let mut pool = PropositionPool::new();
        let (debate, store, p0, p1, p2) = debate_p_and_q_implies_r(&mut pool);
        let backend = ExhaustiveBackend::default();
        let mut rng = rand::rngs::StdRng::seed_from_u64(11);

        let mut pos = Position::new();
        pos.set(p0, Trit::True);
        pos.set(p1, Trit::False);
        pos.set(p2, Trit::True);
        pos.introduction_strategy = vec!["fortify".to_string()];

        let refit = random_refit(&pos, &debate, &store, &backend, &mut rng).unwrap();
        assert_eq!(refit.get(p0), pos.get(p0));
        assert_eq!(refit.get(p1), pos.get(p1));
        assert_eq!(refit.get(p2), pos.get(p2));
        assert_eq!(refit.introduction_strategy, pos.introduction_strategy);
    }

    #[test]
    fn random_refit_resamples_an_incoherent_position() {
        let mut pool = PropositionPool::new();
        let (debate, store, p0, p1, p2) = debate_p_and_q_implies_r(&mut pool);
        let backend = ExhaustiveBackend::default();
        let mut rng = rand::rngs::StdRng::seed_from_u64(12);

        let mut pos = Position::new();
        pos.set(p0, Trit::True);
        pos.set(p1, Trit::True);
        pos.set(p2, Trit::False); // incoherent: p0 & p1 => p2
        pos.update_strategy = Some("random-refit".to_string());

        let refit = random_refit(&pos, &debate, &store, &backend, &mut rng).unwrap();
        assert!(refit.is_complete(&debate));
        assert!(refit.is_coherent(&debate, &store, &backend).unwrap());
        assert_eq!(refit.update_strategy, pos.update_strategy);
    }
}
