//! The trace: the record a simulation run produces (§6 "Interfaces produced
//! by the core").
//!
//! A trace is two parallel, append-only sequences — stages and populations —
//! plus a human-readable decision log. Analysis collaborators (excluded from
//! the core, §1) consume `stages()`/`populations()` directly; the decision
//! log is for humans reading a run back (`dialectics_cli` prints it).

use crate::debate::Debate;
use crate::position::Position;

/// One entry of the human-readable decision log.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub enum Decision {
    ArgumentIntroduced {
        step: usize,
        strategy: String,
    },
    IntroductionRetried {
        step: usize,
        attempt: usize,
        reason: String,
    },
    IntroductionFailed {
        step: usize,
        reason: String,
    },
    NewSentence {
        step: usize,
    },
    RevisionOutcome {
        step: usize,
        position_index: usize,
        outcome: String,
    },
    Terminated {
        step: usize,
        reason: String,
    },
}

/// The ordered record of a simulation run: parallel stage/population
/// sequences plus the decision log (§6).
#[derive(Clone, Debug, Default)]
pub struct Trace {
    stages: Vec<Debate>,
    populations: Vec<Vec<Position>>,
    decisions: Vec<Decision>,
}

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a (stage, population) pair. Stages and populations must stay
    /// in lockstep (§5 "Ordering guarantees"): every call appends to both.
    pub fn push(&mut self, stage: Debate, population: Vec<Position>) {
        self.stages.push(stage);
        self.populations.push(population);
    }

    pub fn record(&mut self, decision: Decision) {
        log_decision(&decision);
        self.decisions.push(decision);
    }

    pub fn stages(&self) -> &[Debate] {
        &self.stages
    }

    pub fn populations(&self) -> &[Vec<Position>] {
        &self.populations
    }

    pub fn decisions(&self) -> &[Decision] {
        &self.decisions
    }

    pub fn current_stage(&self) -> Option<&Debate> {
        self.stages.last()
    }

    pub fn current_population(&self) -> Option<&[Position]> {
        self.populations.last().map(Vec::as_slice)
    }

    pub fn step_count(&self) -> usize {
        self.stages.len().saturating_sub(1)
    }
}

fn log_decision(decision: &Decision) {
    match decision {
        Decision::ArgumentIntroduced { step, strategy } => {
            log::debug!("step {step}: argument introduced under strategy `{strategy}`");
        }
        Decision::IntroductionRetried { step, attempt, reason } => {
            log::trace!("step {step}: introduction retry #{attempt}: {reason}");
        }
        Decision::IntroductionFailed { step, reason } => {
            log::warn!("step {step}: introduction failed: {reason}");
        }
        Decision::NewSentence { step } => {
            log::debug!("step {step}: new sentence introduced");
        }
        Decision::RevisionOutcome {
            step,
            position_index,
            outcome,
        } => {
            log::trace!("step {step}: position {position_index} revised: {outcome}");
        }
        Decision::Terminated { step, reason } => {
            log::info!("step {step}: run terminated: {reason}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::debate::Debate;

    #[test]
    fn push_keeps_stages_and_populations_in_lockstep() {
        let mut trace = Trace::new();
        trace.push(Debate::empty(), Vec::new());
        trace.push(Debate::empty(), vec![Position::new()]);
        assert_eq!(trace.stages().len(), trace.populations().len());
        assert_eq!(trace.step_count(), 1);
    }

    #[test]
    fn record_appends_to_decision_log() {
        let mut trace = Trace::new();
        trace.record(Decision::NewSentence { step: 0 });
        assert_eq!(trace.decisions().len(), 1);
    }
}
