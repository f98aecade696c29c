//! Phase evaluation
//!
//! Phase advancement is driven entirely by the authored trigger table. A
//! trigger fires when the pull count equals `atPull` and the run is in
//! `fromPhase`. Every trigger is checked against the phase the pass started
//! in, so a firing trigger can never enable another one within the same pass.

use tracing::info;

use casefile_core::case::PhaseTrigger;

use super::feed::tag;
use super::state::GameState;

/// A phase change produced by one evaluation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseTransition {
    /// Phase before the trigger fired
    pub from_phase: u32,
    /// Phase after the trigger fired
    pub to_phase: u32,
    /// Pull count that fired the trigger
    pub at_pull: u32,
}

/// Result of evaluating a single trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerResult {
    /// Trigger conditions hold
    Fired,
    /// Trigger conditions not met
    NotMet,
}

/// Evaluates one trigger against a pull count and phase.
#[must_use]
pub const fn evaluate(trigger: &PhaseTrigger, pulls_used: u32, phase: u32) -> TriggerResult {
    if trigger.at_pull == pulls_used && trigger.from_phase == phase {
        TriggerResult::Fired
    } else {
        TriggerResult::NotMet
    }
}

impl GameState {
    /// Runs one pass over the trigger table, applying every trigger that
    /// fires.
    ///
    /// Returns the transitions in authored order.
    pub(super) fn evaluate_phase(&mut self) -> Vec<PhaseTransition> {
        let Some(case) = self.case.clone() else {
            return Vec::new();
        };

        let snapshot = self.phase;
        let pulls_used = self.pulls_used;
        let mut transitions = Vec::new();

        for trigger in &case.definition.phase_triggers {
            if evaluate(trigger, pulls_used, snapshot) == TriggerResult::NotMet {
                continue;
            }

            let from_phase = self.phase;
            self.phase = self.phase.max(trigger.to_phase);

            if let Some(label) = &trigger.divider {
                self.feed.push_divider(label.clone());
            }
            for line in &trigger.messages {
                self.echo_line(line, tag::ALERT);
            }
            if let Some(delta) = trigger.threat_delta {
                self.bump_threat(delta);
            }
            if let Some(delta) = trigger.risk_delta {
                self.risk = self.risk.saturating_add(delta);
            }

            info!(
                from_phase,
                to_phase = self.phase,
                at_pull = trigger.at_pull,
                threat = self.threat,
                risk = self.risk,
                "phase advanced"
            );
            transitions.push(PhaseTransition {
                from_phase,
                to_phase: self.phase,
                at_pull: trigger.at_pull,
            });
        }

        transitions
    }
}
