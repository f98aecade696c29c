//! Intervention unlocking, confirmation gate and resolution
//!
//! A choice either resolves immediately or is held by the confirmation gate
//! until the player confirms or cancels. While a choice is held, choosing a
//! different intervention retargets the hold and choosing the same one only
//! repeats the prompt. Resolution classifies the outcome from evidence and
//! then forces `bad` on any risk or threat breach.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use casefile_core::case::{Endings, Intervention, Rules};

use super::feed::{SYSTEM, divider, tag};
use super::narrator::NARRATOR;
use super::state::{GameState, PendingIntervention, Screen};

/// Advisory queued on the first gate hit since the gate was armed.
pub const GATE_ADVISORY: &str =
    "You can proceed if you wish.\nBut understand: this path is difficult to undo.";

/// Queued on every later gate hit.
pub const GATE_REPEAT: &str = "Proceed, then.";

/// Queued when a held choice is replaced by another.
pub const RETARGET_NOTICE: &str = "Changed. Noted.";

/// Ending text when the intervention authored neither the selected ending
/// nor a neutral one.
pub const FALLBACK_ENDING: &str = "Outcome unknown.";

/// Outcome classification key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// Well evidenced and quiet
    Good,
    /// Thin evidence, or a risk/threat breach
    Bad,
    /// Anything in between
    Neutral,
}

impl Outcome {
    /// Lowercase key as used in case files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Bad => "bad",
            Self::Neutral => "neutral",
        }
    }

    /// Classifies a resolution.
    ///
    /// Evidence picks the initial key; a risk or threat breach then forces
    /// `bad` regardless of evidence.
    #[must_use]
    pub const fn classify(evidence: usize, risk: u32, threat: i32, rules: &Rules) -> Self {
        let mut outcome = Self::Neutral;
        if evidence >= rules.good_evidence_threshold {
            outcome = Self::Good;
        }
        if evidence <= rules.bad_evidence_threshold {
            outcome = Self::Bad;
        }
        if risk >= rules.high_risk_threshold || threat >= rules.high_threat_threshold {
            outcome = Self::Bad;
        }
        outcome
    }

    /// Picks the ending for this outcome, falling back to the neutral ending
    /// and then to [`FALLBACK_ENDING`].
    #[must_use]
    pub fn select_ending(self, endings: &Endings) -> String {
        let authored = match self {
            Self::Good => endings.good.as_ref(),
            Self::Bad => endings.bad.as_ref(),
            Self::Neutral => endings.neutral.as_ref(),
        };
        authored
            .or(endings.neutral.as_ref())
            .map_or_else(|| FALLBACK_ENDING.to_string(), Clone::clone)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summary recorded when a case resolves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSummary {
    /// Resolved intervention id
    pub intervention_id: String,
    /// Resolved intervention title
    pub title: String,
    /// Classified outcome
    pub outcome: Outcome,
    /// Selected ending text
    pub ending_text: String,
    /// Tag count at resolution
    pub evidence: usize,
    /// Risk after the intervention's own exposure
    pub risk: u32,
    /// Threat after the intervention's own adjustment
    pub threat: i32,
}

/// An intervention annotated with its unlock state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterventionStatus {
    /// Intervention id
    pub id: String,
    /// Intervention title
    pub title: String,
    /// Exposure the intervention adds
    pub risk: u32,
    /// Phase has reached the case's intervention phase
    pub globally_unlocked: bool,
    /// Globally unlocked, own phase reached and requirement met
    pub unlocked: bool,
}

impl GameState {
    /// Maps every intervention of the case to its unlock state.
    #[must_use]
    pub fn interventions_unlocked(&self) -> Vec<InterventionStatus> {
        let Some(case) = self.case.as_ref() else {
            return Vec::new();
        };
        case.definition
            .interventions
            .iter()
            .map(|intervention| {
                let globally_unlocked = self.phase >= case.rules.intervention_phase;
                InterventionStatus {
                    id: intervention.id.clone(),
                    title: intervention.title.clone(),
                    risk: intervention.risk,
                    globally_unlocked,
                    unlocked: globally_unlocked && self.requirements_met(intervention),
                }
            })
            .collect()
    }

    /// Chooses an intervention, resolving it unless the confirmation gate
    /// holds it.
    pub fn choose_intervention(&mut self, intervention_id: &str) {
        if self.screen != Screen::Case {
            debug!(intervention_id, "intervention ignored outside case screen");
            return;
        }
        let Some(case) = self.case.clone() else {
            return;
        };
        let Some(intervention) = case.definition.intervention(intervention_id) else {
            debug!(intervention_id, "unknown intervention ignored");
            return;
        };
        if self.phase < case.rules.intervention_phase || !self.requirements_met(intervention) {
            debug!(intervention_id, phase = self.phase, "locked intervention ignored");
            return;
        }

        if let Some(pending_id) = self.pending.as_ref().map(|p| p.id.clone()) {
            if pending_id == intervention.id {
                self.feed.push(NARRATOR, GATE_REPEAT, tag::CHAT);
            } else {
                self.hold(intervention);
                self.feed.push(NARRATOR, RETARGET_NOTICE, tag::CHAT);
            }
            return;
        }

        let gated = self.tags.len() <= case.rules.confirm_evidence_threshold
            || intervention.risk >= case.rules.confirm_risk_threshold;
        if !gated {
            self.resolve_intervention(intervention_id);
            return;
        }

        self.hold(intervention);
        // Confirm, cancel and resolve clear the flag together with `pending`,
        // so with nothing held this branch only runs if that pairing breaks.
        if self.confirm_advisory_shown {
            self.feed.push(NARRATOR, GATE_REPEAT, tag::CHAT);
        } else {
            self.feed.push(NARRATOR, GATE_ADVISORY, tag::CHAT);
            self.confirm_advisory_shown = true;
        }
    }

    /// Resolves the held intervention, bypassing the gate.
    pub fn confirm_intervention(&mut self) {
        if self.screen != Screen::Case {
            return;
        }
        let Some(pending) = self.pending.take() else {
            debug!("confirm ignored with nothing pending");
            return;
        };
        self.confirm_advisory_shown = false;
        self.resolve_intervention(&pending.id);
    }

    /// Releases the held intervention and re-arms the gate.
    pub fn cancel_intervention(&mut self) {
        if self.pending.take().is_some() {
            self.confirm_advisory_shown = false;
            debug!("held intervention cancelled");
        }
    }

    fn hold(&mut self, intervention: &Intervention) {
        info!(intervention_id = %intervention.id, "intervention held for confirmation");
        self.pending = Some(PendingIntervention {
            id: intervention.id.clone(),
            title: intervention.title.clone(),
        });
    }

    fn requirements_met(&self, intervention: &Intervention) -> bool {
        if intervention.min_phase > self.phase {
            return false;
        }
        intervention
            .requires
            .as_ref()
            .is_none_or(|req| req.is_met(|t| self.tags.contains(t)))
    }

    fn resolve_intervention(&mut self, intervention_id: &str) {
        let Some(case) = self.case.clone() else {
            return;
        };
        let Some(intervention) = case.definition.intervention(intervention_id) else {
            return;
        };

        self.risk = self.risk.saturating_add(intervention.risk);
        self.bump_threat(intervention.threat_delta);

        let evidence = self.tags.len();
        let outcome = Outcome::classify(evidence, self.risk, self.threat, &case.rules);
        let ending_text = outcome.select_ending(&intervention.endings);

        self.screen = Screen::Results;
        self.pending = None;
        self.feed.push_divider(divider::ARCHIVED);
        self.feed.push(SYSTEM, ending_text.clone(), tag::CASE);
        for line in &case.definition.epilogue_feed {
            self.echo_line(line, tag::CHAT);
        }

        info!(
            intervention_id,
            %outcome,
            evidence,
            risk = self.risk,
            threat = self.threat,
            "case resolved"
        );
        self.result = Some(ResultSummary {
            intervention_id: intervention.id.clone(),
            title: intervention.title.clone(),
            outcome,
            ending_text,
            evidence,
            risk: self.risk,
            threat: self.threat,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::feed::FeedEntry;
    use crate::engine::testing::case_from_yaml;

    fn rules() -> Rules {
        Rules::default()
    }

    #[test]
    fn test_classify_by_evidence() {
        let r = rules();
        assert_eq!(Outcome::classify(10, 0, 50, &r), Outcome::Good);
        assert_eq!(Outcome::classify(4, 0, 50, &r), Outcome::Bad);
        assert_eq!(Outcome::classify(7, 0, 50, &r), Outcome::Neutral);
    }

    #[test]
    fn test_breach_overrides_good_evidence() {
        let r = rules();
        assert_eq!(Outcome::classify(12, 8, 50, &r), Outcome::Bad);
        assert_eq!(Outcome::classify(12, 0, 85, &r), Outcome::Bad);
        assert_eq!(Outcome::classify(12, 6, 84, &r), Outcome::Good);
    }

    #[test]
    fn test_ending_fallback_chain() {
        let full = Endings {
            good: Some("g".into()),
            bad: None,
            neutral: Some("n".into()),
        };
        assert_eq!(Outcome::Good.select_ending(&full), "g");
        assert_eq!(Outcome::Bad.select_ending(&full), "n");
        assert_eq!(Outcome::Bad.select_ending(&Endings::default()), FALLBACK_ENDING);
    }

    const GATED: &str = r#"
id: gated
title: Gated
openingFeed: []
briefing: Go.
rules: { interventionPhase: 1 }
epilogueFeed:
  - { who: VOSS, text: "We're done here." }
leads:
  - { id: a, title: A, resultText: a, tags: [badge, ledger, van] }
interventions:
  - id: raid
    title: Raid the site
    risk: 3
    endings: { good: "Clean.", bad: "Loud.", neutral: "Quiet." }
  - id: watch
    title: Keep watching
    risk: 1
    requires: { any: [van] }
    endings: { neutral: "Watched." }
  - id: arrest
    title: Arrest
    minPhase: 2
"#;

    fn gated_state() -> GameState {
        let mut state = GameState::new();
        state.start_case(case_from_yaml(GATED));
        state.enter_case();
        state.flush_all(usize::MAX);
        state
    }

    fn chat_lines(state: &GameState) -> Vec<String> {
        state
            .feed()
            .queued()
            .filter_map(|e| match e {
                FeedEntry::Message { who, text, .. } if who == NARRATOR => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_unlock_status() {
        let mut state = gated_state();
        let status = state.interventions_unlocked();
        assert!(status.iter().all(|s| s.globally_unlocked));
        assert!(status[0].unlocked);
        assert!(!status[1].unlocked, "requires van");
        assert!(!status[2].unlocked, "own minPhase");

        state.apply_lead("a");
        assert!(state.interventions_unlocked()[1].unlocked);
    }

    #[test]
    fn test_locked_choice_is_silent() {
        let mut state = gated_state();
        state.choose_intervention("watch");
        state.choose_intervention("arrest");
        state.choose_intervention("missing");
        assert!(state.pending_intervention().is_none());
        assert_eq!(state.feed().queued_len(), 0);
    }

    #[test]
    fn test_gate_shows_long_advisory_once() {
        let mut state = gated_state();
        state.choose_intervention("raid");
        state.choose_intervention("raid");
        state.choose_intervention("raid");

        assert_eq!(state.screen(), Screen::Case);
        assert_eq!(state.pending_intervention().unwrap().id, "raid");
        assert_eq!(chat_lines(&state), [GATE_ADVISORY, GATE_REPEAT, GATE_REPEAT]);
    }

    #[test]
    fn test_retarget_replaces_pending() {
        let mut state = gated_state();
        state.apply_lead("a");
        state.flush_all(usize::MAX);
        state.choose_intervention("raid");
        state.choose_intervention("watch");

        assert_eq!(state.pending_intervention().unwrap().id, "watch");
        assert_eq!(chat_lines(&state), [GATE_ADVISORY, RETARGET_NOTICE]);
        assert_eq!(state.screen(), Screen::Case);
    }

    #[test]
    fn test_cancel_rearms_long_advisory() {
        let mut state = gated_state();
        state.choose_intervention("raid");
        state.cancel_intervention();
        assert!(state.pending_intervention().is_none());
        assert!(!state.confirm_advisory_shown());

        state.choose_intervention("raid");
        assert_eq!(chat_lines(&state), [GATE_ADVISORY, GATE_ADVISORY]);
    }

    #[test]
    fn test_advisory_flag_follows_pending() {
        let mut state = gated_state();
        assert!(!state.confirm_advisory_shown());

        state.choose_intervention("raid");
        assert!(state.pending_intervention().is_some());
        assert!(state.confirm_advisory_shown());

        state.cancel_intervention();
        assert!(state.pending_intervention().is_none());
        assert!(!state.confirm_advisory_shown());

        state.choose_intervention("raid");
        state.confirm_intervention();
        assert!(state.pending_intervention().is_none());
        assert!(!state.confirm_advisory_shown());
    }

    #[test]
    fn test_confirm_resolves_pending() {
        let mut state = gated_state();
        state.choose_intervention("raid");
        state.confirm_intervention();

        assert_eq!(state.screen(), Screen::Results);
        assert!(state.pending_intervention().is_none());
        let result = state.result().unwrap();
        assert_eq!(result.intervention_id, "raid");
        assert_eq!(result.outcome, Outcome::Bad);
        assert_eq!(result.ending_text, "Loud.");
        assert_eq!(result.risk, 3);

        let queued: Vec<FeedEntry> = state.feed().queued().cloned().collect();
        let tail = &queued[queued.len() - 3..];
        assert_eq!(tail[0], FeedEntry::divider(divider::ARCHIVED));
        assert_eq!(tail[1], FeedEntry::message(SYSTEM, "Loud.", tag::CASE));
        assert_eq!(tail[2], FeedEntry::message("VOSS", "We're done here.", tag::CHAT));
    }

    #[test]
    fn test_confirm_without_pending_is_noop() {
        let mut state = gated_state();
        state.confirm_intervention();
        assert_eq!(state.screen(), Screen::Case);
        assert!(state.result().is_none());
    }

    #[test]
    fn test_ungated_choice_resolves_immediately() {
        let mut state = gated_state();
        state.apply_lead("a");
        state.choose_intervention("watch");

        assert_eq!(state.screen(), Screen::Results);
        assert!(!state.confirm_advisory_shown());
        let result = state.result().unwrap();
        assert_eq!(result.evidence, 3);
        assert_eq!(result.outcome, Outcome::Bad);
        assert_eq!(result.ending_text, "Watched.");
    }
}
