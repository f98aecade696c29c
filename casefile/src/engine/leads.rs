//! Lead resolution
//!
//! Invalid targets are silent no-ops: nothing changes and nothing is queued.
//! The reason is only visible at `debug` level.

use serde::Serialize;
use tracing::debug;

use super::feed::{SYSTEM, divider, tag};
use super::narrator::Advisory;
use super::phase::PhaseTransition;
use super::state::{Clue, GameState, Screen};

/// Follow-on effects of one successful pull.
///
/// Empty when the pull was refused.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PullReport {
    /// Phase changes, in trigger table order
    pub transitions: Vec<PhaseTransition>,
    /// Advisories issued, in priority order
    pub advisories: Vec<Advisory>,
}

/// A lead as listed on the actions panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadStatus {
    /// Lead id
    pub id: String,
    /// Lead title
    pub title: String,
    /// Exposure the lead adds
    pub risk: u32,
    /// Whether the lead was already pulled this run
    pub used: bool,
}

/// Why a lead pull was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Refusal {
    WrongScreen,
    UnknownLead,
    PhaseGated,
    AlreadyUsed,
    OutOfPulls,
}

impl GameState {
    /// Pulls the lead `lead_id`.
    ///
    /// Requires the case screen, a known lead visible at the current phase,
    /// not already pulled, and a pull remaining. On success the phase
    /// evaluator, the narrator and the dossier projection run in that order,
    /// and the report says what the first two produced.
    pub fn apply_lead(&mut self, lead_id: &str) -> PullReport {
        if let Err(refusal) = self.check_lead(lead_id) {
            debug!(lead_id, ?refusal, "lead pull ignored");
            return PullReport::default();
        }
        let Some(case) = self.case.clone() else {
            return PullReport::default();
        };
        let Some(lead) = case.definition.lead(lead_id) else {
            return PullReport::default();
        };

        self.used_leads.insert(lead.id.clone());
        self.pulls_used += 1;
        self.risk = self.risk.saturating_add(lead.risk);
        self.bump_threat(lead.threat_delta);

        self.feed.push_divider(divider::NEW_DATA);
        let readout_tag = if lead.risk > 0 { tag::NOISY } else { tag::QUIET };
        self.feed.push(
            SYSTEM,
            format!("{}\n{}", lead.title, lead.result_text),
            readout_tag,
        );

        self.clues.push(Clue {
            lead_id: lead.id.clone(),
            title: lead.clue_title.clone().unwrap_or_else(|| lead.title.clone()),
            text: lead
                .clue_text
                .clone()
                .unwrap_or_else(|| lead.result_text.clone()),
            tags: lead.tags.clone(),
        });
        self.capture_tags(&lead.tags);

        if let Some(reaction) = &lead.reaction {
            self.echo_line(reaction, tag::CHAT);
        }

        debug!(
            lead_id,
            pulls_used = self.pulls_used,
            risk = self.risk,
            threat = self.threat,
            tags = self.tags.len(),
            "lead pulled"
        );

        let transitions = self.evaluate_phase();
        let advisories = self.run_narrator();
        self.refresh_dossier();
        PullReport {
            transitions,
            advisories,
        }
    }

    /// Leads visible at the current phase, in authored order.
    #[must_use]
    pub fn available_leads(&self) -> Vec<LeadStatus> {
        let Some(case) = self.case.as_ref() else {
            return Vec::new();
        };
        case.definition
            .leads
            .iter()
            .filter(|lead| lead.min_phase <= self.phase)
            .map(|lead| LeadStatus {
                id: lead.id.clone(),
                title: lead.title.clone(),
                risk: lead.risk,
                used: self.used_leads.contains(&lead.id),
            })
            .collect()
    }

    fn check_lead(&self, lead_id: &str) -> Result<(), Refusal> {
        if self.screen != Screen::Case {
            return Err(Refusal::WrongScreen);
        }
        let lead = self
            .case
            .as_ref()
            .and_then(|case| case.definition.lead(lead_id))
            .ok_or(Refusal::UnknownLead)?;
        if lead.min_phase > self.phase {
            return Err(Refusal::PhaseGated);
        }
        if self.used_leads.contains(lead_id) {
            return Err(Refusal::AlreadyUsed);
        }
        if self.pulls_used >= self.pulls_max {
            return Err(Refusal::OutOfPulls);
        }
        Ok(())
    }
}
