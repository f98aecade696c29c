//! Read-only run projection for the rendering collaborator

use serde::Serialize;

use casefile_core::case::TeamMember;

use super::dossier::DossierView;
use super::feed::FeedEntry;
use super::intervention::{InterventionStatus, ResultSummary};
use super::leads::LeadStatus;
use super::state::{Clue, GameState, PendingIntervention, Screen, Tabs};

/// Everything a renderer needs to draw one frame.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunView<'a> {
    /// Current screen
    pub screen: Screen,
    /// Installed case id
    pub case_id: Option<&'a str>,
    /// Installed case title
    pub case_title: Option<&'a str>,
    /// Current phase, 0 with no case
    pub phase: u32,
    /// Pulls spent this run
    pub pulls_used: u32,
    /// Pull budget for this run
    pub pulls_max: u32,
    /// Accumulated exposure
    pub risk: u32,
    /// Current threat, within the clamp range
    pub threat: i32,
    /// Evidence tags in capture order
    pub tags: Vec<&'a str>,
    /// Clues in pull order
    pub clues: &'a [Clue],
    /// Entries already shown, oldest first
    pub feed: &'a [FeedEntry],
    /// Entries still waiting in the queue
    pub queued: usize,
    /// Whether the pacing tick drains the queue
    pub autoplay: bool,
    /// Active panel tabs
    pub tabs: Tabs,
    /// Dossier projected at the current phase
    pub dossier: Option<&'a DossierView>,
    /// Intervention held by the confirmation gate
    pub pending: Option<&'a PendingIntervention>,
    /// Leads visible at the current phase
    pub leads: Vec<LeadStatus>,
    /// Interventions with their unlock status
    pub interventions: Vec<InterventionStatus>,
    /// Case team roster
    pub team: &'a [TeamMember],
    /// Asset line, if authored
    pub asset: Option<&'a str>,
    /// Protocol line, if authored
    pub protocol: Option<&'a str>,
    /// Resolution summary on the results screen
    pub result: Option<&'a ResultSummary>,
}

impl GameState {
    /// Builds the read-only projection of this run.
    #[must_use]
    pub fn view(&self) -> RunView<'_> {
        let definition = self.case.as_ref().map(|case| &case.definition);
        RunView {
            screen: self.screen,
            case_id: definition.map(|d| d.id.as_str()),
            case_title: definition.map(|d| d.title.as_str()),
            phase: self.phase,
            pulls_used: self.pulls_used,
            pulls_max: self.pulls_max,
            risk: self.risk,
            threat: self.threat,
            tags: self.tags.iter().map(String::as_str).collect(),
            clues: &self.clues,
            feed: self.feed.visible(),
            queued: self.feed.queued_len(),
            autoplay: self.autoplay,
            tabs: self.tabs,
            dossier: self.dossier.as_ref(),
            pending: self.pending.as_ref(),
            leads: self.available_leads(),
            interventions: self.interventions_unlocked(),
            team: definition.map_or(&[], |d| d.team.as_slice()),
            asset: definition.and_then(|d| d.asset.as_deref()),
            protocol: definition.and_then(|d| d.protocol.as_deref()),
            result: self.result.as_ref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testing::sample_case;

    #[test]
    fn test_home_view_is_empty() {
        let state = GameState::new();
        let view = state.view();
        assert_eq!(view.screen, Screen::Home);
        assert!(view.case_id.is_none());
        assert!(view.leads.is_empty());
        assert!(view.team.is_empty());
    }

    #[test]
    fn test_view_serializes_camel_case() {
        let mut state = GameState::new();
        state.start_case(sample_case());
        state.enter_case();
        state.flush_one();

        let json = serde_json::to_value(state.view()).unwrap();
        assert_eq!(json["screen"], "case");
        assert_eq!(json["caseId"], "night-shift");
        assert_eq!(json["pullsMax"], 6);
        assert_eq!(json["feed"].as_array().unwrap().len(), 1);
        assert_eq!(json["tabs"]["left"], "dossier");
        assert_eq!(json["leads"][0]["id"], "records");
    }
}
