//! Run state
//!
//! [`GameState`] is owned exclusively by one session. Its fields are private:
//! every mutation goes through the engine operations so the run invariants
//! (bounded pulls, clamped threat, append-only sets, monotonic phase) cannot
//! be broken from outside.

use std::collections::BTreeSet;
use std::sync::Arc;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use casefile_core::case::Case;

use super::dossier::DossierView;
use super::feed::{Feed, FeedEntry};
use super::intervention::ResultSummary;
use super::narrator::Advisory;

/// Which screen the run is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Screen {
    /// Case selection
    #[default]
    Home,
    /// Opening sequence, before the player enters the case
    Boot,
    /// Active investigation
    Case,
    /// Case resolved
    Results,
}

/// Left panel tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeftTab {
    /// Dossier projection
    #[default]
    Dossier,
    /// Captured clues
    Clues,
}

/// Right panel tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RightTab {
    /// Leads and interventions
    #[default]
    Actions,
    /// Team roster
    Team,
    /// Asset briefing
    Asset,
    /// Observer protocol
    Protocol,
}

/// A tab selection from the rendering collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Tab {
    /// Select a left panel tab
    Left(LeftTab),
    /// Select a right panel tab
    Right(RightTab),
}

/// Active tab per panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Tabs {
    /// Left panel
    pub left: LeftTab,
    /// Right panel
    pub right: RightTab,
}

/// A clue captured from a pulled lead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Clue {
    /// Lead the clue came from
    pub lead_id: String,
    /// Clue title
    pub title: String,
    /// Clue text
    pub text: String,
    /// Tags the lead contributed
    pub tags: Vec<String>,
}

/// The intervention held by the confirmation gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingIntervention {
    /// Intervention id
    pub id: String,
    /// Intervention title
    pub title: String,
}

/// Mutable state of one run.
#[derive(Debug, Clone, Default)]
pub struct GameState {
    pub(super) screen: Screen,
    pub(super) case: Option<Arc<Case>>,
    pub(super) phase: u32,
    pub(super) pulls_used: u32,
    pub(super) pulls_max: u32,
    pub(super) risk: u32,
    pub(super) threat: i32,
    pub(super) used_leads: IndexSet<String>,
    pub(super) tags: IndexSet<String>,
    pub(super) clues: Vec<Clue>,
    pub(super) pending: Option<PendingIntervention>,
    pub(super) advisories: BTreeSet<Advisory>,
    pub(super) confirm_advisory_shown: bool,
    pub(super) feed: Feed,
    pub(super) autoplay: bool,
    pub(super) tabs: Tabs,
    pub(super) dossier: Option<DossierView>,
    pub(super) result: Option<ResultSummary>,
}

impl GameState {
    /// Current screen.
    #[must_use]
    pub const fn screen(&self) -> Screen {
        self.screen
    }

    /// The case being played, if any.
    #[must_use]
    pub fn case(&self) -> Option<&Arc<Case>> {
        self.case.as_ref()
    }

    /// Current phase (0 when no case is installed).
    #[must_use]
    pub const fn phase(&self) -> u32 {
        self.phase
    }

    /// Pulls spent this run.
    #[must_use]
    pub const fn pulls_used(&self) -> u32 {
        self.pulls_used
    }

    /// Pull budget for this run.
    #[must_use]
    pub const fn pulls_max(&self) -> u32 {
        self.pulls_max
    }

    /// Pulls left this run.
    #[must_use]
    pub const fn pulls_remaining(&self) -> u32 {
        self.pulls_max.saturating_sub(self.pulls_used)
    }

    /// Accumulated player exposure.
    #[must_use]
    pub const fn risk(&self) -> u32 {
        self.risk
    }

    /// Current threat, always within `[0, 99]`.
    #[must_use]
    pub const fn threat(&self) -> i32 {
        self.threat
    }

    /// Lead ids pulled this run, in pull order.
    #[must_use]
    pub const fn used_leads(&self) -> &IndexSet<String> {
        &self.used_leads
    }

    /// Evidence tags captured this run, in capture order.
    #[must_use]
    pub const fn tags(&self) -> &IndexSet<String> {
        &self.tags
    }

    /// Clues captured this run.
    #[must_use]
    pub fn clues(&self) -> &[Clue] {
        &self.clues
    }

    /// The intervention held by the confirmation gate.
    #[must_use]
    pub const fn pending_intervention(&self) -> Option<&PendingIntervention> {
        self.pending.as_ref()
    }

    /// Advisories already issued this run.
    #[must_use]
    pub const fn advisories(&self) -> &BTreeSet<Advisory> {
        &self.advisories
    }

    /// Whether the long confirmation advisory has been shown since the gate
    /// was last armed.
    #[must_use]
    pub const fn confirm_advisory_shown(&self) -> bool {
        self.confirm_advisory_shown
    }

    /// Feed queue and visible log.
    #[must_use]
    pub const fn feed(&self) -> &Feed {
        &self.feed
    }

    /// Visible feed entries.
    #[must_use]
    pub fn visible_feed(&self) -> &[FeedEntry] {
        self.feed.visible()
    }

    /// Whether the pacing tick should drain the queue.
    #[must_use]
    pub const fn autoplay(&self) -> bool {
        self.autoplay
    }

    /// Active tabs.
    #[must_use]
    pub const fn tabs(&self) -> Tabs {
        self.tabs
    }

    /// Last computed dossier projection.
    #[must_use]
    pub const fn dossier(&self) -> Option<&DossierView> {
        self.dossier.as_ref()
    }

    /// Result summary, set once the case resolves.
    #[must_use]
    pub const fn result(&self) -> Option<&ResultSummary> {
        self.result.as_ref()
    }

    /// Adds `tags` to the evidence set, ignoring duplicates.
    pub(super) fn capture_tags<'a>(&mut self, tags: impl IntoIterator<Item = &'a String>) {
        for tag in tags {
            if !self.tags.contains(tag) {
                self.tags.insert(tag.clone());
            }
        }
    }

    /// Applies a signed threat adjustment with clamping.
    pub(super) fn bump_threat(&mut self, delta: i32) {
        self.threat = casefile_core::case::clamp_threat(self.threat, delta);
    }

    /// Queues an authored line unless its speaker is the silent player.
    pub(super) fn echo_line(&mut self, line: &casefile_core::case::FeedLine, default_tag: &str) {
        let silent = self
            .case
            .as_ref()
            .is_some_and(|case| case.definition.is_pov(&line.who));
        if !silent {
            self.feed.push_line(line, default_tag);
        }
    }
}
