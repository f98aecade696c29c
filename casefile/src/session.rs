//! Session and action dispatch
//!
//! A [`Session`] owns one [`GameState`] together with its collaborators: the
//! case library, the save store and the event emitter. Every action from the
//! front end goes through [`Session::dispatch`], which runs the matching
//! engine operation to completion, emits events from what the engine
//! reports plus a before/after comparison, and keeps the save blob current.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::case::{CaseLibrary, CaseSummary};
use crate::engine::{GameState, PullReport, Screen, Tab, Tabs};
use crate::error::LibraryError;
use crate::observability::{Event, EventEmitter};
use crate::persistence::{SaveBlob, SaveStore};

/// Entries moved by a single "skip" action.
pub const DEFAULT_FLUSH_LIMIT: usize = 50;

/// A discrete player or scheduler action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "target", rename_all = "snake_case")]
pub enum Action {
    /// Load a case from the library and start a run
    OpenCase(String),
    /// Leave the boot screen
    EnterCase,
    /// Pull a lead
    PullLead(String),
    /// Choose an intervention
    ChooseIntervention(String),
    /// Confirm the held intervention
    ConfirmIntervention,
    /// Release the held intervention
    CancelIntervention,
    /// Switch a panel tab
    SwitchTab(Tab),
    /// Show one queued feed entry
    AdvanceFeed,
    /// Show every queued feed entry, up to the flush limit
    SkipFeed,
    /// Flip autoplay
    ToggleAutoplay,
    /// Discard the run and return home
    GoHome,
    /// Restart the resolved case
    Replay,
    /// Forget the save blob
    ResetSave,
}

/// Observable fields compared before and after an action.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Snapshot {
    screen: Screen,
    case_id: Option<String>,
    phase: u32,
    pulls_used: u32,
    risk: u32,
    threat: i32,
    tags: usize,
    visible: usize,
    queued: usize,
    pending: Option<String>,
    autoplay: bool,
    tabs: Tabs,
    resolved: bool,
}

impl Snapshot {
    fn of(state: &GameState) -> Self {
        Self {
            screen: state.screen(),
            case_id: state.case().map(|c| c.id().to_string()),
            phase: state.phase(),
            pulls_used: state.pulls_used(),
            risk: state.risk(),
            threat: state.threat(),
            tags: state.tags().len(),
            visible: state.visible_feed().len(),
            queued: state.feed().queued_len(),
            pending: state.pending_intervention().map(|p| p.id.clone()),
            autoplay: state.autoplay(),
            tabs: state.tabs(),
            resolved: state.result().is_some(),
        }
    }
}

/// One player's run plus its collaborators.
pub struct Session {
    state: GameState,
    library: Box<dyn CaseLibrary>,
    saves: Box<dyn SaveStore>,
    events: EventEmitter,
    flush_limit: usize,
    autoplay: bool,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("screen", &self.state.screen())
            .field("events", &self.events)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Creates a session on the home screen.
    #[must_use]
    pub fn new(
        library: Box<dyn CaseLibrary>,
        saves: Box<dyn SaveStore>,
        events: EventEmitter,
    ) -> Self {
        Self {
            state: GameState::new(),
            library,
            saves,
            events,
            flush_limit: DEFAULT_FLUSH_LIMIT,
            autoplay: false,
        }
    }

    /// Starts with autoplay requested.
    ///
    /// A run reset clears the engine's flag; the session puts it back after
    /// every open, replay and return home until the player toggles it off.
    #[must_use]
    pub const fn with_autoplay(mut self, autoplay: bool) -> Self {
        self.autoplay = autoplay;
        self
    }

    /// Overrides how many entries a skip moves.
    #[must_use]
    pub const fn with_flush_limit(mut self, limit: usize) -> Self {
        self.flush_limit = limit;
        self
    }

    /// The run state.
    #[must_use]
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    /// The event emitter.
    #[must_use]
    pub const fn events(&self) -> &EventEmitter {
        &self.events
    }

    /// Lists the cases the library offers.
    ///
    /// # Errors
    ///
    /// Returns an error if the library index cannot be read.
    pub fn case_index(&self) -> Result<Vec<CaseSummary>, LibraryError> {
        self.library.fetch_case_index()
    }

    /// The current save blob, if any.
    #[must_use]
    pub fn last_save(&self) -> Option<SaveBlob> {
        self.saves.load()
    }

    /// Applies one action.
    ///
    /// Returns whether anything observable changed.
    ///
    /// # Errors
    ///
    /// Only [`Action::OpenCase`] can fail, when the library cannot provide
    /// the case. The run is left untouched in that case.
    pub fn dispatch(&mut self, action: Action) -> Result<bool, LibraryError> {
        let before = Snapshot::of(&self.state);
        let mut pull = PullReport::default();

        match &action {
            Action::OpenCase(id) => {
                let case = self.library.fetch_case(id)?;
                self.state.start_case(case);
            }
            Action::EnterCase => self.state.enter_case(),
            Action::PullLead(id) => pull = self.state.apply_lead(id),
            Action::ChooseIntervention(id) => self.state.choose_intervention(id),
            Action::ConfirmIntervention => self.state.confirm_intervention(),
            Action::CancelIntervention => self.state.cancel_intervention(),
            Action::SwitchTab(tab) => self.state.switch_tab(*tab),
            Action::AdvanceFeed => {
                self.state.flush_one();
            }
            Action::SkipFeed => {
                self.state.flush_all(self.flush_limit);
            }
            Action::ToggleAutoplay => {
                self.state.toggle_autoplay();
                self.autoplay = self.state.autoplay();
            }
            Action::GoHome => self.state.go_home(),
            Action::Replay => self.state.replay(),
            Action::ResetSave => {
                self.saves.clear();
                info!("save cleared");
                return Ok(true);
            }
        }

        if self.state.autoplay() != self.autoplay {
            self.state.toggle_autoplay();
        }

        let after = Snapshot::of(&self.state);
        self.record(&action, &before, &after, &pull);
        let changed = before != after;
        if !changed {
            debug!(?action, "action changed nothing");
        }
        Ok(changed)
    }

    /// Pacing tick: shows one queued entry if autoplay is on.
    ///
    /// Returns whether an entry was shown.
    pub fn tick(&mut self) -> bool {
        self.state.autoplay() && self.state.flush_one()
    }

    fn record(&self, action: &Action, before: &Snapshot, after: &Snapshot, pull: &PullReport) {
        let timestamp = Utc::now();

        let reopened = match action {
            Action::OpenCase(_) => true,
            Action::Replay => before.screen == Screen::Results && after.screen == Screen::Boot,
            _ => false,
        };
        if reopened {
            if let Some(case) = self.state.case() {
                self.events.emit(Event::CaseOpened {
                    timestamp,
                    case_id: case.id().to_string(),
                    title: case.title().to_string(),
                    pulls_max: self.state.pulls_max(),
                    threat: self.state.threat(),
                });
                self.saves.write(&SaveBlob {
                    last_case_id: case.id().to_string(),
                    last_case_title: case.title().to_string(),
                    last_outcome: None,
                    resolved_at: None,
                });
            }
            return;
        }

        if before.screen == Screen::Boot && after.screen == Screen::Case {
            if let Some(case_id) = &after.case_id {
                self.events.emit(Event::CaseEntered {
                    timestamp,
                    case_id: case_id.clone(),
                });
            }
        }

        if after.pulls_used > before.pulls_used {
            if let Action::PullLead(lead_id) = action {
                self.events.emit(Event::LeadPulled {
                    timestamp,
                    lead_id: lead_id.clone(),
                    pulls_used: after.pulls_used,
                    risk: after.risk,
                    threat: after.threat,
                    tags: after.tags,
                });
            }
        }

        for transition in &pull.transitions {
            self.events.emit(Event::PhaseAdvanced {
                timestamp,
                from_phase: transition.from_phase,
                to_phase: transition.to_phase,
                at_pull: transition.at_pull,
            });
        }

        for advisory in &pull.advisories {
            self.events.emit(Event::AdvisoryIssued {
                timestamp,
                advisory: *advisory,
            });
        }

        if let Some(held) = &after.pending {
            if before.pending.as_ref() != Some(held) {
                self.events.emit(Event::InterventionHeld {
                    timestamp,
                    intervention_id: held.clone(),
                });
            }
        }

        if !before.resolved && after.resolved {
            self.record_resolution(timestamp);
        }

        if matches!(action, Action::GoHome) && before.case_id.is_some() {
            self.events.emit(Event::RunReset { timestamp });
        }
    }

    fn record_resolution(&self, timestamp: chrono::DateTime<Utc>) {
        let (Some(case), Some(result)) = (self.state.case(), self.state.result()) else {
            return;
        };
        self.events.emit(Event::CaseResolved {
            timestamp,
            intervention_id: result.intervention_id.clone(),
            outcome: result.outcome,
            evidence: result.evidence,
            risk: result.risk,
            threat: result.threat,
        });
        self.saves.write(&SaveBlob {
            last_case_id: case.id().to_string(),
            last_case_title: case.title().to_string(),
            last_outcome: Some(result.outcome),
            resolved_at: Some(timestamp),
        });
    }
}
