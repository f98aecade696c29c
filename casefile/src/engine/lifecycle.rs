//! Run lifecycle and screen transitions
//!
//! `home -> boot -> case -> results`, with `replay` returning to `boot` and
//! `go_home` legal from anywhere. Operations called from an incompatible
//! screen are silent no-ops.

use std::sync::Arc;

use tracing::{debug, info};

use casefile_core::case::Case;

use super::feed::{SYSTEM, divider, tag};
use super::state::{GameState, Screen, Tab, Tabs};

impl GameState {
    /// Creates the initial state: home screen, no case, empty run.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears every run-scoped field.
    ///
    /// The installed case and the screen are left alone; callers decide
    /// what happens to those.
    pub fn reset_run(&mut self) {
        self.phase = 0;
        self.pulls_used = 0;
        self.pulls_max = 0;
        self.risk = 0;
        self.threat = 0;
        self.used_leads.clear();
        self.tags.clear();
        self.clues.clear();
        self.pending = None;
        self.advisories.clear();
        self.confirm_advisory_shown = false;
        self.feed.clear();
        self.autoplay = false;
        self.tabs = Tabs::default();
        self.dossier = None;
        self.result = None;
    }

    /// Installs `case` and starts a fresh run on the boot screen.
    ///
    /// Always legal.
    pub fn start_case(&mut self, case: Arc<Case>) {
        self.reset_run();
        self.screen = Screen::Boot;

        self.pulls_max = case.rules.pulls_max;
        self.threat = case.rules.threat_start;
        self.phase = 1;

        for line in &case.definition.boot {
            self.feed.push(SYSTEM, line.clone(), tag::ACCESS);
        }
        self.feed.push_divider(divider::CHANNEL_OPEN);

        info!(case_id = %case.id(), pulls_max = self.pulls_max, threat = self.threat, "case started");
        self.case = Some(case);

        let opening = self
            .case
            .as_ref()
            .map(|c| c.definition.opening_feed.clone())
            .unwrap_or_default();
        for line in &opening {
            self.echo_line(line, tag::CHAT);
        }

        self.refresh_dossier();
    }

    /// Moves from the boot screen into the live case.
    pub fn enter_case(&mut self) {
        if self.screen != Screen::Boot {
            debug!(screen = ?self.screen, "enter_case ignored outside boot screen");
            return;
        }
        let Some(briefing) = self.case.as_ref().map(|c| c.definition.briefing.clone()) else {
            return;
        };

        self.screen = Screen::Case;
        self.feed.push_divider(divider::CASE_LIVE);
        self.feed.push(SYSTEM, briefing, tag::CASE);
        self.refresh_dossier();
    }

    /// Returns to the home screen and discards the case and run.
    ///
    /// Always legal.
    pub fn go_home(&mut self) {
        self.reset_run();
        self.case = None;
        self.screen = Screen::Home;
    }

    /// Restarts the same case from the boot screen.
    ///
    /// Only legal on the results screen. This is a deterministic restart,
    /// not an undo.
    pub fn replay(&mut self) {
        if self.screen != Screen::Results {
            debug!(screen = ?self.screen, "replay ignored outside results screen");
            return;
        }
        if let Some(case) = self.case.clone() {
            self.start_case(case);
        }
    }

    /// Moves one queued entry to the visible feed.
    ///
    /// Shared by the pacing tick and the manual advance command.
    pub fn flush_one(&mut self) -> bool {
        self.feed.flush_one()
    }

    /// Drains up to `limit` queued entries.
    pub fn flush_all(&mut self, limit: usize) -> usize {
        self.feed.flush_all(limit)
    }

    /// Flips the autoplay flag. Queued entries are never touched.
    pub fn toggle_autoplay(&mut self) {
        self.autoplay = !self.autoplay;
    }

    /// Switches the active tab of one panel.
    pub fn switch_tab(&mut self, tab: Tab) {
        match tab {
            Tab::Left(left) => self.tabs.left = left,
            Tab::Right(right) => self.tabs.right = right,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::feed::FeedEntry;
    use crate::engine::testing::{case_from_yaml, sample_case};

    #[test]
    fn test_initial_state_is_home_and_empty() {
        let state = GameState::new();
        assert_eq!(state.screen(), Screen::Home);
        assert!(state.case().is_none());
        assert_eq!(state.phase(), 0);
        assert_eq!(state.feed().queued_len(), 0);
        assert!(state.visible_feed().is_empty());
    }

    #[test]
    fn test_start_case_installs_rules_and_opening() {
        let mut state = GameState::new();
        state.start_case(sample_case());

        assert_eq!(state.screen(), Screen::Boot);
        assert_eq!(state.phase(), 1);
        assert_eq!(state.pulls_max(), 6);
        assert_eq!(state.threat(), 54);
        assert!(state.dossier().is_some());

        let queued: Vec<FeedEntry> = state.feed().queued().cloned().collect();
        assert_eq!(queued[0], FeedEntry::message(SYSTEM, "LINK ESTABLISHED", tag::ACCESS));
        assert_eq!(queued[2], FeedEntry::divider(divider::CHANNEL_OPEN));
        assert_eq!(
            queued[3],
            FeedEntry::message("LARK", "You're on. Keep it quiet.", tag::CHAT)
        );
        assert!(
            queued
                .iter()
                .all(|e| !matches!(e, FeedEntry::Message { who, .. } if who == "OBSERVER")),
            "pov lines must not be echoed"
        );
    }

    #[test]
    fn test_enter_case_requires_boot_screen() {
        let mut state = GameState::new();
        state.enter_case();
        assert_eq!(state.screen(), Screen::Home);

        state.start_case(sample_case());
        let before = state.feed().queued_len();
        state.enter_case();
        assert_eq!(state.screen(), Screen::Case);
        assert_eq!(state.feed().queued_len(), before + 2);

        // A second enter is a no-op
        state.enter_case();
        assert_eq!(state.feed().queued_len(), before + 2);
    }

    #[test]
    fn test_start_case_resets_previous_run() {
        let mut state = GameState::new();
        state.start_case(sample_case());
        state.enter_case();
        state.apply_lead("records");
        state.toggle_autoplay();
        state.flush_all(100);
        assert!(!state.tags().is_empty());

        state.start_case(sample_case());
        assert!(state.tags().is_empty());
        assert!(state.used_leads().is_empty());
        assert_eq!(state.pulls_used(), 0);
        assert!(!state.autoplay());
        assert!(state.visible_feed().is_empty());
    }

    #[test]
    fn test_go_home_clears_case() {
        let mut state = GameState::new();
        state.start_case(sample_case());
        state.go_home();
        assert_eq!(state.screen(), Screen::Home);
        assert!(state.case().is_none());
        assert!(state.dossier().is_none());
        assert_eq!(state.feed().queued_len(), 0);
    }

    #[test]
    fn test_replay_only_from_results() {
        let mut state = GameState::new();
        state.start_case(sample_case());
        state.enter_case();
        state.replay();
        assert_eq!(state.screen(), Screen::Case);
    }

    #[test]
    fn test_replay_restarts_same_case() {
        let case = case_from_yaml(
            r#"
id: short
title: Short
openingFeed: []
briefing: Go.
rules: { interventionPhase: 1, confirmEvidenceThreshold: 0 }
leads: []
interventions:
  - id: act
    title: Act
"#,
        );
        let mut state = GameState::new();
        state.start_case(Arc::clone(&case));
        state.enter_case();
        state.choose_intervention("act");
        assert_eq!(state.screen(), Screen::Results);

        state.replay();
        assert_eq!(state.screen(), Screen::Boot);
        assert!(Arc::ptr_eq(state.case().unwrap(), &case));
        assert!(state.result().is_none());
    }

    #[test]
    fn test_toggle_autoplay_keeps_queue() {
        let mut state = GameState::new();
        state.start_case(sample_case());
        let queued = state.feed().queued_len();
        state.toggle_autoplay();
        assert!(state.autoplay());
        state.toggle_autoplay();
        assert!(!state.autoplay());
        assert_eq!(state.feed().queued_len(), queued);
    }
}
