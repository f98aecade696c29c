//! Case progression engine
//!
//! A single authoritative reducer over [`GameState`]. Player actions reach the
//! lead resolver or the intervention resolver; phase evaluation, the narrator
//! and the dossier projection run as a fixed pass after every lead. The feed
//! queue is drained independently by [`GameState::flush_one`].
//!
//! Nothing in here blocks, allocates threads or performs I/O. Invalid
//! actions are silent no-ops.

pub mod dossier;
pub mod feed;
pub mod intervention;
pub mod leads;
mod lifecycle;
pub mod narrator;
pub mod phase;
pub mod state;
pub mod view;

pub use dossier::{DossierView, ProjectedField};
pub use feed::{Feed, FeedEntry};
pub use intervention::{InterventionStatus, Outcome, ResultSummary};
pub use leads::{LeadStatus, PullReport};
pub use narrator::Advisory;
pub use phase::PhaseTransition;
pub use state::{Clue, GameState, LeftTab, PendingIntervention, RightTab, Screen, Tab, Tabs};
pub use view::RunView;

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use casefile_core::case::{Case, CaseDefinition};

    pub const SAMPLE: &str = r#"
id: night-shift
title: Night Shift
pov: OBSERVER
boot:
  - LINK ESTABLISHED
  - SUBJECT FILE MOUNTED
openingFeed:
  - { who: LARK, text: "You're on. Keep it quiet." }
  - { who: OBSERVER, text: "..." }
briefing: "A pharmacy on the east side keeps losing stock after midnight."
leads:
  - id: records
    title: Records pull
    resultText: "Badge 4471 swiped in twice without swiping out."
    tags: [badge, ledger]
    clueTitle: Staff badge
    reaction: { who: LARK, text: "That badge is old." }
  - id: cctv
    title: CCTV sweep
    risk: 2
    threatDelta: 10
    resultText: "A figure at the loading dock, 02:14."
    tags: [dock]
  - id: canvass
    title: Canvass the block
    risk: 1
    resultText: "A white van, twice a week."
    tags: [van]
  - id: informant
    title: Lean on the informant
    minPhase: 2
    risk: 3
    threatDelta: 8
    resultText: "He names a second buyer."
    tags: [buyer]
interventions:
  - id: stakeout
    title: Stake out the dock
    risk: 1
    requires: { any: [dock, van] }
    endings:
      good: "The van arrives on schedule."
      neutral: "A long, cold night."
  - id: confront
    title: Confront the orderly
    risk: 4
    threatDelta: 10
    requires: [badge]
    endings:
      bad: "He walks. The stock keeps vanishing."
phaseTriggers:
  - atPull: 2
    fromPhase: 1
    toPhase: 2
    divider: "-- PATTERN FORMING --"
    messages:
      - { who: VOSS, text: "Someone's been asking about us." }
  - { atPull: 4, fromPhase: 2, toPhase: 3, threatDelta: 5 }
dossier:
  name: M. Reyes
  summary: Night-shift orderly.
  fields:
    - { label: Occupation, value: Orderly }
    - { label: Contacts, value: "Two, both former staff", minPhase: 2 }
  assessment: { value: Escalating, minPhase: 3 }
"#;

    /// Parses a case without running the validator.
    pub fn case_from_yaml(yaml: &str) -> Arc<Case> {
        let definition: CaseDefinition = serde_yaml::from_str(yaml).unwrap();
        Arc::new(Case::new(definition))
    }

    pub fn sample_case() -> Arc<Case> {
        case_from_yaml(SAMPLE)
    }
}
