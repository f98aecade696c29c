//! Adaptive narrator
//!
//! Four one-shot advisories checked in fixed priority order after every lead
//! resolution. Each kind fires at most once per run; the set of fired kinds
//! is only cleared by a run reset.

use serde::Serialize;
use tracing::debug;

use casefile_core::case::Rules;

use super::feed::tag;
use super::state::GameState;

/// Fixed narrator identity.
pub const NARRATOR: &str = "SUDO";

/// Advisory kinds, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Advisory {
    /// Many pulls, little evidence
    RecklessPace,
    /// Accumulated risk is high
    LoudRisk,
    /// Interventions are near but evidence is thin
    LowEvidence,
    /// Plenty of evidence at low risk
    GoldenPath,
}

impl Advisory {
    /// Message queued when the advisory fires.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::RecklessPace => "You’re moving quickly. That rarely ends well.",
            Self::LoudRisk => "You are pulling loud threads.",
            Self::LowEvidence => "You are preparing to act without understanding.",
            Self::GoldenPath => "…Impressive.",
        }
    }
}

type Predicate = fn(&GameState, &Rules) -> bool;

/// Ordered advisory table.
const ADVISORIES: [(Advisory, Predicate); 4] = [
    (Advisory::RecklessPace, |s, _| {
        s.pulls_used >= 3 && s.tags.len() <= 2
    }),
    (Advisory::LoudRisk, |s, _| s.risk >= 4),
    (Advisory::LowEvidence, |s, r| {
        s.phase >= 3 && s.tags.len() <= r.low_evidence_advisory_threshold
    }),
    (Advisory::GoldenPath, |s, r| {
        s.tags.len() >= r.golden_path_threshold && s.risk <= 2
    }),
];

impl GameState {
    /// Issues every advisory whose predicate holds and which has not fired
    /// yet this run.
    ///
    /// Returns the kinds issued by this pass, in priority order.
    pub(super) fn run_narrator(&mut self) -> Vec<Advisory> {
        let Some(rules) = self.case.as_ref().map(|case| case.rules) else {
            return Vec::new();
        };

        let mut issued = Vec::new();
        for (kind, predicate) in ADVISORIES {
            if self.advisories.contains(&kind) || !predicate(self, &rules) {
                continue;
            }
            self.advisories.insert(kind);
            self.feed.push(NARRATOR, kind.message(), tag::CHAT);
            debug!(advisory = ?kind, "advisory issued");
            issued.push(kind);
        }
        issued
    }
}
