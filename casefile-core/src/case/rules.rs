//! Case rules and default resolution
//!
//! [`RulesConfig`] is the authored, partially specified form. It is resolved
//! exactly once, at load time, into [`Rules`], whose fields are always
//! populated. The engine only ever reads [`Rules`].

use serde::{Deserialize, Serialize};

/// Lowest legal threat value.
pub const THREAT_MIN: i32 = 0;

/// Highest legal threat value.
pub const THREAT_MAX: i32 = 99;

/// Clamps a threat adjustment into `[THREAT_MIN, THREAT_MAX]`.
///
/// Saturates instead of overflowing so any authored delta is safe.
#[must_use]
pub const fn clamp_threat(current: i32, delta: i32) -> i32 {
    let next = current.saturating_add(delta);
    if next < THREAT_MIN {
        THREAT_MIN
    } else if next > THREAT_MAX {
        THREAT_MAX
    } else {
        next
    }
}

/// Authored rules block. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RulesConfig {
    /// Pull budget for the run
    #[serde(default, alias = "pulls", skip_serializing_if = "Option::is_none")]
    pub pulls_max: Option<u32>,

    /// Threat at case start
    #[serde(default, alias = "startingThreat", skip_serializing_if = "Option::is_none")]
    pub threat_start: Option<i32>,

    /// Phase from which interventions are globally unlocked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intervention_phase: Option<u32>,

    /// Evidence at or above which an outcome classifies as good
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub good_evidence_threshold: Option<usize>,

    /// Evidence at or below which an outcome classifies as bad
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bad_evidence_threshold: Option<usize>,

    /// Risk at or above which an outcome is forced to bad
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high_risk_threshold: Option<u32>,

    /// Threat at or above which an outcome is forced to bad
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high_threat_threshold: Option<i32>,

    /// Tag count at or below which the low-evidence advisory fires
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low_evidence_advisory_threshold: Option<usize>,

    /// Tag count at or above which the golden-path praise fires
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub golden_path_threshold: Option<usize>,

    /// Tag count at or below which interventions require confirmation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirm_evidence_threshold: Option<usize>,

    /// Intervention risk at or above which confirmation is required
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirm_risk_threshold: Option<u32>,
}

/// Fully resolved rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rules {
    /// Pull budget for the run
    pub pulls_max: u32,
    /// Threat at case start, already clamped
    pub threat_start: i32,
    /// Phase from which interventions are globally unlocked
    pub intervention_phase: u32,
    /// Evidence at or above which an outcome classifies as good
    pub good_evidence_threshold: usize,
    /// Evidence at or below which an outcome classifies as bad
    pub bad_evidence_threshold: usize,
    /// Risk at or above which an outcome is forced to bad
    pub high_risk_threshold: u32,
    /// Threat at or above which an outcome is forced to bad
    pub high_threat_threshold: i32,
    /// Tag count at or below which the low-evidence advisory fires
    pub low_evidence_advisory_threshold: usize,
    /// Tag count at or above which the golden-path praise fires
    pub golden_path_threshold: usize,
    /// Tag count at or below which interventions require confirmation
    pub confirm_evidence_threshold: usize,
    /// Intervention risk at or above which confirmation is required
    pub confirm_risk_threshold: u32,
}

impl Rules {
    /// Default pull budget.
    pub const DEFAULT_PULLS_MAX: u32 = 6;
    /// Default starting threat.
    pub const DEFAULT_THREAT_START: i32 = 54;
    /// Default global intervention phase.
    pub const DEFAULT_INTERVENTION_PHASE: u32 = 3;
    /// Default good-evidence threshold.
    pub const DEFAULT_GOOD_EVIDENCE: usize = 10;
    /// Default bad-evidence threshold.
    pub const DEFAULT_BAD_EVIDENCE: usize = 4;
    /// Default high-risk threshold.
    pub const DEFAULT_HIGH_RISK: u32 = 7;
    /// Default high-threat threshold.
    pub const DEFAULT_HIGH_THREAT: i32 = 85;
    /// Default low-evidence advisory threshold.
    pub const DEFAULT_LOW_EVIDENCE_ADVISORY: usize = 4;
    /// Default golden-path threshold.
    pub const DEFAULT_GOLDEN_PATH: usize = 8;
    /// Default confirmation evidence threshold.
    pub const DEFAULT_CONFIRM_EVIDENCE: usize = 2;
    /// Default confirmation risk threshold.
    pub const DEFAULT_CONFIRM_RISK: u32 = 3;

    /// Resolves an authored rules block against the defaults.
    #[must_use]
    pub fn resolve(config: &RulesConfig) -> Self {
        Self {
            pulls_max: config.pulls_max.unwrap_or(Self::DEFAULT_PULLS_MAX),
            threat_start: clamp_threat(
                config.threat_start.unwrap_or(Self::DEFAULT_THREAT_START),
                0,
            ),
            intervention_phase: config
                .intervention_phase
                .unwrap_or(Self::DEFAULT_INTERVENTION_PHASE),
            good_evidence_threshold: config
                .good_evidence_threshold
                .unwrap_or(Self::DEFAULT_GOOD_EVIDENCE),
            bad_evidence_threshold: config
                .bad_evidence_threshold
                .unwrap_or(Self::DEFAULT_BAD_EVIDENCE),
            high_risk_threshold: config.high_risk_threshold.unwrap_or(Self::DEFAULT_HIGH_RISK),
            high_threat_threshold: config
                .high_threat_threshold
                .unwrap_or(Self::DEFAULT_HIGH_THREAT),
            low_evidence_advisory_threshold: config
                .low_evidence_advisory_threshold
                .unwrap_or(Self::DEFAULT_LOW_EVIDENCE_ADVISORY),
            golden_path_threshold: config
                .golden_path_threshold
                .unwrap_or(Self::DEFAULT_GOLDEN_PATH),
            confirm_evidence_threshold: config
                .confirm_evidence_threshold
                .unwrap_or(Self::DEFAULT_CONFIRM_EVIDENCE),
            confirm_risk_threshold: config
                .confirm_risk_threshold
                .unwrap_or(Self::DEFAULT_CONFIRM_RISK),
        }
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self::resolve(&RulesConfig::default())
    }
}
