//! Case definition schema types
//!
//! This module defines the authored shape of a case file. These types are
//! deserialized from YAML or JSON and are immutable once loaded. Unknown
//! fields are rejected so that a typo in authored content fails at load
//! time instead of silently changing the story.

use serde::{Deserialize, Serialize};

use super::rules::RulesConfig;

// ============================================================================
// Top-Level Case Definition
// ============================================================================

/// Root of an authored case file.
///
/// `leads`, `interventions` and `openingFeed` are required; a file missing
/// any of them is structurally malformed and fails deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CaseDefinition {
    /// Stable identifier, also used as the library file stem
    pub id: String,

    /// Display title for the case index
    pub title: String,

    /// Tunable rules; missing values resolve to documented defaults
    #[serde(default)]
    pub rules: RulesConfig,

    /// Boot lines shown as `SYSTEM`/`ACCESS` entries before the channel opens
    #[serde(default)]
    pub boot: Vec<String>,

    /// Messages queued when the case starts
    pub opening_feed: Vec<FeedLine>,

    /// Briefing text queued when the player enters the case
    pub briefing: String,

    /// Investigative actions, in display order
    pub leads: Vec<Lead>,

    /// Terminal choices, in display order
    pub interventions: Vec<Intervention>,

    /// Authored phase advancement table, evaluated in array order
    #[serde(default)]
    pub phase_triggers: Vec<PhaseTrigger>,

    /// Dossier template, progressively revealed by phase
    #[serde(default)]
    pub dossier: DossierTemplate,

    /// Silent player identity; lines spoken by it are never echoed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pov: Option<String>,

    /// Messages queued after the ending text
    #[serde(default)]
    pub epilogue_feed: Vec<FeedLine>,

    /// Team roster for the team panel
    #[serde(default)]
    pub team: Vec<TeamMember>,

    /// Asset panel text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<String>,

    /// Protocol panel text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
}

impl CaseDefinition {
    /// Looks up a lead by id.
    #[must_use]
    pub fn lead(&self, id: &str) -> Option<&Lead> {
        self.leads.iter().find(|l| l.id == id)
    }

    /// Looks up an intervention by id.
    #[must_use]
    pub fn intervention(&self, id: &str) -> Option<&Intervention> {
        self.interventions.iter().find(|i| i.id == id)
    }

    /// Returns `true` if `who` is the silent point-of-view identity.
    #[must_use]
    pub fn is_pov(&self, who: &str) -> bool {
        self.pov.as_deref() == Some(who)
    }
}

// ============================================================================
// Feed Lines
// ============================================================================

/// An authored message line: speaker, text and an optional display tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FeedLine {
    /// Speaker name
    pub who: String,

    /// Message body; literal `\n` sequences are rendered as line breaks
    pub text: String,

    /// Display tag; each consumer supplies its own default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

// ============================================================================
// Leads
// ============================================================================

/// A player-selectable investigative action consuming one pull.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Lead {
    /// Unique identifier within the case
    pub id: String,

    /// Display title
    pub title: String,

    /// Lowest phase at which the lead is visible and pullable
    #[serde(default = "default_min_phase")]
    pub min_phase: u32,

    /// Player exposure added when pulled
    #[serde(default)]
    pub risk: u32,

    /// Signed threat adjustment (clamped by the engine)
    #[serde(default)]
    pub threat_delta: i32,

    /// Readout queued as a `SYSTEM` entry
    pub result_text: String,

    /// Evidence tags captured when pulled
    #[serde(default)]
    pub tags: Vec<String>,

    /// Optional follow-up line from a team member
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reaction: Option<FeedLine>,

    /// Clue title; falls back to the lead title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clue_title: Option<String>,

    /// Clue text; falls back to the result text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clue_text: Option<String>,
}

// ============================================================================
// Interventions
// ============================================================================

/// A terminal branching choice.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Intervention {
    /// Unique identifier within the case
    pub id: String,

    /// Display title
    pub title: String,

    /// Lowest phase at which this intervention may unlock
    #[serde(default = "default_min_phase")]
    pub min_phase: u32,

    /// Evidence tag requirement
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires: Option<Requirement>,

    /// Player exposure added on resolution
    #[serde(default)]
    pub risk: u32,

    /// Signed threat adjustment applied on resolution
    #[serde(default)]
    pub threat_delta: i32,

    /// Authored endings keyed by outcome
    #[serde(default)]
    pub endings: Endings,
}

/// Tag requirement predicate for an intervention.
///
/// A bare list is treated as `all`. The object forms take exactly one key;
/// `{any, all}` together or any other key fails to parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged, from = "RequirementRepr")]
pub enum Requirement {
    /// Bare list: every tag must be present
    List(Vec<String>),

    /// At least one tag must be present
    Any {
        /// Candidate tags
        any: Vec<String>,
    },

    /// Every tag must be present
    All {
        /// Required tags
        all: Vec<String>,
    },
}

/// Wire shape of [`Requirement`], strict about object keys.
#[derive(Deserialize)]
#[serde(untagged)]
enum RequirementRepr {
    List(Vec<String>),
    Any(AnyOf),
    All(AllOf),
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct AnyOf {
    any: Vec<String>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct AllOf {
    all: Vec<String>,
}

impl From<RequirementRepr> for Requirement {
    fn from(repr: RequirementRepr) -> Self {
        match repr {
            RequirementRepr::List(tags) => Self::List(tags),
            RequirementRepr::Any(AnyOf { any }) => Self::Any { any },
            RequirementRepr::All(AllOf { all }) => Self::All { all },
        }
    }
}

impl Requirement {
    /// Returns every tag named by the predicate.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        match self {
            Self::List(tags) | Self::Any { any: tags } | Self::All { all: tags } => tags,
        }
    }

    /// Evaluates the predicate against a tag membership test.
    ///
    /// Empty lists are always satisfied, whatever the form.
    pub fn is_met(&self, has_tag: impl Fn(&str) -> bool) -> bool {
        match self {
            Self::Any { any } => any.is_empty() || any.iter().any(|t| has_tag(t)),
            Self::List(all) | Self::All { all } => all.iter().all(|t| has_tag(t)),
        }
    }
}

/// Authored ending texts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Endings {
    /// Ending for a well-evidenced, quiet resolution
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub good: Option<String>,

    /// Ending for a thin or loud resolution
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bad: Option<String>,

    /// Ending for everything in between, and the fallback for the others
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neutral: Option<String>,
}

// ============================================================================
// Phase Triggers
// ============================================================================

/// Authored phase transition tied to pull count.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PhaseTrigger {
    /// Pull count at which the trigger is considered
    pub at_pull: u32,

    /// Phase the run must be in
    pub from_phase: u32,

    /// Phase entered when the trigger fires
    pub to_phase: u32,

    /// Divider label queued before the messages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub divider: Option<String>,

    /// Escalation messages (tagged `ALERT` unless authored otherwise)
    #[serde(default)]
    pub messages: Vec<FeedLine>,

    /// Signed threat adjustment (clamped)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threat_delta: Option<i32>,

    /// Additional player exposure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_delta: Option<u32>,
}

// ============================================================================
// Dossier
// ============================================================================

/// Dossier template revealed progressively by phase.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DossierTemplate {
    /// Subject name, always visible
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Subject summary, always visible
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    /// Gated fields, in display order
    #[serde(default)]
    pub fields: Vec<DossierField>,

    /// Gated risk assessment note
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assessment: Option<DossierNote>,
}

/// A single gated dossier field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DossierField {
    /// Field label
    pub label: String,

    /// Revealed value
    pub value: String,

    /// Lowest phase at which `value` is revealed
    #[serde(default = "default_min_phase")]
    pub min_phase: u32,

    /// Value shown while locked
    #[serde(default = "DossierField::default_locked_value")]
    pub locked_value: String,
}

impl DossierField {
    fn default_locked_value() -> String {
        "REDACTED".to_string()
    }
}

/// The gated assessment note.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DossierNote {
    /// Revealed note
    pub value: String,

    /// Lowest phase at which `value` is revealed
    #[serde(default = "default_min_phase")]
    pub min_phase: u32,

    /// Note shown while locked
    #[serde(default = "DossierNote::default_locked_value")]
    pub locked_value: String,
}

impl DossierNote {
    fn default_locked_value() -> String {
        "ASSESSMENT UNAVAILABLE".to_string()
    }
}

// ============================================================================
// Panels
// ============================================================================

/// A team roster entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TeamMember {
    /// Call sign
    pub name: String,

    /// One-line description
    pub role: String,
}

const fn default_min_phase() -> u32 {
    1
}

// ============================================================================
// Tests
// ============================================================================
