//! Case validation
//!
//! Runs on the fully deserialized [`CaseDefinition`], before any state is
//! built from it. All issues are collected rather than stopping at the first
//! one, so an author sees every problem in a single pass.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;

use casefile_core::case::{CaseDefinition, THREAT_MAX, THREAT_MIN};
use casefile_core::error::{Severity, ValidationIssue};

/// Identifier pattern for cases, leads and interventions.
///
/// Case ids double as file stems, so the pattern excludes path separators.
pub static ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_-]*$").expect("valid regex"));

/// Returns `true` if `id` is a well-formed identifier.
#[must_use]
pub fn is_valid_id(id: &str) -> bool {
    ID_PATTERN.is_match(id)
}

/// Result of case validation.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Validation errors (prevent loading).
    pub errors: Vec<ValidationIssue>,

    /// Validation warnings (informational).
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Returns `true` if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns `true` if validation passed (no errors).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Case validator.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<ValidationIssue>,
    warnings: Vec<ValidationIssue>,
}

impl Validator {
    /// Creates a new validator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates a case definition and returns every issue found.
    pub fn validate(&mut self, case: &CaseDefinition) -> ValidationResult {
        self.errors.clear();
        self.warnings.clear();

        self.validate_metadata(case);
        self.validate_rules(case);
        self.validate_leads(case);
        self.validate_interventions(case);
        self.validate_phase_triggers(case);
        self.validate_reachability(case);
        self.validate_requirements(case);

        ValidationResult {
            errors: std::mem::take(&mut self.errors),
            warnings: std::mem::take(&mut self.warnings),
        }
    }

    // ========================================================================
    // Schema Validation
    // ========================================================================

    fn validate_metadata(&mut self, case: &CaseDefinition) {
        if case.id.is_empty() {
            self.add_error("id", "Case id is required and cannot be empty");
        } else if !is_valid_id(&case.id) {
            self.add_error(
                "id",
                &format!(
                    "Case id '{}' must start with a letter or digit and contain only letters, digits, '-' or '_'",
                    case.id
                ),
            );
        }

        if case.title.trim().is_empty() {
            self.add_warning("title", "Case title is empty");
        }

        if case.briefing.trim().is_empty() {
            self.add_warning("briefing", "Case briefing is empty");
        }
    }

    fn validate_rules(&mut self, case: &CaseDefinition) {
        let rules = &case.rules;

        if rules.pulls_max == Some(0) {
            self.add_error("rules.pullsMax", "pullsMax must be at least 1");
        }

        if let Some(start) = rules.threat_start {
            if !(THREAT_MIN..=THREAT_MAX).contains(&start) {
                self.add_error(
                    "rules.threatStart",
                    &format!("threatStart {start} is outside {THREAT_MIN}-{THREAT_MAX}"),
                );
            }
        }

        let resolved = casefile_core::case::Rules::resolve(rules);
        if resolved.bad_evidence_threshold >= resolved.good_evidence_threshold {
            self.add_warning(
                "rules.badEvidenceThreshold",
                "badEvidenceThreshold is not below goodEvidenceThreshold; a good outcome is unreachable",
            );
        }
    }

    fn validate_leads(&mut self, case: &CaseDefinition) {
        if case.leads.is_empty() {
            self.add_warning("leads", "Case has no leads");
        }

        let mut seen = HashSet::new();
        for (i, lead) in case.leads.iter().enumerate() {
            let path = format!("leads[{i}].id");
            self.validate_item_id(&path, &lead.id, &mut seen, "lead");

            if lead.result_text.trim().is_empty() {
                self.add_warning(&format!("leads[{i}].resultText"), "Lead has no result text");
            }
            if lead.min_phase == 0 {
                self.add_warning(
                    &format!("leads[{i}].minPhase"),
                    "minPhase 0 behaves the same as 1",
                );
            }
        }
    }

    fn validate_interventions(&mut self, case: &CaseDefinition) {
        if case.interventions.is_empty() {
            self.add_warning("interventions", "Case has no interventions and can never resolve");
        }

        let mut seen = HashSet::new();
        for (i, intervention) in case.interventions.iter().enumerate() {
            let path = format!("interventions[{i}].id");
            self.validate_item_id(&path, &intervention.id, &mut seen, "intervention");

            let endings = &intervention.endings;
            if endings.good.is_none() && endings.bad.is_none() && endings.neutral.is_none() {
                self.add_warning(
                    &format!("interventions[{i}].endings"),
                    "Intervention has no endings; the generic fallback will be shown",
                );
            }
        }
    }

    fn validate_item_id(
        &mut self,
        path: &str,
        id: &str,
        seen: &mut HashSet<String>,
        kind: &str,
    ) {
        if id.is_empty() {
            self.add_error(path, &format!("A {kind} id cannot be empty"));
            return;
        }
        if !is_valid_id(id) {
            self.add_error(path, &format!("Invalid {kind} id '{id}'"));
        }
        if !seen.insert(id.to_string()) {
            self.add_error(path, &format!("Duplicate {kind} id '{id}'"));
        }
    }

    // ========================================================================
    // Semantic Validation
    // ========================================================================

    fn validate_phase_triggers(&mut self, case: &CaseDefinition) {
        let pulls_max = casefile_core::case::Rules::resolve(&case.rules).pulls_max;
        let mut pairs: HashMap<(u32, u32), usize> = HashMap::new();

        for (i, trigger) in case.phase_triggers.iter().enumerate() {
            if trigger.to_phase < trigger.from_phase {
                self.add_error(
                    &format!("phaseTriggers[{i}].toPhase"),
                    &format!(
                        "toPhase {} is lower than fromPhase {}; phase cannot move backwards",
                        trigger.to_phase, trigger.from_phase
                    ),
                );
            }

            if trigger.at_pull == 0 || trigger.at_pull > pulls_max {
                self.add_warning(
                    &format!("phaseTriggers[{i}].atPull"),
                    &format!(
                        "atPull {} can never be reached with pullsMax {pulls_max}",
                        trigger.at_pull
                    ),
                );
            }

            if let Some(first) = pairs.insert((trigger.at_pull, trigger.from_phase), i) {
                self.add_warning(
                    &format!("phaseTriggers[{i}]"),
                    &format!(
                        "Trigger repeats (atPull {}, fromPhase {}) of phaseTriggers[{first}]",
                        trigger.at_pull, trigger.from_phase
                    ),
                );
            }
        }
    }

    fn validate_reachability(&mut self, case: &CaseDefinition) {
        let reachable = reachable_phases(case);
        let max_phase = reachable.iter().copied().max().unwrap_or(1);

        for (i, lead) in case.leads.iter().enumerate() {
            if lead.min_phase > max_phase {
                self.add_warning(
                    &format!("leads[{i}].minPhase"),
                    &format!(
                        "Lead '{}' needs phase {} but no trigger reaches past phase {max_phase}",
                        lead.id, lead.min_phase
                    ),
                );
            }
        }

        let intervention_phase = casefile_core::case::Rules::resolve(&case.rules).intervention_phase;
        if intervention_phase > max_phase && !case.interventions.is_empty() {
            self.add_warning(
                "rules.interventionPhase",
                &format!(
                    "interventionPhase {intervention_phase} is never reached (highest phase is {max_phase})"
                ),
            );
        }

        for (i, intervention) in case.interventions.iter().enumerate() {
            if intervention.min_phase > max_phase {
                self.add_warning(
                    &format!("interventions[{i}].minPhase"),
                    &format!(
                        "Intervention '{}' needs phase {} but no trigger reaches past phase {max_phase}",
                        intervention.id, intervention.min_phase
                    ),
                );
            }
        }
    }

    fn validate_requirements(&mut self, case: &CaseDefinition) {
        let producible: HashSet<&str> = case
            .leads
            .iter()
            .flat_map(|lead| lead.tags.iter().map(String::as_str))
            .collect();

        for (i, intervention) in case.interventions.iter().enumerate() {
            let Some(requires) = &intervention.requires else {
                continue;
            };
            for tag in requires.tags() {
                if producible.contains(tag.as_str()) {
                    continue;
                }
                let mut message = format!("No lead produces required tag '{tag}'");
                if let Some(suggestion) = suggest(tag, producible.iter().copied()) {
                    message.push_str(&format!(" (did you mean '{suggestion}'?)"));
                }
                self.add_warning(&format!("interventions[{i}].requires"), &message);
            }
        }
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    /// Adds an error to the collection.
    fn add_error(&mut self, path: &str, message: &str) {
        self.errors.push(ValidationIssue {
            path: path.to_string(),
            message: message.to_string(),
            severity: Severity::Error,
        });
    }

    /// Adds a warning to the collection.
    fn add_warning(&mut self, path: &str, message: &str) {
        self.warnings.push(ValidationIssue {
            path: path.to_string(),
            message: message.to_string(),
            severity: Severity::Warning,
        });
    }
}

/// Phases reachable from phase 1 through the trigger table.
fn reachable_phases(case: &CaseDefinition) -> HashSet<u32> {
    let mut reachable = HashSet::from([1]);
    loop {
        let before = reachable.len();
        for trigger in &case.phase_triggers {
            if reachable.contains(&trigger.from_phase) && trigger.to_phase >= trigger.from_phase {
                reachable.insert(trigger.to_phase);
            }
        }
        if reachable.len() == before {
            return reachable;
        }
    }
}

/// Closest candidate within a Damerau-Levenshtein distance of 3.
fn suggest<'a>(input: &str, candidates: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    candidates
        .map(|c| (c, strsim::damerau_levenshtein(input, c)))
        .filter(|(_, dist)| *dist <= 3)
        .min_by_key(|(_, dist)| *dist)
        .map(|(c, _)| c)
}
