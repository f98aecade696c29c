//! Dossier projection
//!
//! A pure function of the dossier template and the current phase. It never
//! touches tags, counters or any other run-scoped field.

use serde::Serialize;

use casefile_core::case::DossierTemplate;

use super::state::GameState;

/// Subject name shown when the template has none.
const UNNAMED_SUBJECT: &str = "REDACTED";

/// Dossier as visible at a given phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DossierView {
    /// Subject name
    pub name: String,
    /// Subject summary
    pub summary: String,
    /// Every template field in authored order, labels may repeat
    pub fields: Vec<ProjectedField>,
    /// Visible assessment note, if the template has one
    pub assessment: Option<String>,
}

/// One dossier field after phase gating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectedField {
    /// Authored label
    pub label: String,
    /// Revealed value, or the locked placeholder
    pub value: String,
}

impl DossierView {
    /// Projects `template` at `phase`.
    #[must_use]
    pub fn project(template: &DossierTemplate, phase: u32) -> Self {
        let fields = template
            .fields
            .iter()
            .map(|field| {
                let value = if phase >= field.min_phase {
                    &field.value
                } else {
                    &field.locked_value
                };
                ProjectedField {
                    label: field.label.clone(),
                    value: value.clone(),
                }
            })
            .collect();

        let assessment = template.assessment.as_ref().map(|note| {
            if phase >= note.min_phase {
                note.value.clone()
            } else {
                note.locked_value.clone()
            }
        });

        Self {
            name: template
                .name
                .clone()
                .unwrap_or_else(|| UNNAMED_SUBJECT.to_string()),
            summary: template.summary.clone().unwrap_or_default(),
            fields,
            assessment,
        }
    }
}

impl GameState {
    /// Recomputes the cached dossier projection for the current phase.
    pub(super) fn refresh_dossier(&mut self) {
        self.dossier = self
            .case
            .as_ref()
            .map(|case| DossierView::project(&case.definition.dossier, self.phase));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use casefile_core::case::{DossierField, DossierNote};

    fn template() -> DossierTemplate {
        DossierTemplate {
            name: Some("M. Reyes".into()),
            summary: Some("Night-shift orderly.".into()),
            fields: vec![
                DossierField {
                    label: "Occupation".into(),
                    value: "Orderly".into(),
                    min_phase: 1,
                    locked_value: "REDACTED".into(),
                },
                DossierField {
                    label: "Contacts".into(),
                    value: "Two, both former staff".into(),
                    min_phase: 3,
                    locked_value: "REDACTED".into(),
                },
            ],
            assessment: Some(DossierNote {
                value: "Escalating".into(),
                min_phase: 4,
                locked_value: "ASSESSMENT UNAVAILABLE".into(),
            }),
        }
    }

    fn values(view: &DossierView) -> Vec<(&str, &str)> {
        view.fields
            .iter()
            .map(|f| (f.label.as_str(), f.value.as_str()))
            .collect()
    }

    #[test]
    fn test_fields_locked_below_min_phase() {
        let view = DossierView::project(&template(), 1);
        assert_eq!(
            values(&view),
            [("Occupation", "Orderly"), ("Contacts", "REDACTED")]
        );
        assert_eq!(view.assessment.as_deref(), Some("ASSESSMENT UNAVAILABLE"));
    }

    #[test]
    fn test_fields_revealed_at_min_phase() {
        let view = DossierView::project(&template(), 4);
        assert_eq!(view.fields[1].value, "Two, both former staff");
        assert_eq!(view.assessment.as_deref(), Some("Escalating"));
    }

    #[test]
    fn test_field_order_is_authored_order() {
        let view = DossierView::project(&template(), 1);
        let labels: Vec<&str> = view.fields.iter().map(|f| f.label.as_str()).collect();
        assert_eq!(labels, ["Occupation", "Contacts"]);
    }

    #[test]
    fn test_repeated_labels_are_projected_separately() {
        let template = DossierTemplate {
            fields: vec![
                DossierField {
                    label: "Alias".into(),
                    value: "Ghost".into(),
                    min_phase: 1,
                    locked_value: "REDACTED".into(),
                },
                DossierField {
                    label: "Alias".into(),
                    value: "Wraith".into(),
                    min_phase: 2,
                    locked_value: "REDACTED".into(),
                },
            ],
            ..DossierTemplate::default()
        };

        let early = DossierView::project(&template, 1);
        assert_eq!(values(&early), [("Alias", "Ghost"), ("Alias", "REDACTED")]);
        let late = DossierView::project(&template, 2);
        assert_eq!(values(&late), [("Alias", "Ghost"), ("Alias", "Wraith")]);
    }

    #[test]
    fn test_empty_template_projection() {
        let view = DossierView::project(&DossierTemplate::default(), 2);
        assert_eq!(view.name, "REDACTED");
        assert!(view.summary.is_empty());
        assert!(view.fields.is_empty());
        assert!(view.assessment.is_none());
    }
}
