//! Text rendering for `play`
//!
//! Everything here reads a [`RunView`] and returns a `String`; nothing
//! mutates the run. Authored text may carry literal `\n` sequences, which
//! become line breaks only at this layer.

use std::fmt::Write;

use crate::case::CaseSummary;
use crate::engine::{FeedEntry, LeftTab, RightTab, RunView};
use crate::persistence::SaveBlob;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";

/// Converts authored `\n` escapes into real line breaks.
#[must_use]
pub fn text(raw: &str) -> String {
    raw.replace("\\n", "\n")
}

/// Renderer with an optional ANSI palette.
#[derive(Debug, Clone, Copy, Default)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    /// Creates a renderer.
    #[must_use]
    pub const fn new(color: bool) -> Self {
        Self { color }
    }

    fn paint(self, code: &str, s: &str) -> String {
        if self.color {
            format!("{code}{s}{RESET}")
        } else {
            s.to_string()
        }
    }

    /// Renders the home screen.
    #[must_use]
    pub fn home(self, cases: &[CaseSummary], save: Option<&SaveBlob>) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.paint(BOLD, "CASE FILES"));
        for (i, case) in cases.iter().enumerate() {
            let _ = writeln!(out, "  {}. {} ({})", i + 1, case.title, case.id);
        }
        if cases.is_empty() {
            let _ = writeln!(out, "  (no cases available)");
        }
        if let Some(save) = save {
            let last = match save.last_outcome {
                Some(outcome) => format!("last: {} [{outcome}]", save.last_case_title),
                None => format!("last: {} [open]", save.last_case_title),
            };
            let _ = writeln!(out, "{}", self.paint(DIM, &last));
        }
        out
    }

    /// Renders one feed entry.
    #[must_use]
    pub fn entry(self, entry: &FeedEntry) -> String {
        match entry {
            FeedEntry::Divider { label } => self.paint(DIM, label),
            FeedEntry::Message { who, text: body, tag } => {
                let code = match tag.as_str() {
                    "ALERT" | "NOISY" => RED,
                    "CASE" => BOLD,
                    _ => CYAN,
                };
                let head = self.paint(code, &format!("[{tag}] {who}:"));
                let body = text(body);
                let mut lines = body.lines();
                let first = lines.next().unwrap_or_default();
                let mut rendered = format!("{head} {first}");
                for line in lines {
                    rendered.push_str("\n    ");
                    rendered.push_str(line);
                }
                rendered
            }
        }
    }

    /// One-line run status.
    #[must_use]
    pub fn status(self, view: &RunView<'_>) -> String {
        let title = view.case_title.unwrap_or("-");
        let mut line = format!(
            "{}  phase {}  pulls {}/{}  risk {}  threat {}  tags {}",
            title.to_uppercase(),
            view.phase,
            view.pulls_used,
            view.pulls_max,
            view.risk,
            view.threat,
            view.tags.len(),
        );
        if view.queued > 0 {
            let _ = write!(line, "  (+{} queued)", view.queued);
        }
        if view.autoplay {
            line.push_str("  [auto]");
        }
        self.paint(BOLD, &line)
    }

    /// Renders both panels for the active tabs.
    #[must_use]
    pub fn panels(self, view: &RunView<'_>) -> String {
        let mut out = String::new();
        match view.tabs.left {
            LeftTab::Dossier => self.dossier(view, &mut out),
            LeftTab::Clues => self.clues(view, &mut out),
        }
        out.push('\n');
        match view.tabs.right {
            RightTab::Actions => self.actions(view, &mut out),
            RightTab::Team => {
                let _ = writeln!(out, "{}", self.paint(BOLD, "TEAM"));
                for member in view.team {
                    let _ = writeln!(out, "  {}: {}", member.name, text(&member.role));
                }
            }
            RightTab::Asset => {
                let _ = writeln!(out, "{}", self.paint(BOLD, "ASSET"));
                let _ = writeln!(out, "{}", text(view.asset.unwrap_or("No asset on file.")));
            }
            RightTab::Protocol => {
                let _ = writeln!(out, "{}", self.paint(BOLD, "PROTOCOL"));
                let _ = writeln!(out, "{}", text(view.protocol.unwrap_or("No protocol on file.")));
            }
        }
        if let Some(pending) = view.pending {
            let prompt = format!("HOLDING: {}  (confirm | cancel)", pending.title);
            let _ = writeln!(out, "{}", self.paint(YELLOW, &prompt));
        }
        out
    }

    fn dossier(self, view: &RunView<'_>, out: &mut String) {
        let _ = writeln!(out, "{}", self.paint(BOLD, "DOSSIER"));
        let Some(dossier) = view.dossier else {
            return;
        };
        let _ = writeln!(out, "  {}", dossier.name);
        if !dossier.summary.is_empty() {
            let _ = writeln!(out, "  {}", text(&dossier.summary));
        }
        for field in &dossier.fields {
            let _ = writeln!(out, "  {}: {}", field.label, field.value);
        }
        if let Some(note) = &dossier.assessment {
            let _ = writeln!(out, "  {}", self.paint(DIM, &text(note)));
        }
    }

    fn clues(self, view: &RunView<'_>, out: &mut String) {
        let _ = writeln!(out, "{}", self.paint(BOLD, "CLUES"));
        if view.clues.is_empty() {
            let _ = writeln!(out, "  (none yet)");
        }
        for clue in view.clues {
            let _ = writeln!(out, "  {}: {}", clue.title, text(&clue.text));
        }
        if !view.tags.is_empty() {
            let _ = writeln!(out, "  tags: {}", view.tags.join(", "));
        }
    }

    fn actions(self, view: &RunView<'_>, out: &mut String) {
        let _ = writeln!(out, "{}", self.paint(BOLD, "LEADS"));
        for (i, lead) in view.leads.iter().enumerate() {
            let mark = if lead.used { "x" } else { " " };
            let _ = writeln!(out, "  {}. [{mark}] {} (risk {})", i + 1, lead.title, lead.risk);
        }
        let _ = writeln!(out, "{}", self.paint(BOLD, "INTERVENTIONS"));
        for (i, intervention) in view.interventions.iter().enumerate() {
            let state = if intervention.unlocked {
                "open"
            } else if intervention.globally_unlocked {
                "needs evidence"
            } else {
                "locked"
            };
            let _ = writeln!(
                out,
                "  {}. {} (risk {}, {state})",
                i + 1,
                intervention.title,
                intervention.risk
            );
        }
    }

    /// Renders the results card.
    #[must_use]
    pub fn results(self, view: &RunView<'_>) -> String {
        let Some(result) = view.result else {
            return String::new();
        };
        let mut out = String::new();
        let headline = format!("OUTCOME: {}", result.outcome.as_str().to_uppercase());
        let _ = writeln!(out, "{}", self.paint(BOLD, &headline));
        let _ = writeln!(out, "  {}", result.title);
        let _ = writeln!(
            out,
            "  evidence {}  risk {}  threat {}",
            result.evidence, result.risk, result.threat
        );
        let _ = writeln!(out, "  (replay | home)");
        out
    }
}
