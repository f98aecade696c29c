//! Typed command parsing for `play`
//!
//! Turns one line of player input into a [`Command`]. Numeric targets index
//! into the lists the player is currently looking at (1-based).

use thiserror::Error;

use crate::case::CaseSummary;
use crate::engine::{LeftTab, RightTab, RunView, Tab};
use crate::session::Action;

/// One parsed line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Dispatch an action to the session
    Act(Action),
    /// Redraw the current frame
    Look,
    /// Print the command reference
    Help,
    /// Leave the game
    Quit,
}

/// Why a line could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// Unknown verb.
    #[error("unknown command '{0}' (type 'help')")]
    UnknownCommand(String),

    /// The verb needs a target.
    #[error("'{0}' needs a target")]
    MissingTarget(&'static str),

    /// Numeric target out of range.
    #[error("no {kind} numbered {index}")]
    OutOfRange {
        /// What was being indexed
        kind: &'static str,
        /// The number given
        index: usize,
    },

    /// Unknown tab name.
    #[error("unknown tab '{0}'")]
    UnknownTab(String),
}

/// Command reference printed by `help`.
pub const HELP: &str = "\
commands:
  open <case|n>      open a case from the list
  enter              leave the boot screen
  pull <lead|n>      pull a lead
  choose <id|n>      choose an intervention
  confirm | cancel   answer a held intervention
  tab <name>         dossier, clues, actions, team, asset, protocol
  next               show the next feed entry (empty line works too)
  skip               show everything queued
  auto               toggle autoplay
  home | replay      leave the case, or replay it after resolution
  reset              forget the save
  look | help | quit";

/// Parses one line of input against what is on screen.
///
/// # Errors
///
/// Returns an [`InputError`] describing what was wrong with the line.
pub fn parse(line: &str, view: &RunView<'_>, cases: &[CaseSummary]) -> Result<Command, InputError> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(Command::Act(Action::AdvanceFeed));
    };
    let target = words.next();

    let action = match verb.to_ascii_lowercase().as_str() {
        "q" | "quit" | "exit" => return Ok(Command::Quit),
        "?" | "h" | "help" => return Ok(Command::Help),
        "l" | "look" => return Ok(Command::Look),
        "open" | "o" => {
            let target = target.ok_or(InputError::MissingTarget("open"))?;
            Action::OpenCase(resolve(target, "case", cases.iter().map(|c| c.id.as_str()))?)
        }
        "enter" | "e" => Action::EnterCase,
        "pull" | "p" => {
            let target = target.ok_or(InputError::MissingTarget("pull"))?;
            Action::PullLead(resolve(target, "lead", view.leads.iter().map(|l| l.id.as_str()))?)
        }
        "choose" | "c" => {
            let target = target.ok_or(InputError::MissingTarget("choose"))?;
            Action::ChooseIntervention(resolve(
                target,
                "intervention",
                view.interventions.iter().map(|i| i.id.as_str()),
            )?)
        }
        "confirm" | "yes" | "y" => Action::ConfirmIntervention,
        "cancel" | "no" => Action::CancelIntervention,
        "tab" | "t" => {
            let target = target.ok_or(InputError::MissingTarget("tab"))?;
            Action::SwitchTab(parse_tab(target)?)
        }
        "next" | "n" => Action::AdvanceFeed,
        "skip" | "s" => Action::SkipFeed,
        "auto" | "a" => Action::ToggleAutoplay,
        "home" => Action::GoHome,
        "replay" | "r" => Action::Replay,
        "reset" => Action::ResetSave,
        other => return Err(InputError::UnknownCommand(other.to_string())),
    };
    Ok(Command::Act(action))
}

/// Resolves a 1-based number against `ids`; anything else is taken as an id.
///
/// Unknown ids pass through so the engine can refuse them as it refuses any
/// other invalid target.
fn resolve<'a>(
    target: &str,
    kind: &'static str,
    mut ids: impl Iterator<Item = &'a str>,
) -> Result<String, InputError> {
    match target.parse::<usize>() {
        Ok(index) => index
            .checked_sub(1)
            .and_then(|i| ids.nth(i))
            .map(str::to_string)
            .ok_or(InputError::OutOfRange { kind, index }),
        Err(_) => Ok(target.to_string()),
    }
}

fn parse_tab(name: &str) -> Result<Tab, InputError> {
    let tab = match name.to_ascii_lowercase().as_str() {
        "dossier" => Tab::Left(LeftTab::Dossier),
        "clues" => Tab::Left(LeftTab::Clues),
        "actions" => Tab::Right(RightTab::Actions),
        "team" => Tab::Right(RightTab::Team),
        "asset" => Tab::Right(RightTab::Asset),
        "protocol" => Tab::Right(RightTab::Protocol),
        _ => return Err(InputError::UnknownTab(name.to_string())),
    };
    Ok(tab)
}
