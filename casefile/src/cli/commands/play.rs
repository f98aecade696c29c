//! `play`: the interactive terminal front end
//!
//! One task `select!`s over input lines, the autoplay pacing tick and the
//! shutdown token. Every branch calls into the same [`Session`]
//! synchronously, so two mutations never interleave.

use std::io::{IsTerminal, Write};
use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::case::CaseSummary;
use crate::cli::args::{ColorChoice, PlayArgs};
use crate::cli::input::{self, Command, HELP};
use crate::cli::render::Renderer;
use crate::engine::Screen;
use crate::error::CasefileError;
use crate::observability::EventEmitter;
use crate::observability::logging::use_color;
use crate::persistence::FileSaveStore;
use crate::session::{Action, Session};

use super::open_library;

/// Run the interactive game on stdin/stdout.
///
/// # Errors
///
/// Returns an error if the events file cannot be created, if `--case` names
/// a case the library cannot provide, or on terminal I/O failure.
pub async fn run(
    args: &PlayArgs,
    color: ColorChoice,
    cancel: CancellationToken,
) -> Result<(), CasefileError> {
    let library = open_library(args.library.as_deref())?;
    let saves = FileSaveStore::new(&args.save_dir);
    let events = match &args.events_file {
        Some(path) => EventEmitter::from_file(path)?,
        None => EventEmitter::noop(),
    };
    let mut session =
        Session::new(library, Box::new(saves), events).with_autoplay(args.autoplay);

    if let Some(id) = &args.case {
        session.dispatch(Action::OpenCase(id.clone()))?;
    }

    let renderer = Renderer::new(use_color(color, std::io::stdout().is_terminal()));
    let input = BufReader::new(tokio::io::stdin());
    let pace = Duration::from_millis(args.pace_ms);

    play_loop(&mut session, input, std::io::stdout(), renderer, pace, cancel).await?;
    info!(events = session.events().event_count(), "session ended");
    Ok(())
}

/// Drives `session` from `input` until quit, end of input or cancellation.
///
/// # Errors
///
/// Returns an I/O error if reading input or writing output fails.
pub async fn play_loop<R, W>(
    session: &mut Session,
    input: R,
    mut out: W,
    renderer: Renderer,
    pace: Duration,
    cancel: CancellationToken,
) -> Result<(), CasefileError>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let cases = session.case_index().unwrap_or_else(|e| {
        warn!(error = %e, "case index unavailable");
        Vec::new()
    });

    let mut printer = Printer::new(renderer);
    printer.show(session, &cases, &mut out, true)?;

    let mut lines = input.lines();
    let mut ticker = tokio::time::interval(pace);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            () = cancel.cancelled() => {
                info!("play cancelled");
                break;
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                let command = {
                    let view = session.state().view();
                    input::parse(&line, &view, &cases)
                };
                match command {
                    Ok(Command::Quit) => break,
                    Ok(Command::Help) => writeln!(out, "{HELP}")?,
                    Ok(Command::Look) => printer.show(session, &cases, &mut out, true)?,
                    Ok(Command::Act(action)) => {
                        let detailed = !matches!(action, Action::AdvanceFeed | Action::SkipFeed);
                        match session.dispatch(action) {
                            Ok(true) => printer.show(session, &cases, &mut out, detailed)?,
                            Ok(false) => {}
                            Err(e) => writeln!(out, "{e}")?,
                        }
                    }
                    Err(e) => writeln!(out, "{e}")?,
                }
            }
            _ = ticker.tick() => {
                if session.tick() {
                    printer.show(session, &cases, &mut out, false)?;
                }
            }
        }
        out.flush()?;
    }

    out.flush()?;
    Ok(())
}

/// Tracks what has already been written so each frame only adds news.
#[derive(Debug)]
struct Printer {
    renderer: Renderer,
    shown: usize,
    screen: Option<Screen>,
}

impl Printer {
    const fn new(renderer: Renderer) -> Self {
        Self {
            renderer,
            shown: 0,
            screen: None,
        }
    }

    fn show<W: Write>(
        &mut self,
        session: &Session,
        cases: &[CaseSummary],
        out: &mut W,
        detailed: bool,
    ) -> std::io::Result<()> {
        let view = session.state().view();

        if view.feed.len() < self.shown {
            self.shown = 0;
        }
        for entry in &view.feed[self.shown..] {
            writeln!(out, "{}", self.renderer.entry(entry))?;
        }
        self.shown = view.feed.len();

        let entered = self.screen != Some(view.screen);
        self.screen = Some(view.screen);

        match view.screen {
            Screen::Home if entered || detailed => {
                let save = session.last_save();
                write!(out, "{}", self.renderer.home(cases, save.as_ref()))?;
            }
            Screen::Boot if entered => {
                writeln!(out, "{}", self.renderer.status(&view))?;
                writeln!(out, "(next to read on, enter to begin)")?;
            }
            Screen::Case if entered || detailed => {
                writeln!(out, "{}", self.renderer.status(&view))?;
                write!(out, "{}", self.renderer.panels(&view))?;
            }
            Screen::Results if entered => {
                write!(out, "{}", self.renderer.results(&view))?;
            }
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::case::BuiltinLibrary;
    use crate::persistence::MemorySaveStore;

    fn session() -> Session {
        Session::new(
            Box::new(BuiltinLibrary::default()),
            Box::new(MemorySaveStore::default()),
            EventEmitter::noop(),
        )
    }

    async fn drive(session: &mut Session, script: &str) -> String {
        let mut out = Vec::new();
        play_loop(
            session,
            script.as_bytes(),
            &mut out,
            Renderer::new(false),
            Duration::from_secs(3600),
            CancellationToken::new(),
        )
        .await
        .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn test_home_screen_lists_builtin_cases() {
        let mut session = session();
        let out = drive(&mut session, "quit\n").await;
        assert!(out.contains("CASE FILES"));
        assert!(out.contains("night-shift"));
    }

    #[tokio::test]
    async fn test_open_enter_and_pull() {
        let mut session = session();
        let out = drive(&mut session, "open night-shift\nskip\nenter\nskip\npull records\nskip\n").await;
        assert!(out.contains("LINK ESTABLISHED"));
        assert!(out.contains("-- NEW DATA --"));
        assert_eq!(session.state().pulls_used(), 1);
        assert_eq!(session.state().screen(), Screen::Case);
    }

    #[tokio::test]
    async fn test_bad_input_reports_and_continues() {
        let mut session = session();
        let out = drive(&mut session, "dance\nopen nowhere\nopen 1\n").await;
        assert!(out.contains("unknown command 'dance'"));
        assert!(out.contains("unknown case 'nowhere'"));
        assert_eq!(session.state().screen(), Screen::Boot);
    }

    #[tokio::test]
    async fn test_end_of_input_stops_loop() {
        let mut session = session();
        let out = drive(&mut session, "").await;
        assert!(out.contains("CASE FILES"));
    }

    #[tokio::test]
    async fn test_cancelled_token_stops_loop() {
        let mut session = session();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let (_keep_open, reader) = tokio::io::duplex(64);
        let mut out = Vec::new();
        play_loop(
            &mut session,
            BufReader::new(reader),
            &mut out,
            Renderer::new(false),
            Duration::from_secs(3600),
            cancel,
        )
        .await
        .unwrap();
        assert_eq!(session.state().screen(), Screen::Home);
    }

    #[tokio::test(start_paused = true)]
    async fn test_autoplay_request_outlives_typed_open() {
        let mut session = session().with_autoplay(true);

        let (mut writer, reader) = tokio::io::duplex(64);
        let cancel = CancellationToken::new();
        let stop = cancel.clone();
        tokio::spawn(async move {
            use tokio::io::AsyncWriteExt;
            writer.write_all(b"open night-shift\n").await.unwrap();
            tokio::time::sleep(Duration::from_millis(1400 * 2 + 700)).await;
            stop.cancel();
            let _ = writer.shutdown().await;
        });

        let mut out = Vec::new();
        play_loop(
            &mut session,
            BufReader::new(reader),
            &mut out,
            Renderer::new(false),
            Duration::from_millis(1400),
            cancel,
        )
        .await
        .unwrap();

        // No advance was typed: every visible entry came from a tick.
        assert!(session.state().autoplay());
        assert!(session.state().visible_feed().len() >= 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_autoplay_tick_drains_queue() {
        let mut session = session();
        session.dispatch(Action::OpenCase("night-shift".to_string())).unwrap();
        session.dispatch(Action::ToggleAutoplay).unwrap();
        let queued = session.state().feed().queued_len();

        let (mut writer, reader) = tokio::io::duplex(64);
        let cancel = CancellationToken::new();
        let stop = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(1400 * 2 + 700)).await;
            stop.cancel();
            use tokio::io::AsyncWriteExt;
            let _ = writer.shutdown().await;
        });

        let mut out = Vec::new();
        play_loop(
            &mut session,
            BufReader::new(reader),
            &mut out,
            Renderer::new(false),
            Duration::from_millis(1400),
            cancel,
        )
        .await
        .unwrap();

        // Ticks at 0, 1400 and 2800 ms.
        assert_eq!(session.state().feed().queued_len(), queued - 3);
    }
}
