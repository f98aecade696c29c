//! Structured event stream.
//!
//! Discrete, typed events describing a run: cases opened and entered, leads
//! pulled, phase changes, advisories, held and resolved interventions.
//! Events are serialized as newline-delimited JSON (JSONL) and include a
//! monotonically increasing sequence number for ordering guarantees.

use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::engine::{Advisory, Outcome};

// ---------------------------------------------------------------------------
// Event variants
// ---------------------------------------------------------------------------

/// A discrete event emitted during a run.
///
/// Each variant is tagged with `"type"` when serialized to JSON so consumers
/// can dispatch on the event kind.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum Event {
    /// A case was installed and its run started.
    CaseOpened {
        /// When the case was opened.
        timestamp: DateTime<Utc>,
        /// Case id.
        case_id: String,
        /// Case title.
        title: String,
        /// Pull budget for the run.
        pulls_max: u32,
        /// Starting threat.
        threat: i32,
    },

    /// The player entered the case from the boot screen.
    CaseEntered {
        /// When the case was entered.
        timestamp: DateTime<Utc>,
        /// Case id.
        case_id: String,
    },

    /// A lead was pulled.
    LeadPulled {
        /// When the lead was pulled.
        timestamp: DateTime<Utc>,
        /// Lead id.
        lead_id: String,
        /// Pulls spent so far, including this one.
        pulls_used: u32,
        /// Risk after the pull.
        risk: u32,
        /// Threat after the pull.
        threat: i32,
        /// Evidence tag count after the pull.
        tags: usize,
    },

    /// The phase changed.
    PhaseAdvanced {
        /// When the phase changed.
        timestamp: DateTime<Utc>,
        /// Phase before.
        from_phase: u32,
        /// Phase after.
        to_phase: u32,
        /// Pull count that fired the trigger.
        at_pull: u32,
    },

    /// A one-shot advisory fired.
    AdvisoryIssued {
        /// When the advisory fired.
        timestamp: DateTime<Utc>,
        /// Advisory kind.
        advisory: Advisory,
    },

    /// An intervention was held by the confirmation gate.
    InterventionHeld {
        /// When the hold began.
        timestamp: DateTime<Utc>,
        /// Held intervention id.
        intervention_id: String,
    },

    /// The case resolved.
    CaseResolved {
        /// When the case resolved.
        timestamp: DateTime<Utc>,
        /// Resolved intervention id.
        intervention_id: String,
        /// Classified outcome.
        outcome: Outcome,
        /// Evidence tag count at resolution.
        evidence: usize,
        /// Final risk.
        risk: u32,
        /// Final threat.
        threat: i32,
    },

    /// The run was discarded by returning home.
    RunReset {
        /// When the run was reset.
        timestamp: DateTime<Utc>,
    },
}

// ---------------------------------------------------------------------------
// Envelope (adds sequence number via serde flatten)
// ---------------------------------------------------------------------------

/// Wraps an [`Event`] with a monotonically increasing sequence number.
#[derive(Debug, Serialize)]
struct EventEnvelope {
    /// Zero-based, monotonically increasing sequence counter.
    sequence: u64,
    /// The wrapped event (flattened into the same JSON object).
    #[serde(flatten)]
    event: Event,
}

// ---------------------------------------------------------------------------
// Emitter
// ---------------------------------------------------------------------------

/// Thread-safe, buffered JSONL event writer.
///
/// Each call to [`emit`](Self::emit) atomically increments the sequence
/// counter, serializes the event as a single JSON line, and flushes the
/// underlying writer. Serialization or I/O failures are silently dropped.
pub struct EventEmitter {
    writer: Mutex<BufWriter<Box<dyn Write + Send>>>,
    sequence: AtomicU64,
}

// Box<dyn Write> is not Debug
impl std::fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("sequence", &self.sequence.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl EventEmitter {
    /// Creates an emitter that writes to the given writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(BufWriter::new(writer)),
            sequence: AtomicU64::new(0),
        }
    }

    /// Creates an emitter that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(Box::new(std::io::stderr()))
    }

    /// Creates an emitter that silently discards all events.
    #[must_use]
    pub fn noop() -> Self {
        Self::new(Box::new(std::io::sink()))
    }

    /// Creates an emitter that writes to a file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be created or opened.
    pub fn from_file(path: &Path) -> std::io::Result<Self> {
        let file = std::fs::File::create(path)?;
        Ok(Self::new(Box::new(file)))
    }

    /// Emits an event as a single JSONL line.
    pub fn emit(&self, event: Event) {
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst);
        let envelope = EventEnvelope {
            sequence: seq,
            event,
        };

        if let Ok(mut w) = self.writer.lock() {
            if let Ok(line) = serde_json::to_string(&envelope) {
                let _ = writeln!(w, "{line}");
                let _ = w.flush();
            }
        }
    }

    /// Returns the number of events emitted so far.
    #[must_use]
    pub fn event_count(&self) -> u64 {
        self.sequence.load(Ordering::Relaxed)
    }
}

impl Default for EventEmitter {
    fn default() -> Self {
        Self::noop()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
