//! Narrative feed and pacing queue
//!
//! Entries are queued by the resolvers and moved one at a time to the
//! visible log by [`Feed::flush_one`]. The pacing tick and the manual
//! "advance" command call the same primitive, so draining order is always
//! FIFO and nothing is dropped or reordered.

use std::collections::VecDeque;

use serde::Serialize;

use casefile_core::case::FeedLine;

/// Speaker for engine readouts.
pub const SYSTEM: &str = "SYSTEM";

/// Display tags used by the engine.
pub mod tag {
    /// Boot lines.
    pub const ACCESS: &str = "ACCESS";
    /// Team chatter and narrator lines.
    pub const CHAT: &str = "CHAT";
    /// Case briefing and endings.
    pub const CASE: &str = "CASE";
    /// Lead readout for a lead that carried risk.
    pub const NOISY: &str = "NOISY";
    /// Lead readout for a risk-free lead.
    pub const QUIET: &str = "QUIET";
    /// Phase escalation messages.
    pub const ALERT: &str = "ALERT";
}

/// Divider labels used by the engine.
pub mod divider {
    /// Queued by `start_case` after the boot lines.
    pub const CHANNEL_OPEN: &str = "-- CHANNEL OPEN --";
    /// Queued by `enter_case` before the briefing.
    pub const CASE_LIVE: &str = "-- CASE ACTIVE --";
    /// Queued before each lead readout.
    pub const NEW_DATA: &str = "-- NEW DATA --";
    /// Queued before the ending.
    pub const ARCHIVED: &str = "-- CASE ARCHIVED --";
}

/// A single feed entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeedEntry {
    /// A spoken or system message
    Message {
        /// Speaker
        who: String,
        /// Body
        text: String,
        /// Display tag
        tag: String,
    },
    /// A section boundary
    Divider {
        /// Divider label
        label: String,
    },
}

impl FeedEntry {
    /// Builds a message entry.
    #[must_use]
    pub fn message(who: impl Into<String>, text: impl Into<String>, tag: impl Into<String>) -> Self {
        Self::Message {
            who: who.into(),
            text: text.into(),
            tag: tag.into(),
        }
    }

    /// Builds a divider entry.
    #[must_use]
    pub fn divider(label: impl Into<String>) -> Self {
        Self::Divider {
            label: label.into(),
        }
    }

    /// Builds a message from an authored line, using `default_tag` when the
    /// line carries none.
    #[must_use]
    pub fn from_line(line: &FeedLine, default_tag: &str) -> Self {
        Self::message(
            line.who.clone(),
            line.text.clone(),
            line.tag.as_deref().unwrap_or(default_tag),
        )
    }
}

/// Pending queue plus visible log.
#[derive(Debug, Clone, Default)]
pub struct Feed {
    queue: VecDeque<FeedEntry>,
    visible: Vec<FeedEntry>,
}

impl Feed {
    /// Appends a message to the pending queue.
    pub fn push(&mut self, who: impl Into<String>, text: impl Into<String>, tag: impl Into<String>) {
        self.queue.push_back(FeedEntry::message(who, text, tag));
    }

    /// Appends a divider to the pending queue.
    pub fn push_divider(&mut self, label: impl Into<String>) {
        self.queue.push_back(FeedEntry::divider(label));
    }

    /// Appends an authored line to the pending queue.
    pub fn push_line(&mut self, line: &FeedLine, default_tag: &str) {
        self.queue.push_back(FeedEntry::from_line(line, default_tag));
    }

    /// Moves exactly one entry from the queue to the visible log.
    ///
    /// Returns `false` when the queue is empty.
    pub fn flush_one(&mut self) -> bool {
        let Some(entry) = self.queue.pop_front() else {
            return false;
        };
        self.visible.push(entry);
        true
    }

    /// Drains up to `limit` entries, returning how many moved.
    pub fn flush_all(&mut self, limit: usize) -> usize {
        let mut moved = 0;
        while moved < limit && self.flush_one() {
            moved += 1;
        }
        moved
    }

    /// Empties both the queue and the visible log.
    pub fn clear(&mut self) {
        self.queue.clear();
        self.visible.clear();
    }

    /// Entries not yet shown, oldest first.
    pub fn queued(&self) -> impl ExactSizeIterator<Item = &FeedEntry> {
        self.queue.iter()
    }

    /// Number of entries not yet shown.
    #[must_use]
    pub fn queued_len(&self) -> usize {
        self.queue.len()
    }

    /// The visible log, oldest first.
    #[must_use]
    pub fn visible(&self) -> &[FeedEntry] {
        &self.visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_queued() -> Feed {
        let mut feed = Feed::default();
        feed.push(SYSTEM, "one", tag::CASE);
        feed.push_divider(divider::NEW_DATA);
        feed.push("LARK", "three", tag::CHAT);
        feed
    }

    #[test]
    fn test_flush_on_empty_queue_is_noop() {
        let mut feed = Feed::default();
        assert!(!feed.flush_one());
        assert!(feed.visible().is_empty());
    }

    #[test]
    fn test_flush_one_moves_exactly_one() {
        let mut feed = three_queued();
        assert!(feed.flush_one());
        assert_eq!(feed.visible().len(), 1);
        assert_eq!(feed.queued_len(), 2);
        assert_eq!(feed.visible()[0], FeedEntry::message(SYSTEM, "one", tag::CASE));
    }

    #[test]
    fn test_flush_preserves_fifo_order() {
        let mut feed = three_queued();
        let expected: Vec<FeedEntry> = feed.queued().cloned().collect();
        while feed.flush_one() {}
        assert_eq!(feed.visible(), expected.as_slice());
    }

    #[test]
    fn test_flush_all_respects_limit() {
        let mut feed = three_queued();
        assert_eq!(feed.flush_all(2), 2);
        assert_eq!(feed.queued_len(), 1);
        assert_eq!(feed.flush_all(50), 1);
        assert_eq!(feed.flush_all(50), 0);
    }

    #[test]
    fn test_line_tag_defaults() {
        let line = FeedLine {
            who: "VOSS".into(),
            text: "Move.".into(),
            tag: None,
        };
        assert_eq!(
            FeedEntry::from_line(&line, tag::ALERT),
            FeedEntry::message("VOSS", "Move.", tag::ALERT)
        );
        let tagged = FeedLine {
            tag: Some("RADIO".into()),
            ..line
        };
        assert_eq!(
            FeedEntry::from_line(&tagged, tag::ALERT),
            FeedEntry::message("VOSS", "Move.", "RADIO")
        );
    }

    #[test]
    fn test_entries_serialize_with_kind_tag() {
        let json = serde_json::to_value(FeedEntry::divider("x")).unwrap();
        assert_eq!(json["kind"], "divider");
        assert_eq!(json["label"], "x");
    }
}
