//! Bounded conversation history.
//!
//! The buffer keeps at most [`HISTORY_CAPACITY`] entries (ten exchanges);
//! prompt assembly reads only the most recent [`HISTORY_RENDER_WINDOW`].

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// Entries retained by the buffer.
pub const HISTORY_CAPACITY: usize = 20;

/// Entries rendered into the system prompt.
pub const HISTORY_RENDER_WINDOW: usize = 10;

/// Who said a line of the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Speaker {
    Teacher,
    Student,
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Teacher => f.write_str("Teacher"),
            Self::Student => f.write_str("Student"),
        }
    }
}

/// One line of the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationEntry {
    pub speaker: Speaker,
    pub message: String,
}

impl fmt::Display for ConversationEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.speaker, self.message)
    }
}

/// Append-only, capacity-bounded history; the oldest entries fall off first.
#[derive(Debug, Clone)]
pub struct ConversationHistory {
    entries: VecDeque<ConversationEntry>,
    capacity: usize,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn append(&mut self, speaker: Speaker, message: impl Into<String>) {
        self.entries.push_back(ConversationEntry {
            speaker,
            message: message.into(),
        });
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// The last `n` entries in chronological order.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &ConversationEntry> {
        self.entries.iter().skip(self.entries.len().saturating_sub(n))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConversationEntry> {
        self.entries.iter()
    }
}

impl Default for ConversationHistory {
    fn default() -> Self {
        Self::new()
    }
}
