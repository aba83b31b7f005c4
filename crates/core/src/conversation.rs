//! Conversation-related types.
//!
//! Each user gets an independent [`History`], a FIFO-bounded window of
//! the most recent turns. The [`ConversationStore`] owns every history
//! for the lifetime of the process; nothing is persisted.

use std::collections::{HashMap, VecDeque};
use std::collections::vec_deque;

/// Maximum number of turns retained in a single history.
pub const MAX_HISTORY_TURNS: usize = 10;

/// The speaker of a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    /// The end user.
    User,
    /// The agent.
    Assistant,
}

/// One message in a conversation, tagged with the speaker role.
///
/// Turns are immutable once created.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Turn {
    /// Who produced this turn.
    pub role: Role,
    /// The message text.
    pub content: String,
}

impl Turn {
    /// Creates a user turn.
    #[inline]
    pub fn user<S: Into<String>>(content: S) -> Self {
        Turn {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Creates an assistant turn.
    #[inline]
    pub fn assistant<S: Into<String>>(content: S) -> Self {
        Turn {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// A bounded ordered sequence of turns for one user.
///
/// Insertion order is the conversational order. When the window exceeds
/// [`MAX_HISTORY_TURNS`], the oldest turns are evicted first.
#[derive(Clone, Default, Debug)]
pub struct History {
    turns: VecDeque<Turn>,
}

impl History {
    /// Appends a turn, evicting from the front if the bound is exceeded.
    pub fn push(&mut self, turn: Turn) {
        self.turns.push_back(turn);
        while self.turns.len() > MAX_HISTORY_TURNS {
            self.turns.pop_front();
        }
    }

    /// Returns the number of retained turns.
    #[inline]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Returns `true` if no turns are retained.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Iterates the retained turns in conversational order.
    #[inline]
    pub fn iter(&self) -> vec_deque::Iter<'_, Turn> {
        self.turns.iter()
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a Turn;
    type IntoIter = vec_deque::Iter<'a, Turn>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Mapping from user identifier to [`History`].
///
/// Histories are created lazily on first contact. The store is plain
/// mutable state; callers are responsible for serializing access per
/// user (see the dispatcher in the binary crate).
#[derive(Default, Debug)]
pub struct ConversationStore {
    histories: HashMap<String, History>,
}

impl ConversationStore {
    /// Creates an empty store.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the user's history, creating an empty one if absent.
    pub fn get(&mut self, user_id: &str) -> &History {
        self.histories.entry(user_id.to_owned()).or_default()
    }

    /// Appends a turn to the end of the user's history.
    pub fn append(&mut self, user_id: &str, turn: Turn) {
        self.histories
            .entry(user_id.to_owned())
            .or_default()
            .push(turn);
    }

    /// Replaces the user's history with an empty sequence.
    pub fn reset(&mut self, user_id: &str) {
        self.histories.insert(user_id.to_owned(), History::default());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_bound() {
        let mut history = History::default();
        for i in 0..11 {
            history.push(Turn::user(format!("message {i}")));
        }
        assert_eq!(history.len(), MAX_HISTORY_TURNS);

        // The first-appended turn must be gone, and the rest must keep
        // their original order.
        let contents: Vec<&str> =
            history.iter().map(|t| t.content.as_str()).collect();
        assert_eq!(contents[0], "message 1");
        assert_eq!(contents[9], "message 10");
    }

    #[test]
    fn test_store_creates_lazily() {
        let mut store = ConversationStore::new();
        assert!(store.get("42").is_empty());

        store.append("42", Turn::user("Hi"));
        store.append("42", Turn::assistant("Hey"));
        assert_eq!(store.get("42").len(), 2);

        // Other users are unaffected.
        assert!(store.get("7").is_empty());
    }

    #[test]
    fn test_store_reset() {
        let mut store = ConversationStore::new();
        for _ in 0..5 {
            store.append("42", Turn::user("Hi"));
        }
        store.reset("42");
        assert!(store.get("42").is_empty());

        // Resetting an unknown user is fine too.
        store.reset("7");
        assert!(store.get("7").is_empty());
    }
}
