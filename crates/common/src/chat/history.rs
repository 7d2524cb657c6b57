//! Bounded chat history
//!
//! Keeps only the most recent [`MAX_HISTORY_MESSAGES`] messages so the
//! serialized form stays small enough for browser storage.

use super::ChatMessage;
use crate::errors::Result;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Maximum number of messages retained
pub const MAX_HISTORY_MESSAGES: usize = 100;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatHistory {
    messages: VecDeque<ChatMessage>,
}

impl ChatHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message, evicting the oldest beyond the cap
    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push_back(message);
        while self.messages.len() > MAX_HISTORY_MESSAGES {
            self.messages.pop_front();
        }
    }

    /// Replace the content of a message in place, e.g. while its answer streams
    pub fn update_content(&mut self, id: &str, content: impl Into<String>) -> bool {
        match self.messages.iter_mut().find(|m| m.id == id) {
            Some(message) => {
                message.content = content.into();
                true
            }
            None => false,
        }
    }

    pub fn messages(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Restore from stored JSON. Corrupt data yields an empty history.
    pub fn from_json(stored: &str) -> Self {
        match serde_json::from_str::<Vec<ChatMessage>>(stored) {
            Ok(messages) => {
                let mut history = Self::new();
                messages.into_iter().for_each(|m| history.push(m));
                history
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load chat history, starting empty");
                Self::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_is_capped() {
        let mut history = ChatHistory::new();
        for i in 0..(MAX_HISTORY_MESSAGES + 5) {
            history.push(ChatMessage::user(format!("question {}", i)));
        }

        assert_eq!(history.len(), MAX_HISTORY_MESSAGES);
        let first = history.messages().next().unwrap();
        assert_eq!(first.content, "question 5");
    }

    #[test]
    fn test_round_trip_through_json() {
        let mut history = ChatHistory::new();
        history.push(ChatMessage::user("Who is Moses?"));
        history.push(ChatMessage::assistant("A prophet."));

        let restored = ChatHistory::from_json(&history.to_json().unwrap());
        assert_eq!(restored, history);
    }

    #[test]
    fn test_corrupt_json_yields_empty() {
        let history = ChatHistory::from_json("{not json");
        assert!(history.is_empty());
    }

    #[test]
    fn test_oversized_stored_history_is_trimmed() {
        let stored: Vec<ChatMessage> = (0..150)
            .map(|i| ChatMessage::assistant(format!("answer {}", i)))
            .collect();
        let history = ChatHistory::from_json(&serde_json::to_string(&stored).unwrap());
        assert_eq!(history.len(), MAX_HISTORY_MESSAGES);
        assert_eq!(history.messages().last().unwrap().content, "answer 149");
    }

    #[test]
    fn test_update_and_clear() {
        let mut history = ChatHistory::new();
        let msg = ChatMessage::assistant("");
        let id = msg.id.clone();
        history.push(msg);

        assert!(history.update_content(&id, "streamed text"));
        assert!(!history.update_content("missing", "x"));
        assert_eq!(history.messages().next().unwrap().content, "streamed text");

        history.clear();
        assert!(history.is_empty());
    }
}
