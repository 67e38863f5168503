//! UI-agnostic chat state
//!
//! The structured message list is the source of truth. Hosts derive their
//! rendered view from it and the persistence layer stores it as plain records.

use serde::{Deserialize, Serialize};

/// Text shown in place of the log while no message has been exchanged
pub const WELCOME_MESSAGE: &str =
    "Hi, I'm MindGuard. Ask me anything about mental health, or pick one of the common questions below.";

/// Process-local handle to a message in the log
pub type MessageId = u64;

/// Who wrote a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Author {
    User,
    Assistant,
}

/// Presentation class of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    #[default]
    Normal,
    Error,
}

/// A single entry in the chat log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    #[serde(skip)]
    pub id: MessageId,
    pub author: Author,
    pub text: String,
    #[serde(default)]
    pub kind: MessageKind,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            id: 0,
            author: Author::User,
            text: text.into(),
            kind: MessageKind::Normal,
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            id: 0,
            author: Author::Assistant,
            text: text.into(),
            kind: MessageKind::Normal,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            id: 0,
            author: Author::Assistant,
            text: text.into(),
            kind: MessageKind::Error,
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == MessageKind::Error
    }
}

/// Ordered conversation history
#[derive(Debug, Clone, Default)]
pub struct ChatLog {
    messages: Vec<Message>,
    next_id: MessageId,
}

impl ChatLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a log from persisted records, assigning fresh ids in document order
    pub fn from_records(records: Vec<Message>) -> Self {
        let mut log = Self::new();
        for message in records {
            log.push(message);
        }
        log
    }

    /// The neutral persisted form of the log
    pub fn records(&self) -> &[Message] {
        &self.messages
    }

    /// Append a message and return the id it was given
    pub fn push(&mut self, mut message: Message) -> MessageId {
        let id = self.next_id;
        self.next_id += 1;
        message.id = id;
        self.messages.push(message);
        id
    }

    /// Overwrite the text of a message in place. Returns false if the id is gone.
    pub fn replace_text(&mut self, id: MessageId, text: impl Into<String>) -> bool {
        match self.messages.iter_mut().find(|m| m.id == id) {
            Some(message) => {
                message.text = text.into();
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl PartialEq for ChatLog {
    // Ids are process-local, so two logs match when their records do.
    fn eq(&self, other: &Self) -> bool {
        self.messages.len() == other.messages.len()
            && self
                .messages
                .iter()
                .zip(&other.messages)
                .all(|(a, b)| a.author == b.author && a.text == b.text && a.kind == b.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_assigns_increasing_ids() {
        let mut log = ChatLog::new();
        let a = log.push(Message::user("hi"));
        let b = log.push(Message::assistant("hello"));
        assert!(b > a);
        assert_eq!(log.len(), 2);
        let last = log.last().unwrap();
        assert_eq!((last.id, last.text.as_str()), (b, "hello"));
    }

    #[test]
    fn test_replace_text_keeps_order() {
        let mut log = ChatLog::new();
        let first = log.push(Message::user("one"));
        log.push(Message::assistant("two"));
        assert!(log.replace_text(first, "uno"));

        let texts: Vec<&str> = log.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["uno", "two"]);
    }

    #[test]
    fn test_replace_text_after_clear_is_noop() {
        let mut log = ChatLog::new();
        let id = log.push(Message::user("one"));
        log.clear();
        assert!(!log.replace_text(id, "uno"));
        assert!(log.is_empty());
    }

    #[test]
    fn test_ids_not_reused_after_clear() {
        let mut log = ChatLog::new();
        let old = log.push(Message::user("one"));
        log.clear();
        let new = log.push(Message::user("two"));
        assert_ne!(old, new);
    }

    #[test]
    fn test_records_serialize_without_ids() {
        let mut log = ChatLog::new();
        log.push(Message::user("hi"));
        log.push(Message::error("boom"));

        let json = serde_json::to_string(log.records()).unwrap();
        assert_eq!(
            json,
            r#"[{"author":"user","text":"hi","kind":"normal"},{"author":"assistant","text":"boom","kind":"error"}]"#
        );
    }

    #[test]
    fn test_from_records_matches_original() {
        let mut log = ChatLog::new();
        log.push(Message::user("hi"));
        log.push(Message::assistant("hello"));

        let json = serde_json::to_string(log.records()).unwrap();
        let records: Vec<Message> = serde_json::from_str(&json).unwrap();
        assert_eq!(ChatLog::from_records(records), log);
    }

    #[test]
    fn test_missing_kind_defaults_to_normal() {
        let records: Vec<Message> =
            serde_json::from_str(r#"[{"author":"assistant","text":"hello"}]"#).unwrap();
        assert_eq!(records[0].kind, MessageKind::Normal);
    }
}
