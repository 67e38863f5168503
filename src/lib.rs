pub mod backend;
pub mod canned;
pub mod config;
pub mod events;
pub mod export;
pub mod language;
pub mod logging;
pub mod responder;
pub mod session;
pub mod state;
pub mod storage;
pub mod theme;
pub mod translation;
pub mod voice;

#[cfg(test)]
mod testing;

// Re-export main types for convenience
pub use backend::{BackendError, ChatBackend, HttpBackend, TranslationBackend};
pub use canned::{CannedResponses, COMMON_QUESTIONS};
pub use config::Config;
pub use events::{ChatEvent, Notifier};
pub use language::Language;
pub use responder::{ChatWidget, ReplyTicket, Submission, VoiceStart};
pub use state::{Author, ChatLog, Message, MessageId, MessageKind, WELCOME_MESSAGE};
pub use storage::{ChatHistory, LocalStorage};
pub use theme::Theme;
pub use voice::{CommandRecognizer, SpeechRecognizer};
