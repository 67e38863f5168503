//! In-memory backends shared by the unit tests

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use crate::backend::{BackendError, ChatBackend, TranslationBackend};
use crate::events::{ChatEvent, Notifier};
use crate::responder::ChatWidget;
use crate::storage::{ChatHistory, LocalStorage};
use crate::voice::SpeechRecognizer;

#[derive(Clone)]
pub struct FakeChat {
    reply: Result<String, BackendError>,
    calls: Arc<AtomicUsize>,
    seen: Arc<Mutex<Vec<String>>>,
}

impl FakeChat {
    pub fn replying(reply: &str) -> Self {
        Self::with_result(Ok(reply.to_string()))
    }

    pub fn failing(err: BackendError) -> Self {
        Self::with_result(Err(err))
    }

    fn with_result(reply: Result<String, BackendError>) -> Self {
        Self {
            reply,
            calls: Arc::new(AtomicUsize::new(0)),
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatBackend for FakeChat {
    async fn chat(&self, text: &str) -> Result<String, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(text.to_string());
        self.reply.clone()
    }
}

/// Translates by tagging text with the language, failing for chosen inputs
#[derive(Clone, Default)]
pub struct FakeTranslator {
    reject: Vec<String>,
    unreachable: Vec<String>,
    requests: Arc<Mutex<Vec<(String, String)>>>,
}

impl FakeTranslator {
    pub fn echo() -> Self {
        Self::default()
    }

    /// Answer without a translation for this text
    pub fn rejecting(mut self, text: &str) -> Self {
        self.reject.push(text.to_string());
        self
    }

    /// Fail the request itself for this text
    pub fn unreachable_for(mut self, text: &str) -> Self {
        self.unreachable.push(text.to_string());
        self
    }

    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl TranslationBackend for FakeTranslator {
    async fn translate(&self, text: &str, target_lang: &str) -> Result<String, BackendError> {
        self.requests
            .lock()
            .unwrap()
            .push((text.to_string(), target_lang.to_string()));
        if self.reject.iter().any(|t| t == text) {
            return Err(BackendError::Rejected("Translation failed".to_string()));
        }
        if self.unreachable.iter().any(|t| t == text) {
            return Err(BackendError::Transport("connection refused".to_string()));
        }
        Ok(format!("[{}] {}", target_lang, text))
    }
}

pub struct FakeRecognizer {
    transcript: String,
}

impl FakeRecognizer {
    pub fn hearing(transcript: &str) -> Arc<dyn SpeechRecognizer> {
        Arc::new(Self {
            transcript: transcript.to_string(),
        })
    }
}

#[async_trait]
impl SpeechRecognizer for FakeRecognizer {
    async fn recognize(&self, _locale: &str) -> anyhow::Result<String> {
        Ok(self.transcript.clone())
    }
}

/// A widget persisting into a fresh temporary directory
pub fn widget_with(chat: FakeChat, translator: FakeTranslator) -> (TempDir, ChatWidget) {
    let dir = TempDir::new().unwrap();
    let history = ChatHistory::new(LocalStorage::new(dir.path()));
    let widget = ChatWidget::new(history, Arc::new(chat), Arc::new(translator));
    (dir, widget)
}

/// Keeps every event in memory so tests can assert on them
#[derive(Default)]
pub struct RecordingNotifier {
    events: Mutex<Vec<ChatEvent>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take all events recorded so far
    pub fn drain(&self) -> Vec<ChatEvent> {
        std::mem::take(&mut *self.events.lock().unwrap())
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, event: ChatEvent) {
        self.events.lock().unwrap().push(event);
    }
}
