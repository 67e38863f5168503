//! The chat widget core: accepts user text, answers it from the canned table
//! or the remote backend, and writes the log through to storage.

use std::sync::Arc;
use std::time::Instant;

use crate::backend::{BackendError, ChatBackend, TranslationBackend};
use crate::canned::CannedResponses;
use crate::events::{ChatEvent, Notifier, NullNotifier};
use crate::session::SessionState;
use crate::state::{ChatLog, Message};
use crate::storage::ChatHistory;
use crate::voice::{SpeechRecognizer, SPEECH_LOCALE};

/// Appended in place of a reply when the chat backend fails
pub const SERVER_UNREACHABLE: &str = "⚠️ Server unreachable. Try again later.";

/// Alert raised when no speech recognizer is configured
pub const SPEECH_UNSUPPORTED: &str = "Speech recognition not supported.";

/// Handle to a reply the remote backend still owes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReplyTicket(u64);

/// What happened to a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Empty or rate-limited; nothing changed
    Ignored,
    /// Answered from the canned table
    Answered,
    /// Waiting on the chat backend. The host sends `text` and calls `finish_reply`.
    Pending { ticket: ReplyTicket, text: String },
}

/// Result of asking to start a voice capture
pub enum VoiceStart {
    Unavailable,
    Busy,
    Started(Arc<dyn SpeechRecognizer>),
}

pub struct ChatWidget {
    log: ChatLog,
    canned: CannedResponses,
    history: ChatHistory,
    session: SessionState,
    pending: Vec<ReplyTicket>,
    next_ticket: u64,
    chat: Arc<dyn ChatBackend>,
    translator: Arc<dyn TranslationBackend>,
    recognizer: Option<Arc<dyn SpeechRecognizer>>,
    notifier: Arc<dyn Notifier>,
}

impl ChatWidget {
    /// Build a widget, restoring whatever history was saved before
    pub fn new(
        history: ChatHistory,
        chat: Arc<dyn ChatBackend>,
        translator: Arc<dyn TranslationBackend>,
    ) -> Self {
        let log = history.load();
        Self {
            log,
            canned: CannedResponses::new(),
            history,
            session: SessionState::new(),
            pending: Vec::new(),
            next_ticket: 0,
            chat,
            translator,
            recognizer: None,
            notifier: Arc::new(NullNotifier),
        }
    }

    pub fn with_recognizer(mut self, recognizer: Option<Arc<dyn SpeechRecognizer>>) -> Self {
        self.recognizer = recognizer;
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn log(&self) -> &ChatLog {
        &self.log
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn is_listening(&self) -> bool {
        self.session.is_listening
    }

    /// True while at least one reply is outstanding
    pub fn is_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Shortcuts are offered until the conversation starts
    pub fn show_common_questions(&self) -> bool {
        self.log.is_empty() && self.pending.is_empty()
    }

    pub fn chat_backend(&self) -> Arc<dyn ChatBackend> {
        Arc::clone(&self.chat)
    }

    pub fn translation_backend(&self) -> Arc<dyn TranslationBackend> {
        Arc::clone(&self.translator)
    }

    /// Validate and record user text, answering it immediately when possible
    pub fn begin_submit(&mut self, text: &str, now: Instant) -> Submission {
        let text = text.trim();
        if text.is_empty() {
            return Submission::Ignored;
        }
        if !self.session.try_accept(now) {
            tracing::debug!("dropping submission inside rate-limit window");
            return Submission::Ignored;
        }

        self.log.push(Message::user(text));

        if let Some(answer) = self.canned.lookup(text) {
            let answer = answer.to_string();
            tracing::debug!("answered from canned table");
            self.log.push(Message::assistant(answer));
            self.persist();
            return Submission::Answered;
        }

        let ticket = ReplyTicket(self.next_ticket);
        self.next_ticket += 1;
        self.pending.push(ticket);
        self.persist();

        Submission::Pending {
            ticket,
            text: text.to_string(),
        }
    }

    /// Replace the pending indicator with the backend's answer or the fixed warning
    pub fn finish_reply(&mut self, ticket: ReplyTicket, result: Result<String, BackendError>) {
        let Some(pos) = self.pending.iter().position(|t| *t == ticket) else {
            tracing::debug!("ignoring repeated completion for {:?}", ticket);
            return;
        };
        self.pending.remove(pos);

        match result {
            Ok(reply) => {
                self.log.push(Message::assistant(reply));
            }
            Err(e) => {
                tracing::warn!("chat backend error: {}", e);
                self.log.push(Message::error(SERVER_UNREACHABLE));
            }
        }
        self.persist();
    }

    /// Submit and, on a canned miss, await the backend inline
    pub async fn submit(&mut self, text: &str, now: Instant) -> Submission {
        let submission = self.begin_submit(text, now);
        if let Submission::Pending { ticket, text } = &submission {
            let result = self.chat.chat(text).await;
            self.finish_reply(*ticket, result);
        }
        submission
    }

    /// Empty the log and forget the saved history. Replies still in flight
    /// are kept and land in the fresh log.
    pub fn clear(&mut self) {
        self.log.clear();
        if let Err(e) = self.history.clear() {
            tracing::warn!("could not remove chat history: {:#}", e);
        }
        self.notifier.notify(ChatEvent::LogChanged);
    }

    pub fn begin_voice(&mut self) -> VoiceStart {
        if self.session.is_listening {
            return VoiceStart::Busy;
        }
        let Some(recognizer) = self.recognizer.clone() else {
            self.notifier.notify(ChatEvent::Alert(SPEECH_UNSUPPORTED.to_string()));
            return VoiceStart::Unavailable;
        };
        self.session.is_listening = true;
        self.notifier.notify(ChatEvent::ListeningChanged(true));
        VoiceStart::Started(recognizer)
    }

    /// End the capture session. Returns the transcript to submit, if any.
    pub fn finish_voice(&mut self, result: anyhow::Result<String>) -> Option<String> {
        self.session.is_listening = false;
        self.notifier.notify(ChatEvent::ListeningChanged(false));
        match result {
            Ok(transcript) => Some(transcript),
            Err(e) => {
                tracing::debug!("speech recognition ended without result: {:#}", e);
                None
            }
        }
    }

    /// Capture one utterance and feed it to the responder
    pub async fn dictate(&mut self) -> Option<Submission> {
        let VoiceStart::Started(recognizer) = self.begin_voice() else {
            return None;
        };
        let result = recognizer.recognize(SPEECH_LOCALE).await;
        let transcript = self.finish_voice(result)?;
        Some(self.submit(&transcript, Instant::now()).await)
    }

    pub(crate) fn log_mut(&mut self) -> &mut ChatLog {
        &mut self.log
    }

    pub(crate) fn persist(&mut self) {
        if let Err(e) = self.history.save(&self.log) {
            tracing::warn!("could not save chat history: {:#}", e);
        }
        self.notifier.notify(ChatEvent::LogChanged);
    }
}
