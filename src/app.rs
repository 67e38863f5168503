use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use ratatui::layout::Rect;
use ratatui::widgets::ListState;
use tokio::sync::mpsc::UnboundedSender;

use mindguard_chat::export::export_to;
use mindguard_chat::{
    BackendError, ChatBackend, ChatEvent, ChatHistory, ChatWidget, CommandRecognizer, Config, HttpBackend,
    Language, LocalStorage, MessageId, Notifier, ReplyTicket, SpeechRecognizer, Submission,
    Theme, TranslationBackend, VoiceStart, COMMON_QUESTIONS,
};
use mindguard_chat::voice::SPEECH_LOCALE;

use crate::tui::AppEvent;

/// Delay between choosing a common question and sending it
const SHORTCUT_DELAY: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

/// Forwards core events into the main loop
struct AppNotifier(UnboundedSender<AppEvent>);

impl Notifier for AppNotifier {
    fn notify(&self, event: ChatEvent) {
        let _ = self.0.send(AppEvent::Chat(event));
    }
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub input_mode: InputMode,
    pub widget: ChatWidget,
    pub theme: Theme,

    // Input state
    pub input: String,
    pub cursor: usize, // cursor position in input, in chars

    // Chat view state
    pub chat_scroll: u16,
    pub chat_height: u16, // Height of chat area for scroll calculations
    pub chat_width: u16,  // Width of chat area for wrap calculations
    pub chat_area: Option<Rect>,

    // Translation state
    pub language: Language,
    translation_runs: usize, // language switches still translating
    pub show_language_picker: bool,
    pub language_picker_state: ListState,

    // Notices
    pub alert: Option<String>,
    pub status: Option<String>,

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation

    pub export_dir: PathBuf,
    events: UnboundedSender<AppEvent>,
}

impl App {
    pub fn new(config: &Config, events: UnboundedSender<AppEvent>) -> anyhow::Result<Self> {
        let backend = Arc::new(HttpBackend::new(&config.backend_url()));
        let history = ChatHistory::new(LocalStorage::new(config.data_dir()?));

        let recognizer = config
            .speech_command()
            .and_then(|cmd| CommandRecognizer::from_command_line(&cmd))
            .map(|r| Arc::new(r) as Arc<dyn SpeechRecognizer>);

        let widget = ChatWidget::new(history, backend.clone(), backend)
            .with_recognizer(recognizer)
            .with_notifier(Arc::new(AppNotifier(events.clone())));

        tracing::info!(
            "chat widget ready with {} restored messages, backend {}",
            widget.log().len(),
            config.backend_url()
        );

        Ok(Self::with_widget(widget, config.export_dir(), events))
    }

    pub fn with_widget(widget: ChatWidget, export_dir: PathBuf, events: UnboundedSender<AppEvent>) -> Self {
        Self {
            should_quit: false,
            input_mode: InputMode::Editing,
            widget,
            theme: Theme::default(),

            input: String::new(),
            cursor: 0,

            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,
            chat_area: None,

            language: Language::DEFAULT,
            translation_runs: 0,
            show_language_picker: false,
            language_picker_state: ListState::default(),

            alert: None,
            status: None,

            animation_frame: 0,

            export_dir,
            events,
        }
    }

    /// Hand the input box to the responder
    pub fn send_input(&mut self) {
        let submission = self.widget.begin_submit(&self.input, Instant::now());

        match submission {
            Submission::Ignored => return,
            Submission::Answered => {}
            Submission::Pending { ticket, text } => {
                let backend = self.widget.chat_backend();
                let tx = self.events.clone();
                tokio::spawn(async move {
                    let result = backend.chat(&text).await;
                    let _ = tx.send(AppEvent::Reply(ticket, result));
                });
            }
        }

        self.input.clear();
        self.cursor = 0;
        self.status = None;
        self.scroll_chat_to_bottom();
    }

    pub fn on_reply(&mut self, ticket: ReplyTicket, result: Result<String, BackendError>) {
        self.widget.finish_reply(ticket, result);
        self.scroll_chat_to_bottom();
    }

    /// Fill the input with a shortcut question and send it shortly after
    pub fn choose_common_question(&mut self, index: usize) {
        if !self.widget.show_common_questions() {
            return;
        }
        let Some(question) = COMMON_QUESTIONS.get(index) else {
            return;
        };
        self.input = question.to_string();
        self.cursor = self.input.chars().count();

        let tx = self.events.clone();
        tokio::spawn(async move {
            tokio::time::sleep(SHORTCUT_DELAY).await;
            let _ = tx.send(AppEvent::Submit);
        });
    }

    pub fn start_voice(&mut self) {
        if let VoiceStart::Started(recognizer) = self.widget.begin_voice() {
            self.status = Some("Listening...".to_string());
            let tx = self.events.clone();
            tokio::spawn(async move {
                let result = recognizer.recognize(SPEECH_LOCALE).await;
                let _ = tx.send(AppEvent::Transcript(result));
            });
        }
    }

    pub fn on_transcript(&mut self, result: anyhow::Result<String>) {
        self.status = None;
        if let Some(transcript) = self.widget.finish_voice(result) {
            self.input = transcript;
            self.cursor = self.input.chars().count();
            self.send_input();
        }
    }

    pub fn clear_chat(&mut self) {
        self.widget.clear();
        self.chat_scroll = 0;
        self.status = None;
    }

    pub fn export_chat(&mut self) {
        match export_to(self.widget.log(), &self.export_dir) {
            Ok(path) => self.status = Some(format!("Saved chat to {}", path.display())),
            Err(e) => {
                tracing::error!("export failed: {:#}", e);
                self.alert = Some(format!("Could not save chat: {}", e));
            }
        }
    }

    /// Switch display language, translating the conversation in the background
    pub fn select_language(&mut self, language: Language) {
        self.language = language;
        let plan = self.widget.translation_plan(language);
        if plan.is_empty() {
            return;
        }

        self.translation_runs += 1;
        let translator = self.widget.translation_backend();
        let tx = self.events.clone();
        tokio::spawn(async move {
            // One request at a time, in document order
            for (id, text) in plan {
                let result = translator.translate(&text, language.code()).await;
                if tx.send(AppEvent::Translated(id, result)).is_err() {
                    return;
                }
            }
            let _ = tx.send(AppEvent::TranslationDone);
        });
    }

    pub fn on_translated(&mut self, id: MessageId, result: Result<String, BackendError>) {
        self.widget.apply_translation(id, result);
    }

    pub fn on_translation_done(&mut self) {
        self.translation_runs = self.translation_runs.saturating_sub(1);
    }

    pub fn is_translating(&self) -> bool {
        self.translation_runs > 0
    }

    pub fn on_chat_event(&mut self, event: ChatEvent) {
        match event {
            ChatEvent::Alert(message) => self.alert = Some(message),
            ChatEvent::LogChanged => self.scroll_chat_to_bottom(),
            ChatEvent::ListeningChanged(listening) => {
                tracing::debug!("listening: {}", listening);
            }
        }
    }

    // Language picker navigation
    pub fn open_language_picker(&mut self) {
        let current_idx = Language::all()
            .iter()
            .position(|l| *l == self.language)
            .unwrap_or(0);
        self.language_picker_state.select(Some(current_idx));
        self.show_language_picker = true;
    }

    pub fn language_picker_nav_down(&mut self) {
        let len = Language::all().len();
        let i = self.language_picker_state.selected().unwrap_or(0);
        self.language_picker_state.select(Some((i + 1).min(len - 1)));
    }

    pub fn language_picker_nav_up(&mut self) {
        let i = self.language_picker_state.selected().unwrap_or(0);
        self.language_picker_state.select(Some(i.saturating_sub(1)));
    }

    pub fn confirm_language(&mut self) {
        self.show_language_picker = false;
        if let Some(language) = self
            .language_picker_state
            .selected()
            .and_then(|i| Language::all().get(i).copied())
        {
            self.select_language(language);
        }
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.widget.is_pending() || self.widget.is_listening() || self.is_translating() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    pub fn scroll_down(&mut self) {
        self.chat_scroll = self.chat_scroll.saturating_add(1).min(self.max_chat_scroll());
    }

    pub fn scroll_up(&mut self) {
        self.chat_scroll = self.chat_scroll.saturating_sub(1);
    }

    pub fn scroll_half_page_down(&mut self) {
        let half = (self.chat_height / 2).max(1);
        self.chat_scroll = self.chat_scroll.saturating_add(half).min(self.max_chat_scroll());
    }

    pub fn scroll_half_page_up(&mut self) {
        let half = (self.chat_height / 2).max(1);
        self.chat_scroll = self.chat_scroll.saturating_sub(half);
    }

    /// Keep the latest entry (and the typing indicator) in view
    pub fn scroll_chat_to_bottom(&mut self) {
        self.chat_scroll = self.max_chat_scroll();
    }

    fn max_chat_scroll(&self) -> u16 {
        let visible_height = if self.chat_height > 0 {
            self.chat_height
        } else {
            20
        };
        // Paragraph scroll offsets are u16; a longer history pins to the limit
        let max = self.total_chat_lines().saturating_sub(visible_height as usize);
        u16::try_from(max).unwrap_or(u16::MAX)
    }

    /// Rendered line count of the chat view, matching `ui::chat_lines`
    fn total_chat_lines(&self) -> usize {
        // Use actual chat width for wrap calculation, default to 50 if not set
        let wrap_width = if self.chat_width > 0 {
            self.chat_width as usize
        } else {
            50
        };

        let mut total_lines: usize = 0;

        for msg in self.widget.log().iter() {
            // Author line ("You:" or "MindGuard:") and the blank line after
            total_lines = total_lines.saturating_add(2);
            for line in msg.text.lines() {
                // Use character count, not byte length, for proper UTF-8 handling
                let char_count = line.chars().count();
                total_lines = total_lines.saturating_add(char_count / wrap_width + 1);
            }
        }

        if self.widget.is_pending() {
            total_lines = total_lines.saturating_add(2); // "MindGuard:" + "Typing..."
        }

        total_lines
    }
}
