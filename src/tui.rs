use std::io::{self, Stderr};
use std::time::Duration;
use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEvent, KeyEventKind, MouseEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use futures_util::StreamExt;
use tokio::sync::mpsc;

use mindguard_chat::{BackendError, ChatEvent, MessageId, ReplyTicket};

pub type Tui = Terminal<CrosstermBackend<Stderr>>;

#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    /// The terminal changed size; the next draw relayouts
    Resize,
    Tick,
    /// Submit whatever is in the input box (delayed common-question shortcut)
    Submit,
    /// The chat backend answered a pending submission
    Reply(ReplyTicket, Result<String, BackendError>),
    /// One message of a running translation came back
    Translated(MessageId, Result<String, BackendError>),
    TranslationDone,
    /// The speech recognizer finished its capture session
    Transcript(anyhow::Result<String>),
    /// Something the chat core reported
    Chat(ChatEvent),
}

pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<AppEvent>,
    tx: mpsc::UnboundedSender<AppEvent>,
}

/// Typing and translation indicators advance on this interval
const TICK_INTERVAL: Duration = Duration::from_millis(300);

impl EventHandler {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(forward_terminal_events(tx.clone()));
        tokio::spawn(tick(tx.clone()));
        Self { rx, tx }
    }

    /// Sender for background tasks reporting back to the main loop
    pub fn sender(&self) -> mpsc::UnboundedSender<AppEvent> {
        self.tx.clone()
    }

    pub async fn next(&mut self) -> Option<AppEvent> {
        self.rx.recv().await
    }
}

/// Map a terminal event to the ones the app reacts to
fn from_terminal(event: Event) -> Option<AppEvent> {
    match event {
        // Key release and repeat reports are ignored
        Event::Key(key) if key.kind == KeyEventKind::Press => Some(AppEvent::Key(key)),
        Event::Mouse(mouse) => Some(AppEvent::Mouse(mouse)),
        Event::Resize(_, _) => Some(AppEvent::Resize),
        _ => None,
    }
}

async fn forward_terminal_events(tx: mpsc::UnboundedSender<AppEvent>) {
    let mut reader = event::EventStream::new();
    while let Some(read) = reader.next().await {
        let event = match read {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!("terminal event read failed: {}", e);
                continue;
            }
        };
        if let Some(app_event) = from_terminal(event) {
            if tx.send(app_event).is_err() {
                break;
            }
        }
    }
}

async fn tick(tx: mpsc::UnboundedSender<AppEvent>) {
    let mut interval = tokio::time::interval(TICK_INTERVAL);
    loop {
        interval.tick().await;
        if tx.send(AppEvent::Tick).is_err() {
            break;
        }
    }
}

pub fn init() -> Result<Tui> {
    enable_raw_mode()?;
    execute!(io::stderr(), EnterAlternateScreen, EnableMouseCapture)?;
    Ok(Terminal::new(CrosstermBackend::new(io::stderr()))?)
}

pub fn restore() -> Result<()> {
    execute!(io::stderr(), DisableMouseCapture, LeaveAlternateScreen)?;
    disable_raw_mode()?;
    Ok(())
}

/// Install panic hook to restore terminal on panic
pub fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore();
        original_hook(panic_info);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEventState, KeyModifiers};

    fn key(kind: KeyEventKind) -> Event {
        Event::Key(KeyEvent {
            code: KeyCode::Char('a'),
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        })
    }

    #[test]
    fn test_only_key_presses_are_forwarded() {
        assert!(matches!(from_terminal(key(KeyEventKind::Press)), Some(AppEvent::Key(_))));
        assert!(from_terminal(key(KeyEventKind::Release)).is_none());
        assert!(from_terminal(key(KeyEventKind::Repeat)).is_none());
    }

    #[test]
    fn test_resize_and_focus() {
        assert!(matches!(from_terminal(Event::Resize(80, 24)), Some(AppEvent::Resize)));
        assert!(from_terminal(Event::FocusGained).is_none());
    }
}
