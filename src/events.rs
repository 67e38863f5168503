//! Events the chat core reports to its host

/// Something the hosting surface may want to present
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    /// Blocking notice for the user
    Alert(String),
    /// Voice capture started or stopped
    ListeningChanged(bool),
    /// The log was appended to, rewritten or cleared
    LogChanged,
}

/// Receiver for core events. The host decides presentation.
pub trait Notifier: Send + Sync {
    fn notify(&self, event: ChatEvent);
}

/// Drops every event
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _event: ChatEvent) {}
}
