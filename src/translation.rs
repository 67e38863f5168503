//! In-place translation of the rendered conversation

use crate::backend::{BackendError, TranslationBackend};
use crate::language::Language;
use crate::responder::ChatWidget;
use crate::state::MessageId;

/// Shown when the backend answered without a translation
pub const TRANSLATION_FAILED: &str = "⚠️ Translation failed";

/// Shown when the translation request itself failed
pub const TRANSLATION_SERVER_ERROR: &str = "⚠️ Server error";

impl ChatWidget {
    /// Messages to translate, in document order. Empty for the default language.
    pub fn translation_plan(&self, lang: Language) -> Vec<(MessageId, String)> {
        if lang.is_default() {
            return Vec::new();
        }
        self.log()
            .iter()
            .filter(|m| !m.text.trim().is_empty())
            .map(|m| (m.id, m.text.trim().to_string()))
            .collect()
    }

    /// Replace one message with its translation or a fixed warning.
    /// Returns false when the message no longer exists.
    pub fn apply_translation(&mut self, id: MessageId, result: Result<String, BackendError>) -> bool {
        let text = match result {
            Ok(translated) => translated,
            Err(BackendError::Rejected(details)) => {
                tracing::error!("translation rejected: {}", details);
                TRANSLATION_FAILED.to_string()
            }
            Err(e) => {
                tracing::error!("translation request failed: {}", e);
                TRANSLATION_SERVER_ERROR.to_string()
            }
        };

        if !self.log_mut().replace_text(id, text) {
            tracing::debug!("message {} was cleared before its translation arrived", id);
            return false;
        }
        self.persist();
        true
    }

    /// Translate every message one request at a time. Returns how many were replaced.
    pub async fn translate_all(&mut self, lang: Language) -> usize {
        let translator = self.translation_backend();
        let mut replaced = 0;
        for (id, text) in self.translation_plan(lang) {
            let result = translator.translate(&text, lang.code()).await;
            if self.apply_translation(id, result) {
                replaced += 1;
            }
        }
        replaced
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Message;
    use crate::testing::{widget_with, FakeChat, FakeTranslator};
    use std::time::Instant;

    #[tokio::test]
    async fn test_default_language_sends_nothing() {
        let translator = FakeTranslator::echo();
        let (_dir, mut widget) = widget_with(FakeChat::replying("ok"), translator.clone());
        widget.submit("hello", Instant::now()).await;

        assert!(widget.translation_plan(Language::English).is_empty());
        assert_eq!(widget.translate_all(Language::English).await, 0);
        assert!(translator.requests().is_empty());
        assert_eq!(widget.log().iter().next().unwrap().text, "hello");
    }

    #[tokio::test]
    async fn test_every_message_translated_in_order() {
        let translator = FakeTranslator::echo();
        let (_dir, mut widget) = widget_with(FakeChat::replying("fine"), translator.clone());
        widget.submit("how are you", Instant::now()).await;

        assert_eq!(widget.translate_all(Language::Spanish).await, 2);

        assert_eq!(
            translator.requests(),
            vec![
                ("how are you".to_string(), "es".to_string()),
                ("fine".to_string(), "es".to_string()),
            ]
        );
        let texts: Vec<&str> = widget.log().iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["[es] how are you", "[es] fine"]);
    }

    #[tokio::test]
    async fn test_failures_are_independent() {
        let translator = FakeTranslator::echo()
            .rejecting("two")
            .unreachable_for("three");
        let (_dir, mut widget) = widget_with(FakeChat::replying("ok"), translator);
        for text in ["one", "two", "three", "four"] {
            widget.log_mut().push(Message::user(text));
        }

        assert_eq!(widget.translate_all(Language::French).await, 4);

        let texts: Vec<&str> = widget.log().iter().map(|m| m.text.as_str()).collect();
        assert_eq!(
            texts,
            vec!["[fr] one", TRANSLATION_FAILED, TRANSLATION_SERVER_ERROR, "[fr] four"]
        );
    }

    #[test]
    fn test_blank_messages_skipped() {
        let (_dir, mut widget) = widget_with(FakeChat::replying("ok"), FakeTranslator::echo());
        widget.log_mut().push(Message::user("hello"));
        widget.log_mut().push(Message::assistant("   "));

        let plan = widget.translation_plan(Language::German);
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].1, "hello");
    }

    #[test]
    fn test_translation_persisted() {
        let (dir, mut widget) = widget_with(FakeChat::replying("ok"), FakeTranslator::echo());
        let id = widget.log_mut().push(Message::user("hello"));

        assert!(widget.apply_translation(id, Ok("hola".to_string())));

        let history = crate::storage::ChatHistory::new(crate::storage::LocalStorage::new(dir.path()));
        assert_eq!(history.load(), *widget.log());
    }

    #[test]
    fn test_translation_after_clear_ignored() {
        let (_dir, mut widget) = widget_with(FakeChat::replying("ok"), FakeTranslator::echo());
        let id = widget.log_mut().push(Message::user("hello"));
        widget.clear();

        assert!(!widget.apply_translation(id, Ok("hola".to_string())));
        assert!(widget.log().is_empty());
    }
}
