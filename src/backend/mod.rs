mod error;
mod http;

pub use error::BackendError;
pub use http::HttpBackend;

use async_trait::async_trait;

/// Remote chat endpoint answering free-form questions
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn chat(&self, text: &str) -> Result<String, BackendError>;
}

/// Remote endpoint translating one message at a time
#[async_trait]
pub trait TranslationBackend: Send + Sync {
    async fn translate(&self, text: &str, target_lang: &str) -> Result<String, BackendError>;
}
