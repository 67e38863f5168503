use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{BackendError, ChatBackend, TranslationBackend};

#[derive(Serialize)]
struct ChatRequest<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    response: String,
}

#[derive(Serialize)]
struct TranslateRequest<'a> {
    text: &'a str,
    target_lang: &'a str,
}

#[derive(Deserialize)]
struct TranslateResponse {
    translated_text: Option<String>,
    details: Option<String>,
    error: Option<String>,
}

/// reqwest client for the `/chat` and `/translate` endpoints
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ChatBackend for HttpBackend {
    async fn chat(&self, text: &str) -> Result<String, BackendError> {
        let url = format!("{}/chat", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&ChatRequest { text })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(BackendError::Status(response.status().as_u16()));
        }

        let chat_response: ChatResponse = response.json().await?;
        Ok(chat_response.response)
    }
}

#[async_trait]
impl TranslationBackend for HttpBackend {
    // The translate endpoint reports its own failures in the body, so the
    // status code is not checked here.
    async fn translate(&self, text: &str, target_lang: &str) -> Result<String, BackendError> {
        let url = format!("{}/translate", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&TranslateRequest { text, target_lang })
            .send()
            .await?;

        let result: TranslateResponse = response.json().await?;
        match result.translated_text {
            Some(translated) if !translated.is_empty() => Ok(translated),
            _ => Err(BackendError::Rejected(
                result
                    .details
                    .or(result.error)
                    .unwrap_or_else(|| "no translated_text in response".to_string()),
            )),
        }
    }
}
