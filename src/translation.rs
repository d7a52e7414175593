//! Optional machine translation of single query tokens via a LibreTranslate-compatible API.

use std::env;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::search::Lang;

#[derive(Debug, thiserror::Error)]
pub enum TranslationError {
    #[error("translation API error ({code}): {message}")]
    Api { code: u16, message: String },

    #[error("translation network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("translation response had no text")]
    Empty,
}

/// External translation capability used by the token-mode translator.
pub trait TranslationClient {
    async fn translate(&self, text: &str, source: Lang, target: Lang)
    -> Result<String, TranslationError>;
}

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    source: &'static str,
    target: &'static str,
    format: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslateResponse {
    translated_text: Option<String>,
}

#[derive(Clone)]
pub struct LibreTranslateClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl LibreTranslateClient {
    /// `None` when `LIBRETRANSLATE_URL` is unset; token mode then passes unknown tokens through.
    pub fn from_env(http: Client) -> Option<Self> {
        let base_url = env::var("LIBRETRANSLATE_URL")
            .ok()
            .map(|u| u.trim().trim_end_matches('/').to_string())
            .filter(|u| !u.is_empty())?;
        let api_key = env::var("LIBRETRANSLATE_API_KEY")
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
        Some(Self {
            http,
            base_url,
            api_key,
        })
    }

    #[cfg(test)]
    pub(crate) fn with_base_url(http: Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.to_string(),
            api_key: None,
        }
    }
}

impl TranslationClient for LibreTranslateClient {
    async fn translate(
        &self,
        text: &str,
        source: Lang,
        target: Lang,
    ) -> Result<String, TranslationError> {
        let url = format!("{}/translate", self.base_url);
        let request = TranslateRequest {
            q: text,
            source: source.code(),
            target: target.code(),
            format: "text",
            api_key: self.api_key.as_deref(),
        };

        let response = self
            .http
            .post(&url)
            .header("User-Agent", crate::USER_AGENT)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v["error"].as_str().map(String::from))
                .unwrap_or_else(|| body.chars().take(200).collect());
            return Err(TranslationError::Api {
                code: status.as_u16(),
                message,
            });
        }

        let body: TranslateResponse = response.json().await?;
        let translated = body
            .translated_text
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(TranslationError::Empty)?;
        debug!(source = text, translated = %translated, "token translated");
        Ok(translated)
    }
}
