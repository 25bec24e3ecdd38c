//! English→Korean translation via the DeepL v2 API.

use std::time::Duration;

use serde::Deserialize;

use super::{SourceError, Translator};

pub struct DeepLClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
struct Translation {
    text: String,
}

impl DeepLClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, SourceError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            api_key,
        })
    }
}

impl Translator for DeepLClient {
    async fn translate(&self, text: &str) -> Result<String, SourceError> {
        let key = self.api_key.as_deref().ok_or(SourceError::MissingApiKey)?;

        let url = format!("{}/v2/translate", self.base_url);
        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("DeepL-Auth-Key {key}"))
            .form(&[
                ("text", text),
                ("target_lang", "KO"),
                ("source_lang", "EN"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SourceError::Status(response.status().as_u16()));
        }

        let body: TranslateResponse = response.json().await?;
        body.translations
            .into_iter()
            .next()
            .map(|t| t.text)
            .ok_or(SourceError::Empty)
    }
}
