//! Outbound word acquisition: a random-word provider plus a translation
//! provider, combined into complete [`WordRecord`]s.
//!
//! Provider failures never propagate into the study-state engine: a failed
//! item is dropped from the batch, and a degraded translation falls back
//! first to the dictionary definition, then to the original word.

mod datamuse;
mod deepl;

pub use datamuse::DatamuseClient;
pub use deepl::DeepLClient;

use futures::stream::{self, StreamExt};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;
use crate::models::WordRecord;

/// Default fan-out for batch acquisition; keeps burst rate against the
/// third-party quotas low while overlapping request latency.
pub const DEFAULT_FETCH_CONCURRENCY: usize = 4;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider returned status {0}")]
    Status(u16),

    #[error("translation api key is not configured")]
    MissingApiKey,

    #[error("provider returned no candidates")]
    Empty,
}

/// An untranslated candidate from the word provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordCandidate {
    pub word: String,
    pub english_def: Option<String>,
    pub example: Option<String>,
    pub part_of_speech: Option<String>,
}

/// External word-lookup capability: up to `max` candidates per call; may
/// return fewer.
#[allow(async_fn_in_trait)]
pub trait WordProvider: Send + Sync {
    async fn fetch_candidates(&self, max: usize) -> Result<Vec<WordCandidate>, SourceError>;
}

/// External translation capability (English to Korean).
#[allow(async_fn_in_trait)]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str) -> Result<String, SourceError>;
}

/// Combines a provider and a translator into normalized [`WordRecord`]s.
pub struct WordSource<P, T> {
    provider: P,
    translator: T,
    concurrency: usize,
}

impl WordSource<DatamuseClient, DeepLClient> {
    pub fn from_config(config: &Config) -> Result<Self, SourceError> {
        let provider = DatamuseClient::new(&config.datamuse_base_url, config.http_timeout)?;
        let translator = DeepLClient::new(
            &config.deepl_base_url,
            config.deepl_api_key.clone(),
            config.http_timeout,
        )?;
        Ok(Self::new(provider, translator).with_concurrency(config.fetch_concurrency))
    }
}

impl<P: WordProvider, T: Translator> WordSource<P, T> {
    pub fn new(provider: P, translator: T) -> Self {
        Self {
            provider,
            translator,
            concurrency: DEFAULT_FETCH_CONCURRENCY,
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Fetches one candidate and translates it. Returns `None` when the
    /// provider fails; translation trouble degrades rather than fails (see
    /// [`translate_with_fallback`](Self::complete_word)).
    pub async fn complete_word(&self) -> Option<WordRecord> {
        let candidate = match self.provider.fetch_candidates(1).await {
            Ok(candidates) => candidates.into_iter().next()?,
            Err(err) => {
                warn!(error = %err, "word lookup failed, dropping this item");
                return None;
            }
        };

        let korean = self.translate_with_fallback(&candidate).await;
        Some(WordRecord {
            word: candidate.word,
            korean,
            english: candidate.english_def,
            example: candidate.example,
            part_of_speech: candidate.part_of_speech,
        })
    }

    /// Translation policy: translate the word itself; when the provider
    /// echoes the input back unchanged (or fails), retry with the English
    /// definition; as a last resort keep the original word.
    async fn translate_with_fallback(&self, candidate: &WordCandidate) -> String {
        let word = candidate.word.trim();

        match self.translator.translate(word).await {
            Ok(text) if !is_echo(word, &text) => return text,
            Ok(_) => debug!(word, "translation echoed the input, trying the definition"),
            Err(err) => warn!(word, error = %err, "word translation failed"),
        }

        if let Some(def) = candidate.english_def.as_deref() {
            match self.translator.translate(def).await {
                Ok(text) if !text.trim().is_empty() && !is_echo(def, &text) => return text,
                Ok(_) => debug!(word, "definition translation also degraded"),
                Err(err) => warn!(word, error = %err, "definition translation failed"),
            }
        }

        candidate.word.clone()
    }

    /// Issues `count` independent fetch+translate pairs with bounded
    /// concurrency; failed items are dropped, order is not guaranteed, and
    /// fewer than `count` records may come back.
    pub async fn fetch_batch(&self, count: usize) -> Vec<WordRecord> {
        let records: Vec<WordRecord> = stream::iter(0..count)
            .map(|_| self.complete_word())
            .buffer_unordered(self.concurrency)
            .filter_map(|record| async move { record })
            .collect()
            .await;

        debug!(requested = count, fetched = records.len(), "batch word fetch finished");
        records
    }
}

/// Heuristic for a semantically failed translation: the provider handed the
/// source text straight back.
fn is_echo(source: &str, translated: &str) -> bool {
    source.trim().eq_ignore_ascii_case(translated.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    struct FixedProvider {
        candidates: Mutex<Vec<Result<Vec<WordCandidate>, SourceError>>>,
    }

    impl FixedProvider {
        fn new(results: Vec<Result<Vec<WordCandidate>, SourceError>>) -> Self {
            Self {
                candidates: Mutex::new(results),
            }
        }
    }

    impl WordProvider for FixedProvider {
        async fn fetch_candidates(&self, _max: usize) -> Result<Vec<WordCandidate>, SourceError> {
            let mut queue = self.candidates.lock();
            if queue.is_empty() {
                return Err(SourceError::Empty);
            }
            queue.remove(0)
        }
    }

    /// Echoes configured inputs back; translates everything else by
    /// prefixing `ko:`.
    struct EchoingTranslator {
        echo_inputs: Vec<String>,
        fail: bool,
    }

    impl Translator for EchoingTranslator {
        async fn translate(&self, text: &str) -> Result<String, SourceError> {
            if self.fail {
                return Err(SourceError::Status(503));
            }
            if self.echo_inputs.iter().any(|e| e == text) {
                return Ok(text.to_string());
            }
            Ok(format!("ko:{text}"))
        }
    }

    fn candidate(word: &str, def: Option<&str>) -> WordCandidate {
        WordCandidate {
            word: word.into(),
            english_def: def.map(String::from),
            example: None,
            part_of_speech: Some("n".into()),
        }
    }

    #[tokio::test]
    async fn happy_path_translates_the_word() {
        let source = WordSource::new(
            FixedProvider::new(vec![Ok(vec![candidate("river", Some("a large stream"))])]),
            EchoingTranslator {
                echo_inputs: vec![],
                fail: false,
            },
        );

        let record = source.complete_word().await.unwrap();
        assert_eq!(record.word, "river");
        assert_eq!(record.korean, "ko:river");
        assert_eq!(record.english.as_deref(), Some("a large stream"));
    }

    #[tokio::test]
    async fn echoed_translation_falls_back_to_the_definition() {
        let source = WordSource::new(
            FixedProvider::new(vec![Ok(vec![candidate("river", Some("a large stream"))])]),
            EchoingTranslator {
                echo_inputs: vec!["river".into()],
                fail: false,
            },
        );

        let record = source.complete_word().await.unwrap();
        assert_eq!(record.korean, "ko:a large stream");
    }

    #[tokio::test]
    async fn double_echo_keeps_the_original_word() {
        let source = WordSource::new(
            FixedProvider::new(vec![Ok(vec![candidate("river", Some("a large stream"))])]),
            EchoingTranslator {
                echo_inputs: vec!["river".into(), "a large stream".into()],
                fail: false,
            },
        );

        let record = source.complete_word().await.unwrap();
        assert_eq!(record.korean, "river");
    }

    #[tokio::test]
    async fn translation_failure_without_definition_keeps_the_word() {
        let source = WordSource::new(
            FixedProvider::new(vec![Ok(vec![candidate("river", None)])]),
            EchoingTranslator {
                echo_inputs: vec![],
                fail: true,
            },
        );

        let record = source.complete_word().await.unwrap();
        assert_eq!(record.korean, "river");
    }

    #[tokio::test]
    async fn provider_failure_drops_the_item() {
        let source = WordSource::new(
            FixedProvider::new(vec![Err(SourceError::Status(500))]),
            EchoingTranslator {
                echo_inputs: vec![],
                fail: false,
            },
        );

        assert!(source.complete_word().await.is_none());
    }

    #[tokio::test]
    async fn batch_drops_failed_items_and_keeps_the_rest() {
        let source = WordSource::new(
            FixedProvider::new(vec![
                Ok(vec![candidate("one", None)]),
                Err(SourceError::Status(500)),
                Ok(vec![candidate("two", None)]),
                Ok(vec![]),
            ]),
            EchoingTranslator {
                echo_inputs: vec![],
                fail: false,
            },
        )
        .with_concurrency(1);

        let mut words: Vec<String> = source
            .fetch_batch(4)
            .await
            .into_iter()
            .map(|r| r.word)
            .collect();
        words.sort();
        assert_eq!(words, vec!["one", "two"]);
    }
}
