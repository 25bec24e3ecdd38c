//! Random-word provider backed by the Datamuse API.
//!
//! One lookup returns up to [`PAGE_SIZE`] words starting with a random
//! letter, with tab-separated `"pos\tdefinition"` strings when the `md=d`
//! flag is honored.

use std::time::Duration;

use rand::seq::SliceRandom;
use serde::Deserialize;

use super::{SourceError, WordCandidate, WordProvider};

const PAGE_SIZE: usize = 10;

pub struct DatamuseClient {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct DatamuseEntry {
    word: String,
    #[serde(default)]
    defs: Vec<String>,
}

impl DatamuseClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, SourceError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    fn random_prefix() -> String {
        use rand::Rng;
        let letter = (b'a' + rand::rng().random_range(0..26u8)) as char;
        format!("{letter}*")
    }
}

impl WordProvider for DatamuseClient {
    async fn fetch_candidates(&self, max: usize) -> Result<Vec<WordCandidate>, SourceError> {
        let url = format!("{}/words", self.base_url);
        let prefix = Self::random_prefix();
        let page = PAGE_SIZE.to_string();
        let response = self
            .http
            .get(&url)
            .query(&[
                ("sp", prefix.as_str()),
                ("max", page.as_str()),
                ("md", "d"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SourceError::Status(response.status().as_u16()));
        }

        let mut entries: Vec<DatamuseEntry> = response.json().await?;
        if entries.is_empty() {
            return Err(SourceError::Empty);
        }

        // The page is alphabetical; shuffle so repeated lookups do not keep
        // handing back the same leading words.
        entries.shuffle(&mut rand::rng());
        entries.truncate(max);

        Ok(entries.into_iter().map(candidate_from_entry).collect())
    }
}

fn candidate_from_entry(entry: DatamuseEntry) -> WordCandidate {
    let (part_of_speech, english_def) = entry
        .defs
        .first()
        .and_then(|def| def.split_once('\t'))
        .map(|(pos, def)| (Some(pos.to_string()), Some(def.to_string())))
        .unwrap_or((None, None));

    // The second definition doubles as a usage example when present.
    let example = entry
        .defs
        .get(1)
        .and_then(|def| def.split_once('\t'))
        .map(|(_, text)| text.to_string());

    WordCandidate {
        word: entry.word,
        english_def,
        example,
        part_of_speech,
    }
}
