//! The durable study-state document: load with daily reset, save, word
//! bank CRUD, and pure projections.
//!
//! Every mutation is a synchronous load-modify-save over the whole
//! document. A modified copy only becomes durable through a successful
//! write, so a failed write leaves durable state untouched and the
//! operation surfaces an error instead of leaving memory and disk
//! divergent.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::models::{
    SettingsPatch, Statistics, StorageData, StudySession, WordProgress, WordRecord, WordStatus,
};
use crate::store::{KeyValueStore, StorageResult};
use crate::time::Clock;

/// Document key within the key/value store.
pub const STORAGE_KEY: &str = "engtutor_data";

/// Owns the persisted [`StorageData`] document.
#[derive(Clone)]
pub struct ProgressStore {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl ProgressStore {
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub(crate) fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Returns the persisted document, substituting a fresh default when
    /// the key is absent or the stored JSON is corrupt. If the stored
    /// session date is not today, the session is replaced with an empty one
    /// for today and the reset is persisted immediately.
    pub fn load(&self) -> StorageData {
        let today = self.clock.today();

        let mut data = match self.store.get(STORAGE_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<StorageData>(&raw) {
                Ok(data) => data,
                Err(err) => {
                    warn!(error = %err, "stored document is corrupt, starting fresh");
                    StorageData::fresh(today)
                }
            },
            Ok(None) => StorageData::fresh(today),
            Err(err) => {
                warn!(error = %err, "could not read stored document, starting fresh");
                StorageData::fresh(today)
            }
        };

        if data.current_session.date != today {
            data.current_session = StudySession::empty(today);
            if let Err(err) = self.save(&data) {
                warn!(error = %err, "could not persist the daily session reset");
            }
        }

        data
    }

    /// Serializes and writes the full document.
    pub fn save(&self, data: &StorageData) -> StorageResult<()> {
        let raw = serde_json::to_string(data)?;
        self.store.set(STORAGE_KEY, &raw)
    }

    /// Load, apply `f`, save. The closure's result is returned only once
    /// the write succeeded.
    pub fn with_data<F, R>(&self, f: F) -> StorageResult<R>
    where
        F: FnOnce(&mut StorageData) -> R,
    {
        let mut data = self.load();
        let result = f(&mut data);
        self.save(&data)?;
        Ok(result)
    }

    /// Appends records whose word is not already in the bank (exact,
    /// case-sensitive match). Duplicates, including within the batch, are
    /// dropped. Returns the number actually added.
    pub fn add_words(&self, records: &[WordRecord]) -> StorageResult<usize> {
        self.with_data(|data| {
            let mut known: HashSet<String> =
                data.word_bank.iter().map(|w| w.word.clone()).collect();

            let mut added = 0;
            for record in records {
                if known.insert(record.word.clone()) {
                    data.word_bank.push(WordProgress::from(record.clone()));
                    added += 1;
                }
            }
            added
        })
    }

    /// Sets the word's status and stamps `last_studied` (and
    /// `learned_date` when it becomes learned); bumps `wrong_count` when
    /// asked regardless of the new status. Returns `Ok(false)` without
    /// writing anything meaningful when the word is absent, and rejects
    /// transitions back to `Unseen` (a studied word never becomes unstudied).
    pub fn update_status(
        &self,
        word: &str,
        status: WordStatus,
        increment_wrong: bool,
    ) -> StorageResult<bool> {
        if status == WordStatus::Unseen {
            debug!(word, "refusing to move a word back to unseen");
            return Ok(false);
        }

        let today = self.clock.today();
        self.with_data(|data| {
            let Some(entry) = data.word_bank.iter_mut().find(|w| w.word == word) else {
                debug!(word, "status update for a word not in the bank");
                return false;
            };

            entry.status = status;
            entry.last_studied = Some(today);
            if status == WordStatus::Learned {
                entry.learned_date = Some(today);
            }
            if increment_wrong {
                entry.wrong_count += 1;
            }
            true
        })
    }

    pub fn update_settings(&self, patch: &SettingsPatch) -> StorageResult<()> {
        self.with_data(|data| data.settings.merge(patch))
    }

    pub fn unseen_words(&self) -> Vec<WordProgress> {
        self.words_with_status(WordStatus::Unseen)
    }

    pub fn learned_words(&self) -> Vec<WordProgress> {
        self.words_with_status(WordStatus::Learned)
    }

    pub fn wrong_words(&self) -> Vec<WordProgress> {
        self.words_with_status(WordStatus::Wrong)
    }

    fn words_with_status(&self, status: WordStatus) -> Vec<WordProgress> {
        self.load()
            .word_bank
            .into_iter()
            .filter(|w| w.status == status)
            .collect()
    }

    /// Pure projection over the bank and the current session.
    pub fn statistics(&self) -> Statistics {
        let data = self.load();
        let count = |status| {
            data.word_bank
                .iter()
                .filter(|w| w.status == status)
                .count()
        };

        Statistics {
            total: data.word_bank.len(),
            learned: count(WordStatus::Learned),
            wrong: count(WordStatus::Wrong),
            unseen: count(WordStatus::Unseen),
            today_progress: data.current_session.words_loaded.len(),
            today_limit: data.settings.daily_limit,
        }
    }

    /// Removes the whole document (full data reset).
    pub fn reset(&self) -> StorageResult<()> {
        self.store.remove(STORAGE_KEY)
    }
}
