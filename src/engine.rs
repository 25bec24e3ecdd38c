//! High-level study flows: replenish-and-select for today, answer and
//! review handling, and full reset.
//!
//! Each answer updates the word's bank status and appends the matching
//! activity record in one document write, so a storage failure commits
//! neither half.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::activity::ActivityLog;
use crate::models::{WordProgress, WordStatus};
use crate::progress::ProgressStore;
use crate::session::SessionSelector;
use crate::source::{Translator, WordProvider, WordSource};
use crate::store::{KeyValueStore, StorageResult};
use crate::time::Clock;

pub struct StudyEngine<P, T> {
    progress: ProgressStore,
    session: SessionSelector,
    activity: ActivityLog,
    source: WordSource<P, T>,
}

impl<P: WordProvider, T: Translator> StudyEngine<P, T> {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        source: WordSource<P, T>,
    ) -> Self {
        let progress = ProgressStore::new(store, clock);
        Self {
            session: SessionSelector::new(progress.clone()),
            activity: ActivityLog::new(progress.clone()),
            progress,
            source,
        }
    }

    pub fn progress(&self) -> &ProgressStore {
        &self.progress
    }

    pub fn session(&self) -> &SessionSelector {
        &self.session
    }

    pub fn activity(&self) -> &ActivityLog {
        &self.activity
    }

    /// Returns today's study set, selecting it first if this is the first
    /// call of the day. When the unseen pool is low, pulls fresh words from
    /// the providers before selecting; provider trouble degrades to
    /// whatever the bank already holds.
    pub async fn prepare_today(&self) -> StorageResult<Vec<WordProgress>> {
        let current = self.session.today_words();
        if !current.is_empty() {
            return Ok(current);
        }

        if self.session.needs_more_words() {
            let wanted = self.session.refill_count();
            let fetched = self.source.fetch_batch(wanted).await;
            if fetched.is_empty() {
                warn!("word providers returned nothing, selecting from the existing bank");
            } else {
                let added = self.progress.add_words(&fetched)?;
                info!(wanted, added, "replenished the word bank");
            }
        }

        self.session.select_today_words()?;
        Ok(self.session.today_words())
    }

    /// First-pass card answered correctly: status becomes learned and a
    /// learned record is appended.
    pub fn answer_correct(&self, word: &str) -> StorageResult<bool> {
        self.apply_answer(word, WordStatus::Learned, false, false)
    }

    /// First-pass card missed: status becomes wrong, the per-word wrong
    /// counter and the wrong-bucket record both grow.
    pub fn answer_wrong(&self, word: &str) -> StorageResult<bool> {
        self.apply_answer(word, WordStatus::Wrong, true, false)
    }

    /// Review-pass success: besides learning the word, its wrong-note entry
    /// is explicitly removed.
    pub fn review_correct(&self, word: &str) -> StorageResult<bool> {
        self.apply_answer(word, WordStatus::Learned, false, true)
    }

    /// Review-pass miss: the wrong-note entry stays and its review counter
    /// grows.
    pub fn review_wrong(&self, word: &str) -> StorageResult<bool> {
        self.apply_answer(word, WordStatus::Wrong, true, false)
    }

    /// Status transition plus activity record in a single document write.
    /// Returns `Ok(false)` without recording anything for words not in the
    /// bank.
    fn apply_answer(
        &self,
        word: &str,
        status: WordStatus,
        count_wrong: bool,
        clear_wrong_note: bool,
    ) -> StorageResult<bool> {
        let clock = self.progress.clock();
        let today = clock.today();
        let now = clock.now();

        self.progress.with_data(|data| {
            let Some(entry) = data.word_bank.iter_mut().find(|w| w.word == word) else {
                debug!(word, "answer for a word not in the bank, ignoring");
                return false;
            };

            entry.status = status;
            entry.last_studied = Some(today);
            if status == WordStatus::Learned {
                entry.learned_date = Some(today);
            }
            if count_wrong {
                entry.wrong_count += 1;
            }
            let korean = entry.korean.clone();

            match status {
                WordStatus::Learned => {
                    data.activity.push_learned(word, &korean, now);
                }
                WordStatus::Wrong => {
                    data.activity.bump_wrong(word, &korean, now);
                }
                WordStatus::Unseen => unreachable!("answers never move a word back to unseen"),
            }

            if clear_wrong_note {
                data.activity.clear_wrong(word);
            }

            true
        })
    }

    /// Sets the stored session marker once every card of the day has been
    /// answered. Returns whether the marker was newly set.
    pub fn finish_session_if_done(&self) -> StorageResult<bool> {
        if self.session.today_progress().is_complete && !self.session.is_session_marked_complete() {
            self.session.mark_session_complete()?;
            info!("today's study session is complete");
            return Ok(true);
        }
        Ok(false)
    }

    /// Drops the whole document: bank, session, settings, and activity.
    pub fn reset_all(&self) -> StorageResult<()> {
        info!("resetting all study data");
        self.progress.reset()
    }
}
