//! Selection and tracking of today's study set.
//!
//! The bank's insertion order is the de facto priority queue: the oldest
//! unseen words are selected first, never randomized.

use crate::models::{TodayProgress, WordProgress, WordStatus};
use crate::progress::ProgressStore;
use crate::store::StorageResult;

/// Below this many unseen words the pool should be replenished before
/// selecting today's set.
pub const LOW_WATER_MARK: usize = 20;

/// Replenishment aims the bank at this size...
const REFILL_TARGET_BANK: usize = 50;
/// ...but always fetches at least this many.
const REFILL_MIN: usize = 30;

/// Decides which subset of the word bank constitutes today's study set.
#[derive(Clone)]
pub struct SessionSelector {
    progress: ProgressStore,
}

impl SessionSelector {
    pub fn new(progress: ProgressStore) -> Self {
        Self { progress }
    }

    /// The words already chosen for today, resolved against the bank.
    /// Empty until [`select_today_words`](Self::select_today_words) has run
    /// for the day.
    pub fn today_words(&self) -> Vec<WordProgress> {
        let data = self.progress.load();
        if data.current_session.words_loaded.is_empty() {
            return Vec::new();
        }

        data.word_bank
            .iter()
            .filter(|w| data.current_session.words_loaded.contains(&w.word))
            .cloned()
            .collect()
    }

    /// Takes the first `daily_limit` unseen words in bank order, stores
    /// them as today's session, and returns the selection. Calling this
    /// again the same day overwrites the previous selection.
    pub fn select_today_words(&self) -> StorageResult<Vec<String>> {
        self.progress.with_data(|data| {
            let limit = data.settings.daily_limit as usize;
            let selected: Vec<String> = data
                .word_bank
                .iter()
                .filter(|w| w.status == WordStatus::Unseen)
                .take(limit)
                .map(|w| w.word.clone())
                .collect();

            data.current_session.words_loaded = selected.clone();
            data.current_session.completed = false;
            selected
        })
    }

    /// Today's words still unanswered. A word leaves this set the instant
    /// its status changes away from unseen.
    pub fn remaining_words(&self) -> Vec<WordProgress> {
        let data = self.progress.load();
        data.word_bank
            .iter()
            .filter(|w| {
                data.current_session.words_loaded.contains(&w.word)
                    && w.status == WordStatus::Unseen
            })
            .cloned()
            .collect()
    }

    /// Today's words already answered (learned or wrong).
    pub fn completed_count(&self) -> usize {
        let data = self.progress.load();
        data.word_bank
            .iter()
            .filter(|w| {
                data.current_session.words_loaded.contains(&w.word)
                    && w.status != WordStatus::Unseen
            })
            .count()
    }

    /// Live progress through today's session; `is_complete` is recomputed
    /// here and is authoritative over the stored `completed` marker.
    pub fn today_progress(&self) -> TodayProgress {
        let data = self.progress.load();
        let total = data.current_session.words_loaded.len();
        let completed = data
            .word_bank
            .iter()
            .filter(|w| {
                data.current_session.words_loaded.contains(&w.word)
                    && w.status != WordStatus::Unseen
            })
            .count();
        let remaining = total - completed;
        let percentage = if total > 0 {
            ((completed as f64 / total as f64) * 100.0).round() as u32
        } else {
            0
        };

        TodayProgress {
            total,
            completed,
            remaining,
            percentage,
            is_complete: remaining == 0 && total > 0,
        }
    }

    /// Sets the informational `completed` marker on the stored session.
    pub fn mark_session_complete(&self) -> StorageResult<()> {
        self.progress
            .with_data(|data| data.current_session.completed = true)
    }

    pub fn is_session_marked_complete(&self) -> bool {
        self.progress.load().current_session.completed
    }

    /// True when the unseen pool has dropped below the low-water mark.
    pub fn needs_more_words(&self) -> bool {
        self.unseen_count() < LOW_WATER_MARK
    }

    /// How many additional words to fetch when replenishing.
    pub fn refill_count(&self) -> usize {
        let bank_size = self.progress.load().word_bank.len();
        REFILL_TARGET_BANK.saturating_sub(bank_size).max(REFILL_MIN)
    }

    fn unseen_count(&self) -> usize {
        self.progress
            .load()
            .word_bank
            .iter()
            .filter(|w| w.status == WordStatus::Unseen)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SettingsPatch, WordRecord};
    use crate::store::MemoryStore;
    use crate::time::FixedClock;
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn record(word: &str) -> WordRecord {
        WordRecord {
            word: word.into(),
            korean: format!("{word}-ko"),
            english: None,
            example: None,
            part_of_speech: None,
        }
    }

    fn records(n: usize) -> Vec<WordRecord> {
        (0..n).map(|i| record(&format!("word{i:02}"))).collect()
    }

    fn setup() -> (SessionSelector, ProgressStore) {
        let kv = Arc::new(MemoryStore::new());
        let clock = Arc::new(FixedClock::at_date(
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        ));
        let progress = ProgressStore::new(kv, clock);
        (SessionSelector::new(progress.clone()), progress)
    }

    #[test]
    fn today_words_is_empty_before_selection() {
        let (selector, progress) = setup();
        progress.add_words(&records(5)).unwrap();
        assert!(selector.today_words().is_empty());
    }

    #[test]
    fn selection_is_bounded_by_daily_limit_and_unseen_only() {
        let (selector, progress) = setup();
        progress.add_words(&records(15)).unwrap();
        progress
            .update_status("word00", WordStatus::Learned, false)
            .unwrap();
        progress
            .update_status("word01", WordStatus::Wrong, true)
            .unwrap();

        let selected = selector.select_today_words().unwrap();
        assert_eq!(selected.len(), 10);
        assert!(!selected.contains(&"word00".to_string()));
        assert!(!selected.contains(&"word01".to_string()));
        // Oldest unseen words first, in bank order.
        assert_eq!(selected[0], "word02");
        assert_eq!(selected[9], "word11");
    }

    #[test]
    fn selection_respects_a_smaller_pool_and_custom_limit() {
        let (selector, progress) = setup();
        progress
            .update_settings(&SettingsPatch {
                daily_limit: Some(5),
            })
            .unwrap();
        progress.add_words(&records(3)).unwrap();

        let selected = selector.select_today_words().unwrap();
        assert_eq!(selected.len(), 3);
    }

    #[test]
    fn reselection_overwrites_the_previous_set() {
        let (selector, progress) = setup();
        progress.add_words(&records(12)).unwrap();

        let first = selector.select_today_words().unwrap();
        assert_eq!(first.len(), 10);

        // Answer one word, then re-select: the answered word is no longer
        // unseen and drops out.
        progress
            .update_status("word00", WordStatus::Learned, false)
            .unwrap();
        let second = selector.select_today_words().unwrap();
        assert_eq!(second.len(), 10);
        assert!(!second.contains(&"word00".to_string()));
        assert!(second.contains(&"word10".to_string()));
    }

    #[test]
    fn progress_is_monotone_and_complete_exactly_at_zero_remaining() {
        let (selector, progress) = setup();
        progress.add_words(&records(3)).unwrap();
        selector.select_today_words().unwrap();

        let p = selector.today_progress();
        assert_eq!((p.total, p.completed, p.remaining), (3, 0, 3));
        assert_eq!(p.percentage, 0);
        assert!(!p.is_complete);

        progress
            .update_status("word00", WordStatus::Learned, false)
            .unwrap();
        let p = selector.today_progress();
        assert_eq!((p.completed, p.remaining), (1, 2));
        assert_eq!(p.percentage, 33);
        assert!(!p.is_complete);
        assert_eq!(selector.remaining_words().len(), 2);

        progress
            .update_status("word01", WordStatus::Wrong, true)
            .unwrap();
        progress
            .update_status("word02", WordStatus::Learned, false)
            .unwrap();
        let p = selector.today_progress();
        assert_eq!((p.completed, p.remaining), (3, 0));
        assert_eq!(p.percentage, 100);
        assert!(p.is_complete);
        assert!(selector.remaining_words().is_empty());
    }

    #[test]
    fn empty_session_is_never_complete() {
        let (selector, _) = setup();
        let p = selector.today_progress();
        assert_eq!(p.total, 0);
        assert_eq!(p.percentage, 0);
        assert!(!p.is_complete);
    }

    #[test]
    fn completed_marker_is_independent_of_live_progress() {
        let (selector, progress) = setup();
        progress.add_words(&records(2)).unwrap();
        selector.select_today_words().unwrap();

        assert!(!selector.is_session_marked_complete());
        selector.mark_session_complete().unwrap();
        assert!(selector.is_session_marked_complete());
        // Live progress still says there is work left.
        assert!(!selector.today_progress().is_complete);
    }

    #[test]
    fn needs_more_words_flips_at_the_low_water_mark() {
        let (selector, progress) = setup();
        progress.add_words(&records(19)).unwrap();
        assert!(selector.needs_more_words());

        progress.add_words(&[record("word19")]).unwrap();
        assert!(!selector.needs_more_words());

        // Answering a word shrinks the unseen pool back below the mark.
        progress
            .update_status("word00", WordStatus::Learned, false)
            .unwrap();
        assert!(selector.needs_more_words());
    }

    #[test]
    fn refill_count_tops_up_to_fifty_with_a_floor_of_thirty() {
        let (selector, progress) = setup();
        assert_eq!(selector.refill_count(), 50);

        progress.add_words(&records(12)).unwrap();
        assert_eq!(selector.refill_count(), 38);

        progress.add_words(&records(30)).unwrap(); // 12 duplicates, 18 new
        assert_eq!(selector.refill_count(), 30);
    }
}
