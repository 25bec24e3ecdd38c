//! Append-only learned/wrong activity records and the statistics derived
//! from them: daily series, distribution, most-missed words, study streak.
//!
//! The buckets live inside the main [`StorageData`](crate::StorageData)
//! document but are mutated only through this engine.

use std::collections::BTreeSet;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

use crate::models::{
    ActivityBuckets, ActivityRecord, BasicStats, DailyActivity, DistributionSlice,
};
use crate::progress::ProgressStore;
use crate::store::StorageResult;

const LEARNED_COLOR: &str = "#10b981";
const WRONG_COLOR: &str = "#ef4444";

/// The bucket mutations live here so every writer shares one
/// implementation: the log's own API below and the study flows that commit
/// a status change and its activity record in a single document write.
impl ActivityBuckets {
    pub(crate) fn push_learned(&mut self, word: &str, korean: &str, now: DateTime<Utc>) -> bool {
        if self.learned.iter().any(|r| r.word == word) {
            return false;
        }
        self.learned.push(ActivityRecord {
            word: word.to_string(),
            korean: korean.to_string(),
            saved_at: now,
            review_count: 0,
        });
        true
    }

    pub(crate) fn bump_wrong(&mut self, word: &str, korean: &str, now: DateTime<Utc>) -> u32 {
        if let Some(entry) = self.wrong.iter_mut().find(|r| r.word == word) {
            entry.review_count += 1;
            entry.saved_at = now;
            return entry.review_count;
        }
        self.wrong.push(ActivityRecord {
            word: word.to_string(),
            korean: korean.to_string(),
            saved_at: now,
            review_count: 1,
        });
        1
    }

    pub(crate) fn clear_wrong(&mut self, word: &str) -> bool {
        let before = self.wrong.len();
        self.wrong.retain(|r| r.word != word);
        self.wrong.len() != before
    }
}

#[derive(Clone)]
pub struct ActivityLog {
    progress: ProgressStore,
}

impl ActivityLog {
    pub fn new(progress: ProgressStore) -> Self {
        Self { progress }
    }

    /// Appends a learned record, once per distinct word. Re-learning an
    /// already recorded word is a no-op; returns whether a record was
    /// written.
    pub fn record_learned(&self, word: &str, korean: &str) -> StorageResult<bool> {
        let now = self.progress.clock().now();
        self.progress
            .with_data(|data| data.activity.push_learned(word, korean, now))
    }

    /// Inserts a wrong record with `review_count=1`, or bumps the counter
    /// and refreshes the timestamp on a repeat miss. Returns the new count.
    pub fn record_wrong(&self, word: &str, korean: &str) -> StorageResult<u32> {
        let now = self.progress.clock().now();
        self.progress
            .with_data(|data| data.activity.bump_wrong(word, korean, now))
    }

    /// Drops the word's wrong-bucket entry. Removal is only ever this
    /// explicit operation; recording a word as learned never removes it.
    pub fn remove_from_wrong(&self, word: &str) -> StorageResult<bool> {
        self.progress
            .with_data(|data| data.activity.clear_wrong(word))
    }

    pub fn basic_stats(&self) -> BasicStats {
        let data = self.progress.load();
        let total_learned = data.activity.learned.len();
        let total_wrong = data.activity.wrong.len();
        let total_reviews = data.activity.wrong.iter().map(|r| r.review_count).sum();
        let denominator = total_learned + total_wrong;
        let success_rate = if denominator > 0 {
            ((total_learned as f64 / denominator as f64) * 100.0).round() as u32
        } else {
            0
        };

        BasicStats {
            total_learned,
            total_wrong,
            total_reviews,
            success_rate,
        }
    }

    /// Per-day counts for the last `days` calendar days, oldest first and
    /// inclusive of today. Days without activity appear with zero counts.
    pub fn daily_series(&self, days: usize) -> Vec<DailyActivity> {
        let data = self.progress.load();
        let today = self.progress.clock().today();

        (0..days)
            .rev()
            .map(|offset| {
                let date = today - Duration::days(offset as i64);
                let on = |records: &[ActivityRecord]| {
                    records
                        .iter()
                        .filter(|r| r.saved_at.date_naive() == date)
                        .count()
                };
                let learned = on(&data.activity.learned);
                let wrong = on(&data.activity.wrong);
                DailyActivity {
                    date,
                    learned,
                    wrong,
                    total: learned + wrong,
                    date_label: format!("{}/{}", date.month(), date.day()),
                }
            })
            .collect()
    }

    /// Two-slice learned/wrong summary for the pie chart.
    pub fn distribution(&self) -> Vec<DistributionSlice> {
        let data = self.progress.load();
        vec![
            DistributionSlice {
                name: "learned".to_string(),
                value: data.activity.learned.len(),
                color: LEARNED_COLOR.to_string(),
            },
            DistributionSlice {
                name: "wrong".to_string(),
                value: data.activity.wrong.len(),
                color: WRONG_COLOR.to_string(),
            },
        ]
    }

    /// Wrong-bucket entries with the highest review counts. Ties keep
    /// insertion order (stable sort).
    pub fn most_wrong(&self, limit: usize) -> Vec<ActivityRecord> {
        let mut entries = self.progress.load().activity.wrong;
        entries.sort_by(|a, b| b.review_count.cmp(&a.review_count));
        entries.truncate(limit);
        entries
    }

    /// Consecutive days of activity ending today. The chain must include
    /// today: activity yesterday but none today yields 0.
    pub fn study_streak(&self) -> u32 {
        let data = self.progress.load();
        let dates: BTreeSet<NaiveDate> = data
            .activity
            .learned
            .iter()
            .chain(data.activity.wrong.iter())
            .map(|r| r.saved_at.date_naive())
            .collect();

        let mut streak = 0;
        let mut cursor = self.progress.clock().today();
        for date in dates.iter().rev() {
            if *date == cursor {
                streak += 1;
                cursor = cursor - Duration::days(1);
            } else {
                break;
            }
        }
        streak
    }

    /// Empties both buckets (full statistics reset).
    pub fn clear_all(&self) -> StorageResult<()> {
        self.progress.with_data(|data| {
            data.activity.learned.clear();
            data.activity.wrong.clear();
        })
    }
}
