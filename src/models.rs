//! Data types for the persisted study-state document and its derived views.
//!
//! Wire names stay camelCase so a document written by an earlier build of
//! the trainer parses unchanged.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Informational only; never consulted for migrations.
pub const STORAGE_VERSION: &str = "1.0.0";

pub const DEFAULT_DAILY_LIMIT: u32 = 10;

/// Per-word learning status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WordStatus {
    Unseen,
    Learned,
    Wrong,
}

/// A freshly acquired word from the source adapters. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordRecord {
    pub word: String,
    pub korean: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub english: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_of_speech: Option<String>,
}

/// Durable per-word state. `word` is the natural key, case-sensitive and
/// unique within the bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordProgress {
    pub word: String,
    pub korean: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub english: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_of_speech: Option<String>,
    pub status: WordStatus,
    pub last_studied: Option<NaiveDate>,
    pub wrong_count: u32,
    pub learned_date: Option<NaiveDate>,
}

impl From<WordRecord> for WordProgress {
    fn from(record: WordRecord) -> Self {
        Self {
            word: record.word,
            korean: record.korean,
            english: record.english,
            example: record.example,
            part_of_speech: record.part_of_speech,
            status: WordStatus::Unseen,
            last_studied: None,
            wrong_count: 0,
            learned_date: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    pub daily_limit: u32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            daily_limit: DEFAULT_DAILY_LIMIT,
        }
    }
}

/// Partial settings update; `None` fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_limit: Option<u32>,
}

impl AppSettings {
    pub fn merge(&mut self, patch: &SettingsPatch) {
        if let Some(limit) = patch.daily_limit {
            if limit > 0 {
                self.daily_limit = limit;
            }
        }
    }
}

/// The calendar-day study set. `words_loaded` references bank entries by
/// word and is replaced wholesale on a new day or re-selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySession {
    pub date: NaiveDate,
    pub words_loaded: Vec<String>,
    pub completed: bool,
}

impl StudySession {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            words_loaded: Vec::new(),
            completed: false,
        }
    }
}

/// One learned or wrong event. In the wrong bucket `review_count` tracks
/// repeat misses; the learned bucket is written once per word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRecord {
    pub word: String,
    pub korean: String,
    pub saved_at: DateTime<Utc>,
    #[serde(default)]
    pub review_count: u32,
}

/// Append-only activity buckets, stored inside the main document and
/// mutated only through [`crate::ActivityLog`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityBuckets {
    #[serde(default)]
    pub learned: Vec<ActivityRecord>,
    #[serde(default)]
    pub wrong: Vec<ActivityRecord>,
}

/// The whole persisted document. One per user, one writer at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageData {
    pub settings: AppSettings,
    pub word_bank: Vec<WordProgress>,
    pub current_session: StudySession,
    #[serde(default)]
    pub activity: ActivityBuckets,
    pub version: String,
}

impl StorageData {
    pub fn fresh(today: NaiveDate) -> Self {
        Self {
            settings: AppSettings::default(),
            word_bank: Vec::new(),
            current_session: StudySession::empty(today),
            activity: ActivityBuckets::default(),
            version: STORAGE_VERSION.to_string(),
        }
    }

    pub fn find_word(&self, word: &str) -> Option<&WordProgress> {
        self.word_bank.iter().find(|w| w.word == word)
    }
}

/// Bank-wide counters plus today's target, for the overview screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total: usize,
    pub learned: usize,
    pub wrong: usize,
    pub unseen: usize,
    pub today_progress: usize,
    pub today_limit: u32,
}

/// Live progress through today's session. `is_complete` is recomputed on
/// every query and is authoritative; the stored session `completed` flag is
/// an informational marker only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodayProgress {
    pub total: usize,
    pub completed: usize,
    pub remaining: usize,
    pub percentage: u32,
    pub is_complete: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicStats {
    pub total_learned: usize,
    pub total_wrong: usize,
    pub total_reviews: u32,
    pub success_rate: u32,
}

/// One day of the activity series. `date_label` is the short `M/D` axis
/// label used by the charts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyActivity {
    pub date: NaiveDate,
    pub learned: usize,
    pub wrong: usize,
    pub total: usize,
    pub date_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionSlice {
    pub name: String,
    pub value: usize,
    pub color: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_record_converts_to_fresh_progress() {
        let record = WordRecord {
            word: "apple".into(),
            korean: "사과".into(),
            english: Some("a common fruit".into()),
            example: Some("she ate an apple".into()),
            part_of_speech: Some("n".into()),
        };

        let progress = WordProgress::from(record);
        assert_eq!(progress.status, WordStatus::Unseen);
        assert_eq!(progress.example.as_deref(), Some("she ate an apple"));
        assert_eq!(progress.wrong_count, 0);
        assert!(progress.last_studied.is_none());
        assert!(progress.learned_date.is_none());
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&WordStatus::Unseen).unwrap(),
            "\"unseen\""
        );
        assert_eq!(
            serde_json::to_string(&WordStatus::Learned).unwrap(),
            "\"learned\""
        );
    }

    #[test]
    fn document_round_trips_with_camel_case_keys() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let mut data = StorageData::fresh(today);
        data.word_bank.push(WordProgress {
            word: "river".into(),
            korean: "강".into(),
            english: None,
            example: Some("the river burst its banks".into()),
            part_of_speech: None,
            status: WordStatus::Wrong,
            last_studied: Some(today),
            wrong_count: 2,
            learned_date: None,
        });

        let json = serde_json::to_string(&data).unwrap();
        assert!(json.contains("\"wordBank\""));
        assert!(json.contains("\"currentSession\""));
        assert!(json.contains("\"wrongCount\":2"));
        assert!(json.contains("\"dailyLimit\":10"));

        let back: StorageData = serde_json::from_str(&json).unwrap();
        assert_eq!(back, data);
    }

    #[test]
    fn older_document_without_activity_field_still_parses() {
        let json = r#"{
            "settings": {"dailyLimit": 20},
            "wordBank": [],
            "currentSession": {"date": "2025-06-01", "wordsLoaded": [], "completed": false},
            "version": "1.0.0"
        }"#;

        let data: StorageData = serde_json::from_str(json).unwrap();
        assert_eq!(data.settings.daily_limit, 20);
        assert!(data.activity.learned.is_empty());
        assert!(data.activity.wrong.is_empty());
    }

    #[test]
    fn settings_merge_ignores_zero_limit() {
        let mut settings = AppSettings::default();
        settings.merge(&SettingsPatch {
            daily_limit: Some(0),
        });
        assert_eq!(settings.daily_limit, DEFAULT_DAILY_LIMIT);

        settings.merge(&SettingsPatch {
            daily_limit: Some(50),
        });
        assert_eq!(settings.daily_limit, 50);
    }
}
