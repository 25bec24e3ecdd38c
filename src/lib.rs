//! Study-state engine for a vocabulary flashcard trainer.
//!
//! Owns the persisted word bank, selects the calendar-day study set,
//! tracks per-word status transitions (unseen/learned/wrong), and derives
//! statistics (daily series, streaks, most-missed words) from timestamped
//! activity records. Also ships the outbound adapters used to acquire new
//! words: a random-word provider (Datamuse) and a Korean translation
//! provider (DeepL).
//!
//! Presentation, server-side persistence, and multi-device sync are out of
//! scope: the engine assumes a single user, single device, single writer.

pub mod activity;
pub mod config;
pub mod engine;
pub mod logging;
pub mod models;
pub mod progress;
pub mod session;
pub mod source;
pub mod store;
pub mod time;

pub use activity::ActivityLog;
pub use config::Config;
pub use engine::StudyEngine;
pub use models::{
    ActivityBuckets, ActivityRecord, AppSettings, BasicStats, DailyActivity, DistributionSlice,
    SettingsPatch, Statistics, StorageData, StudySession, TodayProgress, WordProgress, WordRecord,
    WordStatus,
};
pub use progress::ProgressStore;
pub use session::SessionSelector;
pub use source::{
    DatamuseClient, DeepLClient, SourceError, Translator, WordCandidate, WordProvider, WordSource,
};
pub use store::{FileStore, KeyValueStore, MemoryStore, StorageError, StorageResult};
pub use time::{Clock, FixedClock, SystemClock};
