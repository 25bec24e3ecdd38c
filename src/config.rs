//! Runtime configuration from environment variables, with defaults that
//! work out of the box (except the DeepL key, which has no default).

use std::path::PathBuf;
use std::time::Duration;

use crate::source::DEFAULT_FETCH_CONCURRENCY;

const DEFAULT_DATAMUSE_BASE_URL: &str = "https://api.datamuse.com";
const DEFAULT_DEEPL_BASE_URL: &str = "https://api-free.deepl.com";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub deepl_api_key: Option<String>,
    pub datamuse_base_url: String,
    pub deepl_base_url: String,
    pub fetch_concurrency: usize,
    pub http_timeout: Duration,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let data_dir = std::env::var("ENGTUTOR_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data"));

        let deepl_api_key = std::env::var("DEEPL_API_KEY").ok().filter(|k| !k.is_empty());

        let datamuse_base_url = std::env::var("DATAMUSE_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_DATAMUSE_BASE_URL.to_string());

        let deepl_base_url = std::env::var("DEEPL_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_DEEPL_BASE_URL.to_string());

        let fetch_concurrency = std::env::var("FETCH_CONCURRENCY")
            .ok()
            .and_then(|value| value.parse::<usize>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_FETCH_CONCURRENCY);

        let http_timeout = std::env::var("HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS));

        let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let log_dir = std::env::var("LOG_DIR").ok().map(PathBuf::from);

        Self {
            data_dir,
            deepl_api_key,
            datamuse_base_url,
            deepl_base_url,
            fetch_concurrency,
            http_timeout,
            log_level,
            log_dir,
        }
    }
}
