use std::{env, net::SocketAddr, time::Duration};

use thiserror::Error;

#[cfg(test)]
use once_cell::sync::Lazy;
#[cfg(test)]
pub(crate) static ENV_MUTEX: Lazy<std::sync::Mutex<()>> = Lazy::new(|| std::sync::Mutex::new(()));

/// SerpAPI のプレースホルダキー。ドキュメントからコピーされたまま残っている
/// 値は未設定として扱う。
const SERPAPI_PLACEHOLDER_KEY: &str = "YOUR_SERPAPI_API_KEY";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    http_bind: SocketAddr,
    model_dir: Option<String>,
    serpapi_api_key: Option<String>,
    serpapi_base_url: String,
    search_connect_timeout: Duration,
    search_total_timeout: Duration,
    search_max_results: usize,
    search_engine: String,
    search_language: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {source}")]
    Invalid {
        name: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl Config {
    /// 環境変数から設定値を読み込み、検証する。
    ///
    /// すべての変数にデフォルト値があるため、未設定はエラーにならない。
    /// 数値やアドレスのパースに失敗した場合のみエラーを返す。
    ///
    /// # Errors
    /// 値のパースに失敗した場合は [`ConfigError`] を返す。
    pub fn from_env() -> Result<Self, ConfigError> {
        let http_bind = parse_socket_addr("PLAGIARISM_HTTP_BIND", "0.0.0.0:9800")?;
        let model_dir = env::var("PLAGIARISM_MODEL_DIR").ok();

        // An absent key and the placeholder both disable web source lookup.
        // The service must never fall back to an embedded credential.
        let serpapi_api_key = env::var("SERPAPI_API_KEY")
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty() && key != SERPAPI_PLACEHOLDER_KEY);
        let serpapi_base_url =
            env::var("SERPAPI_BASE_URL").unwrap_or_else(|_| "https://serpapi.com/".to_string());

        let search_connect_timeout = parse_duration_ms("SEARCH_CONNECT_TIMEOUT_MS", 3000)?;
        let search_total_timeout = parse_duration_secs("SEARCH_TIMEOUT_SECS", 10)?;
        let search_max_results = parse_usize("SEARCH_MAX_RESULTS", 5)?;
        let search_engine = env::var("SEARCH_ENGINE").unwrap_or_else(|_| "google".to_string());
        let search_language = env::var("SEARCH_LANGUAGE").unwrap_or_else(|_| "en".to_string());

        Ok(Self {
            http_bind,
            model_dir,
            serpapi_api_key,
            serpapi_base_url,
            search_connect_timeout,
            search_total_timeout,
            search_max_results,
            search_engine,
            search_language,
        })
    }

    #[must_use]
    pub fn http_bind(&self) -> SocketAddr {
        self.http_bind
    }

    #[must_use]
    pub fn model_dir(&self) -> Option<&str> {
        self.model_dir.as_deref()
    }

    #[must_use]
    pub fn serpapi_api_key(&self) -> Option<&str> {
        self.serpapi_api_key.as_deref()
    }

    #[must_use]
    pub fn serpapi_base_url(&self) -> &str {
        &self.serpapi_base_url
    }

    #[must_use]
    pub fn search_connect_timeout(&self) -> Duration {
        self.search_connect_timeout
    }

    #[must_use]
    pub fn search_total_timeout(&self) -> Duration {
        self.search_total_timeout
    }

    #[must_use]
    pub fn search_max_results(&self) -> usize {
        self.search_max_results
    }

    #[must_use]
    pub fn search_engine(&self) -> &str {
        &self.search_engine
    }

    #[must_use]
    pub fn search_language(&self) -> &str {
        &self.search_language
    }
}

fn parse_socket_addr(name: &'static str, default: &str) -> Result<SocketAddr, ConfigError> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    raw.parse::<SocketAddr>()
        .map_err(|error| ConfigError::Invalid {
            name,
            source: anyhow::Error::new(error),
        })
}

fn parse_usize(name: &'static str, default: usize) -> Result<usize, ConfigError> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    raw.parse::<usize>().map_err(|error| ConfigError::Invalid {
        name,
        source: anyhow::Error::new(error),
    })
}

fn parse_duration_ms(name: &'static str, default: u64) -> Result<Duration, ConfigError> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    let millis = raw.parse::<u64>().map_err(|error| ConfigError::Invalid {
        name,
        source: anyhow::Error::new(error),
    })?;
    Ok(Duration::from_millis(millis))
}

fn parse_duration_secs(name: &'static str, default: u64) -> Result<Duration, ConfigError> {
    let raw = env::var(name).unwrap_or_else(|_| default.to_string());
    let secs = raw.parse::<u64>().map_err(|error| ConfigError::Invalid {
        name,
        source: anyhow::Error::new(error),
    })?;
    Ok(Duration::from_secs(secs))
}
