/// SerpAPI 経由で入力テキストに一致しそうな Web ページを探すクライアント。
///
/// この機能は補助的なものなので、失敗は常に空リストへ縮退させ、
/// 呼び出し側へはエラーを返さない。
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::{debug, warn};

/// 検索結果 1 件分。上流レスポンスに欠けているフィールドは None のまま。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct WebSource {
    pub(crate) title: Option<String>,
    pub(crate) snippet: Option<String>,
    pub(crate) link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    organic_results: Vec<WebSource>,
}

/// SerpAPI クライアントの設定。
#[derive(Debug, Clone)]
pub(crate) struct SerpApiConfig {
    pub(crate) base_url: String,
    pub(crate) api_key: Option<String>,
    pub(crate) connect_timeout: Duration,
    pub(crate) total_timeout: Duration,
    pub(crate) engine: String,
    pub(crate) language: String,
}

#[derive(Debug, Clone)]
pub(crate) struct SerpApiClient {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
    engine: String,
    language: String,
}

impl SerpApiClient {
    /// 新しい SerpAPI クライアントを作成する。
    ///
    /// # Errors
    /// URL のパースまたは HTTP クライアントの構築に失敗した場合は
    /// エラーを返す。
    pub(crate) fn new(config: SerpApiConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.total_timeout)
            .build()
            .context("failed to build serpapi HTTP client")?;

        let base_url = Url::parse(&config.base_url).context("invalid serpapi base URL")?;

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key,
            engine: config.engine,
            language: config.language,
        })
    }

    #[must_use]
    pub(crate) fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    /// クエリに一致しそうな Web ページを最大 `max_results` 件返す。
    ///
    /// 空クエリとキー未設定ではネットワークに出ない。通信・パースの
    /// 失敗はログに残して空リストを返す。この関数は決して失敗しない。
    pub(crate) async fn search(&self, query: &str, max_results: usize) -> Vec<WebSource> {
        if query.trim().is_empty() {
            return Vec::new();
        }

        let Some(api_key) = self.api_key.as_deref() else {
            warn!("serpapi api key not configured; skipping web source lookup");
            return Vec::new();
        };

        match self.fetch(query, api_key, max_results).await {
            Ok(sources) => sources,
            Err(error) => {
                warn!(error = ?error, "web source lookup failed");
                Vec::new()
            }
        }
    }

    async fn fetch(
        &self,
        query: &str,
        api_key: &str,
        max_results: usize,
    ) -> Result<Vec<WebSource>> {
        let url = self
            .base_url
            .join("search")
            .context("failed to build serpapi search URL")?;

        let response = self
            .client
            .get(url)
            .query(&[
                ("engine", self.engine.as_str()),
                ("q", query),
                ("api_key", api_key),
                ("num", &max_results.to_string()),
                ("hl", self.language.as_str()),
            ])
            .send()
            .await
            .context("serpapi search request failed")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("serpapi returned error status {status}");
        }

        let body: SearchResponse = response
            .json()
            .await
            .context("failed to deserialize serpapi search response")?;

        let mut sources = body.organic_results;
        sources.truncate(max_results);

        debug!(count = sources.len(), "fetched web sources");

        Ok(sources)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(base_url: String, api_key: Option<&str>) -> SerpApiConfig {
        SerpApiConfig {
            base_url,
            api_key: api_key.map(str::to_string),
            connect_timeout: Duration::from_secs(1),
            total_timeout: Duration::from_secs(1),
            engine: "google".to_string(),
            language: "en".to_string(),
        }
    }

    fn organic_results_body(count: usize) -> serde_json::Value {
        let entries: Vec<serde_json::Value> = (0..count)
            .map(|i| {
                serde_json::json!({
                    "title": format!("Result {i}"),
                    "snippet": format!("Snippet {i}"),
                    "link": format!("https://example.com/{i}")
                })
            })
            .collect();
        serde_json::json!({ "organic_results": entries })
    }

    #[tokio::test]
    async fn search_returns_parsed_sources() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("engine", "google"))
            .and(query_param("q", "copied text"))
            .and(query_param("api_key", "test-key"))
            .and(query_param("num", "5"))
            .and(query_param("hl", "en"))
            .respond_with(ResponseTemplate::new(200).set_body_json(organic_results_body(2)))
            .mount(&server)
            .await;

        let client = SerpApiClient::new(test_config(server.uri(), Some("test-key")))
            .expect("client should build");
        let sources = client.search("copied text", 5).await;

        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].title.as_deref(), Some("Result 0"));
        assert_eq!(sources[1].link.as_deref(), Some("https://example.com/1"));
    }

    #[tokio::test]
    async fn search_truncates_to_max_results() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(organic_results_body(8)))
            .mount(&server)
            .await;

        let client = SerpApiClient::new(test_config(server.uri(), Some("test-key")))
            .expect("client should build");
        let sources = client.search("copied text", 3).await;

        assert_eq!(sources.len(), 3);
    }

    #[tokio::test]
    async fn search_tolerates_missing_result_fields() {
        let server = MockServer::start().await;

        let body = serde_json::json!({
            "organic_results": [
                { "title": "Only a title" },
                { "link": "https://example.com/untitled" }
            ]
        });

        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let client = SerpApiClient::new(test_config(server.uri(), Some("test-key")))
            .expect("client should build");
        let sources = client.search("copied text", 5).await;

        assert_eq!(sources.len(), 2);
        assert!(sources[0].snippet.is_none());
        assert!(sources[0].link.is_none());
        assert!(sources[1].title.is_none());
    }

    #[tokio::test]
    async fn search_without_api_key_makes_no_request() {
        let server = MockServer::start().await;

        let client = SerpApiClient::new(test_config(server.uri(), None))
            .expect("client should build");
        let sources = client.search("copied text", 5).await;

        assert!(sources.is_empty());
        assert!(!client.is_enabled());
        let received = server.received_requests().await.expect("request log");
        assert!(received.is_empty());
    }

    #[tokio::test]
    async fn search_with_blank_query_makes_no_request() {
        let server = MockServer::start().await;

        let client = SerpApiClient::new(test_config(server.uri(), Some("test-key")))
            .expect("client should build");
        let sources = client.search("   \t", 5).await;

        assert!(sources.is_empty());
        let received = server.received_requests().await.expect("request log");
        assert!(received.is_empty());
    }

    #[tokio::test]
    async fn search_degrades_to_empty_on_http_error_status() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = SerpApiClient::new(test_config(server.uri(), Some("test-key")))
            .expect("client should build");
        let sources = client.search("copied text", 5).await;

        assert!(sources.is_empty());
    }

    #[tokio::test]
    async fn search_degrades_to_empty_on_malformed_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
            .mount(&server)
            .await;

        let client = SerpApiClient::new(test_config(server.uri(), Some("test-key")))
            .expect("client should build");
        let sources = client.search("copied text", 5).await;

        assert!(sources.is_empty());
    }

    #[tokio::test]
    async fn search_degrades_to_empty_on_timeout() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(organic_results_body(1))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let mut config = test_config(server.uri(), Some("test-key"));
        config.total_timeout = Duration::from_millis(100);

        let client = SerpApiClient::new(config).expect("client should build");
        let sources = client.search("copied text", 5).await;

        assert!(sources.is_empty());
    }

    #[tokio::test]
    async fn search_treats_missing_organic_results_as_empty() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"search_metadata": {}})),
            )
            .mount(&server)
            .await;

        let client = SerpApiClient::new(test_config(server.uri(), Some("test-key")))
            .expect("client should build");
        let sources = client.search("copied text", 5).await;

        assert!(sources.is_empty());
    }
}
