/// Prometheusメトリクス定義。
use prometheus::{
    Counter, Histogram, Registry, register_counter_with_registry,
    register_histogram_with_registry,
};

/// メトリクスコレクター。
#[derive(Debug, Clone)]
pub struct Metrics {
    // カウンター
    pub detect_requests: Counter,
    pub classifications_flagged: Counter,
    pub classifications_clean: Counter,
    pub empty_submissions: Counter,
    pub web_sources_returned: Counter,

    // ヒストグラム
    pub web_search_duration: Histogram,
}

impl Metrics {
    /// 新しいメトリクスコレクターを作成する。
    ///
    /// # Errors
    /// レジストリへの登録に失敗した場合はエラーを返す。
    pub fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
        Ok(Self {
            detect_requests: register_counter_with_registry!(
                "plagiarism_detect_requests_total",
                "Total number of detect form submissions",
                registry
            )?,
            classifications_flagged: register_counter_with_registry!(
                "plagiarism_flagged_total",
                "Total number of submissions classified as plagiarism",
                registry
            )?,
            classifications_clean: register_counter_with_registry!(
                "plagiarism_clean_total",
                "Total number of submissions classified as not plagiarism",
                registry
            )?,
            empty_submissions: register_counter_with_registry!(
                "plagiarism_empty_submissions_total",
                "Total number of empty or whitespace-only submissions",
                registry
            )?,
            web_sources_returned: register_counter_with_registry!(
                "plagiarism_web_sources_returned_total",
                "Total number of web source entries returned to users",
                registry
            )?,
            web_search_duration: register_histogram_with_registry!(
                "plagiarism_web_search_duration_seconds",
                "Latency of outbound web source lookups",
                registry
            )?,
        })
    }
}

