use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
};
use serde::Deserialize;
use tracing::error;

use crate::{app::AppState, detector::Verdict, render};

#[derive(Debug, Deserialize)]
pub(crate) struct DetectForm {
    /// フィールド欠落は空文字として扱う。
    #[serde(default)]
    text: String,
}

/// フォーム投稿を受け、分類と Web ソース検索を順に実行して 1 ページに描画する。
///
/// Web ソース検索は決して失敗しない。分類のモデル層エラーだけが 500 になる。
pub(crate) async fn detect(
    State(state): State<AppState>,
    Form(form): Form<DetectForm>,
) -> impl IntoResponse {
    let metrics = state.telemetry().metrics().clone();
    metrics.detect_requests.inc();

    let verdict = match state.detector().classify(&form.text) {
        Ok(verdict) => verdict,
        Err(err) => {
            error!(error = ?err, "classification failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                "classification failed".to_string(),
            )
                .into_response();
        }
    };

    match verdict {
        Verdict::Plagiarism => metrics.classifications_flagged.inc(),
        Verdict::Clean => metrics.classifications_clean.inc(),
        Verdict::Empty => metrics.empty_submissions.inc(),
    }

    let timer = metrics.web_search_duration.start_timer();
    let sources = state
        .serpapi_client()
        .search(&form.text, state.config().search_max_results())
        .await;
    timer.observe_duration();
    metrics.web_sources_returned.inc_by(sources.len() as f64);

    Html(render::results_page(&form.text, verdict.message(), &sources)).into_response()
}
