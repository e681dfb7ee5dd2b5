use axum::{Json, extract::State};
use serde::Serialize;

use crate::app::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) struct HealthReport {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

pub(crate) async fn ready(State(state): State<AppState>) -> Json<HealthReport> {
    state.telemetry().record_ready_probe();

    // モデルはレジストリ構築時に読み込み済み。Web ソース検索は任意機能
    // なので、無効でも ready のまま detail で知らせるだけにする。
    let detail = if state.serpapi_client().is_enabled() {
        None
    } else {
        Some("web source lookup disabled: no api key configured".to_string())
    };

    Json(HealthReport {
        status: "ready",
        detail,
    })
}

pub(crate) async fn live(State(state): State<AppState>) -> Json<HealthReport> {
    state.telemetry().record_live_probe();
    Json(HealthReport {
        status: "live",
        detail: None,
    })
}
