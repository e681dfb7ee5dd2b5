pub(crate) mod detect;
pub(crate) mod health;
pub(crate) mod metrics;
pub(crate) mod pages;

use axum::{
    Router,
    routing::{get, post},
};

use crate::app::AppState;

pub(crate) fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::index))
        .route("/detect", post(detect::detect))
        .route("/health/ready", get(health::ready))
        .route("/health/live", get(health::live))
        .route("/metrics", get(metrics::exporter))
        .with_state(state)
}
