use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;

use crate::{
    api,
    clients::{SerpApiClient, SerpApiConfig},
    config::Config,
    detector::PlagiarismDetector,
    model::ArtifactStore,
    observability::Telemetry,
};

#[derive(Clone)]
pub(crate) struct AppState {
    registry: Arc<ComponentRegistry>,
}

pub struct ComponentRegistry {
    config: Arc<Config>,
    telemetry: Telemetry,
    detector: PlagiarismDetector,
    serpapi_client: Arc<SerpApiClient>,
}

impl AppState {
    pub(crate) fn new(registry: ComponentRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    pub(crate) fn telemetry(&self) -> &Telemetry {
        &self.registry.telemetry
    }

    pub(crate) fn config(&self) -> &Config {
        &self.registry.config
    }

    pub(crate) fn detector(&self) -> &PlagiarismDetector {
        &self.registry.detector
    }

    pub(crate) fn serpapi_client(&self) -> Arc<SerpApiClient> {
        Arc::clone(&self.registry.serpapi_client)
    }
}

impl ComponentRegistry {
    /// 構成情報と依存をまとめて初期化し、アプリケーションの共有レジストリを構築する。
    ///
    /// モデルアーティファクトはここで一度だけ読み込まれ、以後は
    /// 読み取り専用で全リクエストに共有される。
    ///
    /// # Errors
    /// Telemetry の初期化、アーティファクトの読み込み、HTTP クライアント
    /// 構築が失敗した場合はエラーを返す。
    pub fn build(config: Config) -> Result<Self> {
        let config = Arc::new(config);
        let telemetry = Telemetry::new()?;

        let artifacts = Arc::new(
            ArtifactStore::load(config.model_dir())
                .context("failed to load model artifacts")?,
        );
        let detector = PlagiarismDetector::new(artifacts);

        let serpapi_client = Arc::new(
            SerpApiClient::new(SerpApiConfig {
                base_url: config.serpapi_base_url().to_string(),
                api_key: config.serpapi_api_key().map(str::to_string),
                connect_timeout: config.search_connect_timeout(),
                total_timeout: config.search_total_timeout(),
                engine: config.search_engine().to_string(),
                language: config.search_language().to_string(),
            })
            .context("failed to build serpapi client")?,
        );

        Ok(Self {
            config,
            telemetry,
            detector,
            serpapi_client,
        })
    }

    #[must_use]
    pub fn config(&self) -> Arc<Config> {
        Arc::clone(&self.config)
    }
}

pub fn build_router(registry: ComponentRegistry) -> Router {
    let state = AppState::new(registry);
    api::router(state)
}
