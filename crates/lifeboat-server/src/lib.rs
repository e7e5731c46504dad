//! Lifeboat form server — library interface.
//!
//! Exposes the application state, router construction and handlers so the
//! binary and the integration tests build the service the same way.

pub mod config;
pub mod handlers;
pub mod render;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use lifeboat_core::{AppConfig, OutcomeResolver, OverrideTable, SurvivalModel};
use lifeboat_model::{InferenceStatsTracker, TrackedModel};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

pub use handlers::{
    api_predict_handler, fact_handler, form_handler, health_handler, index_handler,
    FormSubmission, PredictResponse,
};

/// Shared state threaded through axum handlers via `State`.
///
/// Built once at startup; handlers only read it.
pub struct AppState {
    pub config: AppConfig,
    /// Resolved artifact location the model was loaded from.
    pub model_path: PathBuf,
    pub resolver: OutcomeResolver,
    pub inference_stats: Arc<InferenceStatsTracker>,
}

impl AppState {
    /// Wrap an already-loaded model.
    pub fn new(config: AppConfig, model_path: PathBuf, model: Arc<dyn SurvivalModel>) -> Self {
        let inference_stats = Arc::new(InferenceStatsTracker::default());
        let tracked = Arc::new(TrackedModel::new(model, Arc::clone(&inference_stats)))
            as Arc<dyn SurvivalModel>;
        let overrides = Arc::new(OverrideTable::from_config(&config.overrides));
        Self {
            config,
            model_path,
            resolver: OutcomeResolver::new(overrides, tracked),
            inference_stats,
        }
    }
}

/// Resolve the configured artifact path and load the model.
///
/// A failure here is fatal: the caller must not start serving.
pub fn build_app_state(config: AppConfig) -> anyhow::Result<Arc<AppState>> {
    let model_path = lifeboat_model::resolve_artifact_path(Path::new(&config.model_path))?;
    info!(path = %model_path.display(), "Resolved model artifact");

    let model = lifeboat_model::load_model(&model_path).map_err(|e| {
        error!(path = %model_path.display(), error = %e, "Cannot load survival model");
        e
    })?;

    Ok(Arc::new(AppState::new(config, model_path, model)))
}

/// Build the axum [`Router`] with all routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    let body_limit = state.config.max_request_size_bytes;
    Router::new()
        .route("/", get(index_handler))
        .route("/predict", post(form_handler))
        .route("/api/v1/predict", post(api_predict_handler))
        .route("/api/v1/fact", get(fact_handler))
        .route("/health", get(health_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
