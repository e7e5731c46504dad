//! Request handlers for the form page and the JSON API.
//!
//! Every submission is resolved synchronously against the shared
//! [`OutcomeResolver`](lifeboat_core::OutcomeResolver). Failures stay local
//! to the submission and are shown inline (HTML) or as a JSON error body.

use crate::render::{render_page, FormState, ResultPanel};
use crate::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::{Form, Json};
use lifeboat_core::facts::random_fact;
use lifeboat_core::{FormInput, LifeboatError, PredictionResult, SurvivalReport};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Raw urlencoded form body. Everything is a string so bad values can be
/// reported inline instead of being rejected by the extractor.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FormSubmission {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sex: String,
    #[serde(default)]
    pub age: String,
    #[serde(default)]
    pub income_bracket: String,
}

/// JSON body returned by `POST /api/v1/predict`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    pub result: PredictionResult,
    pub report: SurvivalReport,
}

// ---------------------------------------------------------------------------
// HTML handlers
// ---------------------------------------------------------------------------

/// `GET /` — empty form with a placeholder result.
pub async fn index_handler() -> Html<String> {
    Html(render_page(
        &FormState::default(),
        &ResultPanel::Placeholder,
        random_fact(),
    ))
}

/// `POST /predict` — resolve a form submission and render the result page.
pub async fn form_handler(
    State(state): State<Arc<AppState>>,
    Form(submission): Form<FormSubmission>,
) -> Html<String> {
    let fact = random_fact();
    let parsed = FormInput::from_raw(
        &submission.name,
        &submission.sex,
        &submission.age,
        &submission.income_bracket,
    );

    let input = match parsed {
        Ok(input) => input,
        Err(e) => {
            warn!(error = %e, "Rejected form submission");
            let form = FormState {
                name: submission.name,
                ..FormState::default()
            };
            return Html(render_page(&form, &ResultPanel::Error(&e.to_string()), fact));
        }
    };

    let form = FormState::from(&input);
    match state.resolver.resolve(&input) {
        Ok(result) => {
            debug!(verdict_source = ?result.verdict_source, survived = result.survived, "Resolved form submission");
            let report = SurvivalReport::build(&input, &result);
            Html(render_page(&form, &ResultPanel::Report(&report), fact))
        }
        Err(e) => {
            warn!(error = %e, "Prediction failed for form submission");
            Html(render_page(&form, &ResultPanel::Error(&e.to_string()), fact))
        }
    }
}

// ---------------------------------------------------------------------------
// JSON handlers
// ---------------------------------------------------------------------------

/// `POST /api/v1/predict` — resolve a JSON [`FormInput`].
///
/// Bodies that are not valid JSON or do not match [`FormInput`] are reported
/// as [`LifeboatError::InvalidInput`].
pub async fn api_predict_handler(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<FormInput>, JsonRejection>,
) -> Response {
    let input = match payload {
        Ok(Json(input)) => input,
        Err(rejection) => {
            let err = LifeboatError::InvalidInput(rejection.body_text());
            warn!(error = %err, "Rejected API submission");
            return error_response(&err);
        }
    };

    match state.resolver.resolve(&input) {
        Ok(result) => {
            debug!(verdict_source = ?result.verdict_source, survived = result.survived, "Resolved API submission");
            let report = SurvivalReport::build(&input, &result);
            (StatusCode::OK, Json(PredictResponse { result, report })).into_response()
        }
        Err(e) => {
            warn!(error = %e, "Prediction failed for API submission");
            error_response(&e)
        }
    }
}

/// `GET /api/v1/fact`
pub async fn fact_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "fact": random_fact() }))
}

/// `GET /health` — model identity and inference statistics.
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "model": {
            "name": state.resolver.model().name(),
            "path": state.model_path,
            "inference": state.inference_stats.snapshot(),
        },
        "overrides": state.resolver.overrides().len(),
    }))
}

// ---------------------------------------------------------------------------
// Utilities
// ---------------------------------------------------------------------------

/// Map a [`LifeboatError`] to a status code and JSON error body.
pub(crate) fn error_response(err: &LifeboatError) -> Response {
    let (status, kind) = match err {
        LifeboatError::InvalidInput(_) => (StatusCode::UNPROCESSABLE_ENTITY, "invalid_input"),
        LifeboatError::Prediction(_) => (StatusCode::INTERNAL_SERVER_ERROR, "prediction_error"),
        LifeboatError::ModelLoad(_) => (StatusCode::SERVICE_UNAVAILABLE, "model_load_error"),
        LifeboatError::Config(_) | LifeboatError::Serialization(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
        }
    };
    let body = serde_json::json!({
        "error": {
            "message": err.to_string(),
            "type": kind,
        }
    });
    (status, Json(body)).into_response()
}
