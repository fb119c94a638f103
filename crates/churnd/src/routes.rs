//! Route registration: the single page, the predict endpoint, and the usual
//! system endpoints.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tracing::warn;

use churn_model::{ChurnAdapter, ChurnPipeline, Prediction, PredictionRequest};

/// Application shared state. The adapter (and the pipeline inside it) is
/// loaded once at startup and shared read-only; no request mutates it.
#[derive(Clone)]
pub struct AppState {
    pub adapter: Arc<ChurnAdapter<ChurnPipeline>>,
    pub pipeline_id: String,
    pub pipeline_version: String,
}

/// Build the complete router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/health", get(health))
        .route("/version", get(version))
        .route("/predict", post(predict))
        .with_state(state)
}

async fn index_page() -> impl IntoResponse {
    Html(include_str!("web/index.html"))
}

async fn health() -> &'static str {
    "ok"
}

#[derive(Debug, Serialize)]
struct VersionBody {
    service: &'static str,
    version: &'static str,
    pipeline_id: String,
    pipeline_version: String,
}

async fn version(State(state): State<AppState>) -> Json<VersionBody> {
    Json(VersionBody {
        service: "churnd",
        version: env!("CARGO_PKG_VERSION"),
        pipeline_id: state.pipeline_id.clone(),
        pipeline_version: state.pipeline_version.clone(),
    })
}

/// What the page renders after a prediction.
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub risk_percent: f64,
    pub category: &'static str,
    pub recommendation: &'static str,
    pub top_factors: Vec<FactorBody>,
}

#[derive(Debug, Serialize)]
pub struct FactorBody {
    pub name: String,
    pub contribution: f64,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl PredictResponse {
    fn from_prediction(prediction: &Prediction) -> Self {
        Self {
            risk_percent: round2(prediction.verdict.risk_percent),
            category: prediction.verdict.category.as_str(),
            recommendation: prediction.verdict.recommendation(),
            top_factors: prediction
                .top_features
                .iter()
                .map(|(name, contribution)| FactorBody {
                    name: name.clone(),
                    contribution: round2(*contribution),
                })
                .collect(),
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// One prediction per press of the form's button. Failures are terminal for
/// this action only: the error is surfaced to the page and the process keeps
/// serving.
async fn predict(
    State(state): State<AppState>,
    Json(request): Json<PredictionRequest>,
) -> Result<Json<PredictResponse>, (StatusCode, Json<ErrorBody>)> {
    match state.adapter.predict(&request) {
        Ok(prediction) => Ok(Json(PredictResponse::from_prediction(&prediction))),
        Err(err) => {
            warn!(error = %err, "prediction failed");
            Err((
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorBody {
                    error: err.to_string(),
                }),
            ))
        }
    }
}
