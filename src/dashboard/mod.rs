//! HTTP dashboard: one page of input controls, one analyze action.
//!
//! `GET /` renders the page awaiting input, `POST /analyze` takes the form
//! fields of [`MilkInput`] and renders the same page with the predicted
//! grade and the feature-importance chart. The artifact comes from a shared
//! [`ArtifactCache`], so it is read from disk once per process no matter
//! how many requests arrive.

pub mod page;

use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::artifact::ArtifactCache;
use crate::error::{ArtifactError, PredictError};
use crate::predict::{MilkInput, Predictor};

#[derive(Debug, Clone)]
pub struct AppState {
    pub cache: Arc<ArtifactCache>,
}

impl AppState {
    pub fn new(cache: ArtifactCache) -> Self {
        AppState {
            cache: Arc::new(cache),
        }
    }
}

/// Failures surfaced to the browser as a plain 500 page.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error(transparent)]
    Artifact(#[from] ArtifactError),
    #[error(transparent)]
    Predict(#[from] PredictError),
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        error!(error = %self, "request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("internal error: {self}"),
        )
            .into_response()
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/analyze", post(analyze_handler))
        .route("/health", get(health_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn index_handler(State(state): State<AppState>) -> Result<Html<String>, DashboardError> {
    let artifact = state.cache.get()?;
    Ok(Html(page::render(&artifact, &MilkInput::default(), None)))
}

async fn analyze_handler(
    State(state): State<AppState>,
    Form(input): Form<MilkInput>,
) -> Result<Html<String>, DashboardError> {
    let artifact = state.cache.get()?;
    let prediction = Predictor::new(Arc::clone(&artifact)).predict(&input)?;
    Ok(Html(page::render(&artifact, &input, Some(&prediction))))
}

async fn health_handler() -> &'static str {
    "ok"
}
