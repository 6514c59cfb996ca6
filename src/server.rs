use axum::{
    extract::State,
    response::{Html, Json},
    routing::{get, post},
    Router,
};
use std::{sync::Arc, time::Instant};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    engine::PredictionEngine,
    error::AppError,
    types::{PredictRequest, PredictionResult},
};

pub type AppState = Arc<PredictionEngine>;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/predict", post(predict_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn predict_handler(
    State(engine): State<AppState>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<PredictionResult>, AppError> {
    let start = Instant::now();

    metrics::increment_counter!("predictions_total");

    let result = engine.predict(&request.text)?;
    metrics::increment_counter!(
        "predictions_by_label",
        "label" => result.binary_prediction.as_str()
    );

    let latency = start.elapsed().as_millis() as f64;
    metrics::histogram!("prediction_duration_ms", latency);

    Ok(Json(result))
}

async fn health_handler() -> Result<Json<serde_json::Value>, AppError> {
    Ok(Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    })))
}

async fn index_handler() -> Html<&'static str> {
    Html(include_str!("../static/index.html"))
}
