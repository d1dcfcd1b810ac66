mod config;
mod detector;
mod types;
mod watson;

use axum::{
    Router,
    extract::{Form, State},
    http::StatusCode,
    response::{Html, Json},
    routing::{get, post},
};
use axum_prometheus::PrometheusMetricLayer;
use clap::Parser;
use metrics::counter;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use config::Config;
use detector::Detector;
use types::{DetectionResponse, EmotionData, StatementForm};
use watson::WatsonDetector;

const INVALID_TEXT_RESPONSE: &str = "Invalid text! Please try again.";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,empath=debug".into()),
        )
        .init();

    let config = Config::parse();
    tracing::info!("Starting emotion detection server with config: {:?}", config);

    let detector = WatsonDetector::new(config.watson_config())?;
    let state = AppState::new(Arc::new(detector));

    let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();

    let app = router(state)
        .route("/metrics", get(|| async move { metric_handle.render() }))
        .layer(prometheus_layer)
        .layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind(&config.server_address()).await?;
    tracing::info!("Server running on http://{}", config.server_address());

    axum::serve(listener, app).await?;
    Ok(())
}

#[derive(Clone)]
struct AppState {
    detector: Arc<dyn Detector>,
}

impl AppState {
    fn new(detector: Arc<dyn Detector>) -> Self {
        Self { detector }
    }
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/emotionDetector", post(detect_emotion_handler))
        .with_state(state)
}

async fn index_handler() -> Html<&'static str> {
    Html(include_str!("../static/index.html"))
}

#[tracing::instrument(skip(state, form), fields(statement_len = form.statement.len()))]
async fn detect_emotion_handler(
    State(state): State<AppState>,
    Form(form): Form<StatementForm>,
) -> (StatusCode, Json<DetectionResponse>) {
    counter!("emotion_detection_requests_total").increment(1);
    tracing::info!("Processing emotion detection request");

    let detection = state.detector.detect(&form.statement).await;

    let (status, response) = match (&detection.data, detection.status) {
        (EmotionData::Analysis(analysis), 200) => match analysis.summary() {
            Some(sentence) => (StatusCode::OK, sentence),
            // A 200 without a dominant emotion is still unusable input.
            None => (StatusCode::BAD_REQUEST, INVALID_TEXT_RESPONSE.to_string()),
        },
        (_, 400) => (StatusCode::BAD_REQUEST, INVALID_TEXT_RESPONSE.to_string()),
        // Error records keep the status the client assigned; no per-kind
        // messaging on the way out.
        (_, status) => (
            StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            INVALID_TEXT_RESPONSE.to_string(),
        ),
    };

    if status != StatusCode::OK {
        tracing::debug!(status = status.as_u16(), "returning non-success detection");
    }

    (
        status,
        Json(DetectionResponse {
            response,
            emotion_data: detection.data,
        }),
    )
}
