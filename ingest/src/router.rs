use std::future::ready;
use std::sync::Arc;

use axum::http::Method;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::prometheus::{setup_metrics_recorder, track_metrics};
use crate::{ingest, sinks, time::TimeSource};

#[derive(Clone)]
pub struct State {
    pub sink: Arc<dyn sinks::RecordSink + Send + Sync>,
    pub timesource: Arc<dyn TimeSource + Send + Sync>,
}

async fn index() -> &'static str {
    "VivoTech Push Server is running!"
}

pub fn router<
    TZ: TimeSource + Send + Sync + 'static,
    S: sinks::RecordSink + Send + Sync + 'static,
>(
    timesource: TZ,
    sink: S,
    metrics: bool,
) -> Router {
    let state = State {
        sink: Arc::new(sink),
        timesource: Arc::new(timesource),
    };

    // Very permissive CORS policy: cameras and the reverse proxies in
    // front of them send funky headers.
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
        .allow_origin(AllowOrigin::mirror_request());

    // The route table is the union of the controller variants that
    // shipped over time; aliases share one handler.
    let router = Router::new()
        .route("/", get(index))
        .route("/api/vivotek/data", post(ingest::data))
        .route("/receiveData", post(ingest::data))
        .route("/api/vivotek/logs", post(ingest::logs))
        .route("/logs", post(ingest::logs))
        .route("/push", post(ingest::push))
        .route("/push/json", post(ingest::push_json))
        .route("/push/xml", post(ingest::push_xml))
        .route("/data", post(ingest::push_xml))
        .route("/health", get(ingest::health))
        .route("/api/vivotek/health", get(ingest::health))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum::middleware::from_fn(track_metrics))
        .with_state(state);

    // Don't install metrics unless asked to.
    // Installing a global recorder when ingest is used as a library
    // (during tests etc) does not work well.
    if metrics {
        let recorder_handle = setup_metrics_recorder();
        router.route("/metrics", get(move || ready(recorder_handle.render())))
    } else {
        router
    }
}
