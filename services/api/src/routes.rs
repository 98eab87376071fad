use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use loan_advisor::advisor::{advisor_router, AdvisorService, SessionStore};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_operational_routes<S>(service: Arc<AdvisorService<S>>) -> axum::Router
where
    S: SessionStore + 'static,
{
    advisor_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::InMemorySessionStore;
    use axum::body::Body;
    use axum::http::Request;
    use loan_advisor::advisor::{EvaluationConfig, LenderCatalog};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tower::ServiceExt;

    fn app_state() -> AppState {
        let recorder = PrometheusBuilder::new().build_recorder();
        AppState {
            readiness: Arc::new(AtomicBool::new(false)),
            metrics: Arc::new(recorder.handle()),
        }
    }

    fn app(state: AppState) -> axum::Router {
        let service = Arc::new(AdvisorService::new(
            Arc::new(InMemorySessionStore::default()),
            Arc::new(LenderCatalog::standard()),
            EvaluationConfig::default(),
        ));
        with_operational_routes(service).layer(Extension(state))
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .body(Body::empty())
            .expect("request")
    }

    #[tokio::test]
    async fn readiness_tracks_flag() {
        let state = app_state();
        let router = app(state.clone());

        let pending = router
            .clone()
            .oneshot(get("/ready"))
            .await
            .expect("response");
        assert_eq!(pending.status(), StatusCode::SERVICE_UNAVAILABLE);

        state.readiness.store(true, Ordering::Release);
        let ready = router.oneshot(get("/ready")).await.expect("response");
        assert_eq!(ready.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn health_and_advisor_routes_share_router() {
        let router = app(app_state());

        let health = router
            .clone()
            .oneshot(get("/health"))
            .await
            .expect("response");
        assert_eq!(health.status(), StatusCode::OK);

        let lenders = router
            .oneshot(get("/api/v1/lenders"))
            .await
            .expect("response");
        assert_eq!(lenders.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn metrics_are_prometheus_text() {
        let response = app(app_state())
            .oneshot(get("/metrics"))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; version=0.0.4"
        );
    }
}
