use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use super::calculator::{build_amortization_schedule, compute_loan_details};
use super::catalog::LoanTypeId;
use super::comparison::{
    compare_lenders, market_stats, DEFAULT_COMPARISON_PRINCIPAL,
    DEFAULT_COMPARISON_TENURE_MONTHS,
};
use super::domain::SessionId;
use super::service::{AdvisorService, AdvisorServiceError};
use super::session::SessionStore;

pub const UNAVAILABLE_MESSAGE: &str = "temporarily unavailable, try again shortly";

#[derive(Debug, Deserialize)]
pub struct UtteranceRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatorRequest {
    pub principal: f64,
    pub annual_rate_percent: f64,
    pub tenure_months: u32,
}

#[derive(Debug, Deserialize)]
pub struct CompareQuery {
    pub loan_type: String,
    pub amount: Option<f64>,
    pub tenure_months: Option<u32>,
}

/// Router builder exposing the conversation, calculator and lender endpoints.
pub fn advisor_router<S>(service: Arc<AdvisorService<S>>) -> Router
where
    S: SessionStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/advisor/sessions/:session_id/utterances",
            post(utterance_handler::<S>),
        )
        .route(
            "/api/v1/advisor/sessions/:session_id",
            delete(reset_handler::<S>),
        )
        .route("/api/v1/calculator/emi", post(emi_handler::<S>))
        .route(
            "/api/v1/calculator/amortization",
            post(amortization_handler::<S>),
        )
        .route("/api/v1/lenders", get(lenders_handler::<S>))
        .route("/api/v1/lenders/compare", get(compare_handler::<S>))
        .route("/api/v1/lenders/stats", get(stats_handler::<S>))
        .with_state(service)
}

fn unavailable(err: AdvisorServiceError) -> Response {
    error!(error = %err, "advisor request failed");
    let payload = json!({
        "error": UNAVAILABLE_MESSAGE,
    });
    (StatusCode::SERVICE_UNAVAILABLE, axum::Json(payload)).into_response()
}

fn invalid_loan_input() -> Response {
    let payload = json!({
        "error": "principal and tenure must be positive and the rate cannot be negative",
    });
    (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
}

pub(crate) async fn utterance_handler<S>(
    State(service): State<Arc<AdvisorService<S>>>,
    Path(session_id): Path<String>,
    axum::Json(request): axum::Json<UtteranceRequest>,
) -> Response
where
    S: SessionStore + 'static,
{
    let id = SessionId(session_id);
    match service.submit_utterance(&id, &request.text).await {
        Ok(envelope) => (StatusCode::OK, axum::Json(envelope)).into_response(),
        Err(err) => unavailable(err),
    }
}

pub(crate) async fn reset_handler<S>(
    State(service): State<Arc<AdvisorService<S>>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
{
    match service.reset(&SessionId(session_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => unavailable(err),
    }
}

pub(crate) async fn emi_handler<S>(
    State(_service): State<Arc<AdvisorService<S>>>,
    axum::Json(request): axum::Json<CalculatorRequest>,
) -> Response
where
    S: SessionStore + 'static,
{
    match compute_loan_details(
        request.principal,
        request.annual_rate_percent,
        request.tenure_months,
    ) {
        Some(details) => (StatusCode::OK, axum::Json(details)).into_response(),
        None => invalid_loan_input(),
    }
}

pub(crate) async fn amortization_handler<S>(
    State(_service): State<Arc<AdvisorService<S>>>,
    axum::Json(request): axum::Json<CalculatorRequest>,
) -> Response
where
    S: SessionStore + 'static,
{
    let details = compute_loan_details(
        request.principal,
        request.annual_rate_percent,
        request.tenure_months,
    );
    let schedule = build_amortization_schedule(
        request.principal,
        request.annual_rate_percent,
        request.tenure_months,
    );

    match (details, schedule) {
        (Some(details), Ok(schedule)) => {
            let payload = json!({
                "details": details,
                "schedule": schedule,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        _ => invalid_loan_input(),
    }
}

pub(crate) async fn lenders_handler<S>(State(service): State<Arc<AdvisorService<S>>>) -> Response
where
    S: SessionStore + 'static,
{
    let payload = json!({
        "lenders": service.catalog().lenders(),
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) async fn compare_handler<S>(
    State(service): State<Arc<AdvisorService<S>>>,
    Query(query): Query<CompareQuery>,
) -> Response
where
    S: SessionStore + 'static,
{
    let Some(loan_type) = LoanTypeId::parse(&query.loan_type) else {
        let payload = json!({
            "error": format!("unknown loan type '{}'", query.loan_type),
        });
        return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
    };

    let comparison = compare_lenders(
        service.catalog(),
        loan_type,
        query.amount.unwrap_or(DEFAULT_COMPARISON_PRINCIPAL),
        query
            .tenure_months
            .unwrap_or(DEFAULT_COMPARISON_TENURE_MONTHS),
    );
    (StatusCode::OK, axum::Json(comparison)).into_response()
}

pub(crate) async fn stats_handler<S>(State(service): State<Arc<AdvisorService<S>>>) -> Response
where
    S: SessionStore + 'static,
{
    match market_stats(service.catalog()) {
        Some(stats) => (StatusCode::OK, axum::Json(stats)).into_response(),
        None => {
            let payload = json!({
                "error": "lender catalog has no offers",
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
    }
}
