use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::http::StatusCode;
use axum::response::Response;
use serde_json::Value;

use crate::advisor::catalog::{LenderCatalog, LoanTypeId};
use crate::advisor::domain::{EligibilityApplication, EmploymentType, SessionId};
use crate::advisor::evaluation::{EligibilityEvaluator, EvaluationConfig};
use crate::advisor::generator::{GeneratedReply, GeneratorError, TextGenerator};
use crate::advisor::interview::InterviewSession;
use crate::advisor::session::{SessionStore, SessionStoreError};
use crate::advisor::{advisor_router, AdvisorService};

/// Answers for a home loan interview that every standard lender approves.
pub(super) const HOME_LOAN_ANSWERS: [&str; 7] =
    ["home", "1500000", "20", "80000", "720", "5000", "salaried"];

pub(super) fn catalog() -> Arc<LenderCatalog> {
    Arc::new(LenderCatalog::standard())
}

pub(super) fn session_id(value: &str) -> SessionId {
    SessionId::new(value)
}

pub(super) fn application() -> EligibilityApplication {
    EligibilityApplication {
        loan_type: LoanTypeId::Home,
        amount: 1_500_000.0,
        tenure_years: 20.0,
        monthly_income: 80_000.0,
        credit_score: 720,
        existing_emi: 5_000.0,
        employment_type: EmploymentType::Salaried,
    }
}

pub(super) fn evaluator() -> EligibilityEvaluator {
    EligibilityEvaluator::new(EvaluationConfig::default())
}

pub(super) fn build_service() -> (AdvisorService<MemorySessionStore>, Arc<MemorySessionStore>) {
    let store = Arc::new(MemorySessionStore::default());
    let service = AdvisorService::new(store.clone(), catalog(), EvaluationConfig::default());
    (service, store)
}

pub(super) fn service_with_generator(
    generator: Arc<dyn TextGenerator>,
    timeout: Duration,
) -> (AdvisorService<MemorySessionStore>, Arc<MemorySessionStore>) {
    let (service, store) = build_service();
    (service.with_generator(generator, timeout), store)
}

#[derive(Default, Clone)]
pub(super) struct MemorySessionStore {
    sessions: Arc<Mutex<HashMap<SessionId, InterviewSession>>>,
}

impl MemorySessionStore {
    pub(super) fn get(&self, id: &SessionId) -> Option<InterviewSession> {
        self.sessions
            .lock()
            .expect("session mutex poisoned")
            .get(id)
            .cloned()
    }

    pub(super) fn len(&self) -> usize {
        self.sessions.lock().expect("session mutex poisoned").len()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self, id: &SessionId) -> Result<Option<InterviewSession>, SessionStoreError> {
        Ok(self.get(id))
    }

    fn save(&self, id: &SessionId, session: InterviewSession) -> Result<(), SessionStoreError> {
        self.sessions
            .lock()
            .expect("session mutex poisoned")
            .insert(id.clone(), session);
        Ok(())
    }

    fn discard(&self, id: &SessionId) -> Result<(), SessionStoreError> {
        self.sessions
            .lock()
            .expect("session mutex poisoned")
            .remove(id);
        Ok(())
    }
}

pub(super) struct UnavailableStore;

impl SessionStore for UnavailableStore {
    fn load(&self, _id: &SessionId) -> Result<Option<InterviewSession>, SessionStoreError> {
        Err(SessionStoreError::Unavailable("cache offline".to_string()))
    }

    fn save(&self, _id: &SessionId, _session: InterviewSession) -> Result<(), SessionStoreError> {
        Err(SessionStoreError::Unavailable("cache offline".to_string()))
    }

    fn discard(&self, _id: &SessionId) -> Result<(), SessionStoreError> {
        Err(SessionStoreError::Unavailable("cache offline".to_string()))
    }
}

/// Generator that always fails at the transport layer.
pub(super) struct FailingGenerator;

#[async_trait]
impl TextGenerator for FailingGenerator {
    async fn generate(&self, _query: &str) -> Result<GeneratedReply, GeneratorError> {
        Err(GeneratorError::Transport("connection refused".to_string()))
    }
}

/// Generator that answers only after `delay`.
pub(super) struct SlowGenerator {
    pub(super) delay: Duration,
}

#[async_trait]
impl TextGenerator for SlowGenerator {
    async fn generate(&self, query: &str) -> Result<GeneratedReply, GeneratorError> {
        tokio::time::sleep(self.delay).await;
        Ok(GeneratedReply {
            text: format!("late answer to {query}"),
            category: "text".to_string(),
            payload: None,
            title: None,
        })
    }
}

/// Generator returning a fixed category and counting calls.
pub(super) struct EchoGenerator {
    pub(super) category: &'static str,
    pub(super) payload: Option<Value>,
    calls: AtomicUsize,
}

impl EchoGenerator {
    pub(super) fn new(category: &'static str, payload: Option<Value>) -> Self {
        Self {
            category,
            payload,
            calls: AtomicUsize::new(0),
        }
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for EchoGenerator {
    async fn generate(&self, query: &str) -> Result<GeneratedReply, GeneratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(GeneratedReply {
            text: format!("echo: {query}"),
            category: self.category.to_string(),
            payload: self.payload.clone(),
            title: None,
        })
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn assert_unavailable_response(response: &Response) {
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

pub(super) fn router_with_service(service: AdvisorService<MemorySessionStore>) -> axum::Router {
    advisor_router(Arc::new(service))
}
