use chrono::{DateTime, Utc};
use loan_advisor::advisor::{InterviewSession, LenderCatalog, SessionId, SessionStore, SessionStoreError};
use loan_advisor::config::AdvisorConfig;
use loan_advisor::error::AppError;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local interview storage; conversations do not survive a restart.
#[derive(Default, Clone)]
pub(crate) struct InMemorySessionStore {
    sessions: Arc<Mutex<HashMap<SessionId, InterviewSession>>>,
}

impl InMemorySessionStore {
    /// Drop interviews with no activity for `limit`; returns how many were removed.
    pub(crate) fn purge_idle(&self, now: DateTime<Utc>, limit: chrono::Duration) -> usize {
        let mut guard = self.sessions.lock().expect("session store mutex poisoned");
        let before = guard.len();
        guard.retain(|_, session| !session.is_idle(now, limit));
        before - guard.len()
    }

    pub(crate) fn len(&self) -> usize {
        self.sessions
            .lock()
            .expect("session store mutex poisoned")
            .len()
    }
}

impl SessionStore for InMemorySessionStore {
    fn load(&self, id: &SessionId) -> Result<Option<InterviewSession>, SessionStoreError> {
        let guard = self.sessions.lock().expect("session store mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn save(&self, id: &SessionId, session: InterviewSession) -> Result<(), SessionStoreError> {
        let mut guard = self.sessions.lock().expect("session store mutex poisoned");
        guard.insert(id.clone(), session);
        Ok(())
    }

    fn discard(&self, id: &SessionId) -> Result<(), SessionStoreError> {
        let mut guard = self.sessions.lock().expect("session store mutex poisoned");
        guard.remove(id);
        Ok(())
    }
}

/// Catalog from the configured CSV export, or the bundled lenders when none is set.
pub(crate) fn load_catalog(config: &AdvisorConfig) -> Result<LenderCatalog, AppError> {
    match &config.catalog_csv {
        Some(path) => {
            let catalog = LenderCatalog::from_path(path)?;
            info!(path = %path.display(), lenders = catalog.lenders().len(), "lender catalog loaded");
            Ok(catalog)
        }
        None => Ok(LenderCatalog::standard()),
    }
}

pub(crate) fn idle_limit(config: &AdvisorConfig) -> chrono::Duration {
    chrono::Duration::minutes(i64::from(config.session_idle_minutes))
}
