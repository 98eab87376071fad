use super::domain::SessionId;
use super::interview::InterviewSession;

/// Storage for in-progress interviews so the service can be exercised in isolation.
///
/// Only `InProgress` sessions are saved; a missing entry means no interview is running.
pub trait SessionStore: Send + Sync {
    fn load(&self, id: &SessionId) -> Result<Option<InterviewSession>, SessionStoreError>;
    fn save(&self, id: &SessionId, session: InterviewSession) -> Result<(), SessionStoreError>;
    fn discard(&self, id: &SessionId) -> Result<(), SessionStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SessionStoreError {
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}
