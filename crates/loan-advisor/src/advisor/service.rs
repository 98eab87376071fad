use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::assembler::ResponseAssembler;
use super::catalog::LenderCatalog;
use super::classifier::{Classification, Classifier, IntentId};
use super::domain::SessionId;
use super::evaluation::{EligibilityEvaluator, EvaluationConfig};
use super::generator::{generate_with_timeout, TextGenerator};
use super::interview::{InterviewSession, InterviewTurn};
use super::response::{ResponseCategory, ResponseEnvelope};
use super::session::{SessionStore, SessionStoreError};

pub const DEFAULT_GENERATOR_TIMEOUT: Duration = Duration::from_millis(8_000);

/// Entry point for user turns: routes each utterance to the running interview or the classifier.
pub struct AdvisorService<S> {
    store: Arc<S>,
    catalog: Arc<LenderCatalog>,
    classifier: Classifier,
    evaluator: EligibilityEvaluator,
    assembler: ResponseAssembler,
    generator: Option<Arc<dyn TextGenerator>>,
    generator_timeout: Duration,
}

impl<S> AdvisorService<S>
where
    S: SessionStore + 'static,
{
    pub fn new(store: Arc<S>, catalog: Arc<LenderCatalog>, config: EvaluationConfig) -> Self {
        Self {
            store,
            classifier: Classifier::new(catalog.clone()),
            evaluator: EligibilityEvaluator::new(config),
            assembler: ResponseAssembler::new(catalog.clone()),
            catalog,
            generator: None,
            generator_timeout: DEFAULT_GENERATOR_TIMEOUT,
        }
    }

    /// Delegate unclassified utterances to `generator`, waiting at most `timeout`.
    pub fn with_generator(mut self, generator: Arc<dyn TextGenerator>, timeout: Duration) -> Self {
        self.generator = Some(generator);
        self.generator_timeout = timeout;
        self
    }

    pub fn catalog(&self) -> &Arc<LenderCatalog> {
        &self.catalog
    }

    pub fn evaluator(&self) -> &EligibilityEvaluator {
        &self.evaluator
    }

    /// Process one user message to completion.
    ///
    /// Generator failures never surface here; the only error is an unavailable session store.
    pub async fn submit_utterance(
        &self,
        session_id: &SessionId,
        text: &str,
    ) -> Result<ResponseEnvelope, AdvisorServiceError> {
        if let Some(mut session) = self.store.load(session_id)? {
            match session.submit(text, self.evaluator.config()) {
                Ok(turn) => return self.interview_turn(session_id, session, turn),
                Err(err) => {
                    warn!(session = %session_id, error = %err, "dropping unusable interview");
                    self.store.discard(session_id)?;
                }
            }
        }

        let result = self.classifier.classify(text);
        match result.category {
            Classification::Intent(IntentId::Eligibility) => {
                self.start_interview(session_id, &result.text)
            }
            Classification::Unclassified => self.delegate(session_id, text).await,
            _ => Ok(self.assembler.classified(result)),
        }
    }

    /// Drop any pending interview for the conversation.
    pub fn reset(&self, session_id: &SessionId) -> Result<(), AdvisorServiceError> {
        self.store.discard(session_id)?;
        info!(session = %session_id, "conversation reset");
        Ok(())
    }

    fn start_interview(
        &self,
        session_id: &SessionId,
        intro: &str,
    ) -> Result<ResponseEnvelope, AdvisorServiceError> {
        self.store.save(session_id, InterviewSession::start())?;
        info!(session = %session_id, "eligibility interview started");
        Ok(self.assembler.interview_started(intro))
    }

    fn interview_turn(
        &self,
        session_id: &SessionId,
        session: InterviewSession,
        turn: InterviewTurn,
    ) -> Result<ResponseEnvelope, AdvisorServiceError> {
        match turn {
            InterviewTurn::Question {
                field,
                step_index,
                retry,
            } => {
                if let Some(err) = &retry {
                    debug!(session = %session_id, field = field.key(), error = %err, "answer rejected");
                }
                self.store.save(session_id, session)?;
                Ok(self
                    .assembler
                    .interview_question(field, step_index, retry.as_ref()))
            }
            InterviewTurn::Cancelled => {
                self.store.discard(session_id)?;
                info!(
                    session = %session_id,
                    step = session.step_index(),
                    "eligibility interview cancelled"
                );
                Ok(self.assembler.interview_cancelled())
            }
            InterviewTurn::Completed(application) => {
                self.store.discard(session_id)?;
                let verdicts = self.evaluator.evaluate(&application, &self.catalog);
                info!(
                    session = %session_id,
                    loan_type = application.loan_type.as_str(),
                    lenders = verdicts.len(),
                    eligible = verdicts.iter().filter(|verdict| verdict.eligible).count(),
                    "eligibility interview completed"
                );
                Ok(self.assembler.eligibility_result(application, verdicts))
            }
        }
    }

    async fn delegate(
        &self,
        session_id: &SessionId,
        text: &str,
    ) -> Result<ResponseEnvelope, AdvisorServiceError> {
        let Some(generator) = &self.generator else {
            return Ok(self.assembler.fallback());
        };

        match generate_with_timeout(generator.as_ref(), text, self.generator_timeout).await {
            Ok(reply) => {
                if ResponseCategory::from_generator_label(&reply.category)
                    == ResponseCategory::EligibilityStart
                {
                    return self.start_interview(session_id, &reply.text);
                }
                Ok(self.assembler.generated(reply))
            }
            Err(err) => {
                warn!(session = %session_id, error = %err, "text generator failed, using fallback");
                Ok(self.assembler.fallback())
            }
        }
    }
}

/// Error raised by the advisor service.
#[derive(Debug, thiserror::Error)]
pub enum AdvisorServiceError {
    #[error(transparent)]
    Store(#[from] SessionStoreError),
}
