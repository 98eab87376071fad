//! Slot-filling eligibility interview.
//!
//! A session walks [`InterviewField::ORDER`] one answer at a time. Rejected answers leave the
//! session untouched and the same question is asked again; "cancel" ends it without results.

mod questions;

pub use questions::{
    parse_number, AnswerValue, InterviewAnswers, InterviewField, ValidationError,
};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::domain::EligibilityApplication;
use super::evaluation::EvaluationConfig;
use questions::validate;

pub const CANCEL_KEYWORD: &str = "cancel";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewStatus {
    InProgress,
    Cancelled,
    Completed,
}

/// Mutable state for one interview. Discard it once it leaves `InProgress`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewSession {
    step_index: usize,
    collected: InterviewAnswers,
    status: InterviewStatus,
    started_at: DateTime<Utc>,
    last_activity_at: DateTime<Utc>,
}

/// What a session asks for or produces after a turn.
#[derive(Debug, Clone, PartialEq)]
pub enum InterviewTurn {
    Question {
        field: InterviewField,
        step_index: usize,
        retry: Option<ValidationError>,
    },
    Cancelled,
    Completed(EligibilityApplication),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InterviewError {
    #[error("interview is already {0:?}")]
    Closed(InterviewStatus),
    #[error("validated answer does not fit the {0:?} field")]
    MismatchedAnswer(InterviewField),
}

impl InterviewSession {
    pub fn start() -> Self {
        Self::start_at(Utc::now())
    }

    pub fn start_at(now: DateTime<Utc>) -> Self {
        Self {
            step_index: 0,
            collected: InterviewAnswers::default(),
            status: InterviewStatus::InProgress,
            started_at: now,
            last_activity_at: now,
        }
    }

    pub fn step_index(&self) -> usize {
        self.step_index
    }

    pub fn status(&self) -> InterviewStatus {
        self.status
    }

    pub fn collected(&self) -> &InterviewAnswers {
        &self.collected
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn last_activity_at(&self) -> DateTime<Utc> {
        self.last_activity_at
    }

    pub fn pending_field(&self) -> Option<InterviewField> {
        match self.status {
            InterviewStatus::InProgress => InterviewField::ORDER.get(self.step_index).copied(),
            _ => None,
        }
    }

    pub fn is_idle(&self, now: DateTime<Utc>, limit: Duration) -> bool {
        now - self.last_activity_at > limit
    }

    pub fn submit(
        &mut self,
        text: &str,
        config: &EvaluationConfig,
    ) -> Result<InterviewTurn, InterviewError> {
        self.submit_at(text, config, Utc::now())
    }

    /// Apply one user answer.
    pub fn submit_at(
        &mut self,
        text: &str,
        config: &EvaluationConfig,
        now: DateTime<Utc>,
    ) -> Result<InterviewTurn, InterviewError> {
        let field = self
            .pending_field()
            .ok_or(InterviewError::Closed(self.status))?;
        self.last_activity_at = now;

        if text.trim().eq_ignore_ascii_case(CANCEL_KEYWORD) {
            self.status = InterviewStatus::Cancelled;
            return Ok(InterviewTurn::Cancelled);
        }

        let value = match validate(field, text, config) {
            Ok(value) => value,
            Err(err) => {
                return Ok(InterviewTurn::Question {
                    field,
                    step_index: self.step_index,
                    retry: Some(err),
                })
            }
        };

        self.collected.record(field, value)?;
        self.step_index += 1;

        if let Some(next) = InterviewField::ORDER.get(self.step_index) {
            return Ok(InterviewTurn::Question {
                field: *next,
                step_index: self.step_index,
                retry: None,
            });
        }

        self.status = InterviewStatus::Completed;
        match self.collected.complete() {
            Some(application) => Ok(InterviewTurn::Completed(application)),
            // every step stores its field before advancing
            None => Err(InterviewError::Closed(self.status)),
        }
    }
}
