//! Conversational eligibility engine.
//!
//! [`AdvisorService::submit_utterance`] is the single inbound operation: it feeds the running
//! interview when one exists for the session, and otherwise classifies the text and, for
//! unclassified input, optionally asks the external text generator.

pub mod assembler;
pub mod calculator;
pub mod catalog;
pub mod classifier;
pub mod comparison;
pub mod domain;
pub mod evaluation;
pub mod generator;
pub mod interview;
pub mod response;
pub mod router;
pub mod service;
pub mod session;

#[cfg(test)]
mod tests;

pub use assembler::ResponseAssembler;
pub use calculator::{
    build_amortization_schedule, compute_emi, compute_loan_details, round_currency,
    AmortizationEntry, CalculatorError, LoanDetails,
};
pub use catalog::{
    CatalogError, Lender, LenderCatalog, LenderCategory, LenderLoanOffer, LoanTypeId,
};
pub use classifier::{Classification, ClassificationResult, Classifier, IntentId, ScenarioId};
pub use comparison::{
    compare_lenders, default_comparison, market_stats, ComparisonRow, LenderComparison,
    LoanTypeAverage, MarketStats,
};
pub use domain::{EligibilityApplication, EmploymentType, SessionId};
pub use evaluation::{
    EligibilityEvaluator, EligibilityVerdict, EvaluationConfig, IneligibilityReason,
};
pub use generator::{
    generate_with_timeout, GeneratedReply, GeneratorError, HttpTextGenerator, TextGenerator,
};
pub use interview::{
    InterviewAnswers, InterviewError, InterviewField, InterviewSession, InterviewStatus,
    InterviewTurn, ValidationError,
};
pub use response::{InterviewProgress, ResponseCategory, ResponseEnvelope, ResponsePayload};
pub use router::advisor_router;
pub use service::{AdvisorService, AdvisorServiceError};
pub use session::{SessionStore, SessionStoreError};
