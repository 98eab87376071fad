use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use super::common::*;
use crate::advisor::catalog::LoanTypeId;
use crate::advisor::classifier::CLARIFICATION_TEXT;
use crate::advisor::evaluation::EvaluationConfig;
use crate::advisor::interview::{InterviewField, InterviewStatus};
use crate::advisor::response::{ResponseCategory, ResponsePayload};
use crate::advisor::{AdvisorService, AdvisorServiceError, SessionStoreError};

#[tokio::test]
async fn eligibility_conversation_runs_to_completion() {
    let (service, store) = build_service();
    let id = session_id("conv-1");

    let opening = service
        .submit_utterance(&id, "am I eligible for a loan")
        .await
        .expect("turn succeeds");
    assert_eq!(opening.category, ResponseCategory::EligibilityStart);
    assert!(opening
        .display_text
        .ends_with(InterviewField::LoanType.question()));
    assert_eq!(
        store.get(&id).map(|session| session.status()),
        Some(InterviewStatus::InProgress)
    );

    let (last, questions) = HOME_LOAN_ANSWERS.split_last().expect("answers");
    for (index, answer) in questions.iter().enumerate() {
        let envelope = service
            .submit_utterance(&id, answer)
            .await
            .expect("turn succeeds");
        assert_eq!(envelope.category, ResponseCategory::EligibilityQuestion);
        assert_eq!(
            envelope.display_text,
            InterviewField::ORDER[index + 1].question()
        );
    }

    let result = service
        .submit_utterance(&id, last)
        .await
        .expect("turn succeeds");
    assert_eq!(result.category, ResponseCategory::EligibilityResult);
    let verdicts = result.verdicts().expect("verdict payload");
    assert_eq!(verdicts.len(), 3);
    assert!(verdicts.iter().all(|verdict| verdict.eligible));
    assert!(store.get(&id).is_none(), "completed sessions are discarded");
}

#[tokio::test]
async fn invalid_answer_repeats_question_with_hint() {
    let (service, store) = build_service();
    let id = session_id("conv-retry");
    service
        .submit_utterance(&id, "can I get a loan? am I eligible")
        .await
        .expect("turn succeeds");
    service
        .submit_utterance(&id, "home")
        .await
        .expect("turn succeeds");

    let envelope = service
        .submit_utterance(&id, "abc")
        .await
        .expect("turn succeeds");

    assert_eq!(envelope.display_text, InterviewField::Amount.question());
    match envelope.payload {
        Some(ResponsePayload::Interview(progress)) => {
            assert!(progress.retry);
            assert_eq!(progress.field, InterviewField::Amount);
            assert_eq!(progress.step_index, 1);
        }
        other => panic!("expected interview progress, got {other:?}"),
    }
    assert_eq!(store.get(&id).map(|session| session.step_index()), Some(1));
}

#[tokio::test]
async fn currency_prefixed_answers_keep_their_full_value() {
    let (service, store) = build_service();
    let id = session_id("conv-rupees");
    service
        .submit_utterance(&id, "am I eligible for a loan")
        .await
        .expect("turn succeeds");

    for answer in ["home", "₹15,00,000", "20", "Rs. 45,000"] {
        let envelope = service
            .submit_utterance(&id, answer)
            .await
            .expect("turn succeeds");
        assert_eq!(envelope.category, ResponseCategory::EligibilityQuestion);
    }

    let session = store.get(&id).expect("interview pending");
    assert_eq!(session.step_index(), 4);
    assert_eq!(session.collected().amount, Some(1_500_000.0));
    assert_eq!(session.collected().monthly_income, Some(45_000.0));
}

#[tokio::test]
async fn cancel_discards_interview_without_verdicts() {
    let (service, store) = build_service();
    let id = session_id("conv-cancel");
    service
        .submit_utterance(&id, "check my eligibility")
        .await
        .expect("turn succeeds");
    service
        .submit_utterance(&id, "personal")
        .await
        .expect("turn succeeds");

    let envelope = service
        .submit_utterance(&id, "cancel")
        .await
        .expect("turn succeeds");

    assert_eq!(envelope.category, ResponseCategory::Text);
    assert!(envelope.verdicts().is_none());
    assert!(store.get(&id).is_none());

    let next = service
        .submit_utterance(&id, "I need a laptop loan")
        .await
        .expect("turn succeeds");
    assert_eq!(next.category, ResponseCategory::ScenarioCard);
}

#[tokio::test]
async fn conversations_do_not_share_interview_state() {
    let (service, store) = build_service();
    let first = session_id("conv-a");
    let second = session_id("conv-b");

    service
        .submit_utterance(&first, "am I eligible")
        .await
        .expect("turn succeeds");
    let other = service
        .submit_utterance(&second, "home")
        .await
        .expect("turn succeeds");

    assert_eq!(other.category, ResponseCategory::ScenarioCard);
    assert_eq!(store.len(), 1);
    assert_eq!(store.get(&first).map(|session| session.step_index()), Some(0));
}

#[tokio::test]
async fn scenario_reply_carries_loan_type_payload() {
    let (service, store) = build_service();

    let envelope = service
        .submit_utterance(&session_id("conv-laptop"), "I need a laptop loan")
        .await
        .expect("turn succeeds");

    assert_eq!(envelope.category, ResponseCategory::ScenarioCard);
    assert_eq!(
        envelope.payload,
        Some(ResponsePayload::LoanType {
            loan_type: LoanTypeId::Gadget,
            lender_id: None,
        })
    );
    assert_eq!(store.len(), 0, "scenario replies bypass the interview");
}

#[tokio::test]
async fn comparison_reply_embeds_default_snapshot() {
    let (service, _) = build_service();

    let envelope = service
        .submit_utterance(&session_id("conv-compare"), "compare lenders for me")
        .await
        .expect("turn succeeds");

    assert_eq!(envelope.category, ResponseCategory::ComparisonCard);
    match envelope.payload {
        Some(ResponsePayload::Comparison(comparison)) => {
            assert_eq!(comparison.loan_type, LoanTypeId::Home);
            assert_eq!(comparison.best_offer.as_deref(), Some("apex"));
        }
        other => panic!("expected comparison payload, got {other:?}"),
    }
}

#[tokio::test]
async fn unclassified_without_generator_uses_clarification() {
    let (service, _) = build_service();

    let envelope = service
        .submit_utterance(&session_id("conv-x"), "what's the weather")
        .await
        .expect("turn succeeds");

    assert_eq!(envelope.category, ResponseCategory::Text);
    assert_eq!(envelope.display_text, CLARIFICATION_TEXT);
}

#[tokio::test]
async fn generator_failure_falls_back_to_clarification() {
    let (service, _) =
        service_with_generator(Arc::new(FailingGenerator), Duration::from_millis(500));

    let envelope = service
        .submit_utterance(&session_id("conv-fail"), "tell me a story")
        .await
        .expect("generator failures are not errors");

    assert_eq!(envelope.display_text, CLARIFICATION_TEXT);
}

#[tokio::test]
async fn slow_generator_times_out_to_clarification() {
    let generator = SlowGenerator {
        delay: Duration::from_secs(5),
    };
    let (service, _) = service_with_generator(Arc::new(generator), Duration::from_millis(50));

    let envelope = service
        .submit_utterance(&session_id("conv-slow"), "tell me a story")
        .await
        .expect("timeouts are not errors");

    assert_eq!(envelope.display_text, CLARIFICATION_TEXT);
}

#[tokio::test]
async fn generator_handles_only_unclassified_text() {
    let generator = Arc::new(EchoGenerator::new("loan_card", Some(json!("business"))));
    let (service, _) = service_with_generator(generator.clone(), Duration::from_secs(1));

    let classified = service
        .submit_utterance(&session_id("conv-echo"), "hello")
        .await
        .expect("turn succeeds");
    assert_eq!(classified.category, ResponseCategory::Welcome);
    assert_eq!(generator.calls(), 0);

    let delegated = service
        .submit_utterance(&session_id("conv-echo"), "my bakery needs an oven")
        .await
        .expect("turn succeeds");
    assert_eq!(generator.calls(), 1);
    assert_eq!(delegated.display_text, "echo: my bakery needs an oven");
    assert_eq!(
        delegated.payload,
        Some(ResponsePayload::LoanType {
            loan_type: LoanTypeId::Business,
            lender_id: None,
        })
    );
}

#[tokio::test]
async fn generator_eligibility_reply_starts_interview() {
    let generator = Arc::new(EchoGenerator::new("start_eligibility", None));
    let (service, store) = service_with_generator(generator, Duration::from_secs(1));
    let id = session_id("conv-gen-start");

    let envelope = service
        .submit_utterance(&id, "could a bank lend me money")
        .await
        .expect("turn succeeds");

    assert_eq!(envelope.category, ResponseCategory::EligibilityStart);
    assert!(envelope
        .display_text
        .ends_with(InterviewField::LoanType.question()));
    assert!(store.get(&id).is_some());
}

#[tokio::test]
async fn reset_drops_pending_interview() {
    let (service, store) = build_service();
    let id = session_id("conv-reset");
    service
        .submit_utterance(&id, "am I eligible")
        .await
        .expect("turn succeeds");

    service.reset(&id).expect("reset succeeds");

    assert!(store.get(&id).is_none());
}

#[tokio::test]
async fn store_outage_is_the_only_error() {
    let service = AdvisorService::new(
        Arc::new(UnavailableStore),
        catalog(),
        EvaluationConfig::default(),
    );

    match service
        .submit_utterance(&session_id("conv-down"), "hello")
        .await
    {
        Err(AdvisorServiceError::Store(SessionStoreError::Unavailable(_))) => {}
        other => panic!("expected store outage, got {other:?}"),
    }
}
