use std::sync::Arc;

use super::common::*;
use crate::assessment::scoring::ScoringError;
use crate::assessment::{AssessmentError, CreditAssessmentService};

#[tokio::test]
async fn valid_submission_dispatches_exactly_one_scoring_call() {
    let (service, scorer) = build_service([prediction(0.1234, 712, "Good")]);

    let assessment = service.assess(submission()).await.expect("assessment");

    let calls = scorer.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0], record());
    assert_eq!(assessment.record, record());
    assert_eq!(assessment.prediction.credit_score(), 712);
    assert_eq!(assessment.view().probability_display, "12.34%");
}

#[tokio::test]
async fn invalid_submission_never_reaches_the_scorer() {
    let (service, scorer) = build_service([prediction(0.1, 800, "Excellent")]);
    let mut submission = submission();
    submission.num_open_accounts = Some(9);

    match service.assess(submission).await {
        Err(AssessmentError::Validation(error)) => {
            assert_eq!(error.violations[0].field, "num_open_accounts");
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert!(scorer.calls().is_empty());
}

#[tokio::test]
async fn scorer_failure_aborts_the_submission() {
    let service = CreditAssessmentService::new(Arc::new(UnavailableScorer));

    match service.assess(submission()).await {
        Err(AssessmentError::Scoring(ScoringError::Transport(detail))) => {
            assert_eq!(detail, "connection refused");
        }
        other => panic!("expected scoring error, got {other:?}"),
    }
}

#[tokio::test]
async fn response_carries_ratio_and_view() {
    let (service, _) = build_service([prediction(0.5, 600, "Average")]);

    let response = service
        .assess(submission())
        .await
        .expect("assessment")
        .response();

    assert!((response.loan_to_income_ratio - 2.1333).abs() < 1e-3);
    assert_eq!(response.result.rating_class, "rating-average");
}
