use std::collections::VecDeque;
use std::future::Future;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::assessment::domain::{BorrowerRecord, PredictionResult};
use crate::assessment::intake::{BorrowerSubmission, IntakeGuard};
use crate::assessment::scoring::{CreditScorer, ScoringError};
use crate::assessment::{assessment_router, CreditAssessmentService};

pub(super) fn submission() -> BorrowerSubmission {
    BorrowerSubmission::default_form()
}

pub(super) fn record() -> BorrowerRecord {
    IntakeGuard
        .record_from_submission(submission())
        .expect("default form is valid")
}

pub(super) fn prediction(probability: f64, credit_score: i64, rating: &str) -> PredictionResult {
    PredictionResult::try_new(probability, credit_score, rating).expect("prediction in contract")
}

/// Scorer that remembers every record it was asked about and replays queued predictions.
#[derive(Default, Clone)]
pub(super) struct RecordingScorer {
    calls: Arc<Mutex<Vec<BorrowerRecord>>>,
    replies: Arc<Mutex<VecDeque<PredictionResult>>>,
}

impl RecordingScorer {
    pub(super) fn replying(replies: impl IntoIterator<Item = PredictionResult>) -> Self {
        let scorer = Self::default();
        scorer
            .replies
            .lock()
            .expect("replies mutex poisoned")
            .extend(replies);
        scorer
    }

    pub(super) fn calls(&self) -> Vec<BorrowerRecord> {
        self.calls.lock().expect("calls mutex poisoned").clone()
    }
}

impl CreditScorer for RecordingScorer {
    fn score(
        &self,
        record: &BorrowerRecord,
    ) -> impl Future<Output = Result<PredictionResult, ScoringError>> + Send {
        self.calls
            .lock()
            .expect("calls mutex poisoned")
            .push(record.clone());
        let reply = self
            .replies
            .lock()
            .expect("replies mutex poisoned")
            .pop_front()
            .ok_or_else(|| ScoringError::Transport("no reply queued".to_string()));
        async move { reply }
    }
}

pub(super) struct UnavailableScorer;

impl CreditScorer for UnavailableScorer {
    fn score(
        &self,
        _record: &BorrowerRecord,
    ) -> impl Future<Output = Result<PredictionResult, ScoringError>> + Send {
        async { Err(ScoringError::Transport("connection refused".to_string())) }
    }
}

pub(super) fn build_service(
    replies: impl IntoIterator<Item = PredictionResult>,
) -> (CreditAssessmentService<RecordingScorer>, RecordingScorer) {
    let scorer = RecordingScorer::replying(replies);
    let service = CreditAssessmentService::new(Arc::new(scorer.clone()));
    (service, scorer)
}

pub(super) fn router_with_service<S: CreditScorer + 'static>(
    service: CreditAssessmentService<S>,
) -> axum::Router {
    assessment_router(Arc::new(service))
}

pub(super) fn form_body(submission: &BorrowerSubmission) -> String {
    let mut pairs = Vec::new();
    let mut push = |name: &str, value: Option<String>| {
        if let Some(value) = value {
            pairs.push(format!("{name}={value}"));
        }
    };
    push("age", submission.age.map(|v| v.to_string()));
    push("income", submission.income.map(|v| v.to_string()));
    push("loan_amount", submission.loan_amount.map(|v| v.to_string()));
    push(
        "loan_tenure_months",
        submission.loan_tenure_months.map(|v| v.to_string()),
    );
    push(
        "avg_dpd_per_delinquency",
        submission.avg_dpd_per_delinquency.map(|v| v.to_string()),
    );
    push(
        "delinquency_ratio",
        submission.delinquency_ratio.map(|v| v.to_string()),
    );
    push(
        "credit_utilization_ratio",
        submission.credit_utilization_ratio.map(|v| v.to_string()),
    );
    push(
        "num_open_accounts",
        submission.num_open_accounts.map(|v| v.to_string()),
    );
    push("residence_type", submission.residence_type.clone());
    push("loan_purpose", submission.loan_purpose.clone());
    push("loan_type", submission.loan_type.clone());
    pairs.join("&")
}

pub(super) async fn read_body(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    String::from_utf8(body.to_vec()).expect("utf-8 body")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
