use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::domain::{BorrowerRecord, PredictionResult};
use super::intake::{BorrowerSubmission, IntakeGuard, ValidationError};
use super::presenter::AssessmentView;
use super::scoring::{CreditScorer, ScoringError};

/// Service composing intake validation with the scoring collaborator.
pub struct CreditAssessmentService<S> {
    guard: IntakeGuard,
    scorer: Arc<S>,
}

impl<S> CreditAssessmentService<S>
where
    S: CreditScorer + 'static,
{
    pub fn new(scorer: Arc<S>) -> Self {
        Self {
            guard: IntakeGuard,
            scorer,
        }
    }

    /// Validate a submission and score it. The collaborator is called once per valid
    /// record and never for a rejected one.
    pub async fn assess(
        &self,
        submission: BorrowerSubmission,
    ) -> Result<Assessment, AssessmentError> {
        let record = match self.guard.record_from_submission(submission) {
            Ok(record) => record,
            Err(err) => {
                debug!(violations = err.violations.len(), "borrower submission rejected");
                return Err(err.into());
            }
        };

        info!(
            age = record.age(),
            loan_purpose = record.loan_purpose().label(),
            loan_type = record.loan_type().label(),
            "dispatching borrower record for scoring"
        );

        let prediction = match self.scorer.score(&record).await {
            Ok(prediction) => prediction,
            Err(err) => {
                warn!(error = %err, "scoring collaborator failed");
                return Err(err.into());
            }
        };

        info!(
            credit_score = prediction.credit_score(),
            rating = prediction.rating_label(),
            "borrower record scored"
        );

        Ok(Assessment {
            record,
            prediction,
            assessed_at: Utc::now(),
        })
    }
}

/// A scored record, discarded once rendered.
#[derive(Debug, Clone)]
pub struct Assessment {
    pub record: BorrowerRecord,
    pub prediction: PredictionResult,
    pub assessed_at: DateTime<Utc>,
}

impl Assessment {
    pub fn view(&self) -> AssessmentView {
        AssessmentView::from_prediction(&self.prediction)
    }

    pub fn response(&self) -> AssessmentResponse {
        AssessmentResponse {
            loan_to_income_ratio: self.record.loan_to_income_ratio(),
            result: self.view(),
            assessed_at: self.assessed_at,
        }
    }
}

/// JSON body returned by the assessment API.
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentResponse {
    pub loan_to_income_ratio: f64,
    pub result: AssessmentView,
    pub assessed_at: DateTime<Utc>,
}

/// Error raised by the assessment service.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Scoring(#[from] ScoringError),
}
