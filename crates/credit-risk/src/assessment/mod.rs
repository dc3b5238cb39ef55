//! Borrower intake, collaborator scoring, and result presentation for the credit risk form.
//!
//! Each submission is independent: a `BorrowerSubmission` is validated into a
//! `BorrowerRecord`, scored once by a `CreditScorer`, and rendered; nothing is retained
//! between requests.

pub mod domain;
pub mod intake;
pub mod page;
pub mod presenter;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    format_ratio, loan_to_income_ratio, BorrowerRecord, LoanPurpose, LoanType, PredictionResult,
    Rating, ResidenceType, UnknownOption,
};
pub use intake::{BorrowerSubmission, FieldViolation, IntakeGuard, ValidationError};
pub use page::{render_page, PanelState};
pub use presenter::{format_probability, rating_class, AssessmentView};
pub use router::assessment_router;
pub use scoring::{CreditScorer, HttpCreditScorer, ScoringError};
pub use service::{Assessment, AssessmentError, AssessmentResponse, CreditAssessmentService};
