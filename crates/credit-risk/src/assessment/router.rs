use std::sync::Arc;

use axum::{
    extract::{
        rejection::{FormRejection, JsonRejection},
        State,
    },
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde_json::json;

use super::intake::{BorrowerSubmission, FieldViolation};
use super::page::{render_page, PanelState};
use super::scoring::CreditScorer;
use super::service::{AssessmentError, CreditAssessmentService};

/// Router builder exposing the form page and the JSON assessment endpoint.
pub fn assessment_router<S>(service: Arc<CreditAssessmentService<S>>) -> Router
where
    S: CreditScorer + 'static,
{
    Router::new()
        .route("/", get(form_handler).post(submit_form_handler::<S>))
        .route(
            "/api/v1/credit-risk/assessments",
            post(assess_handler::<S>),
        )
        .with_state(service)
}

pub(crate) async fn form_handler() -> Html<String> {
    Html(render_page(
        &BorrowerSubmission::default_form(),
        &PanelState::Idle,
    ))
}

pub(crate) async fn submit_form_handler<S>(
    State(service): State<Arc<CreditAssessmentService<S>>>,
    form: Result<Form<BorrowerSubmission>, FormRejection>,
) -> Response
where
    S: CreditScorer + 'static,
{
    let submission = match form {
        Ok(Form(submission)) => submission,
        Err(rejection) => {
            let violations = vec![FieldViolation::new("form", rejection.body_text())];
            let page = render_page(
                &BorrowerSubmission::default_form(),
                &PanelState::Rejected(violations),
            );
            return (StatusCode::UNPROCESSABLE_ENTITY, Html(page)).into_response();
        }
    };

    match service.assess(submission.clone()).await {
        Ok(assessment) => {
            let values = BorrowerSubmission::from(&assessment.record);
            let page = render_page(&values, &PanelState::Result(assessment.view()));
            (StatusCode::OK, Html(page)).into_response()
        }
        Err(AssessmentError::Validation(error)) => {
            let page = render_page(&submission, &PanelState::Rejected(error.violations));
            (StatusCode::UNPROCESSABLE_ENTITY, Html(page)).into_response()
        }
        Err(AssessmentError::Scoring(_)) => {
            let page = render_page(&submission, &PanelState::Failed);
            (StatusCode::BAD_GATEWAY, Html(page)).into_response()
        }
    }
}

pub(crate) async fn assess_handler<S>(
    State(service): State<Arc<CreditAssessmentService<S>>>,
    body: Result<Json<BorrowerSubmission>, JsonRejection>,
) -> Response
where
    S: CreditScorer + 'static,
{
    let submission = match body {
        Ok(Json(submission)) => submission,
        Err(rejection) => {
            let payload = json!({
                "error": "borrower submission rejected",
                "violations": [FieldViolation::new("body", rejection.body_text())],
            });
            return (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response();
        }
    };

    match service.assess(submission).await {
        Ok(assessment) => (StatusCode::OK, Json(assessment.response())).into_response(),
        Err(AssessmentError::Validation(error)) => {
            let payload = json!({
                "error": "borrower submission rejected",
                "violations": error.violations,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
        Err(AssessmentError::Scoring(_)) => {
            let payload = json!({
                "error": "prediction failed",
            });
            (StatusCode::BAD_GATEWAY, Json(payload)).into_response()
        }
    }
}
