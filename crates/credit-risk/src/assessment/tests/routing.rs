use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use super::common::*;
use crate::assessment::intake::BorrowerSubmission;
use crate::assessment::router::submit_form_handler;
use crate::assessment::CreditAssessmentService;

fn form_request(body: String) -> Request<Body> {
    Request::post("/")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .expect("request builds")
}

#[tokio::test]
async fn get_renders_idle_form() {
    let (service, scorer) = build_service([]);
    let router = router_with_service(service);

    let response = router
        .oneshot(Request::get("/").body(Body::empty()).expect("request"))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let page = read_body(response).await;
    assert!(page.contains("Calculate Risk"));
    assert!(!page.contains("Prediction Results"));
    assert!(scorer.calls().is_empty());
}

#[tokio::test]
async fn form_submit_renders_result_panel() {
    let (service, scorer) = build_service([prediction(0.0421, 781, "Excellent")]);
    let router = router_with_service(service);

    let response = router
        .oneshot(form_request(form_body(&submission())))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let page = read_body(response).await;
    assert!(page.contains("<p class='rating-excellent'>\u{1F3C5} Rating: Excellent</p>"));
    assert!(page.contains("<span class='highlight'>4.21%</span>"));
    assert!(page.contains("<span class='highlight'>781</span>"));
    assert_eq!(scorer.calls().len(), 1);
}

#[tokio::test]
async fn resubmission_replaces_previous_result() {
    let (service, scorer) = build_service([
        prediction(0.0421, 781, "Excellent"),
        prediction(0.8765, 342, "Poor"),
    ]);
    let router = router_with_service(service);

    let first = router
        .clone()
        .oneshot(form_request(form_body(&submission())))
        .await
        .expect("first submit");
    let first_page = read_body(first).await;
    assert!(first_page.contains("781"));

    let mut riskier = submission();
    riskier.age = Some(55);
    riskier.delinquency_ratio = Some(80);
    riskier.residence_type = Some("Rented".to_string());
    let second = router
        .oneshot(form_request(form_body(&riskier)))
        .await
        .expect("second submit");
    let second_page = read_body(second).await;

    assert!(second_page.contains("<span class='highlight'>342</span>"));
    assert!(second_page.contains("87.65%"));
    assert!(second_page.contains("rating-poor'"));
    assert!(!second_page.contains("781"));
    assert!(!second_page.contains("rating-excellent'"));
    assert!(second_page.contains(r#"<option value="Rented" selected>"#));
    assert_eq!(scorer.calls().len(), 2);
}

#[tokio::test]
async fn out_of_range_form_is_rejected_without_scoring() {
    let (service, scorer) = build_service([prediction(0.1, 700, "Good")]);
    let router = router_with_service(service);
    let mut submission = submission();
    submission.age = Some(12);

    let response = router
        .oneshot(form_request(form_body(&submission)))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let page = read_body(response).await;
    assert!(page.contains("age must be between 18 and 100, got 12"));
    assert!(!page.contains("Prediction Results"));
    assert!(scorer.calls().is_empty());
}

#[tokio::test]
async fn unparseable_form_is_rejected() {
    let (service, scorer) = build_service([]);
    let router = router_with_service(service);

    let response = router
        .oneshot(form_request("age=twenty&income=1".to_string()))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let page = read_body(response).await;
    assert!(page.contains("<li>form "));
    assert!(scorer.calls().is_empty());
}

#[tokio::test]
async fn scorer_failure_renders_generic_notice() {
    let service = Arc::new(CreditAssessmentService::new(Arc::new(UnavailableScorer)));
    let submission = axum::Form(submission());

    let response = submit_form_handler(State(service), Ok(submission)).await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let page = read_body(response).await;
    assert!(page.contains("Prediction failed."));
    assert!(!page.contains("connection refused"));
}

#[tokio::test]
async fn json_api_returns_view() {
    let (service, _) = build_service([prediction(0.1234, 712, "Good")]);
    let router = router_with_service(service);

    let response = router
        .oneshot(
            Request::post("/api/v1/credit-risk/assessments")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    serde_json::to_vec(&submission()).expect("serialize"),
                ))
                .expect("request"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["result"]["rating"], json!("Good"));
    assert_eq!(payload["result"]["rating_class"], json!("rating-good"));
    assert_eq!(payload["result"]["probability_display"], json!("12.34%"));
    assert_eq!(payload["result"]["credit_score"], json!(712));
    assert!(payload.get("assessed_at").is_some());
}

#[tokio::test]
async fn json_api_reports_violations() {
    let (service, scorer) = build_service([]);
    let router = router_with_service(service);

    let mut submission = BorrowerSubmission::default_form();
    submission.loan_purpose = Some("Vacation".to_string());

    let response = router
        .oneshot(
            Request::post("/api/v1/credit-risk/assessments")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    serde_json::to_vec(&submission).expect("serialize"),
                ))
                .expect("request"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert_eq!(payload["violations"][0]["field"], json!("loan_purpose"));
    assert!(scorer.calls().is_empty());
}

#[tokio::test]
async fn json_api_maps_scorer_failure_to_bad_gateway() {
    let router = router_with_service(CreditAssessmentService::new(Arc::new(UnavailableScorer)));

    let response = router
        .oneshot(
            Request::post("/api/v1/credit-risk/assessments")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    serde_json::to_vec(&submission()).expect("serialize"),
                ))
                .expect("request"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let payload = read_json_body(response).await;
    assert_eq!(payload, json!({ "error": "prediction failed" }));
}

#[tokio::test]
async fn blank_form_field_is_reported_as_required() {
    let (service, scorer) = build_service([]);
    let router = router_with_service(service);

    let response = router
        .oneshot(form_request("age=&income=5&loan_amount=7".to_string()))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let page = read_body(response).await;
    assert!(page.contains("<li>age is required</li>"));
    assert!(!page.contains("<li>form "));
    assert!(page.contains(r#"name="income" value="5""#));
    assert!(page.contains(r#"name="loan_amount" value="7""#));
    assert!(scorer.calls().is_empty());
}

#[tokio::test]
async fn json_api_reports_malformed_body_as_json() {
    let (service, scorer) = build_service([]);
    let router = router_with_service(service);

    let response = router
        .oneshot(
            Request::post("/api/v1/credit-risk/assessments")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"age": true}"#))
                .expect("request"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    let payload = read_json_body(response).await;
    assert_eq!(payload["error"], json!("borrower submission rejected"));
    assert_eq!(payload["violations"][0]["field"], json!("body"));
    assert!(scorer.calls().is_empty());
}
