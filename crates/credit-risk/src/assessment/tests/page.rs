use super::common::*;
use crate::assessment::intake::{BorrowerSubmission, FieldViolation};
use crate::assessment::page::{render_page, render_result, PanelState, PAGE_TITLE};
use crate::assessment::presenter::AssessmentView;

#[test]
fn idle_page_has_form_but_no_results() {
    let page = render_page(&submission(), &PanelState::Idle);

    assert!(page.contains(PAGE_TITLE));
    assert!(page.contains("Calculate Risk"));
    assert!(!page.contains("Prediction Results"));
    assert!(!page.contains("result-section'"));
}

#[test]
fn page_exposes_eleven_constrained_inputs() {
    let page = render_page(&submission(), &PanelState::Idle);

    for name in [
        "age",
        "income",
        "loan_amount",
        "loan_tenure_months",
        "avg_dpd_per_delinquency",
        "delinquency_ratio",
        "credit_utilization_ratio",
        "num_open_accounts",
        "residence_type",
        "loan_purpose",
        "loan_type",
    ] {
        assert!(page.contains(&format!(r#"name="{name}""#)), "missing {name}");
    }
    assert!(page.contains(r#"name="age" value="28" min="18" max="100""#));
    assert!(page.contains(r#"name="num_open_accounts" value="2" min="1" max="4""#));
    assert!(page.contains(r#"<option value="Owned" selected>"#));
}

#[test]
fn page_shows_loan_to_income_ratio_for_values() {
    let page = render_page(&submission(), &PanelState::Idle);
    assert!(page.contains(r#"id="loan_to_income_ratio">2.13<"#));

    let mut no_income = submission();
    no_income.income = Some(0.0);
    let page = render_page(&no_income, &PanelState::Idle);
    assert!(page.contains(r#"id="loan_to_income_ratio">0.00<"#));

    let page = render_page(&BorrowerSubmission::default(), &PanelState::Idle);
    assert!(page.contains(r#"id="loan_to_income_ratio">0.00<"#));
}

#[test]
fn result_panel_renders_returned_values() {
    let view = AssessmentView::from_prediction(&prediction(0.1234, 712, "Good"));
    let page = render_page(&submission(), &PanelState::Result(view));

    assert!(page.contains("Prediction Results"));
    assert!(page.contains("<p class='rating-good'>\u{1F44D} Rating: Good</p>"));
    assert!(page.contains("<span class='highlight'>12.34%</span>"));
    assert!(page.contains("<span class='highlight'>712</span>"));
}

#[test]
fn rating_labels_are_escaped() {
    let view = AssessmentView::from_prediction(&prediction(0.9, 310, "<b>Bad</b>"));
    let panel = render_result(&view);

    assert!(panel.contains("Rating: &lt;b&gt;Bad&lt;/b&gt;"));
    assert!(panel.contains("rating-poor"));
}

#[test]
fn rejected_panel_lists_violations() {
    let page = render_page(
        &submission(),
        &PanelState::Rejected(vec![FieldViolation::new(
            "age",
            "must be between 18 and 100, got 12",
        )]),
    );

    assert!(page.contains("Please correct the values below."));
    assert!(!page.contains("highlighted"));
    assert!(page.contains("<li>age must be between 18 and 100, got 12</li>"));
    assert!(!page.contains("Prediction Results"));
}

#[test]
fn failed_panel_is_generic() {
    let page = render_page(&submission(), &PanelState::Failed);
    assert!(page.contains("Prediction failed."));
    assert!(!page.contains("Prediction Results"));
}
