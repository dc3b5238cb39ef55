//! Server-rendered credit risk form and result panel.

use super::domain::{format_ratio, loan_to_income_ratio, LoanPurpose, LoanType, ResidenceType};
use super::intake::{BorrowerSubmission, FieldViolation};
use super::presenter::AssessmentView;

pub const PAGE_TITLE: &str = "Lauki Finance: Credit Risk Modelling";

/// Shared stylesheet, embedded once in the document head.
pub const STYLESHEET: &str = r#"
body {
    background-color: #f7f9fc;
    font-family: Arial, sans-serif;
    margin: 0;
    padding: 24px;
}
.title {
    text-align: center;
    font-size: 36px;
    font-weight: bold;
    color: #2E7D32;
    margin-bottom: 20px;
}
.form-row {
    display: grid;
    grid-template-columns: repeat(3, 1fr);
    gap: 16px;
    margin-bottom: 12px;
}
.field label { display: block; font-weight: bold; margin-bottom: 4px; }
.field input, .field select { width: 100%; padding: 6px; box-sizing: border-box; }
.ratio-value { font-family: monospace; font-size: 16px; }
.result-section {
    background-color: #E3F2FD;
    border-left: 6px solid #2E7D32;
    padding: 20px;
    border-radius: 12px;
    box-shadow: 0 4px 10px rgba(0, 0, 0, 0.1);
    margin-top: 20px;
}
.result-section p { font-size: 18px; margin: 5px 0; }
.highlight { font-weight: bold; color: #2E7D32; font-size: 20px; }
.rating-excellent { color: #2E7D32; font-weight: bold; font-size: 20px; }
.rating-good { color: #1976D2; font-weight: bold; font-size: 20px; }
.rating-average { color: #FFA726; font-weight: bold; font-size: 20px; }
.rating-poor { color: #D32F2F; font-weight: bold; font-size: 20px; }
.notice-error {
    background-color: #FFEBEE;
    border-left: 6px solid #D32F2F;
    padding: 16px;
    border-radius: 12px;
    margin-top: 20px;
}
"#;

const RATIO_SCRIPT: &str = r#"
(function () {
    var income = document.getElementById('income');
    var loan = document.getElementById('loan_amount');
    var out = document.getElementById('loan_to_income_ratio');
    function refresh() {
        var i = parseFloat(income.value);
        var l = parseFloat(loan.value);
        var ratio = (i > 0 && !isNaN(l)) ? l / i : 0;
        out.textContent = ratio.toFixed(2);
    }
    income.addEventListener('input', refresh);
    loan.addEventListener('input', refresh);
})();
"#;

/// What the panel below the form shows for one request.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelState {
    /// Nothing submitted yet.
    Idle,
    Result(AssessmentView),
    Rejected(Vec<FieldViolation>),
    /// The collaborator failed; details stay in the logs.
    Failed,
}

pub fn render_page(values: &BorrowerSubmission, panel: &PanelState) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{css}</style>
</head>
<body>
    <div class="title">{title}</div>
    <h3>Borrower Information</h3>
    {form}
    {panel}
    <script>{script}</script>
</body>
</html>"#,
        title = PAGE_TITLE,
        css = STYLESHEET,
        form = render_form(values),
        panel = render_panel(panel),
        script = RATIO_SCRIPT,
    )
}

fn render_form(values: &BorrowerSubmission) -> String {
    let ratio = loan_to_income_ratio(
        values.loan_amount.unwrap_or(0.0),
        values.income.unwrap_or(0.0),
    );

    let rows = [
        [
            number_input("age", "Age", values.age.map(|v| v.to_string()), "18", Some("100"), "1"),
            number_input("income", "Income", values.income.map(amount), "0", None, "any"),
            number_input(
                "loan_amount",
                "Loan Amount",
                values.loan_amount.map(amount),
                "0",
                None,
                "any",
            ),
        ],
        [
            number_input(
                "loan_tenure_months",
                "Loan Tenure (months)",
                values.loan_tenure_months.map(|v| v.to_string()),
                "0",
                None,
                "1",
            ),
            number_input(
                "avg_dpd_per_delinquency",
                "Avg DPD",
                values.avg_dpd_per_delinquency.map(amount),
                "0",
                None,
                "any",
            ),
            number_input(
                "delinquency_ratio",
                "Delinquency Ratio (%)",
                values.delinquency_ratio.map(|v| v.to_string()),
                "0",
                Some("100"),
                "1",
            ),
        ],
        [
            number_input(
                "credit_utilization_ratio",
                "Credit Utilization Ratio (%)",
                values.credit_utilization_ratio.map(|v| v.to_string()),
                "0",
                Some("100"),
                "1",
            ),
            number_input(
                "num_open_accounts",
                "Open Loan Accounts",
                values.num_open_accounts.map(|v| v.to_string()),
                "1",
                Some("4"),
                "1",
            ),
            format!(
                r#"<div class="field"><label>Loan to Income Ratio:</label><span class="ratio-value" id="loan_to_income_ratio">{}</span></div>"#,
                format_ratio(ratio)
            ),
        ],
        [
            select_input(
                "residence_type",
                "Residence Type",
                &ResidenceType::ALL.map(ResidenceType::label),
                values.residence_type.as_deref(),
            ),
            select_input(
                "loan_purpose",
                "Loan Purpose",
                &LoanPurpose::ALL.map(LoanPurpose::label),
                values.loan_purpose.as_deref(),
            ),
            select_input(
                "loan_type",
                "Loan Type",
                &LoanType::ALL.map(LoanType::label),
                values.loan_type.as_deref(),
            ),
        ],
    ];

    let body: String = rows
        .iter()
        .map(|row| format!(r#"<div class="form-row">{}</div>"#, row.concat()))
        .collect();

    format!(
        r#"<form id="credit_risk_form" method="post" action="/">{body}<button type="submit">Calculate Risk</button></form>"#
    )
}

fn amount(value: f64) -> String {
    value.to_string()
}

fn number_input(
    name: &str,
    label: &str,
    value: Option<String>,
    min: &str,
    max: Option<&str>,
    step: &str,
) -> String {
    let max_attr = max.map(|max| format!(r#" max="{max}""#)).unwrap_or_default();
    format!(
        r#"<div class="field"><label for="{name}">{label}</label><input type="number" id="{name}" name="{name}" value="{value}" min="{min}"{max_attr} step="{step}" required></div>"#,
        value = html_escape(value.as_deref().unwrap_or_default()),
    )
}

fn select_input(name: &str, label: &str, options: &[&str], selected: Option<&str>) -> String {
    let options: String = options
        .iter()
        .map(|option| {
            let marker = if selected.is_some_and(|chosen| chosen.eq_ignore_ascii_case(option)) {
                " selected"
            } else {
                ""
            };
            format!(r#"<option value="{option}"{marker}>{option}</option>"#)
        })
        .collect();
    format!(
        r#"<div class="field"><label for="{name}">{label}</label><select id="{name}" name="{name}">{options}</select></div>"#
    )
}

fn render_panel(panel: &PanelState) -> String {
    match panel {
        PanelState::Idle => String::new(),
        PanelState::Result(view) => render_result(view),
        PanelState::Rejected(violations) => {
            let items: String = violations
                .iter()
                .map(|violation| format!("<li>{}</li>", html_escape(&violation.to_string())))
                .collect();
            format!(
                r#"<div class="notice-error"><p><b>Please correct the values below.</b></p><ul>{items}</ul></div>"#
            )
        }
        PanelState::Failed => r#"<div class="notice-error"><p><b>Prediction failed.</b> The risk model could not score this application; please try again.</p></div>"#
            .to_string(),
    }
}

/// Result panel markup for one assessment.
pub fn render_result(view: &AssessmentView) -> String {
    format!(
        r#"<h3>Prediction Results</h3>
    <p class='{class}'>{icon} Rating: {rating}</p>
    <div class='result-section'>
        <p><b>&#9989; Risk Calculation Complete!</b></p>
        <p><b>Default Probability:</b> <span class='highlight'>{probability}</span></p>
        <p><b>Credit Score:</b> <span class='highlight'>{score}</span></p>
    </div>"#,
        class = view.rating_class,
        icon = view.rating_icon,
        rating = html_escape(&view.rating),
        probability = view.probability_display,
        score = view.credit_score,
    )
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
