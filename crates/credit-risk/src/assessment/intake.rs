use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use super::domain::{BorrowerRecord, LoanPurpose, LoanType, ResidenceType};

const AGE_RANGE: RangeInclusive<i64> = 18..=100;
const PERCENT_RANGE: RangeInclusive<i64> = 0..=100;
const OPEN_ACCOUNTS_RANGE: RangeInclusive<i64> = 1..=4;

/// Raw borrower attributes as posted by the form or the JSON API.
///
/// Every field is optional so a missing value surfaces as a violation instead of a
/// deserializer rejection. A blank numeric input counts as missing. Select values stay
/// as text until the guard parses them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BorrowerSubmission {
    #[serde(deserialize_with = "blank_as_none")]
    pub age: Option<i64>,
    #[serde(deserialize_with = "blank_as_none")]
    pub income: Option<f64>,
    #[serde(deserialize_with = "blank_as_none")]
    pub loan_amount: Option<f64>,
    #[serde(deserialize_with = "blank_as_none")]
    pub loan_tenure_months: Option<i64>,
    #[serde(deserialize_with = "blank_as_none")]
    pub avg_dpd_per_delinquency: Option<f64>,
    #[serde(deserialize_with = "blank_as_none")]
    pub delinquency_ratio: Option<i64>,
    #[serde(deserialize_with = "blank_as_none")]
    pub credit_utilization_ratio: Option<i64>,
    #[serde(deserialize_with = "blank_as_none")]
    pub num_open_accounts: Option<i64>,
    pub residence_type: Option<String>,
    pub loan_purpose: Option<String>,
    pub loan_type: Option<String>,
}

/// Numbers arrive as text from the form and as numbers (or text) from JSON.
fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + Deserialize<'de>,
    T::Err: fmt::Display,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw<T> {
        Text(String),
        Value(T),
    }

    match Option::<Raw<T>>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(Raw::Text(text)) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(serde::de::Error::custom),
        Some(Raw::Value(value)) => Ok(Some(value)),
    }
}

impl BorrowerSubmission {
    /// Values the form shows before anything has been submitted.
    pub fn default_form() -> Self {
        Self {
            age: Some(28),
            income: Some(1_200_000.0),
            loan_amount: Some(2_560_000.0),
            loan_tenure_months: Some(36),
            avg_dpd_per_delinquency: Some(20.0),
            delinquency_ratio: Some(30),
            credit_utilization_ratio: Some(30),
            num_open_accounts: Some(2),
            residence_type: Some(ResidenceType::Owned.label().to_string()),
            loan_purpose: Some(LoanPurpose::Education.label().to_string()),
            loan_type: Some(LoanType::Unsecured.label().to_string()),
        }
    }
}

impl From<&BorrowerRecord> for BorrowerSubmission {
    fn from(record: &BorrowerRecord) -> Self {
        Self {
            age: Some(record.age.into()),
            income: Some(record.income),
            loan_amount: Some(record.loan_amount),
            loan_tenure_months: Some(record.loan_tenure_months.into()),
            avg_dpd_per_delinquency: Some(record.avg_dpd_per_delinquency),
            delinquency_ratio: Some(record.delinquency_ratio.into()),
            credit_utilization_ratio: Some(record.credit_utilization_ratio.into()),
            num_open_accounts: Some(record.num_open_accounts.into()),
            residence_type: Some(record.residence_type.label().to_string()),
            loan_purpose: Some(record.loan_purpose.label().to_string()),
            loan_type: Some(record.loan_type.label().to_string()),
        }
    }
}

/// One rejected form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.message)
    }
}

/// Every violation found in a submission; never empty.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("borrower submission rejected: {}", summarize(.violations))]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

fn summarize(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Guard responsible for producing `BorrowerRecord` instances.
#[derive(Debug, Clone, Default)]
pub struct IntakeGuard;

impl IntakeGuard {
    /// Convert a raw submission into a record, collecting all violations before failing.
    pub fn record_from_submission(
        &self,
        submission: BorrowerSubmission,
    ) -> Result<BorrowerRecord, ValidationError> {
        let mut violations = Vec::new();

        let age = bounded_integer::<u8>(&mut violations, "age", submission.age, AGE_RANGE);
        let income = non_negative_amount(&mut violations, "income", submission.income);
        let loan_amount =
            non_negative_amount(&mut violations, "loan_amount", submission.loan_amount);
        let loan_tenure_months = bounded_integer::<u32>(
            &mut violations,
            "loan_tenure_months",
            submission.loan_tenure_months,
            0..=i64::from(u32::MAX),
        );
        let avg_dpd_per_delinquency = non_negative_amount(
            &mut violations,
            "avg_dpd_per_delinquency",
            submission.avg_dpd_per_delinquency,
        );
        let delinquency_ratio = bounded_integer::<u8>(
            &mut violations,
            "delinquency_ratio",
            submission.delinquency_ratio,
            PERCENT_RANGE,
        );
        let credit_utilization_ratio = bounded_integer::<u8>(
            &mut violations,
            "credit_utilization_ratio",
            submission.credit_utilization_ratio,
            PERCENT_RANGE,
        );
        let num_open_accounts = bounded_integer::<u8>(
            &mut violations,
            "num_open_accounts",
            submission.num_open_accounts,
            OPEN_ACCOUNTS_RANGE,
        );
        let residence_type = select::<ResidenceType>(
            &mut violations,
            "residence_type",
            submission.residence_type.as_deref(),
        );
        let loan_purpose = select::<LoanPurpose>(
            &mut violations,
            "loan_purpose",
            submission.loan_purpose.as_deref(),
        );
        let loan_type =
            select::<LoanType>(&mut violations, "loan_type", submission.loan_type.as_deref());

        match (
            age,
            income,
            loan_amount,
            loan_tenure_months,
            avg_dpd_per_delinquency,
            delinquency_ratio,
            credit_utilization_ratio,
            num_open_accounts,
            residence_type,
            loan_purpose,
            loan_type,
        ) {
            (
                Some(age),
                Some(income),
                Some(loan_amount),
                Some(loan_tenure_months),
                Some(avg_dpd_per_delinquency),
                Some(delinquency_ratio),
                Some(credit_utilization_ratio),
                Some(num_open_accounts),
                Some(residence_type),
                Some(loan_purpose),
                Some(loan_type),
            ) if violations.is_empty() => Ok(BorrowerRecord {
                age,
                income,
                loan_amount,
                loan_tenure_months,
                avg_dpd_per_delinquency,
                delinquency_ratio,
                credit_utilization_ratio,
                num_open_accounts,
                residence_type,
                loan_purpose,
                loan_type,
            }),
            _ => Err(ValidationError { violations }),
        }
    }
}

fn bounded_integer<T: TryFrom<i64>>(
    violations: &mut Vec<FieldViolation>,
    field: &'static str,
    value: Option<i64>,
    range: RangeInclusive<i64>,
) -> Option<T> {
    let Some(value) = value else {
        violations.push(FieldViolation::new(field, "is required"));
        return None;
    };

    if !range.contains(&value) {
        violations.push(FieldViolation::new(
            field,
            format!(
                "must be between {} and {}, got {value}",
                range.start(),
                range.end()
            ),
        ));
        return None;
    }

    match T::try_from(value) {
        Ok(converted) => Some(converted),
        Err(_) => {
            violations.push(FieldViolation::new(field, format!("{value} is out of range")));
            None
        }
    }
}

fn non_negative_amount(
    violations: &mut Vec<FieldViolation>,
    field: &'static str,
    value: Option<f64>,
) -> Option<f64> {
    match value {
        None => {
            violations.push(FieldViolation::new(field, "is required"));
            None
        }
        Some(amount) if !amount.is_finite() => {
            violations.push(FieldViolation::new(field, "must be a finite number"));
            None
        }
        Some(amount) if amount < 0.0 => {
            violations.push(FieldViolation::new(
                field,
                format!("must be at least 0, got {amount}"),
            ));
            None
        }
        Some(amount) => Some(amount),
    }
}

fn select<T>(
    violations: &mut Vec<FieldViolation>,
    field: &'static str,
    value: Option<&str>,
) -> Option<T>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    let Some(raw) = value.filter(|raw| !raw.trim().is_empty()) else {
        violations.push(FieldViolation::new(field, "is required"));
        return None;
    };

    match raw.parse::<T>() {
        Ok(option) => Some(option),
        Err(err) => {
            violations.push(FieldViolation::new(field, err.to_string()));
            None
        }
    }
}
