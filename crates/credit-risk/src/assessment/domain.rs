use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::scoring::ScoringError;

/// Validated borrower attributes handed to the scoring collaborator.
///
/// Only [`super::intake::IntakeGuard`] constructs records, so every value here already
/// satisfies the form constraints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BorrowerRecord {
    pub(super) age: u8,
    pub(super) income: f64,
    pub(super) loan_amount: f64,
    pub(super) loan_tenure_months: u32,
    pub(super) avg_dpd_per_delinquency: f64,
    pub(super) delinquency_ratio: u8,
    pub(super) credit_utilization_ratio: u8,
    pub(super) num_open_accounts: u8,
    pub(super) residence_type: ResidenceType,
    pub(super) loan_purpose: LoanPurpose,
    pub(super) loan_type: LoanType,
}

impl BorrowerRecord {
    pub fn age(&self) -> u8 {
        self.age
    }

    pub fn income(&self) -> f64 {
        self.income
    }

    pub fn loan_amount(&self) -> f64 {
        self.loan_amount
    }

    pub fn loan_tenure_months(&self) -> u32 {
        self.loan_tenure_months
    }

    pub fn avg_dpd_per_delinquency(&self) -> f64 {
        self.avg_dpd_per_delinquency
    }

    pub fn delinquency_ratio(&self) -> u8 {
        self.delinquency_ratio
    }

    pub fn credit_utilization_ratio(&self) -> u8 {
        self.credit_utilization_ratio
    }

    pub fn num_open_accounts(&self) -> u8 {
        self.num_open_accounts
    }

    pub fn residence_type(&self) -> ResidenceType {
        self.residence_type
    }

    pub fn loan_purpose(&self) -> LoanPurpose {
        self.loan_purpose
    }

    pub fn loan_type(&self) -> LoanType {
        self.loan_type
    }

    /// Display-only ratio; the collaborator derives its own copy.
    pub fn loan_to_income_ratio(&self) -> f64 {
        loan_to_income_ratio(self.loan_amount, self.income)
    }
}

/// `loan_amount / income`, or zero when there is no income to divide by.
pub fn loan_to_income_ratio(loan_amount: f64, income: f64) -> f64 {
    if income > 0.0 {
        loan_amount / income
    } else {
        0.0
    }
}

pub fn format_ratio(ratio: f64) -> String {
    format!("{ratio:.2}")
}

/// Error raised when a select value does not name a known option.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{value}' is not one of {expected}")]
pub struct UnknownOption {
    pub value: String,
    pub expected: &'static str,
}

/// How the borrower occupies their residence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ResidenceType {
    Owned,
    Rented,
    Mortgage,
}

impl ResidenceType {
    /// Options in the order the form lists them.
    pub const ALL: [ResidenceType; 3] = [Self::Owned, Self::Rented, Self::Mortgage];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Owned => "Owned",
            Self::Rented => "Rented",
            Self::Mortgage => "Mortgage",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LoanPurpose {
    Education,
    Home,
    Auto,
    Personal,
}

impl LoanPurpose {
    pub const ALL: [LoanPurpose; 4] = [Self::Education, Self::Home, Self::Auto, Self::Personal];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Education => "Education",
            Self::Home => "Home",
            Self::Auto => "Auto",
            Self::Personal => "Personal",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LoanType {
    Unsecured,
    Secured,
}

impl LoanType {
    pub const ALL: [LoanType; 2] = [Self::Unsecured, Self::Secured];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Unsecured => "Unsecured",
            Self::Secured => "Secured",
        }
    }
}

fn parse_option<T: Copy>(
    raw: &str,
    options: &[T],
    label: fn(T) -> &'static str,
    expected: &'static str,
) -> Result<T, UnknownOption> {
    let trimmed = raw.trim();
    options
        .iter()
        .copied()
        .find(|option| label(*option).eq_ignore_ascii_case(trimmed))
        .ok_or_else(|| UnknownOption {
            value: trimmed.to_string(),
            expected,
        })
}

impl FromStr for ResidenceType {
    type Err = UnknownOption;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        parse_option(raw, &Self::ALL, Self::label, "Owned, Rented, Mortgage")
    }
}

impl FromStr for LoanPurpose {
    type Err = UnknownOption;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        parse_option(raw, &Self::ALL, Self::label, "Education, Home, Auto, Personal")
    }
}

impl FromStr for LoanType {
    type Err = UnknownOption;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        parse_option(raw, &Self::ALL, Self::label, "Unsecured, Secured")
    }
}

impl fmt::Display for ResidenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for LoanPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for LoanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Triple returned by the scoring collaborator for one record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    probability: f64,
    credit_score: i64,
    rating: String,
}

impl PredictionResult {
    /// Accepts a collaborator reply, rejecting probabilities outside `0.0..=1.0`.
    pub fn try_new(
        probability: f64,
        credit_score: i64,
        rating: impl Into<String>,
    ) -> Result<Self, ScoringError> {
        if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
            return Err(ScoringError::OutOfContract(format!(
                "probability {probability} outside 0.0..=1.0"
            )));
        }

        Ok(Self {
            probability,
            credit_score,
            rating: rating.into(),
        })
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    pub fn credit_score(&self) -> i64 {
        self.credit_score
    }

    /// Rating label exactly as the collaborator sent it.
    pub fn rating_label(&self) -> &str {
        &self.rating
    }

    pub fn rating(&self) -> Rating {
        Rating::from_label(&self.rating)
    }
}

/// Four-level ordinal classification produced by the collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    Excellent,
    Good,
    Average,
    Poor,
}

impl Rating {
    /// Total over arbitrary labels: anything unrecognised lands in `Poor`.
    pub fn from_label(label: &str) -> Self {
        match label {
            "Excellent" => Rating::Excellent,
            "Good" => Rating::Good,
            "Average" => Rating::Average,
            _ => Rating::Poor,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Rating::Excellent => "Excellent",
            Rating::Good => "Good",
            Rating::Average => "Average",
            Rating::Poor => "Poor",
        }
    }
}
