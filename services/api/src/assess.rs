use clap::Args;
use credit_risk::assessment::{
    format_ratio, BorrowerSubmission, CreditAssessmentService, HttpCreditScorer,
};
use credit_risk::config::ScoringConfig;
use credit_risk::error::AppError;
use std::sync::Arc;
use std::time::Duration;

#[derive(Args, Debug)]
pub(crate) struct AssessArgs {
    /// Borrower age (18-100)
    #[arg(long, default_value_t = 28)]
    pub(crate) age: i64,
    /// Annual income
    #[arg(long, default_value_t = 1_200_000.0)]
    pub(crate) income: f64,
    #[arg(long, default_value_t = 2_560_000.0)]
    pub(crate) loan_amount: f64,
    #[arg(long, default_value_t = 36)]
    pub(crate) loan_tenure_months: i64,
    /// Average days past due per delinquency
    #[arg(long, default_value_t = 20.0)]
    pub(crate) avg_dpd_per_delinquency: f64,
    /// Delinquency ratio in percent (0-100)
    #[arg(long, default_value_t = 30)]
    pub(crate) delinquency_ratio: i64,
    /// Credit utilization ratio in percent (0-100)
    #[arg(long, default_value_t = 30)]
    pub(crate) credit_utilization_ratio: i64,
    /// Open loan accounts (1-4)
    #[arg(long, default_value_t = 2)]
    pub(crate) num_open_accounts: i64,
    /// Owned, Rented or Mortgage
    #[arg(long, default_value = "Owned")]
    pub(crate) residence_type: String,
    /// Education, Home, Auto or Personal
    #[arg(long, default_value = "Education")]
    pub(crate) loan_purpose: String,
    /// Unsecured or Secured
    #[arg(long, default_value = "Unsecured")]
    pub(crate) loan_type: String,
    /// Scoring collaborator endpoint (defaults to the configured one)
    #[arg(long)]
    pub(crate) scoring_url: Option<String>,
    /// Request timeout in seconds for the scoring call (defaults to the configured one)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub(crate) timeout_secs: Option<u64>,
}

impl AssessArgs {
    fn submission(&self) -> BorrowerSubmission {
        BorrowerSubmission {
            age: Some(self.age),
            income: Some(self.income),
            loan_amount: Some(self.loan_amount),
            loan_tenure_months: Some(self.loan_tenure_months),
            avg_dpd_per_delinquency: Some(self.avg_dpd_per_delinquency),
            delinquency_ratio: Some(self.delinquency_ratio),
            credit_utilization_ratio: Some(self.credit_utilization_ratio),
            num_open_accounts: Some(self.num_open_accounts),
            residence_type: Some(self.residence_type.clone()),
            loan_purpose: Some(self.loan_purpose.clone()),
            loan_type: Some(self.loan_type.clone()),
        }
    }

    /// Flags given on the command line win over the loaded configuration.
    fn scoring_config(&self, base: ScoringConfig) -> ScoringConfig {
        ScoringConfig {
            endpoint: self.scoring_url.clone().unwrap_or(base.endpoint),
            timeout: self
                .timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(base.timeout),
        }
    }
}

pub(crate) async fn run_assessment(args: AssessArgs) -> Result<(), AppError> {
    let config = args.scoring_config(credit_risk::config::AppConfig::load()?.scoring);

    let scorer = Arc::new(HttpCreditScorer::from_config(&config)?);
    let service = CreditAssessmentService::new(scorer);
    let assessment = service.assess(args.submission()).await?;
    let view = assessment.view();

    println!("Credit risk assessment");
    println!("Scoring endpoint: {}", config.endpoint);
    println!(
        "Loan to income ratio: {}",
        format_ratio(assessment.record.loan_to_income_ratio())
    );
    println!("{} Rating: {}", view.rating_icon, view.rating);
    println!("Default probability: {}", view.probability_display);
    println!("Credit score: {}", view.credit_score);

    Ok(())
}
