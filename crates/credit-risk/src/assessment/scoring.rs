use std::future::Future;
use std::time::Duration;

use serde::Deserialize;

use super::domain::{BorrowerRecord, PredictionResult};
use crate::config::ScoringConfig;

/// Seam to the external model that turns a record into a prediction.
pub trait CreditScorer: Send + Sync {
    fn score(
        &self,
        record: &BorrowerRecord,
    ) -> impl Future<Output = Result<PredictionResult, ScoringError>> + Send;
}

/// Failure reported by (or while reaching) the scoring collaborator.
#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    #[error("scoring collaborator unreachable: {0}")]
    Transport(String),
    #[error("scoring collaborator answered with status {0}")]
    Status(u16),
    #[error("scoring collaborator reply malformed: {0}")]
    Malformed(String),
    #[error("scoring collaborator reply out of contract: {0}")]
    OutOfContract(String),
}

/// The collaborator may answer with named fields or a bare three-element array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ScoringReply {
    Named {
        probability: f64,
        credit_score: i64,
        rating: String,
    },
    Positional(f64, i64, String),
}

impl ScoringReply {
    fn into_prediction(self) -> Result<PredictionResult, ScoringError> {
        match self {
            ScoringReply::Named {
                probability,
                credit_score,
                rating,
            }
            | ScoringReply::Positional(probability, credit_score, rating) => {
                PredictionResult::try_new(probability, credit_score, rating)
            }
        }
    }
}

/// Scorer that posts the eleven record fields as JSON to a prediction endpoint.
#[derive(Debug, Clone)]
pub struct HttpCreditScorer {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpCreditScorer {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn from_config(config: &ScoringConfig) -> Result<Self, reqwest::Error> {
        Self::new(config.endpoint.clone(), config.timeout)
    }
}

impl CreditScorer for HttpCreditScorer {
    fn score(
        &self,
        record: &BorrowerRecord,
    ) -> impl Future<Output = Result<PredictionResult, ScoringError>> + Send {
        let request = self.client.post(&self.endpoint).json(record);

        async move {
            let response = request
                .send()
                .await
                .map_err(|err| ScoringError::Transport(err.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(ScoringError::Status(status.as_u16()));
            }

            let body = response
                .bytes()
                .await
                .map_err(|err| ScoringError::Transport(err.to_string()))?;
            let reply: ScoringReply = serde_json::from_slice(&body)
                .map_err(|err| ScoringError::Malformed(err.to_string()))?;

            reply.into_prediction()
        }
    }
}
