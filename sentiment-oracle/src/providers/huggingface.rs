//! Hugging Face inference API provider
//!
//! Calls the hosted (or self-hosted, via `base_url`) text-classification
//! pipeline and keeps the highest scoring label.

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{OracleError, Result};
use crate::oracle::{Classification, SentimentOracle};

const HF_INFERENCE_URL: &str = "https://api-inference.huggingface.co";

/// Provider for the Hugging Face inference API
pub struct HuggingFaceOracle {
    model: String,
    base_url: String,
    api_key: String,
    client: Client,
}

impl HuggingFaceOracle {
    /// Create a new provider, optionally pointed at a custom endpoint
    pub fn new(model: &str, api_key: String, base_url: Option<&str>) -> Result<Self> {
        let client = Client::new();

        Ok(Self {
            model: model.to_string(),
            base_url: base_url
                .unwrap_or(HF_INFERENCE_URL)
                .trim_end_matches('/')
                .to_string(),
            api_key,
            client,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}", self.base_url, self.model)
    }
}

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
}

#[derive(Debug, Deserialize)]
struct LabelScore {
    label: String,
    score: f64,
}

// The pipeline answers `[[...]]` for a single input on most deployments, `[...]` on some.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    Nested(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
    #[serde(default)]
    estimated_time: Option<f64>,
}

/// Pick the best label out of a raw inference response body
fn parse_response(body: &str) -> Result<Classification> {
    let parsed: InferenceResponse = serde_json::from_str(body)
        .map_err(|e| OracleError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

    let candidates = match parsed {
        InferenceResponse::Nested(outer) => outer.into_iter().flatten().collect::<Vec<_>>(),
        InferenceResponse::Flat(inner) => inner,
    };

    candidates
        .into_iter()
        .max_by(|a, b| a.score.total_cmp(&b.score))
        .map(|best| Classification::new(best.label, best.score))
        .ok_or_else(|| OracleError::InvalidResponse("Empty label list".into()))
}

#[async_trait]
impl SentimentOracle for HuggingFaceOracle {
    async fn classify(&self, text: &str) -> Result<Classification> {
        debug!("POST {} ({} chars)", self.endpoint(), text.chars().count());

        let response = self
            .client
            .post(self.endpoint())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&InferenceRequest { inputs: text })
            .send()
            .await
            .map_err(|e| OracleError::ApiError {
                message: format!("Request failed: {}", e),
                status_code: None,
            })?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if !status.is_success() {
            let error = serde_json::from_str::<ErrorResponse>(&body).ok();

            match status.as_u16() {
                // Cold model: the endpoint reports how long loading will take
                503 => {
                    let message = error
                        .map(|e| match e.estimated_time {
                            Some(t) => format!("{} (ready in ~{:.0}s)", e.error, t),
                            None => e.error,
                        })
                        .unwrap_or(body);
                    return Err(OracleError::ServerOverloaded { message });
                }
                429 => return Err(OracleError::RateLimited { retry_after: None }),
                code => {
                    return Err(OracleError::ApiError {
                        message: error.map(|e| e.error).unwrap_or(body),
                        status_code: Some(code),
                    });
                }
            }
        }

        parse_response(&body)
    }

    fn name(&self) -> &'static str {
        "Hugging Face"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn is_available(&self) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(OracleError::Unavailable("Empty Hugging Face API token".into()));
        }
        Ok(())
    }
}
