//! HTTP client for the analysis service's `/api/analyze` and `/health` endpoints.

use async_trait::async_trait;
use clauseai_core::AnalysisResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::{Analyzer, ClientConfig};

const GENERIC_FAILURE: &str = "Analysis failed";

#[derive(Error, Debug)]
pub enum AnalyzeError {
    #[error("clause text is empty")]
    EmptyClause,
    #[error("could not reach the analysis service: {0}")]
    Network(#[from] reqwest::Error),
    #[error("{detail} (status {status})")]
    Service { status: u16, detail: String },
    #[error("invalid response from the analysis service: {0}")]
    InvalidResponse(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct AnalyzeRequest<'a> {
    clause_text: &'a str,
}

/// Backend liveness report from `GET /health`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HealthStatus {
    pub ok: bool,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub llm_base_url: Option<String>,
    #[serde(default)]
    pub faiss_ntotal: Option<u64>,
}

/// Single-attempt client: no retries, failures surface immediately.
#[derive(Clone)]
pub struct AnalysisClient {
    client: reqwest::Client,
    config: ClientConfig,
}

impl AnalysisClient {
    pub fn new(config: ClientConfig) -> Result<Self, AnalyzeError> {
        let mut builder = reqwest::Client::builder().user_agent(concat!(
            "clauseai/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            config,
        })
    }

    /// Submit clause text for scoring, rewrite, and precedent retrieval.
    pub async fn analyze(&self, clause_text: &str) -> Result<AnalysisResult, AnalyzeError> {
        if clause_text.is_empty() {
            return Err(AnalyzeError::EmptyClause);
        }

        let url = self.config.analyze_url();
        info!(url = %url, chars = clause_text.len(), "requesting clause analysis");
        let resp = self
            .client
            .post(&url)
            .json(&AnalyzeRequest { clause_text })
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AnalyzeError::Service {
                status: status.as_u16(),
                detail: service_detail(&body),
            });
        }

        let body = resp.text().await?;
        let result: AnalysisResult = serde_json::from_str(&body)?;
        info!(
            clause_type = %result.clause_type,
            risk_score = result.risk_score,
            evidence = result.evidence.len(),
            "analysis complete"
        );
        Ok(result)
    }

    pub async fn health(&self) -> Result<HealthStatus, AnalyzeError> {
        let url = self.config.health_url();
        debug!(url = %url, "checking analysis service health");
        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AnalyzeError::Service {
                status: status.as_u16(),
                detail: service_detail(&body),
            });
        }
        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl Analyzer for AnalysisClient {
    async fn analyze(&self, clause_text: &str) -> Result<AnalysisResult, AnalyzeError> {
        AnalysisClient::analyze(self, clause_text).await
    }
}

/// Pull a human-readable message out of an error body.
///
/// A string `detail` is used as-is; a validation list contributes its `msg`
/// entries. Anything else falls back to a generic message.
fn service_detail(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return GENERIC_FAILURE.to_string();
    };
    match value.get("detail") {
        Some(Value::String(detail)) if !detail.is_empty() => detail.clone(),
        Some(Value::Array(items)) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            if messages.is_empty() {
                GENERIC_FAILURE.to_string()
            } else {
                messages.join("; ")
            }
        }
        _ => GENERIC_FAILURE.to_string(),
    }
}
