//! HttpClient: CouncilClient over the collaborator's JSON endpoints

use std::time::Duration;

use async_trait::async_trait;
use council_types::{
    AnalysisRequest, AnalysisResult, DebateInjectionRequest, DebateInjectionResponse,
};
use serde::Serialize;

use crate::{decode_analysis, decode_debate, ClientError, CouncilClient, Result};

pub const ANALYZE_PATH: &str = "/api/analyze";
pub const DEBATE_PATH: &str = "/api/debate";

#[derive(Clone)]
pub struct HttpClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST `body` as JSON and return the raw response text on 2xx
    async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<String> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "collaborator request");
        let response = self.client.post(&url).json(body).send().await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            tracing::warn!(%url, status = status.as_u16(), "collaborator returned error");
            return Err(ClientError::Http {
                status: status.as_u16(),
                body: text,
            });
        }
        Ok(text)
    }
}

#[async_trait]
impl CouncilClient for HttpClient {
    async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisResult> {
        request.validate()?;
        let body = self.post(ANALYZE_PATH, &request).await?;
        decode_analysis(&body)
    }

    async fn inject_debate(
        &self,
        request: DebateInjectionRequest,
    ) -> Result<DebateInjectionResponse> {
        request.validate()?;
        let body = self.post(DEBATE_PATH, &request).await?;
        decode_debate(&body)
    }
}
