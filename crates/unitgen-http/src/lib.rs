use anyhow::{Context, Result};
use reqwest::blocking::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use unitgen_core::{
    GENERATE_PATH, GenerateReply, GenerateRequest, GenerationBackend, REGENERATE_PATH,
    RegenerateReply, RegenerateRequest,
};

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

/// Non-success HTTP status from the generation service.
#[derive(Debug, Error)]
#[error("generation service returned {status}: {message}")]
pub struct ServiceError {
    pub status: u16,
    pub message: String,
}

#[derive(Debug, serde::Deserialize)]
struct ErrorEnvelope {
    error: String,
}

#[derive(Clone)]
pub struct HttpBackend {
    base_url: String,
    client: Client,
}

impl HttpBackend {
    /// `timeout` of `None` leaves failure detection to the transport.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.endpoint(path);
        tracing::debug!(%url, "posting to generation service");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .with_context(|| format!("failed calling {url}"))?;

        let status = response.status();
        tracing::debug!(%url, status = status.as_u16(), "generation service replied");
        if !status.is_success() {
            let raw = response
                .text()
                .unwrap_or_else(|_| "<unavailable>".to_string());
            let message = serde_json::from_str::<ErrorEnvelope>(&raw)
                .map(|envelope| envelope.error)
                .unwrap_or(raw);
            return Err(ServiceError {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        response
            .json()
            .with_context(|| format!("failed to decode response from {url}"))
    }
}

impl GenerationBackend for HttpBackend {
    fn generate_tests(&self, req: &GenerateRequest) -> Result<GenerateReply> {
        self.post_json(GENERATE_PATH, req)
    }

    fn regenerate_with_feedback(&self, req: &RegenerateRequest) -> Result<RegenerateReply> {
        self.post_json(REGENERATE_PATH, req)
    }
}
