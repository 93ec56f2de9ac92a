use crate::settings::SolverSettings;
use crate::sketch::error::SubmitError;
use crate::sketch::protocol::{parse_response, RecognitionRequest, RecognitionResult};
use anyhow::{Context, Result};
use reqwest::blocking::Client;
use std::time::Duration;

pub const CALCULATE_ROUTE: &str = "calculate";

/// Turns a rendered sketch into recognised expressions. Called from a worker
/// thread, never from the event loop.
pub trait RecognitionService: Send + Sync {
    fn recognize(
        &self,
        request: &RecognitionRequest,
    ) -> Result<Vec<RecognitionResult>, SubmitError>;
}

pub struct HttpRecognitionService {
    client: Client,
    endpoint: String,
}

impl HttpRecognitionService {
    pub fn new(api_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent("sketch-solver")
            .timeout(timeout)
            .build()
            .context("build recognition http client")?;
        Ok(Self {
            client,
            endpoint: calculate_endpoint(api_url),
        })
    }

    pub fn from_settings(settings: &SolverSettings) -> Result<Self> {
        Self::new(
            &settings.api_url,
            Duration::from_secs(settings.request_timeout_secs.max(1)),
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl RecognitionService for HttpRecognitionService {
    fn recognize(
        &self,
        request: &RecognitionRequest,
    ) -> Result<Vec<RecognitionResult>, SubmitError> {
        tracing::debug!(endpoint = %self.endpoint, vars = request.dict_of_vars.len(), "posting sketch");
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .map_err(|err| SubmitError::Transport(err.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|err| SubmitError::Transport(err.to_string()))?;
        if !status.is_success() {
            return Err(SubmitError::Status {
                status: status.as_u16(),
                body,
            });
        }
        parse_response(&body)
    }
}

pub fn calculate_endpoint(api_url: &str) -> String {
    format!("{}/{CALCULATE_ROUTE}", api_url.trim().trim_end_matches('/'))
}
