//! Completion client for OpenAI-compatible chat endpoints.

use std::time::Duration;

use async_trait::async_trait;
use bizflow_core::completion::{CompletionRequest, CompletionService};
use bizflow_core::error::DomainError;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, instrument};

/// Posts chat requests to `{base_url}/chat/completions` with bearer auth.
#[derive(Debug, Clone)]
pub struct OpenAiCompletionClient {
    client: Client,
    base_url: String,
    api_key: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiCompletionClient {
    /// Creates a client whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the HTTP client cannot be
    /// built.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, DomainError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| DomainError::Infrastructure(format!("building HTTP client: {err}")))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            api_key: api_key.into(),
        })
    }

    /// The chat completions endpoint.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

fn check_status(status: StatusCode) -> Result<(), DomainError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(DomainError::Completion(format!(
            "completion endpoint returned status {status}"
        )))
    }
}

fn first_choice(body: ChatCompletionResponse) -> Result<String, DomainError> {
    body.choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content.unwrap_or_default())
        .ok_or_else(|| DomainError::Completion("response contained no choices".into()))
}

#[async_trait]
impl CompletionService for OpenAiCompletionClient {
    #[instrument(skip(self, request), fields(model = %request.model))]
    async fn complete(&self, request: &CompletionRequest) -> Result<String, DomainError> {
        debug!(messages = request.messages.len(), "requesting completion");

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|err| DomainError::Completion(err.to_string()))?;

        check_status(response.status())?;

        let body: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|err| DomainError::Completion(format!("decoding response: {err}")))?;
        first_choice(body)
    }
}
