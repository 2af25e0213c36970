//! # Chat Completions Client
//!
//! HTTP client for an OpenAI-compatible `/chat/completions` endpoint. The
//! async client is bridged into the synchronous [`ChatBackend`] contract so
//! participants can call it from the orchestrator's single thread of control.

use std::time::Duration;

use parley_core::Message;
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::LlmConfig;
use crate::error::{LlmError, LlmResult};
use crate::runtime::run_async;
use crate::wire::{ChatMessage, ChatRequest, ChatResponse, FunctionDefinition};

/// Something that turns a chat history into the next message.
pub trait ChatBackend: Send + Sync {
    /// Complete `messages`, offering `functions` to the model.
    fn complete(
        &self,
        messages: &[ChatMessage],
        functions: &[FunctionDefinition],
    ) -> LlmResult<Message>;
}

/// JSON-over-HTTP transport shared by the chat and embeddings clients
#[derive(Debug, Clone)]
pub(crate) struct ApiTransport {
    client: Client,
    config: LlmConfig,
}

impl ApiTransport {
    pub(crate) fn new(config: LlmConfig) -> LlmResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    pub(crate) fn config(&self) -> &LlmConfig {
        &self.config
    }

    pub(crate) async fn post_json<B, R>(&self, path: &str, body: &B) -> LlmResult<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let mut request = self.client.post(self.config.endpoint(path)).json(body);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }
}

/// Chat-completions client.
#[derive(Debug, Clone)]
pub struct ChatCompletionsClient {
    transport: ApiTransport,
}

impl ChatCompletionsClient {
    pub fn new(config: LlmConfig) -> LlmResult<Self> {
        Ok(Self {
            transport: ApiTransport::new(config)?,
        })
    }

    pub fn config(&self) -> &LlmConfig {
        self.transport.config()
    }

    pub async fn complete_async(
        &self,
        messages: &[ChatMessage],
        functions: &[FunctionDefinition],
    ) -> LlmResult<Message> {
        let config = self.transport.config();
        let request = ChatRequest {
            model: &config.model,
            messages,
            temperature: config.temperature,
            functions,
        };

        let response: ChatResponse = self
            .transport
            .post_json("chat/completions", &request)
            .await?;
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or(LlmError::EmptyResponse)?;

        let message = choice.message.into_message()?;
        debug!(
            model = %config.model,
            history = messages.len(),
            tool_request = message.is_tool_request(),
            "Completion received"
        );
        Ok(message)
    }
}

impl ChatBackend for ChatCompletionsClient {
    fn complete(
        &self,
        messages: &[ChatMessage],
        functions: &[FunctionDefinition],
    ) -> LlmResult<Message> {
        run_async(|| self.complete_async(messages, functions))
    }
}
