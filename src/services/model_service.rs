use std::{io::Write, pin::Pin, str::FromStr, sync::Arc};

use async_openai::{config::OpenAIConfig, error::OpenAIError, Client};
use async_trait::async_trait;
use futures::{Stream, StreamExt};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    config::Config,
    errors::{AppError, AppResult},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

/// JSON schema the service must conform its reply to.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseSchema {
    pub name: String,
    pub schema: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub messages: Vec<ChatMessage>,
    pub response_schema: Option<ResponseSchema>,
}

impl GenerationRequest {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            response_schema: None,
        }
    }

    pub fn with_response_schema(mut self, schema: ResponseSchema) -> Self {
        self.response_schema = Some(schema);
        self
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Sends one request and returns the complete reply text.
    async fn generate(&self, request: GenerationRequest) -> AppResult<String>;
}

/// Receives streamed tokens for observation; never read back by the pipeline.
pub trait TokenSink: Send + Sync {
    fn on_token(&self, token: &str);

    fn on_finish(&self) {}
}

pub struct StdoutTokenSink;

impl TokenSink for StdoutTokenSink {
    fn on_token(&self, token: &str) {
        let mut out = std::io::stdout().lock();
        let _ = out.write_all(token.as_bytes());
        let _ = out.flush();
    }

    fn on_finish(&self) {
        println!();
    }
}

pub struct LogTokenSink;

impl TokenSink for LogTokenSink {
    fn on_token(&self, token: &str) {
        log::trace!(target: "quizgpt::tokens", "{}", token);
    }
}

pub struct NullTokenSink;

impl TokenSink for NullTokenSink {
    fn on_token(&self, _token: &str) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSinkKind {
    Stdout,
    Log,
    None,
}

impl TokenSinkKind {
    pub fn build(self) -> Arc<dyn TokenSink> {
        match self {
            TokenSinkKind::Stdout => Arc::new(StdoutTokenSink),
            TokenSinkKind::Log => Arc::new(LogTokenSink),
            TokenSinkKind::None => Arc::new(NullTokenSink),
        }
    }
}

impl FromStr for TokenSinkKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "stdout" => Ok(TokenSinkKind::Stdout),
            "log" => Ok(TokenSinkKind::Log),
            "none" | "off" => Ok(TokenSinkKind::None),
            other => Err(format!("unknown token sink '{}'", other)),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CompletionChunk {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
}

#[derive(Debug, Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: ChunkDelta,
}

#[derive(Debug, Default, Deserialize)]
struct ChunkDelta {
    #[serde(default)]
    content: Option<String>,
}

/// Chat-completions client for OpenAI-compatible endpoints.
pub struct OpenAiModelService {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: f32,
    streaming: bool,
    sink: Arc<dyn TokenSink>,
}

impl OpenAiModelService {
    pub fn new(config: &Config, sink: Arc<dyn TokenSink>) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(config.openai_api_key.expose_secret().to_string())
            .with_api_base(config.openai_api_base.clone());

        Self {
            client: Client::with_config(openai_config),
            model: config.model.clone(),
            temperature: config.temperature,
            streaming: config.streaming,
            sink,
        }
    }

    fn request_body(&self, request: &GenerationRequest) -> serde_json::Value {
        let mut body = json!({
            "model": self.model,
            "temperature": self.temperature,
            "messages": request.messages,
            "stream": self.streaming,
        });

        if let Some(schema) = &request.response_schema {
            body["response_format"] = json!({
                "type": "json_schema",
                "json_schema": {
                    "name": schema.name,
                    "schema": schema.schema,
                    "strict": true,
                }
            });
        }

        body
    }

    async fn complete(&self, body: serde_json::Value) -> AppResult<String> {
        let response: CompletionResponse = self
            .client
            .chat()
            .create_byot(body)
            .await
            .map_err(service_error)?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                AppError::GenerationServiceError("completion contained no message".to_string())
            })
    }

    async fn complete_streaming(&self, body: serde_json::Value) -> AppResult<String> {
        let stream: Pin<Box<dyn Stream<Item = Result<CompletionChunk, OpenAIError>> + Send>> = self
            .client
            .chat()
            .create_stream_byot(body)
            .await
            .map_err(service_error)?;

        collect_stream(stream, self.sink.as_ref()).await
    }
}

/// Concatenates the content deltas of `stream`, forwarding each one to `sink`
/// as it arrives. A failed chunk ends the stream with an error.
async fn collect_stream<S>(mut stream: S, sink: &dyn TokenSink) -> AppResult<String>
where
    S: Stream<Item = Result<CompletionChunk, OpenAIError>> + Unpin,
{
    let mut text = String::new();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(service_error)?;
        for choice in chunk.choices {
            if let Some(token) = choice.delta.content {
                sink.on_token(&token);
                text.push_str(&token);
            }
        }
    }
    sink.on_finish();

    Ok(text)
}

#[async_trait]
impl TextGenerator for OpenAiModelService {
    async fn generate(&self, request: GenerationRequest) -> AppResult<String> {
        let body = self.request_body(&request);

        let text = if self.streaming {
            self.complete_streaming(body).await?
        } else {
            self.complete(body).await?
        };

        if text.trim().is_empty() {
            return Err(AppError::GenerationServiceError(
                "generation service returned an empty reply".to_string(),
            ));
        }

        log::debug!("Model {} returned {} characters", self.model, text.len());
        Ok(text)
    }
}

fn service_error(err: OpenAIError) -> AppError {
    log::error!("Generation service call failed: {}", err);
    AppError::GenerationServiceError(err.to_string())
}
