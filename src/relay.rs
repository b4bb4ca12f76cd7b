use async_openai::config::OpenAIConfig;
use async_openai::error::OpenAIError;
use async_openai::types::{
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequest, CreateChatCompletionRequestArgs,
};
use async_openai::Client;
use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

const COMPLETION_MODEL: &str = "gpt-4o-mini";
const MAX_COMPLETION_TOKENS: u32 = 512;

/// A relay failure. The two variants must stay distinct: `Api` means the
/// completion service answered with a structured error payload, `Transport`
/// means the call itself never produced an answer.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("completion API returned an error: {0}")]
    Api(String),

    #[error("completion request failed: {0}")]
    Transport(String),
}

/// Outbound seam to the external text-completion service. One best-effort
/// call per invocation; no retry, no timeout policy.
#[async_trait]
pub trait Relay: Send + Sync {
    async fn complete(&self, instruction: &str, message: &str) -> Result<String, RelayError>;
}

/// Relay backed by an OpenAI-compatible completion API.
pub struct OpenAiRelay {
    client: Client<OpenAIConfig>,
}

impl OpenAiRelay {
    pub fn new(api_key: &str, api_base: Option<&str>) -> Self {
        let mut config = OpenAIConfig::new().with_api_key(api_key);
        if let Some(api_base) = api_base {
            config = config.with_api_base(api_base);
        }

        Self {
            client: Client::with_config(config),
        }
    }
}

/// Builds the two-turn instruction/user exchange sent on every relay call.
fn completion_request(
    instruction: &str,
    message: &str,
) -> Result<CreateChatCompletionRequest, OpenAIError> {
    CreateChatCompletionRequestArgs::default()
        .model(COMPLETION_MODEL)
        .max_tokens(MAX_COMPLETION_TOKENS)
        .messages([
            ChatCompletionRequestSystemMessageArgs::default()
                .content(instruction)
                .build()?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(message)
                .build()?
                .into(),
        ])
        .build()
}

fn map_openai_error(err: OpenAIError) -> RelayError {
    match err {
        OpenAIError::ApiError(api_error) => RelayError::Api(api_error.message),
        other => RelayError::Transport(other.to_string()),
    }
}

#[async_trait]
impl Relay for OpenAiRelay {
    async fn complete(&self, instruction: &str, message: &str) -> Result<String, RelayError> {
        let request = completion_request(instruction, message).map_err(map_openai_error)?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(map_openai_error)?;

        debug!("completion returned {} choice(s)", response.choices.len());

        response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| RelayError::Api("completion response contained no content".to_string()))
    }
}
