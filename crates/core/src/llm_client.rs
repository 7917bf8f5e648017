use async_openai::{
    Client,
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequest, CreateChatCompletionRequestArgs,
        CreateChatCompletionResponse, ResponseFormat, ResponseFormatJsonSchema,
    },
};
use async_trait::async_trait;
use schemars::JsonSchema;
use tracing::debug;

/// Errors surfaced by an [`LLMClient`].
#[derive(Debug, thiserror::Error)]
pub enum LLMError {
    /// The request could not be built, sent, or was rejected by the provider.
    #[error("{0}")]
    Api(#[from] OpenAIError),
    /// The model declined to produce the requested output.
    #[error("model refused the request: {0}")]
    Refusal(String),
    /// The response carried no choices or no message content.
    #[error("LLM response had no content")]
    EmptyResponse,
}

/// A named JSON schema the model output must conform to.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSchema {
    pub name: String,
    pub description: Option<String>,
    pub schema: serde_json::Value,
}

impl OutputSchema {
    /// Derives the schema for `T` in the form strict providers accept: the
    /// `$schema` meta key is dropped and every property is listed as required,
    /// including fields that carry a serde default when decoding.
    pub fn for_type<T: JsonSchema>(name: impl Into<String>, description: Option<String>) -> Self {
        let mut schema = serde_json::Value::from(schemars::schema_for!(T));
        if let Some(object) = schema.as_object_mut() {
            object.remove("$schema");
            let properties: Vec<serde_json::Value> = object
                .get("properties")
                .and_then(|p| p.as_object())
                .map(|p| p.keys().cloned().map(serde_json::Value::String).collect())
                .unwrap_or_default();
            if !properties.is_empty() {
                object.insert("required".to_string(), serde_json::Value::Array(properties));
            }
        }
        Self {
            name: name.into(),
            description,
            schema,
        }
    }
}

/// A single instruction + user message exchange with a structured reply.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredPrompt {
    pub instructions: String,
    pub user_message: String,
    pub output_schema: OutputSchema,
    pub temperature: f32,
}

/// A generic client for interacting with an LLM.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Makes a single, non-streaming call and returns the raw JSON text the
    /// model produced for `prompt.output_schema`.
    async fn complete_structured(&self, prompt: StructuredPrompt) -> Result<String, LLMError>;
}

/// An implementation of `LLMClient` for any OpenAI-compatible API.
pub struct OpenAICompatibleClient {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAICompatibleClient {
    /// Creates a new client for an OpenAI-compatible service.
    ///
    /// # Arguments
    ///
    /// * `config` - The configuration for the OpenAI client, including API key and base URL.
    /// * `model` - The specific model identifier to use for chat completions (e.g., "gpt-4o").
    pub fn new(config: OpenAIConfig, model: String) -> Self {
        Self {
            client: Client::with_config(config),
            model,
        }
    }

    fn build_request(
        &self,
        prompt: StructuredPrompt,
    ) -> Result<CreateChatCompletionRequest, LLMError> {
        let StructuredPrompt {
            instructions,
            user_message,
            output_schema,
            temperature,
        } = prompt;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(vec![
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(instructions)
                    .build()?
                    .into(),
                ChatCompletionRequestUserMessageArgs::default()
                    .content(user_message)
                    .build()?
                    .into(),
            ])
            .temperature(temperature)
            .response_format(ResponseFormat::JsonSchema {
                json_schema: ResponseFormatJsonSchema {
                    description: output_schema.description,
                    name: output_schema.name,
                    schema: Some(output_schema.schema),
                    strict: Some(true),
                },
            })
            .build()?;

        Ok(request)
    }
}

/// Pulls the message text out of the first choice.
fn extract_content(response: CreateChatCompletionResponse) -> Result<String, LLMError> {
    let message = response
        .choices
        .into_iter()
        .next()
        .ok_or(LLMError::EmptyResponse)?
        .message;

    if let Some(refusal) = message.refusal {
        return Err(LLMError::Refusal(refusal));
    }

    message
        .content
        .filter(|content| !content.trim().is_empty())
        .ok_or(LLMError::EmptyResponse)
}

#[async_trait]
impl LLMClient for OpenAICompatibleClient {
    async fn complete_structured(&self, prompt: StructuredPrompt) -> Result<String, LLMError> {
        let request = self.build_request(prompt)?;
        let response = self.client.chat().create(request).await?;
        debug!(model = %self.model, usage = ?response.usage, "LLM call completed");
        extract_content(response)
    }
}
