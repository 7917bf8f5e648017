//! Follow-up Decision Service
//!
//! This module decides whether a survey answer warrants a clarifying follow-up
//! question. The judgment itself is delegated to an LLM; this layer owns the
//! prompt, the structured output contract and the error classification.

use crate::{
    llm_client::{LLMClient, LLMError, OutputSchema, StructuredPrompt},
    recommendation::{FollowUpRecommendation, RecommendationError, RecommendationOutput},
};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Sampling temperature used for follow-up decisions.
pub const DEFAULT_TEMPERATURE: f32 = 0.2;

/// Name under which the output schema is registered with the provider.
pub const OUTPUT_SCHEMA_NAME: &str = "follow_up_recommendation";

/// Fixed instruction preamble sent as the system message.
pub const INSTRUCTIONS: &str = "\
You are a professional survey assistant tasked with judging whether a follow-up question is needed.
Consider the original survey question and the respondent's answer.

- Return `should_ask = true` when you need more detail to understand the answer.
  Include a concise follow_up_question that invites elaboration.
- Return `should_ask = false` when the answer is already specific enough or a follow up question would not make sense.
  Set follow_up_question to an empty string when no follow up is required.

Avoid repeating the original question verbatim and keep follow-up questions single-sentence and neutral.";

/// The two classes of failure a caller of [`FollowUpService::decide`] must handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowUpErrorKind {
    InvalidInput,
    Backend,
}

#[derive(Debug, thiserror::Error)]
pub enum FollowUpError {
    #[error("Both question and response must be provided.")]
    MissingInput,
    #[error(transparent)]
    InvalidRecommendation(#[from] RecommendationError),
    #[error("Follow-up agent failed: {0}")]
    Backend(#[from] LLMError),
    #[error("Follow-up agent encountered an unexpected error: {0}")]
    MalformedOutput(#[from] serde_json::Error),
}

impl FollowUpError {
    pub fn kind(&self) -> FollowUpErrorKind {
        match self {
            FollowUpError::MissingInput | FollowUpError::InvalidRecommendation(_) => {
                FollowUpErrorKind::InvalidInput
            }
            FollowUpError::Backend(_) | FollowUpError::MalformedOutput(_) => {
                FollowUpErrorKind::Backend
            }
        }
    }
}

/// Defines the contract for any service that can make follow-up decisions.
#[async_trait]
pub trait FollowUpService: Send + Sync {
    /// Decides whether `response` to `question` needs a follow-up question.
    ///
    /// Both strings must be non-empty.
    async fn decide(
        &self,
        question: &str,
        response: &str,
    ) -> Result<FollowUpRecommendation, FollowUpError>;
}

/// Builds the user message embedding both strings verbatim.
pub fn build_prompt(question: &str, response: &str) -> String {
    format!(
        "Survey question: {question}\nRespondent answer: {response}\n\nProvide your recommendation."
    )
}

/// An implementation of `FollowUpService` backed by an [`LLMClient`].
pub struct LLMFollowUpService {
    client: Arc<dyn LLMClient>,
    output_schema: OutputSchema,
    temperature: f32,
}

impl LLMFollowUpService {
    pub fn new(client: Arc<dyn LLMClient>) -> Self {
        Self {
            client,
            output_schema: OutputSchema::for_type::<RecommendationOutput>(
                OUTPUT_SCHEMA_NAME,
                Some("Whether to ask a follow-up question, and its text.".to_string()),
            ),
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

#[async_trait]
impl FollowUpService for LLMFollowUpService {
    #[instrument(name = "followup_decide", skip_all)]
    async fn decide(
        &self,
        question: &str,
        response: &str,
    ) -> Result<FollowUpRecommendation, FollowUpError> {
        if question.is_empty() || response.is_empty() {
            return Err(FollowUpError::MissingInput);
        }

        let prompt = StructuredPrompt {
            instructions: INSTRUCTIONS.to_string(),
            user_message: build_prompt(question, response),
            output_schema: self.output_schema.clone(),
            temperature: self.temperature,
        };

        let raw = self.client.complete_structured(prompt).await?;
        let output: RecommendationOutput = serde_json::from_str(&raw)?;

        if !output.should_ask && !output.follow_up_question.trim().is_empty() {
            debug!(
                discarded = %output.follow_up_question,
                "Model supplied a question with should_ask=false; discarding it"
            );
        }

        let recommendation = FollowUpRecommendation::try_from(output)?;
        info!(
            should_ask = recommendation.should_ask(),
            "Follow-up decision made"
        );
        Ok(recommendation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::MockLLMClient;
    use async_openai::error::OpenAIError;

    fn service_returning(raw: &'static str) -> LLMFollowUpService {
        let mut client = MockLLMClient::new();
        client
            .expect_complete_structured()
            .times(1)
            .returning(move |_| Ok(raw.to_string()));
        LLMFollowUpService::new(Arc::new(client))
    }

    #[test]
    fn test_build_prompt_embeds_inputs_verbatim() {
        let prompt = build_prompt("  Q1 ", "Because\nI like it");
        assert_eq!(
            prompt,
            "Survey question:   Q1 \nRespondent answer: Because\nI like it\n\nProvide your recommendation."
        );
    }

    #[tokio::test]
    async fn test_decide_sends_expected_prompt() {
        let mut client = MockLLMClient::new();
        client
            .expect_complete_structured()
            .withf(|prompt| {
                prompt.instructions == INSTRUCTIONS
                    && prompt.user_message.contains("Survey question: How was your stay?")
                    && prompt.user_message.contains("Respondent answer: Fine")
                    && prompt.temperature == DEFAULT_TEMPERATURE
                    && prompt.output_schema.name == OUTPUT_SCHEMA_NAME
            })
            .times(1)
            .returning(|_| {
                Ok(r#"{"should_ask": true, "follow_up_question": "What made it fine?"}"#.to_string())
            });

        let service = LLMFollowUpService::new(Arc::new(client));
        let rec = service.decide("How was your stay?", "Fine").await.unwrap();

        assert!(rec.should_ask());
        assert_eq!(rec.follow_up_question(), "What made it fine?");
    }

    #[tokio::test]
    async fn test_decide_rejects_empty_inputs_without_calling_backend() {
        let mut client = MockLLMClient::new();
        client.expect_complete_structured().never();
        let service = LLMFollowUpService::new(Arc::new(client));

        for (question, response) in [("", "answer"), ("question", ""), ("", "")] {
            let err = service.decide(question, response).await.unwrap_err();
            assert!(matches!(err, FollowUpError::MissingInput));
            assert_eq!(err.kind(), FollowUpErrorKind::InvalidInput);
            assert_eq!(err.to_string(), "Both question and response must be provided.");
        }
    }

    #[tokio::test]
    async fn test_decide_normalizes_question_when_not_needed() {
        let service =
            service_returning(r#"{"should_ask": false, "follow_up_question": "  ignore me  "}"#);
        let rec = service.decide("Q1", "No comment").await.unwrap();
        assert_eq!(rec, FollowUpRecommendation::no_follow_up());
    }

    #[tokio::test]
    async fn test_decide_accepts_output_without_question() {
        let service = service_returning(r#"{"should_ask": false}"#);
        let rec = service.decide("Q1", "No comment").await.unwrap();
        assert_eq!(rec, FollowUpRecommendation::no_follow_up());
    }

    #[tokio::test]
    async fn test_decide_trims_question() {
        let service =
            service_returning(r#"{"should_ask": true, "follow_up_question": "  Why so?  "}"#);
        let rec = service.decide("Q1", "Because").await.unwrap();
        assert_eq!(rec.follow_up_question(), "Why so?");
    }

    #[tokio::test]
    async fn test_decide_blank_question_is_invalid_input() {
        let service = service_returning(r#"{"should_ask": true, "follow_up_question": "   "}"#);
        let err = service.decide("Q1", "Because").await.unwrap_err();
        assert!(matches!(err, FollowUpError::InvalidRecommendation(_)));
        assert_eq!(err.kind(), FollowUpErrorKind::InvalidInput);
        assert!(err.to_string().contains("must be provided"));
    }

    #[tokio::test]
    async fn test_decide_malformed_output_is_backend_failure() {
        let service = service_returning("definitely not json");
        let err = service.decide("Q1", "Because").await.unwrap_err();
        assert!(matches!(err, FollowUpError::MalformedOutput(_)));
        assert_eq!(err.kind(), FollowUpErrorKind::Backend);
    }

    #[tokio::test]
    async fn test_decide_backend_error_is_wrapped() {
        let mut client = MockLLMClient::new();
        client
            .expect_complete_structured()
            .times(1)
            .returning(|_| Err(LLMError::Api(OpenAIError::InvalidArgument("bad model".into()))));
        let service = LLMFollowUpService::new(Arc::new(client));

        let err = service.decide("Q1", "Because").await.unwrap_err();
        assert_eq!(err.kind(), FollowUpErrorKind::Backend);
        assert!(err.to_string().starts_with("Follow-up agent failed:"));
        assert!(err.to_string().contains("bad model"));
    }

    #[tokio::test]
    async fn test_with_temperature_overrides_default() {
        let mut client = MockLLMClient::new();
        client
            .expect_complete_structured()
            .withf(|prompt| prompt.temperature == 0.7)
            .times(1)
            .returning(|_| Ok(r#"{"should_ask": false, "follow_up_question": ""}"#.to_string()));
        let service = LLMFollowUpService::new(Arc::new(client)).with_temperature(0.7);

        let rec = service.decide("Q1", "Because").await.unwrap();
        assert!(!rec.should_ask());
    }
}
