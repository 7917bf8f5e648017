use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Returned when a recommendation asks for a follow-up but carries no question.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("follow_up_question must be provided when should_ask is true.")]
pub struct RecommendationError;

/// The validated outcome of a follow-up decision.
///
/// Values can only be built through [`FollowUpRecommendation::new`], which
/// binds the two fields together: when `should_ask` is false the question is
/// always empty, and when it is true the question is trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FollowUpRecommendation {
    should_ask: bool,
    follow_up_question: String,
}

impl FollowUpRecommendation {
    /// Normalizes or rejects a `(should_ask, follow_up_question)` pair.
    ///
    /// Any text supplied alongside `should_ask = false` is discarded.
    pub fn new(
        should_ask: bool,
        follow_up_question: impl Into<String>,
    ) -> Result<Self, RecommendationError> {
        if !should_ask {
            return Ok(Self::no_follow_up());
        }

        let question = follow_up_question.into();
        let cleaned = question.trim();
        if cleaned.is_empty() {
            return Err(RecommendationError);
        }

        Ok(Self {
            should_ask: true,
            follow_up_question: cleaned.to_string(),
        })
    }

    /// A recommendation that no follow-up is needed.
    pub fn no_follow_up() -> Self {
        Self {
            should_ask: false,
            follow_up_question: String::new(),
        }
    }

    pub fn should_ask(&self) -> bool {
        self.should_ask
    }

    pub fn follow_up_question(&self) -> &str {
        &self.follow_up_question
    }
}

/// The structured output the model is asked to produce.
///
/// Unknown fields are rejected. A missing `follow_up_question` decodes as
/// empty; the schema sent to the provider still lists it as required.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct RecommendationOutput {
    /// Whether a follow-up question should be asked.
    pub should_ask: bool,
    /// The follow-up question text (empty when none is required).
    #[serde(default)]
    pub follow_up_question: String,
}

impl TryFrom<RecommendationOutput> for FollowUpRecommendation {
    type Error = RecommendationError;

    fn try_from(output: RecommendationOutput) -> Result<Self, Self::Error> {
        Self::new(output.should_ask, output.follow_up_question)
    }
}
