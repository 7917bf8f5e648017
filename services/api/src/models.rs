//! API Models
//!
//! Request and response bodies for the HTTP surface, annotated for OpenAPI
//! document generation with `utoipa`.

use followup_core::FollowUpRecommendation;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A survey question paired with the respondent's answer.
#[derive(Deserialize, ToSchema, Debug)]
pub struct FollowUpRequest {
    #[schema(min_length = 1, example = "What did you think of the onboarding process?")]
    pub question: String,
    #[schema(min_length = 1, example = "It was fine.")]
    pub response: String,
}

impl FollowUpRequest {
    /// Returns the name of the first field that is empty, if any.
    pub fn empty_field(&self) -> Option<&'static str> {
        if self.question.is_empty() {
            Some("question")
        } else if self.response.is_empty() {
            Some("response")
        } else {
            None
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
pub struct FollowUpResponse {
    pub should_ask: bool,
    #[schema(example = "What would have made it better?")]
    pub follow_up_question: String,
}

impl From<FollowUpRecommendation> for FollowUpResponse {
    fn from(recommendation: FollowUpRecommendation) -> Self {
        Self {
            should_ask: recommendation.should_ask(),
            follow_up_question: recommendation.follow_up_question().to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug, PartialEq)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub detail: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_followup_request_deserialization() {
        let json = r#"{"question": "Q1", "response": "Because I like it"}"#;
        let payload: FollowUpRequest = serde_json::from_str(json).unwrap();

        assert_eq!(payload.question, "Q1");
        assert_eq!(payload.response, "Because I like it");
        assert_eq!(payload.empty_field(), None);
    }

    #[test]
    fn test_followup_request_missing_field() {
        let result: Result<FollowUpRequest, _> = serde_json::from_str(r#"{"question": "Q1"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_followup_request_empty_field() {
        let payload: FollowUpRequest =
            serde_json::from_str(r#"{"question": "", "response": ""}"#).unwrap();
        assert_eq!(payload.empty_field(), Some("question"));

        let payload: FollowUpRequest =
            serde_json::from_str(r#"{"question": "Q1", "response": ""}"#).unwrap();
        assert_eq!(payload.empty_field(), Some("response"));
    }

    #[test]
    fn test_followup_response_from_recommendation() {
        let rec = FollowUpRecommendation::new(true, "  Why?  ").unwrap();
        let response = FollowUpResponse::from(rec);

        assert_eq!(
            response,
            FollowUpResponse {
                should_ask: true,
                follow_up_question: "Why?".to_string(),
            }
        );
    }

    #[test]
    fn test_health_response_default() {
        let json = serde_json::to_string(&HealthResponse::default()).unwrap();
        assert_eq!(json, r#"{"status":"ok"}"#);
    }

    #[test]
    fn test_error_response_serialization() {
        let error = ErrorResponse {
            detail: "Follow-up agent is unavailable.".to_string(),
        };

        let json = serde_json::to_string(&error).unwrap();
        assert_eq!(json, r#"{"detail":"Follow-up agent is unavailable."}"#);
    }
}
