pub mod followup;
pub mod llm_client;
pub mod recommendation;

pub use followup::{FollowUpError, FollowUpErrorKind, FollowUpService, LLMFollowUpService};
pub use recommendation::{FollowUpRecommendation, RecommendationError};
