//! Self-care recommendation generation
//!
//! Sends the entry text plus its mood and primary emotion to the completion
//! service with a fixed therapist persona. This component never fails: any
//! error (network, quota, malformed response, missing backend) yields a fixed
//! fallback string so entry creation is never blocked on the completion
//! service being up.

use tracing::{debug, warn};

use crate::ai::{CompletionBackend, CompletionClient};
use crate::models::{Emotion, Mood};

/// Returned whenever the completion service cannot produce a recommendation
pub const FALLBACK_RECOMMENDATION: &str =
    "Sorry, we couldn't generate recommendations at this time.";

/// System message sent with every recommendation request
const SYSTEM_PERSONA: &str = "You are an empathetic AI that provides mental health guidance.";

/// Total attempts per request (one capped retry)
const MAX_ATTEMPTS: usize = 2;

/// Recommendation generator over an optional completion backend
pub struct RecommendationGenerator {
    client: Option<CompletionClient>,
}

impl RecommendationGenerator {
    pub fn new(client: Option<CompletionClient>) -> Self {
        Self { client }
    }

    /// The configured backend, if any
    pub fn client(&self) -> Option<&CompletionClient> {
        self.client.as_ref()
    }

    /// Generate advice text for an analyzed entry
    ///
    /// Always returns synchronously-usable text; never an error.
    pub async fn generate(&self, entry_text: &str, mood: Mood, emotion: Emotion) -> String {
        let Some(client) = &self.client else {
            debug!("No completion backend configured, using fallback recommendation");
            return FALLBACK_RECOMMENDATION.to_string();
        };

        let prompt = build_prompt(entry_text, mood, emotion);

        for attempt in 1..=MAX_ATTEMPTS {
            match client.complete(SYSTEM_PERSONA, &prompt).await {
                Ok(text) if !text.is_empty() => return text,
                Ok(_) => {
                    warn!(attempt, "Completion service returned empty recommendation");
                }
                Err(e) => {
                    warn!(attempt, error = %e, "Recommendation generation failed");
                }
            }
        }

        FALLBACK_RECOMMENDATION.to_string()
    }
}

/// Fixed prompt template embedding the entry and its emotional context
fn build_prompt(entry_text: &str, mood: Mood, emotion: Emotion) -> String {
    format!(
        "You are a compassionate AI therapist. A user wrote this diary entry:\n\
         \n\
         \"{}\"\n\
         \n\
         The user's mood is {} and their primary emotion is {}.\n\
         Generate:\n\
         1. A short emotional summary (2-3 sentences).\n\
         2. Three kind, personal, and helpful self-care recommendations.\n\
         \n\
         Format your response with bullet points.",
        entry_text, mood, emotion
    )
}
