//! Entry analysis pipeline
//!
//! `EntryAnalyzer` composes the per-entry analysis: lexicon sentiment,
//! hosted emotion classification with mood bucketing, key-phrase extraction,
//! and an LLM-generated self-care recommendation. The pipeline runs
//! synchronously inside one request; the only ordering constraint is that
//! emotion classification completes before recommendation generation, which
//! needs the mood and primary emotion.
//!
//! Failure contract, per component:
//! - sentiment scoring: fatal, propagates and aborts the analysis
//! - emotion classification: swallowed, degrades to the neutral default
//! - recommendation generation: swallowed inside the generator, which
//!   always returns text

mod keyphrase;
mod recommend;
mod sentiment;

pub use keyphrase::KeyPhraseExtractor;
pub use recommend::{RecommendationGenerator, FALLBACK_RECOMMENDATION};
pub use sentiment::SentimentScorer;

use chrono::Utc;
use tracing::warn;

use crate::ai::{CompletionClient, EmotionBackend, EmotionClient};
use crate::error::{Error, Result};
use crate::models::{AnalysisResult, EmotionAnalysis, SentimentScore};

/// Per-entry analysis pipeline
///
/// Owns the model handles; construct once at process startup and share.
/// All methods take `&self` and are safe for concurrent requests.
pub struct EntryAnalyzer {
    scorer: SentimentScorer,
    emotions: EmotionClient,
    recommender: RecommendationGenerator,
    phrases: KeyPhraseExtractor,
}

impl EntryAnalyzer {
    pub fn new(emotions: EmotionClient, completions: Option<CompletionClient>) -> Self {
        Self {
            scorer: SentimentScorer::new(),
            emotions,
            recommender: RecommendationGenerator::new(completions),
            phrases: KeyPhraseExtractor::new(),
        }
    }

    /// The emotion classifier backend (for health checks)
    pub fn emotions(&self) -> &EmotionClient {
        &self.emotions
    }

    /// The recommendation generator (for interactive feedback)
    pub fn recommender(&self) -> &RecommendationGenerator {
        &self.recommender
    }

    /// Analyze one entry text into a composite result
    pub async fn analyze(&self, text: &str) -> Result<AnalysisResult> {
        if text.trim().is_empty() {
            return Err(Error::InvalidData("Entry content must not be empty".into()));
        }

        let sentiment = self.scorer.score(text)?;
        let emotion = self.classify_or_default(text).await;
        let key_phrases = self.phrases.extract(text);

        // Needs the emotion output, so it runs last
        let recommendation = self
            .recommender
            .generate(text, emotion.mood, emotion.primary_emotion)
            .await;

        Ok(AnalysisResult {
            sentiment,
            emotion,
            key_phrases,
            recommendation,
            analyzed_at: Utc::now(),
        })
    }

    /// Compute only the sentiment and emotion signals for one text
    ///
    /// Used by trend aggregation over historical entries; skips key phrases
    /// and recommendations so no completion calls are made per entry.
    pub async fn analyze_signals(&self, text: &str) -> Result<(SentimentScore, EmotionAnalysis)> {
        if text.trim().is_empty() {
            return Err(Error::InvalidData("Entry content must not be empty".into()));
        }
        let sentiment = self.scorer.score(text)?;
        let emotion = self.classify_or_default(text).await;
        Ok((sentiment, emotion))
    }

    /// Classify emotions, degrading to the neutral default on any failure
    async fn classify_or_default(&self, text: &str) -> EmotionAnalysis {
        match self.emotions.classify(text).await {
            Ok(scores) => EmotionAnalysis::from_scores(scores),
            Err(e) => {
                warn!(error = %e, "Emotion classification failed, using neutral default");
                EmotionAnalysis::neutral_default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{MockCompletionBackend, MockEmotionBackend};
    use crate::models::{Emotion, Mood, SentimentLabel};

    fn analyzer_with(
        emotions: MockEmotionBackend,
        completions: MockCompletionBackend,
    ) -> EntryAnalyzer {
        EntryAnalyzer::new(
            EmotionClient::Mock(emotions),
            Some(CompletionClient::Mock(completions)),
        )
    }

    #[tokio::test]
    async fn test_analyze_positive_entry() {
        let analyzer = analyzer_with(MockEmotionBackend::new(), MockCompletionBackend::new());

        let result = analyzer
            .analyze("I feel wonderful today, thank you everyone!")
            .await
            .unwrap();

        assert_eq!(result.sentiment.label, SentimentLabel::Positive);
        assert_eq!(result.emotion.mood, Mood::Positive);
        assert_eq!(result.emotion.primary_emotion, Emotion::Gratitude);
        assert!(!result.recommendation.is_empty());
        assert!(result.key_phrases.contains(&"wonderful today".to_string()));
    }

    #[tokio::test]
    async fn test_empty_content_rejected_before_any_model_call() {
        let emotions = MockEmotionBackend::new();
        let completions = MockCompletionBackend::new();
        let analyzer = analyzer_with(emotions.clone(), completions.clone());

        assert!(analyzer.analyze("").await.is_err());
        assert!(analyzer.analyze("  \n ").await.is_err());

        assert_eq!(emotions.calls(), 0);
        assert_eq!(completions.calls(), 0);
    }

    #[tokio::test]
    async fn test_classifier_failure_degrades_to_exact_neutral_default() {
        let analyzer = analyzer_with(MockEmotionBackend::failing(), MockCompletionBackend::new());

        let result = analyzer.analyze("A quiet afternoon of reading.").await.unwrap();

        assert_eq!(result.emotion.mood, Mood::Neutral);
        assert!((result.emotion.confidence - 0.5).abs() < f64::EPSILON);
        assert_eq!(result.emotion.primary_emotion, Emotion::Neutral);
        assert!(result.emotion.secondary_emotions.is_empty());
        // Sentiment still computed normally
        assert_eq!(
            result.sentiment.label,
            SentimentLabel::from_compound(result.sentiment.compound)
        );
    }

    #[tokio::test]
    async fn test_completion_failure_still_produces_analysis() {
        let analyzer =
            analyzer_with(MockEmotionBackend::new(), MockCompletionBackend::failing());

        let result = analyzer.analyze("Feeling sad and lonely tonight.").await.unwrap();

        assert_eq!(result.recommendation, FALLBACK_RECOMMENDATION);
        assert_eq!(result.emotion.primary_emotion, Emotion::Sadness);
        assert_eq!(result.emotion.mood, Mood::Negative);
    }

    #[tokio::test]
    async fn test_analyze_signals_skips_completion() {
        let completions = MockCompletionBackend::new();
        let analyzer = analyzer_with(MockEmotionBackend::new(), completions.clone());

        let (sentiment, emotion) = analyzer
            .analyze_signals("Thank you for the lovely dinner.")
            .await
            .unwrap();

        assert_eq!(sentiment.label, SentimentLabel::Positive);
        assert_eq!(emotion.primary_emotion, Emotion::Gratitude);
        assert_eq!(completions.calls(), 0);
    }
}
