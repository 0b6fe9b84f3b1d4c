//! Mock backends for testing
//!
//! Provide predictable responses for both hosted models, plus failure
//! switches and call counters so tests can assert that a backend was (or was
//! not) invoked.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::models::{Emotion, EmotionScore};

use super::completion::CompletionBackend;
use super::emotion::EmotionBackend;

/// Mock emotion classifier
///
/// Scores all 28 categories with a keyword heuristic. Clones share the call
/// counter, so a test can keep a handle and assert on invocations after
/// handing a clone to the pipeline.
#[derive(Clone, Default)]
pub struct MockEmotionBackend {
    /// Whether classify should fail with ModelUnavailable
    pub fail: bool,
    calls: Arc<AtomicUsize>,
}

impl MockEmotionBackend {
    /// Create a new mock backend (healthy by default)
    pub fn new() -> Self {
        Self {
            fail: false,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a mock backend whose classify calls always fail
    pub fn failing() -> Self {
        Self {
            fail: true,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of classify calls made so far (shared across clones)
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Keyword-driven category scores for a text
    ///
    /// Every category gets a small floor score; recognized keywords boost
    /// specific categories. Deterministic, so tests can assert exact
    /// primaries.
    pub fn scores_for(text: &str) -> Vec<EmotionScore> {
        let lower = text.to_lowercase();
        let boost = |emotion: Emotion| -> f64 {
            match emotion {
                Emotion::Gratitude if lower.contains("thank") || lower.contains("grateful") => 0.93,
                Emotion::Joy
                    if lower.contains("wonderful")
                        || lower.contains("happy")
                        || lower.contains("joy") =>
                {
                    0.88
                }
                Emotion::Admiration if lower.contains("wonderful") => 0.35,
                Emotion::Sadness
                    if lower.contains("sad") || lower.contains("down") || lower.contains("lonely") =>
                {
                    0.91
                }
                Emotion::Grief if lower.contains("loss") || lower.contains("grief") => 0.64,
                Emotion::Anger if lower.contains("angry") || lower.contains("furious") => 0.9,
                Emotion::Annoyance if lower.contains("angry") || lower.contains("annoy") => 0.45,
                Emotion::Fear
                    if lower.contains("scared")
                        || lower.contains("afraid")
                        || lower.contains("terrified") =>
                {
                    0.88
                }
                Emotion::Nervousness
                    if lower.contains("nervous") || lower.contains("anxious") =>
                {
                    0.82
                }
                _ => 0.0,
            }
        };

        let mut scores: Vec<EmotionScore> = Emotion::ALL
            .iter()
            .map(|&emotion| EmotionScore {
                emotion,
                score: 0.005 + boost(emotion),
            })
            .collect();

        // No keyword hit anywhere: neutral dominates
        if scores.iter().all(|s| s.score < 0.1) {
            for s in &mut scores {
                if s.emotion == Emotion::Neutral {
                    s.score = 0.85;
                }
            }
        }

        scores
    }
}

#[async_trait]
impl EmotionBackend for MockEmotionBackend {
    async fn classify(&self, text: &str) -> Result<Vec<EmotionScore>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(Error::ModelUnavailable(
                "mock emotion backend set to fail".into(),
            ));
        }
        Ok(Self::scores_for(text))
    }

    async fn health_check(&self) -> bool {
        !self.fail
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}

/// Default reply the mock completion backend returns
pub const MOCK_RECOMMENDATION: &str = "- You sound like you are carrying a lot today.\n\
- Take a ten minute walk outside and notice three things you can see.\n\
- Write down one small thing that went well.\n\
- Reach out to someone you trust and tell them how your day went.";

/// Mock completion backend
#[derive(Clone)]
pub struct MockCompletionBackend {
    /// Whether complete should fail with a simulated network error
    pub fail: bool,
    reply: String,
    calls: Arc<AtomicUsize>,
}

impl Default for MockCompletionBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCompletionBackend {
    /// Create a new mock backend returning the default reply
    pub fn new() -> Self {
        Self {
            fail: false,
            reply: MOCK_RECOMMENDATION.to_string(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a mock backend whose complete calls always fail
    pub fn failing() -> Self {
        Self {
            fail: true,
            reply: String::new(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a mock backend with a scripted reply
    pub fn with_reply(reply: &str) -> Self {
        Self {
            fail: false,
            reply: reply.to_string(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of complete calls made so far (shared across clones)
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionBackend for MockCompletionBackend {
    async fn complete(&self, _system: &str, _prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(Error::ModelUnavailable(
                "mock completion backend set to fail".into(),
            ));
        }
        Ok(self.reply.trim().to_string())
    }

    async fn health_check(&self) -> bool {
        !self.fail
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_emotion_keywords() {
        let backend = MockEmotionBackend::new();

        let scores = backend.classify("Thank you for a wonderful day").await.unwrap();
        let top = scores
            .iter()
            .max_by(|a, b| a.score.partial_cmp(&b.score).unwrap())
            .unwrap();
        assert_eq!(top.emotion, Emotion::Gratitude);

        let scores = backend.classify("The meeting is at noon").await.unwrap();
        let top = scores
            .iter()
            .max_by(|a, b| a.score.partial_cmp(&b.score).unwrap())
            .unwrap();
        assert_eq!(top.emotion, Emotion::Neutral);

        assert_eq!(backend.calls(), 2);
    }

    #[tokio::test]
    async fn test_failing_mocks() {
        let emotions = MockEmotionBackend::failing();
        assert!(emotions.classify("anything").await.is_err());
        assert!(!emotions.health_check().await);

        let completions = MockCompletionBackend::failing();
        assert!(completions.complete("s", "p").await.is_err());
        assert_eq!(completions.calls(), 1);
    }

    #[tokio::test]
    async fn test_call_counter_shared_across_clones() {
        let backend = MockEmotionBackend::new();
        let clone = backend.clone();
        clone.classify("hello").await.unwrap();
        assert_eq!(backend.calls(), 1);
    }
}
