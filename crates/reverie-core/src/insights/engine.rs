//! Trend aggregation and insight rules
//!
//! `TrendAggregator` re-analyzes each historical entry's raw content through
//! the sentiment and emotion models (no recommendation or key-phrase work)
//! and fits a least-squares line per signal. `InsightGenerator` applies fixed
//! threshold rules over the summary and the latest stored analysis.

use tracing::debug;

use crate::analysis::EntryAnalyzer;
use crate::error::Result;
use crate::models::AnalysisResult;

use super::types::{InsightReport, TrendSample, TrendSummary};

/// Sentiment slope above which the mood counts as improving
const IMPROVING_TREND: f64 = 0.1;

/// Sentiment slope below which the mood counts as declining
const DECLINING_TREND: f64 = -0.1;

/// Emotion confidence above which an emotion counts as strong
const STRONG_EMOTION_CONFIDENCE: f64 = 0.8;

/// How many key phrases the focus observation lists
const FOCUS_PHRASE_LIMIT: usize = 3;

/// Fits mood trends over a chronologically ordered entry history
pub struct TrendAggregator<'a> {
    analyzer: &'a EntryAnalyzer,
}

impl<'a> TrendAggregator<'a> {
    pub fn new(analyzer: &'a EntryAnalyzer) -> Self {
        Self { analyzer }
    }

    /// Summarize mood direction over samples ordered oldest-first
    ///
    /// Returns `Ok(None)` for an empty history; a single sample yields
    /// degenerate slopes of 0.0.
    pub async fn summarize(&self, samples: &[TrendSample]) -> Result<Option<TrendSummary>> {
        if samples.is_empty() {
            return Ok(None);
        }

        let mut polarities = Vec::with_capacity(samples.len());
        let mut confidences = Vec::with_capacity(samples.len());

        for sample in samples {
            let (sentiment, emotion) = self.analyzer.analyze_signals(&sample.content).await?;
            polarities.push(sentiment.polarity);
            confidences.push(emotion.confidence);
        }

        let period_start = samples.iter().map(|s| s.recorded_at).min().unwrap_or_default();
        let period_end = samples.iter().map(|s| s.recorded_at).max().unwrap_or_default();

        let summary = TrendSummary {
            sentiment_trend: linear_slope(&polarities),
            emotion_trend: linear_slope(&confidences),
            average_sentiment: mean(&polarities),
            average_emotion: mean(&confidences),
            period_start,
            period_end,
        };

        debug!(
            entries = samples.len(),
            sentiment_trend = summary.sentiment_trend,
            emotion_trend = summary.emotion_trend,
            "Trend summary computed"
        );

        Ok(Some(summary))
    }
}

/// Ordinary least-squares slope of values against their index
///
/// Fewer than two points is a degenerate fit and reports 0.0.
fn linear_slope(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }

    let n_f = n as f64;
    let sum_x: f64 = (0..n).map(|i| i as f64).sum();
    let sum_y: f64 = values.iter().sum();
    let sum_xy: f64 = values.iter().enumerate().map(|(i, y)| i as f64 * y).sum();
    let sum_xx: f64 = (0..n).map(|i| (i * i) as f64).sum();

    let denominator = n_f * sum_xx - sum_x * sum_x;
    if denominator == 0.0 {
        return 0.0;
    }
    (n_f * sum_xy - sum_x * sum_y) / denominator
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Applies fixed observation rules over a trend summary and latest analysis
pub struct InsightGenerator;

impl InsightGenerator {
    /// Observation strings in rule order; may be empty
    pub fn observations(trend: &TrendSummary, latest: &AnalysisResult) -> Vec<String> {
        let mut insights = Vec::new();

        if trend.sentiment_trend > IMPROVING_TREND {
            insights.push("Your overall mood has been improving recently.".to_string());
        } else if trend.sentiment_trend < DECLINING_TREND {
            insights.push("You've been feeling more down lately.".to_string());
        }

        if latest.emotion.confidence > STRONG_EMOTION_CONFIDENCE {
            insights.push(format!(
                "You're experiencing strong {} emotions.",
                latest.emotion.primary_emotion
            ));
        }

        if !latest.key_phrases.is_empty() {
            let focus: Vec<&str> = latest
                .key_phrases
                .iter()
                .take(FOCUS_PHRASE_LIMIT)
                .map(String::as_str)
                .collect();
            insights.push(format!("Recent entries focus on: {}", focus.join(", ")));
        }

        insights
    }

    /// Assemble the full payload, re-surfacing trend and latest analysis
    pub fn report(trend: TrendSummary, latest: AnalysisResult) -> InsightReport {
        let insights = Self::observations(&trend, &latest);
        InsightReport {
            insights,
            trend,
            latest_analysis: latest,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::ai::{CompletionClient, EmotionClient, MockCompletionBackend, MockEmotionBackend};
    use crate::models::{
        EmotionAnalysis, EmotionScore, Emotion, Mood, SentimentLabel, SentimentScore,
    };

    fn test_analyzer() -> EntryAnalyzer {
        EntryAnalyzer::new(
            EmotionClient::Mock(MockEmotionBackend::new()),
            Some(CompletionClient::Mock(MockCompletionBackend::new())),
        )
    }

    fn samples(contents: &[&str]) -> Vec<TrendSample> {
        let start = Utc::now() - Duration::days(contents.len() as i64);
        contents
            .iter()
            .enumerate()
            .map(|(i, content)| TrendSample {
                content: content.to_string(),
                recorded_at: start + Duration::days(i as i64),
            })
            .collect()
    }

    fn analysis(confidence: f64, key_phrases: Vec<&str>) -> AnalysisResult {
        AnalysisResult {
            sentiment: SentimentScore {
                label: SentimentLabel::Neutral,
                compound: 0.0,
                negative: 0.0,
                neutral: 1.0,
                positive: 0.0,
                polarity: 0.0,
                subjectivity: 0.0,
            },
            emotion: EmotionAnalysis {
                mood: Mood::Positive,
                confidence,
                primary_emotion: Emotion::Joy,
                secondary_emotions: vec![EmotionScore {
                    emotion: Emotion::Joy,
                    score: confidence,
                }],
            },
            key_phrases: key_phrases.into_iter().map(String::from).collect(),
            recommendation: "rest".to_string(),
            analyzed_at: Utc::now(),
        }
    }

    fn trend(sentiment_trend: f64) -> TrendSummary {
        TrendSummary {
            sentiment_trend,
            emotion_trend: 0.0,
            average_sentiment: 0.0,
            average_emotion: 0.5,
            period_start: Utc::now(),
            period_end: Utc::now(),
        }
    }

    #[test]
    fn test_linear_slope_basics() {
        assert_eq!(linear_slope(&[]), 0.0);
        assert_eq!(linear_slope(&[0.3]), 0.0);
        // Strictly increasing polarity over three points: slope is the step
        let slope = linear_slope(&[-0.5, 0.0, 0.5]);
        assert!((slope - 0.5).abs() < 1e-9);
        assert!(linear_slope(&[0.5, 0.0, -0.5]) < 0.0);
        assert_eq!(linear_slope(&[0.2, 0.2, 0.2]), 0.0);
    }

    #[tokio::test]
    async fn test_empty_history_is_no_data() {
        let analyzer = test_analyzer();
        let aggregator = TrendAggregator::new(&analyzer);
        assert!(aggregator.summarize(&[]).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_single_entry_has_zero_slopes() {
        let analyzer = test_analyzer();
        let aggregator = TrendAggregator::new(&analyzer);
        let summary = aggregator
            .summarize(&samples(&["One quiet day."]))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(summary.sentiment_trend, 0.0);
        assert_eq!(summary.emotion_trend, 0.0);
        assert_eq!(summary.period_start, summary.period_end);
    }

    #[tokio::test]
    async fn test_improving_history_has_positive_sentiment_trend() {
        let analyzer = test_analyzer();
        let aggregator = TrendAggregator::new(&analyzer);
        let history = samples(&[
            "An awful, horrible, miserable day.",
            "The sky is blue.",
            "A wonderful, happy, lovely day.",
        ]);
        let summary = aggregator.summarize(&history).await.unwrap().unwrap();
        assert!(summary.sentiment_trend > 0.0);
        assert!(summary.period_start < summary.period_end);
    }

    #[test]
    fn test_improving_and_declining_observations() {
        let latest = analysis(0.5, vec![]);

        let improving = InsightGenerator::observations(&trend(0.2), &latest);
        assert!(improving.iter().any(|i| i.contains("improving")));

        let declining = InsightGenerator::observations(&trend(-0.2), &latest);
        assert!(declining.iter().any(|i| i.contains("more down")));

        let flat = InsightGenerator::observations(&trend(0.0), &latest);
        assert!(!flat.iter().any(|i| i.contains("improving") || i.contains("more down")));
    }

    #[test]
    fn test_strong_emotion_observation_names_the_label() {
        let strong = InsightGenerator::observations(&trend(0.0), &analysis(0.9, vec![]));
        assert!(strong.iter().any(|i| i.contains("strong joy emotions")));

        let weak = InsightGenerator::observations(&trend(0.0), &analysis(0.8, vec![]));
        assert!(weak.is_empty());
    }

    #[test]
    fn test_focus_observation_lists_first_three_phrases() {
        let latest = analysis(0.5, vec!["garden", "morning run", "work", "dinner"]);
        let insights = InsightGenerator::observations(&trend(0.0), &latest);
        assert_eq!(
            insights,
            vec!["Recent entries focus on: garden, morning run, work"]
        );
    }

    #[test]
    fn test_no_rules_matched_yields_empty_insights() {
        let insights = InsightGenerator::observations(&trend(0.05), &analysis(0.4, vec![]));
        assert!(insights.is_empty());
    }

    #[test]
    fn test_report_resurfaces_inputs_unchanged() {
        let latest = analysis(0.9, vec!["garden"]);
        let summary = trend(0.3);
        let report = InsightGenerator::report(summary.clone(), latest.clone());
        assert_eq!(report.trend.sentiment_trend, summary.sentiment_trend);
        assert_eq!(report.latest_analysis.key_phrases, latest.key_phrases);
        assert!(!report.insights.is_empty());
    }
}
