//! Core types for trend aggregation and insights

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::AnalysisResult;

/// One historical entry's raw material for trend aggregation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendSample {
    pub content: String,
    pub recorded_at: DateTime<Utc>,
}

/// Mood direction over a user's entry history
///
/// Trends are least-squares slopes against chronological entry index, not
/// elapsed time. Always computed fresh; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendSummary {
    /// Slope of sentiment polarity over entries
    pub sentiment_trend: f64,
    /// Slope of emotion confidence over entries
    pub emotion_trend: f64,
    pub average_sentiment: f64,
    pub average_emotion: f64,
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
}

/// Insights payload returned to the caller
///
/// Re-surfaces the trend summary and the latest analysis unchanged alongside
/// the generated observations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightReport {
    pub insights: Vec<String>,
    pub trend: TrendSummary,
    pub latest_analysis: AnalysisResult,
}
