//! Reverie Core Library
//!
//! Shared functionality for the Reverie AI diary:
//! - Database access and migrations (encrypted SQLite)
//! - Pluggable hosted-model backends (emotion classifier, completion service)
//! - Entry analysis pipeline (sentiment, emotion, mood, key phrases,
//!   self-care recommendations)
//! - Trend aggregation and insight generation over past entries

pub mod ai;
pub mod analysis;
pub mod db;
pub mod error;
pub mod insights;
pub mod models;

/// Test utilities including mock model server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use ai::{
    CompletionBackend, CompletionClient, EmotionBackend, EmotionClient, HostedEmotionBackend,
    MockCompletionBackend, MockEmotionBackend, OpenAICompatibleBackend,
};
pub use analysis::{
    EntryAnalyzer, KeyPhraseExtractor, RecommendationGenerator, SentimentScorer,
    FALLBACK_RECOMMENDATION,
};
pub use db::Database;
pub use error::{Error, Result};
pub use insights::{InsightGenerator, InsightReport, TrendAggregator, TrendSample, TrendSummary};
