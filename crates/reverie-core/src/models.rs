//! Domain models for Reverie

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered diary user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// A new entry submitted by a user, before analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEntry {
    #[serde(default)]
    pub title: String,
    pub content: String,
}

/// A stored diary entry with its analysis
///
/// Entry content is immutable once analyzed; the entry and its analysis are
/// written as a single row so a half-formed entry can never be observed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub content: String,
    pub analysis: AnalysisResult,
    pub created_at: DateTime<Utc>,
}

/// Complete analysis of one entry's text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub sentiment: SentimentScore,
    pub emotion: EmotionAnalysis,
    /// Key terms in source order; duplicates are preserved
    pub key_phrases: Vec<String>,
    pub recommendation: String,
    pub analyzed_at: DateTime<Utc>,
}

/// Lexicon sentiment scores for one text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentScore {
    pub label: SentimentLabel,
    /// Aggregate valence in [-1, 1]
    pub compound: f64,
    pub negative: f64,
    pub neutral: f64,
    pub positive: f64,
    /// Independent lexicon polarity in [-1, 1]
    pub polarity: f64,
    /// Independent lexicon subjectivity in [0, 1]
    pub subjectivity: f64,
}

/// Discrete sentiment label derived from the compound score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

/// Compound score cutoffs for labeling, inclusive on both sides
const POSITIVE_COMPOUND: f64 = 0.05;
const NEGATIVE_COMPOUND: f64 = -0.05;

impl SentimentLabel {
    /// Discretize a compound score: >= 0.05 positive, <= -0.05 negative,
    /// neutral otherwise.
    pub fn from_compound(compound: f64) -> Self {
        if compound >= POSITIVE_COMPOUND {
            SentimentLabel::Positive
        } else if compound <= NEGATIVE_COMPOUND {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "Positive",
            SentimentLabel::Negative => "Negative",
            SentimentLabel::Neutral => "Neutral",
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SentimentLabel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "positive" => Ok(SentimentLabel::Positive),
            "negative" => Ok(SentimentLabel::Negative),
            "neutral" => Ok(SentimentLabel::Neutral),
            _ => Err(format!("Unknown sentiment label: {}", s)),
        }
    }
}

/// Coarse mood bucket derived from the primary emotion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Positive,
    Negative,
    Neutral,
}

impl Mood {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Positive => "positive",
            Mood::Negative => "negative",
            Mood::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Mood {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "positive" => Ok(Mood::Positive),
            "negative" => Ok(Mood::Negative),
            "neutral" => Ok(Mood::Neutral),
            _ => Err(format!("Unknown mood: {}", s)),
        }
    }
}

/// The classifier's fixed emotion category set
///
/// Category order matches the classifier's output indices, so `ALL[n]`
/// resolves a positional `LABEL_<n>` wire label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Admiration,
    Amusement,
    Anger,
    Annoyance,
    Approval,
    Caring,
    Confusion,
    Curiosity,
    Desire,
    Disappointment,
    Disapproval,
    Disgust,
    Embarrassment,
    Excitement,
    Fear,
    Gratitude,
    Grief,
    Joy,
    Love,
    Nervousness,
    Optimism,
    Pride,
    Realization,
    Relief,
    Remorse,
    Sadness,
    Surprise,
    Neutral,
}

impl Emotion {
    /// Every category in the classifier's index order
    pub const ALL: [Emotion; 28] = [
        Emotion::Admiration,
        Emotion::Amusement,
        Emotion::Anger,
        Emotion::Annoyance,
        Emotion::Approval,
        Emotion::Caring,
        Emotion::Confusion,
        Emotion::Curiosity,
        Emotion::Desire,
        Emotion::Disappointment,
        Emotion::Disapproval,
        Emotion::Disgust,
        Emotion::Embarrassment,
        Emotion::Excitement,
        Emotion::Fear,
        Emotion::Gratitude,
        Emotion::Grief,
        Emotion::Joy,
        Emotion::Love,
        Emotion::Nervousness,
        Emotion::Optimism,
        Emotion::Pride,
        Emotion::Realization,
        Emotion::Relief,
        Emotion::Remorse,
        Emotion::Sadness,
        Emotion::Surprise,
        Emotion::Neutral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Admiration => "admiration",
            Emotion::Amusement => "amusement",
            Emotion::Anger => "anger",
            Emotion::Annoyance => "annoyance",
            Emotion::Approval => "approval",
            Emotion::Caring => "caring",
            Emotion::Confusion => "confusion",
            Emotion::Curiosity => "curiosity",
            Emotion::Desire => "desire",
            Emotion::Disappointment => "disappointment",
            Emotion::Disapproval => "disapproval",
            Emotion::Disgust => "disgust",
            Emotion::Embarrassment => "embarrassment",
            Emotion::Excitement => "excitement",
            Emotion::Fear => "fear",
            Emotion::Gratitude => "gratitude",
            Emotion::Grief => "grief",
            Emotion::Joy => "joy",
            Emotion::Love => "love",
            Emotion::Nervousness => "nervousness",
            Emotion::Optimism => "optimism",
            Emotion::Pride => "pride",
            Emotion::Realization => "realization",
            Emotion::Relief => "relief",
            Emotion::Remorse => "remorse",
            Emotion::Sadness => "sadness",
            Emotion::Surprise => "surprise",
            Emotion::Neutral => "neutral",
        }
    }

    /// Resolve a wire label to a category
    ///
    /// Accepts both literal names ("joy") and positional labels ("LABEL_17").
    pub fn from_label(label: &str) -> Option<Emotion> {
        let lower = label.to_lowercase();
        if let Some(index) = lower.strip_prefix("label_") {
            return index
                .parse::<usize>()
                .ok()
                .and_then(|i| Emotion::ALL.get(i).copied());
        }
        Emotion::ALL.iter().copied().find(|e| e.as_str() == lower)
    }

    /// Resolve a wire label, degrading unknown labels to neutral
    pub fn from_label_or_neutral(label: &str) -> Emotion {
        Emotion::from_label(label).unwrap_or(Emotion::Neutral)
    }

    /// Map this emotion to its mood bucket
    ///
    /// The partition is total over the category set: 11 positive emotions,
    /// 12 negative, and the remaining 5 neutral.
    pub fn mood(self) -> Mood {
        match self {
            Emotion::Joy
            | Emotion::Love
            | Emotion::Gratitude
            | Emotion::Excitement
            | Emotion::Pride
            | Emotion::Optimism
            | Emotion::Admiration
            | Emotion::Approval
            | Emotion::Relief
            | Emotion::Amusement
            | Emotion::Caring => Mood::Positive,
            Emotion::Sadness
            | Emotion::Grief
            | Emotion::Anger
            | Emotion::Remorse
            | Emotion::Disappointment
            | Emotion::Disgust
            | Emotion::Fear
            | Emotion::Nervousness
            | Emotion::Embarrassment
            | Emotion::Annoyance
            | Emotion::Confusion
            | Emotion::Disapproval => Mood::Negative,
            Emotion::Curiosity
            | Emotion::Desire
            | Emotion::Realization
            | Emotion::Surprise
            | Emotion::Neutral => Mood::Neutral,
        }
    }
}

impl std::fmt::Display for Emotion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One scored emotion category from the classifier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmotionScore {
    pub emotion: Emotion,
    pub score: f64,
}

/// Confidence the classifier reports when it could not run
const DEGRADED_CONFIDENCE: f64 = 0.5;

/// How many top categories are reported as secondary emotions
const SECONDARY_EMOTION_LIMIT: usize = 3;

/// Emotion classification digest for one entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmotionAnalysis {
    pub mood: Mood,
    pub confidence: f64,
    pub primary_emotion: Emotion,
    /// Top categories (primary included), highest score first; ties keep
    /// the classifier's category order
    pub secondary_emotions: Vec<EmotionScore>,
}

impl EmotionAnalysis {
    /// Build the digest from a full category score distribution
    ///
    /// An empty distribution degrades to the neutral default.
    pub fn from_scores(mut scores: Vec<EmotionScore>) -> Self {
        // Stable sort: equal scores keep the classifier's original order
        scores.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

        let Some(top) = scores.first().copied() else {
            return Self::neutral_default();
        };

        scores.truncate(SECONDARY_EMOTION_LIMIT);

        Self {
            mood: top.emotion.mood(),
            confidence: top.score,
            primary_emotion: top.emotion,
            secondary_emotions: scores,
        }
    }

    /// The documented degraded result used when classification fails
    pub fn neutral_default() -> Self {
        Self {
            mood: Mood::Neutral,
            confidence: DEGRADED_CONFIDENCE,
            primary_emotion: Emotion::Neutral,
            secondary_emotions: Vec::new(),
        }
    }
}
