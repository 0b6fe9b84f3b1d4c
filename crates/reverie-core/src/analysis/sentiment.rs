//! Lexicon sentiment scoring
//!
//! Two independent lexicon models per text: a VADER analyzer produces the
//! compound score and negative/neutral/positive component weights, and a
//! compact word-valence table produces the polarity/subjectivity pair. The
//! label is a pure function of the compound score.

use regex::Regex;
use vader_sentiment::SentimentIntensityAnalyzer;

use crate::error::{Error, Result};
use crate::models::{SentimentLabel, SentimentScore};

/// Word valence table: (word, polarity, subjectivity)
///
/// Polarity in [-1, 1], subjectivity in [0, 1]. Matched tokens are averaged;
/// a text with no matches scores (0.0, 0.0).
const VALENCE_LEXICON: &[(&str, f64, f64)] = &[
    ("amazing", 0.6, 0.9),
    ("angry", -0.5, 1.0),
    ("anxious", -0.4, 0.9),
    ("awful", -1.0, 1.0),
    ("bad", -0.7, 0.67),
    ("beautiful", 0.85, 1.0),
    ("best", 1.0, 0.3),
    ("better", 0.5, 0.5),
    ("boring", -0.7, 0.9),
    ("broken", -0.4, 0.6),
    ("calm", 0.3, 0.7),
    ("comfortable", 0.45, 0.7),
    ("depressed", -0.7, 0.9),
    ("difficult", -0.5, 1.0),
    ("disappointed", -0.6, 0.8),
    ("dreadful", -1.0, 1.0),
    ("excellent", 1.0, 1.0),
    ("excited", 0.4, 0.75),
    ("exhausted", -0.6, 0.9),
    ("fantastic", 0.9, 0.9),
    ("fine", 0.4, 0.5),
    ("fun", 0.3, 0.2),
    ("glad", 0.5, 1.0),
    ("good", 0.7, 0.6),
    ("grateful", 0.5, 0.8),
    ("great", 0.8, 0.75),
    ("happy", 0.8, 1.0),
    ("hate", -0.8, 0.9),
    ("hopeful", 0.4, 0.7),
    ("horrible", -1.0, 1.0),
    ("hurt", -0.5, 0.7),
    ("joyful", 0.8, 0.9),
    ("lonely", -0.5, 0.8),
    ("love", 0.5, 0.6),
    ("lovely", 0.7, 0.9),
    ("miserable", -1.0, 1.0),
    ("nervous", -0.4, 0.9),
    ("nice", 0.6, 1.0),
    ("painful", -0.7, 0.9),
    ("peaceful", 0.5, 0.8),
    ("perfect", 1.0, 1.0),
    ("proud", 0.6, 0.8),
    ("relaxed", 0.4, 0.7),
    ("sad", -0.5, 1.0),
    ("scared", -0.6, 0.9),
    ("stressful", -0.6, 0.9),
    ("terrible", -1.0, 1.0),
    ("tired", -0.4, 0.75),
    ("unhappy", -0.6, 1.0),
    ("upset", -0.6, 0.9),
    ("wonderful", 1.0, 1.0),
    ("worried", -0.5, 0.8),
    ("worse", -0.5, 0.5),
    ("worst", -1.0, 0.3),
];

/// Lexicon sentiment model wrapper
///
/// Construction parses the embedded lexicon, which is the expensive step;
/// build one at process startup and reuse it. Scoring takes `&self` and is
/// safe to call concurrently.
pub struct SentimentScorer {
    analyzer: SentimentIntensityAnalyzer<'static>,
    word_re: Regex,
}

impl SentimentScorer {
    pub fn new() -> Self {
        Self {
            analyzer: SentimentIntensityAnalyzer::new(),
            word_re: Regex::new(r"[A-Za-z][A-Za-z']*").expect("valid word regex"),
        }
    }

    /// Score one non-empty text
    ///
    /// Never fabricates a score: a missing component from the underlying
    /// model propagates as `ModelUnavailable`.
    pub fn score(&self, text: &str) -> Result<SentimentScore> {
        if text.trim().is_empty() {
            return Err(Error::InvalidData("Cannot score empty text".into()));
        }

        let scores = self.analyzer.polarity_scores(text);
        let component = |key: &str| -> Result<f64> {
            scores.get(key).copied().ok_or_else(|| {
                Error::ModelUnavailable(format!("Sentiment model returned no '{}' component", key))
            })
        };

        let compound = component("compound")?;
        let (polarity, subjectivity) = self.valence(text);

        Ok(SentimentScore {
            label: SentimentLabel::from_compound(compound),
            compound,
            negative: component("neg")?,
            neutral: component("neu")?,
            positive: component("pos")?,
            polarity,
            subjectivity,
        })
    }

    /// Average (polarity, subjectivity) over lexicon hits
    fn valence(&self, text: &str) -> (f64, f64) {
        let mut polarity_sum = 0.0;
        let mut subjectivity_sum = 0.0;
        let mut hits = 0usize;

        for token in self.word_re.find_iter(text) {
            let word = token.as_str().to_lowercase();
            if let Ok(index) = VALENCE_LEXICON.binary_search_by(|(w, _, _)| w.cmp(&word.as_str())) {
                let (_, polarity, subjectivity) = VALENCE_LEXICON[index];
                polarity_sum += polarity;
                subjectivity_sum += subjectivity;
                hits += 1;
            }
        }

        if hits == 0 {
            (0.0, 0.0)
        } else {
            (polarity_sum / hits as f64, subjectivity_sum / hits as f64)
        }
    }
}

impl Default for SentimentScorer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lexicon_is_sorted_for_binary_search() {
        for pair in VALENCE_LEXICON.windows(2) {
            assert!(pair[0].0 < pair[1].0, "{} >= {}", pair[0].0, pair[1].0);
        }
    }

    #[test]
    fn test_positive_text() {
        let scorer = SentimentScorer::new();
        let score = scorer
            .score("I feel wonderful today, thank you everyone!")
            .unwrap();
        assert_eq!(score.label, SentimentLabel::Positive);
        assert!(score.compound >= 0.05);
        assert!(score.polarity > 0.0);
        assert!(score.subjectivity > 0.0);
    }

    #[test]
    fn test_negative_text() {
        let scorer = SentimentScorer::new();
        let score = scorer.score("This was an awful, horrible day.").unwrap();
        assert_eq!(score.label, SentimentLabel::Negative);
        assert!(score.compound <= -0.05);
        assert!(score.polarity < 0.0);
    }

    #[test]
    fn test_neutral_text() {
        let scorer = SentimentScorer::new();
        let score = scorer.score("The sky is blue.").unwrap();
        assert_eq!(score.label, SentimentLabel::Neutral);
        assert_eq!(score.polarity, 0.0);
        assert_eq!(score.subjectivity, 0.0);
    }

    #[test]
    fn test_empty_text_rejected() {
        let scorer = SentimentScorer::new();
        assert!(scorer.score("").is_err());
        assert!(scorer.score("   \n").is_err());
    }

    #[test]
    fn test_label_tracks_compound() {
        // The label must be a pure function of the compound score
        let scorer = SentimentScorer::new();
        for text in [
            "I love this so much, it is great!",
            "I hate everything about this terrible mess.",
            "The report is on the desk.",
        ] {
            let score = scorer.score(text).unwrap();
            assert_eq!(score.label, SentimentLabel::from_compound(score.compound));
        }
    }
}
