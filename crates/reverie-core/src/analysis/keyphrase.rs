//! Lightweight key-phrase extraction
//!
//! Groups consecutive content words (stopwords and short tokens pruned) into
//! phrases of up to three words, in source order. No deduplication and no
//! ranking; repeated phrases appear repeatedly.

use regex::Regex;
use std::collections::HashSet;

/// Maximum words per extracted phrase
const MAX_PHRASE_WORDS: usize = 3;

/// Minimum token length to count as a content word
const MIN_WORD_LEN: usize = 3;

/// A phrase must contain at least one word this long
const MIN_ANCHOR_LEN: usize = 4;

/// Function words and diary filler that never anchor a phrase
const STOPWORDS: &[&str] = &[
    "about", "after", "again", "all", "also", "and", "another", "any", "are", "back", "because",
    "been", "before", "being", "but", "can", "could", "day", "did", "does", "doing", "done",
    "down", "each", "even", "ever", "every", "everyone", "everything", "feel", "feeling", "felt",
    "few", "for", "from", "get", "going", "got", "had", "has", "have", "her", "here", "him",
    "his", "how", "into", "its", "just", "like", "made", "make", "many", "more", "most", "much",
    "not", "now", "off", "only", "onto", "other", "our", "out", "over", "own", "quite", "really",
    "she", "should", "some", "something", "somewhat", "still", "such", "than", "that", "the",
    "their", "them", "then", "there", "these", "they", "thing", "things", "this", "those",
    "thank", "thanks", "too", "very", "was", "were", "what", "when", "where", "which", "while",
    "who", "why", "will", "with", "would", "you", "your",
];

/// Key-phrase extractor with precompiled token pattern
pub struct KeyPhraseExtractor {
    word_re: Regex,
    stopwords: HashSet<&'static str>,
}

impl KeyPhraseExtractor {
    pub fn new() -> Self {
        Self {
            word_re: Regex::new(r"[A-Za-z][A-Za-z']*").expect("valid word regex"),
            stopwords: STOPWORDS.iter().copied().collect(),
        }
    }

    /// Extract phrases in source order, duplicates preserved
    pub fn extract(&self, text: &str) -> Vec<String> {
        let mut phrases = Vec::new();

        // Punctuation bounds a phrase the same way a stopword does
        for segment in text.split(|c: char| ".,;:!?()\n\"".contains(c)) {
            let mut chunk: Vec<String> = Vec::new();

            for token in self.word_re.find_iter(segment) {
                let word = token.as_str().to_lowercase();
                let is_content =
                    word.len() >= MIN_WORD_LEN && !self.stopwords.contains(word.as_str());

                if is_content {
                    chunk.push(word);
                    if chunk.len() == MAX_PHRASE_WORDS {
                        Self::flush(&mut chunk, &mut phrases);
                    }
                } else {
                    Self::flush(&mut chunk, &mut phrases);
                }
            }
            Self::flush(&mut chunk, &mut phrases);
        }

        phrases
    }

    fn flush(chunk: &mut Vec<String>, phrases: &mut Vec<String>) {
        if !chunk.is_empty() && chunk.iter().any(|w| w.len() >= MIN_ANCHOR_LEN) {
            phrases.push(chunk.join(" "));
        }
        chunk.clear();
    }
}

impl Default for KeyPhraseExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_content_chunks_in_order() {
        let extractor = KeyPhraseExtractor::new();
        let phrases = extractor.extract(
            "Work was stressful. My manager scheduled another deadline meeting about the quarterly report.",
        );
        assert_eq!(
            phrases,
            vec![
                "work",
                "stressful",
                "manager scheduled",
                "deadline meeting",
                "quarterly report"
            ]
        );
    }

    #[test]
    fn test_duplicates_are_preserved() {
        let extractor = KeyPhraseExtractor::new();
        let phrases = extractor.extract("Rain again. Rain again.");
        assert_eq!(phrases, vec!["rain", "rain"]);
    }

    #[test]
    fn test_stopword_only_text_yields_nothing() {
        let extractor = KeyPhraseExtractor::new();
        assert!(extractor.extract("I was there with them again.").is_empty());
        assert!(extractor.extract("").is_empty());
    }

    #[test]
    fn test_phrases_capped_at_three_words() {
        let extractor = KeyPhraseExtractor::new();
        let phrases = extractor.extract("bright orange autumn maple leaves");
        assert!(phrases.iter().all(|p| p.split(' ').count() <= 3));
        assert_eq!(phrases[0], "bright orange autumn");
    }
}
