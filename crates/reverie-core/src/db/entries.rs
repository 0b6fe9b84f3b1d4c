//! Diary entry operations
//!
//! Entries and their analysis are written as one row; there is no separate
//! analysis table and no update path. All reads and deletes are scoped by
//! user id so one user can never observe another's entries.

use std::str::FromStr;

use rusqlite::{params, OptionalExtension, Row};

use super::{parse_datetime, Database};
use crate::error::Result;
use crate::models::{
    AnalysisResult, Emotion, EmotionAnalysis, EmotionScore, Entry, Mood, NewEntry, SentimentLabel,
    SentimentScore,
};

fn json_column_error(index: usize, err: serde_json::Error) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(index, rusqlite::types::Type::Text, Box::new(err))
}

fn row_to_entry(row: &Row<'_>) -> rusqlite::Result<Entry> {
    let secondary_json: String = row.get(14)?;
    let secondary: Vec<EmotionScore> =
        serde_json::from_str(&secondary_json).map_err(|e| json_column_error(14, e))?;
    let phrases_json: String = row.get(15)?;
    let key_phrases: Vec<String> =
        serde_json::from_str(&phrases_json).map_err(|e| json_column_error(15, e))?;

    Ok(Entry {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        content: row.get(3)?,
        analysis: AnalysisResult {
            sentiment: SentimentScore {
                label: SentimentLabel::from_str(&row.get::<_, String>(4)?)
                    .unwrap_or(SentimentLabel::Neutral),
                compound: row.get(5)?,
                negative: row.get(6)?,
                neutral: row.get(7)?,
                positive: row.get(8)?,
                polarity: row.get(9)?,
                subjectivity: row.get(10)?,
            },
            emotion: EmotionAnalysis {
                mood: Mood::from_str(&row.get::<_, String>(11)?).unwrap_or(Mood::Neutral),
                confidence: row.get(12)?,
                primary_emotion: Emotion::from_label_or_neutral(&row.get::<_, String>(13)?),
                secondary_emotions: secondary,
            },
            key_phrases,
            recommendation: row.get(16)?,
            analyzed_at: parse_datetime(&row.get::<_, String>(17)?),
        },
        created_at: parse_datetime(&row.get::<_, String>(18)?),
    })
}

const ENTRY_COLUMNS: &str = "id, user_id, title, content, sentiment_label, compound, negative, \
     neutral, positive, polarity, subjectivity, mood, confidence, primary_emotion, \
     secondary_emotions, key_phrases, recommendation, analyzed_at, created_at";

impl Database {
    /// Insert an entry together with its analysis, returning the stored row
    pub fn insert_entry(
        &self,
        user_id: i64,
        entry: &NewEntry,
        analysis: &AnalysisResult,
    ) -> Result<Entry> {
        let conn = self.conn()?;

        conn.execute(
            r#"
            INSERT INTO entries (
                user_id, title, content,
                sentiment_label, compound, negative, neutral, positive, polarity, subjectivity,
                mood, confidence, primary_emotion, secondary_emotions,
                key_phrases, recommendation, analyzed_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                user_id,
                entry.title,
                entry.content,
                analysis.sentiment.label.as_str(),
                analysis.sentiment.compound,
                analysis.sentiment.negative,
                analysis.sentiment.neutral,
                analysis.sentiment.positive,
                analysis.sentiment.polarity,
                analysis.sentiment.subjectivity,
                analysis.emotion.mood.as_str(),
                analysis.emotion.confidence,
                analysis.emotion.primary_emotion.as_str(),
                serde_json::to_string(&analysis.emotion.secondary_emotions)?,
                serde_json::to_string(&analysis.key_phrases)?,
                analysis.recommendation,
                analysis.analyzed_at.to_rfc3339(),
            ],
        )?;
        let id = conn.last_insert_rowid();
        drop(conn);

        self.get_entry(id, user_id)?.ok_or_else(|| {
            crate::error::Error::NotFound(format!("Entry {} after insert", id))
        })
    }

    /// List a user's entries, newest first
    pub fn list_entries(&self, user_id: i64) -> Result<Vec<Entry>> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {} FROM entries WHERE user_id = ? ORDER BY created_at DESC, id DESC",
            ENTRY_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let entries = stmt
            .query_map(params![user_id], row_to_entry)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }

    /// List a user's entries oldest first, for trend aggregation
    pub fn list_entries_chronological(&self, user_id: i64) -> Result<Vec<Entry>> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {} FROM entries WHERE user_id = ? ORDER BY created_at ASC, id ASC",
            ENTRY_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let entries = stmt
            .query_map(params![user_id], row_to_entry)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }

    /// Fetch one entry, scoped to its owner
    pub fn get_entry(&self, id: i64, user_id: i64) -> Result<Option<Entry>> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {} FROM entries WHERE id = ? AND user_id = ?",
            ENTRY_COLUMNS
        );
        let entry = conn
            .query_row(&sql, params![id, user_id], row_to_entry)
            .optional()?;
        Ok(entry)
    }

    /// Delete one entry, scoped to its owner; returns the deleted row count
    pub fn delete_entry(&self, id: i64, user_id: i64) -> Result<usize> {
        let conn = self.conn()?;
        let count = conn.execute(
            "DELETE FROM entries WHERE id = ? AND user_id = ?",
            params![id, user_id],
        )?;
        Ok(count)
    }

    /// Count all stored entries
    pub fn count_entries(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM entries", [], |row| row.get(0))?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use crate::db::Database;
    use crate::models::{
        AnalysisResult, EmotionAnalysis, EmotionScore, Emotion, Mood, NewEntry, SentimentLabel,
        SentimentScore,
    };

    fn sample_analysis() -> AnalysisResult {
        AnalysisResult {
            sentiment: SentimentScore {
                label: SentimentLabel::Positive,
                compound: 0.82,
                negative: 0.0,
                neutral: 0.4,
                positive: 0.6,
                polarity: 0.75,
                subjectivity: 0.9,
            },
            emotion: EmotionAnalysis {
                mood: Mood::Positive,
                confidence: 0.91,
                primary_emotion: Emotion::Gratitude,
                secondary_emotions: vec![
                    EmotionScore { emotion: Emotion::Gratitude, score: 0.91 },
                    EmotionScore { emotion: Emotion::Joy, score: 0.55 },
                ],
            },
            key_phrases: vec!["wonderful day".to_string()],
            recommendation: "Keep a gratitude list.".to_string(),
            analyzed_at: Utc::now(),
        }
    }

    fn new_entry(content: &str) -> NewEntry {
        NewEntry {
            title: "A day".to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_insert_and_get_entry_round_trip() {
        let db = Database::in_memory().unwrap();
        let user = db.create_user("Ada", "ada@example.com", "hash").unwrap();

        let entry = db
            .insert_entry(user.id, &new_entry("I feel wonderful."), &sample_analysis())
            .unwrap();

        let fetched = db.get_entry(entry.id, user.id).unwrap().unwrap();
        assert_eq!(fetched.content, "I feel wonderful.");
        assert_eq!(fetched.analysis.sentiment.label, SentimentLabel::Positive);
        assert_eq!(fetched.analysis.emotion.primary_emotion, Emotion::Gratitude);
        assert_eq!(fetched.analysis.emotion.secondary_emotions.len(), 2);
        assert_eq!(fetched.analysis.key_phrases, vec!["wonderful day"]);
    }

    #[test]
    fn test_entries_are_scoped_by_user() {
        let db = Database::in_memory().unwrap();
        let ada = db.create_user("Ada", "ada@example.com", "hash").unwrap();
        let eve = db.create_user("Eve", "eve@example.com", "hash").unwrap();

        let entry = db
            .insert_entry(ada.id, &new_entry("Private thoughts."), &sample_analysis())
            .unwrap();

        assert!(db.get_entry(entry.id, eve.id).unwrap().is_none());
        assert!(db.list_entries(eve.id).unwrap().is_empty());
        assert_eq!(db.delete_entry(entry.id, eve.id).unwrap(), 0);

        // Owner still sees and can delete it
        assert!(db.get_entry(entry.id, ada.id).unwrap().is_some());
        assert_eq!(db.delete_entry(entry.id, ada.id).unwrap(), 1);
        assert!(db.get_entry(entry.id, ada.id).unwrap().is_none());
    }

    #[test]
    fn test_list_orderings() {
        let db = Database::in_memory().unwrap();
        let user = db.create_user("Ada", "ada@example.com", "hash").unwrap();

        for content in ["first", "second", "third"] {
            db.insert_entry(user.id, &new_entry(content), &sample_analysis())
                .unwrap();
        }

        let newest_first = db.list_entries(user.id).unwrap();
        assert_eq!(newest_first[0].content, "third");
        assert_eq!(newest_first[2].content, "first");

        let chronological = db.list_entries_chronological(user.id).unwrap();
        assert_eq!(chronological[0].content, "first");
        assert_eq!(chronological[2].content, "third");
    }
}
