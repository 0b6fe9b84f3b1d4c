//! Init and status command implementations

use std::path::Path;

use anyhow::Result;

use reverie_core::ai::{CompletionBackend, CompletionClient, EmotionBackend, EmotionClient};

use super::open_db;

pub fn cmd_init(db_path: &Path, no_encrypt: bool) -> Result<()> {
    let db = open_db(db_path, no_encrypt)?;
    println!("✅ Database initialized: {}", db.path());
    if no_encrypt {
        println!("   ⚠️  Encryption DISABLED (--no-encrypt)");
    } else {
        println!("   🔒 Encrypted with key derived from REVERIE_DB_KEY");
    }
    Ok(())
}

pub async fn cmd_status(db_path: &Path, no_encrypt: bool) -> Result<()> {
    let db = open_db(db_path, no_encrypt)?;

    println!("Database: {}", db.path());
    println!("  Users:   {}", db.count_users()?);
    println!("  Entries: {}", db.count_entries()?);
    println!();

    match EmotionClient::from_env() {
        Some(client) => {
            let status = if client.health_check().await {
                "✅ responding"
            } else {
                "⚠️  not responding"
            };
            println!(
                "Emotion classifier: {} ({} at {})",
                status,
                client.model(),
                client.host()
            );
        }
        None => println!("Emotion classifier: not configured (set EMOTION_HOST)"),
    }

    match CompletionClient::from_env() {
        Some(client) => {
            let status = if client.health_check().await {
                "✅ responding"
            } else {
                "⚠️  not responding"
            };
            println!(
                "Completion service: {} ({} at {})",
                status,
                client.model(),
                client.host()
            );
        }
        None => {
            println!("Completion service: not configured (recommendations will use fallback text)")
        }
    }

    Ok(())
}
