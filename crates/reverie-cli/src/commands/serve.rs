//! Server command implementation

use std::path::Path;

use anyhow::{Context, Result};

use reverie_core::ai::{CompletionClient, EmotionClient};
use reverie_core::analysis::EntryAnalyzer;
use reverie_server::ServerConfig;

use super::open_db;

pub async fn cmd_serve(db_path: &Path, host: &str, port: u16, no_encrypt: bool) -> Result<()> {
    println!("🚀 Starting Reverie web server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);
    if no_encrypt {
        println!("   ⚠️  Encryption DISABLED (--no-encrypt)");
    }
    println!();
    println!("   Press Ctrl+C to stop");

    let db = open_db(db_path, no_encrypt)?;

    let config = ServerConfig::from_env()
        .context("Server configuration incomplete (is REVERIE_JWT_SECRET set?)")?;

    // The classifier is required; serve() re-checks reachability and refuses
    // to start if it is down
    let emotions = EmotionClient::from_env().context(
        "Emotion classifier not configured. Set EMOTION_HOST (and optionally EMOTION_MODEL), \
         or EMOTION_BACKEND=mock for development.",
    )?;

    let completions = CompletionClient::from_env();
    let analyzer = EntryAnalyzer::new(emotions, completions);

    reverie_server::serve(db, analyzer, host, port, config).await?;

    Ok(())
}
