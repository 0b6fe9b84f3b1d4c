//! One-off pipeline probe
//!
//! Runs the full analysis pipeline against the configured backends and
//! prints the result as JSON. Useful for checking model wiring without
//! starting the server.

use anyhow::{Context, Result};

use reverie_core::ai::{CompletionClient, EmotionClient};
use reverie_core::analysis::EntryAnalyzer;

pub async fn cmd_analyze(text: &str) -> Result<()> {
    let emotions = EmotionClient::from_env().context(
        "Emotion classifier not configured. Set EMOTION_HOST, or EMOTION_BACKEND=mock \
         for development.",
    )?;
    let completions = CompletionClient::from_env();
    if completions.is_none() {
        println!("ℹ️  No completion service configured; recommendation will use fallback text");
    }

    let analyzer = EntryAnalyzer::new(emotions, completions);
    let analysis = analyzer.analyze(text).await?;

    println!("{}", serde_json::to_string_pretty(&analysis)?);
    Ok(())
}
