//! Pluggable hosted-model backend abstraction
//!
//! This module provides backend-agnostic interfaces for the two hosted models
//! the diary pipeline depends on:
//!
//! - `EmotionBackend` / `EmotionClient`: multi-class emotion classification.
//!   Required at process start; the server refuses to boot without it.
//! - `CompletionBackend` / `CompletionClient`: chat-completion service used
//!   for self-care recommendations. Optional; failures degrade to a fixed
//!   fallback and never block entry creation.
//!
//! Each client is an enum over concrete backends (hosted HTTP + mock),
//! providing Clone and compile-time dispatch without Box<dyn> overhead.
//!
//! # Configuration
//!
//! Environment variables:
//! - `EMOTION_BACKEND`: hosted (default) or mock
//! - `EMOTION_HOST`: classification server URL (required for hosted)
//! - `EMOTION_MODEL`: model name (default: SamLowe/roberta-base-go_emotions)
//! - `EMOTION_API_KEY`: API key if required (optional)
//! - `COMPLETION_HOST`: chat-completion server URL (required for hosted)
//! - `COMPLETION_MODEL`: model name (default: gpt-4)
//! - `COMPLETION_API_KEY`: API key if required (optional)

mod completion;
mod emotion;
mod mock;

pub use completion::{CompletionBackend, CompletionClient, OpenAICompatibleBackend};
pub use emotion::{EmotionBackend, EmotionClient, HostedEmotionBackend};
pub use mock::{MockCompletionBackend, MockEmotionBackend};
