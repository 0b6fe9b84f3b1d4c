//! Request handlers, organized by domain

mod auth;
mod entries;
mod insights;

pub use auth::{get_me, login, register};
pub use entries::{create_entry, delete_entry, get_entry, list_entries};
pub use insights::{get_insights, health, interactive_feedback};
