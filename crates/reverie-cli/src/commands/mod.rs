//! Command implementations

mod analyze;
mod core;
mod serve;

pub use analyze::cmd_analyze;
pub use core::{cmd_init, cmd_status};
pub use serve::cmd_serve;

use std::path::Path;

use anyhow::{Context, Result};
use reverie_core::db::Database;

/// Open the database, encrypted unless explicitly disabled
pub fn open_db(path: &Path, no_encrypt: bool) -> Result<Database> {
    let path_str = path
        .to_str()
        .context("Database path must be valid UTF-8")?;

    let db = if no_encrypt {
        Database::new_unencrypted(path_str)?
    } else {
        Database::new(path_str)?
    };
    Ok(db)
}
