//! CLI smoke tests

use crate::commands;
use tempfile::TempDir;

#[test]
fn test_open_db_creates_database() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("reverie.db");

    let db = commands::open_db(&path, true).unwrap();
    assert_eq!(db.count_users().unwrap(), 0);
    assert_eq!(db.count_entries().unwrap(), 0);
    assert!(path.exists());
}

#[test]
fn test_open_db_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("reverie.db");

    {
        let db = commands::open_db(&path, true).unwrap();
        db.create_user("Ada", "ada@example.com", "hash").unwrap();
    }

    // Reopening runs migrations again without clobbering data
    let db = commands::open_db(&path, true).unwrap();
    assert_eq!(db.count_users().unwrap(), 1);
}
