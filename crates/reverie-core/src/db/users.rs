//! User account operations

use rusqlite::{params, OptionalExtension};

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::User;

impl Database {
    /// Create a user with a pre-hashed password
    ///
    /// Fails with `InvalidData` if the email is already registered.
    pub fn create_user(&self, name: &str, email: &str, password_hash: &str) -> Result<User> {
        let conn = self.conn()?;

        let existing: Option<i64> = conn
            .query_row(
                "SELECT id FROM users WHERE email = ?",
                params![email],
                |row| row.get(0),
            )
            .optional()?;

        if existing.is_some() {
            return Err(Error::InvalidData(format!(
                "User already exists: {}",
                email
            )));
        }

        conn.execute(
            "INSERT INTO users (name, email, password_hash) VALUES (?, ?, ?)",
            params![name, email, password_hash],
        )?;
        let id = conn.last_insert_rowid();

        self.get_user(id)?
            .ok_or_else(|| Error::NotFound(format!("User {} after insert", id)))
    }

    /// Get a user by id
    pub fn get_user(&self, id: i64) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                "SELECT id, name, email, created_at FROM users WHERE id = ?",
                params![id],
                |row| {
                    Ok(User {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        email: row.get(2)?,
                        created_at: parse_datetime(&row.get::<_, String>(3)?),
                    })
                },
            )
            .optional()?;
        Ok(user)
    }

    /// Look up a user by email, returning the stored password hash alongside
    pub fn find_user_by_email(&self, email: &str) -> Result<Option<(User, String)>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                "SELECT id, name, email, created_at, password_hash FROM users WHERE email = ?",
                params![email],
                |row| {
                    Ok((
                        User {
                            id: row.get(0)?,
                            name: row.get(1)?,
                            email: row.get(2)?,
                            created_at: parse_datetime(&row.get::<_, String>(3)?),
                        },
                        row.get::<_, String>(4)?,
                    ))
                },
            )
            .optional()?;
        Ok(user)
    }

    /// Count registered users
    pub fn count_users(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use crate::db::Database;

    #[test]
    fn test_create_and_find_user() {
        let db = Database::in_memory().unwrap();
        let user = db.create_user("Ada", "ada@example.com", "hash").unwrap();
        assert_eq!(user.name, "Ada");

        let (found, hash) = db.find_user_by_email("ada@example.com").unwrap().unwrap();
        assert_eq!(found.id, user.id);
        assert_eq!(hash, "hash");

        assert!(db.find_user_by_email("nobody@example.com").unwrap().is_none());
        assert_eq!(db.count_users().unwrap(), 1);
    }

    #[test]
    fn test_duplicate_email_rejected() {
        let db = Database::in_memory().unwrap();
        db.create_user("Ada", "ada@example.com", "hash").unwrap();
        let err = db.create_user("Eve", "ada@example.com", "hash2");
        assert!(err.is_err());
        assert_eq!(db.count_users().unwrap(), 1);
    }
}
