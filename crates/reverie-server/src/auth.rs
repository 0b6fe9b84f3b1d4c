//! Session tokens and password hashing
//!
//! HS256 JWTs carry only the user id; handlers receive the verified identity
//! as an `AuthUser` extension and never see credentials.

use argon2::password_hash::{
    rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};
use argon2::Argon2;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Environment variable for the token signing secret
pub const JWT_SECRET_ENV: &str = "REVERIE_JWT_SECRET";

/// Session lifetime
const TOKEN_TTL_DAYS: i64 = 30;

/// Verified identity attached to authenticated requests
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    user_id: i64,
    exp: i64,
}

/// Issue a session token for a user
pub fn issue_token(user_id: i64, secret: &str) -> anyhow::Result<String> {
    let claims = Claims {
        user_id,
        exp: (Utc::now() + Duration::days(TOKEN_TTL_DAYS)).timestamp(),
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok(token)
}

/// Verify a session token and return its user id
pub fn verify_token(token: &str, secret: &str) -> jsonwebtoken::errors::Result<i64> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims.user_id)
}

/// Hash a password with Argon2id and a fresh salt
pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored hash
pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_round_trip() {
        let token = issue_token(42, "secret").unwrap();
        assert_eq!(verify_token(&token, "secret").unwrap(), 42);
    }

    #[test]
    fn test_token_wrong_secret_rejected() {
        let token = issue_token(42, "secret").unwrap();
        assert!(verify_token(&token, "other-secret").is_err());
        assert!(verify_token("not-a-token", "secret").is_err());
    }

    #[test]
    fn test_password_round_trip() {
        let hash = hash_password("hunter2").unwrap();
        assert_ne!(hash, "hunter2");
        assert!(verify_password("hunter2", &hash));
        assert!(!verify_password("hunter3", &hash));
        assert!(!verify_password("hunter2", "garbage-hash"));
    }
}
