//! services/api/src/identity.rs
//!
//! Token and credential primitives shared by the auth handlers and the
//! access-guard middleware.
//!
//! Tokens are HS256 JWTs carrying the user's id, email and admin flag,
//! valid for seven days. Passwords are stored as Argon2 hashes. Password
//! reset tokens are random hex strings with a one-hour expiry window.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use creatorhub_core::domain::User;

/// Claims carried inside every access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub id: u64,
    pub email: String,
    pub is_admin: bool,
    pub exp: i64,
}

/// What the access guard learned about the caller.
///
/// Routes that serve both signed-in users and anonymous visitors receive
/// this instead of bare claims, so the guest case is explicit at the
/// handler level rather than a missing extension.
#[derive(Debug, Clone)]
pub enum Identity {
    Authenticated(Claims),
    Guest,
}

/// Signs a fresh seven-day access token for the given user.
pub fn issue_token(user: &User, secret: &str) -> Result<String, ApiError> {
    let claims = Claims {
        id: user.id,
        email: user.email.clone(),
        is_admin: user.is_admin,
        exp: (Utc::now() + Duration::days(7)).timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(format!("Failed to sign token: {e}")))
}

/// Verifies a token's signature and expiry. Any failure reads as `None`.
pub fn decode_token(token: &str, secret: &str) -> Option<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .ok()
    .map(|data| data.claims)
}

/// Hashes a password with a per-user random salt.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::Internal(format!("Failed to hash password: {e}")))
}

/// Checks a candidate password against a stored hash. A hash that fails to
/// parse counts as a mismatch.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    PasswordHash::new(stored_hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

/// 32 random bytes, hex-encoded. The shape password reset links carry.
pub fn generate_reset_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use creatorhub_core::domain::User;

    fn sample_user() -> User {
        User {
            id: 7,
            full_name: "Test Creator".to_string(),
            email: "creator@example.com".to_string(),
            whatsapp_number: "+1234567890".to_string(),
            password: "hash".to_string(),
            is_admin: false,
            created_at: Utc::now(),
            updated_at: None,
            reset_token: None,
            reset_token_expiry: None,
            youtube_info: None,
            current_plan: None,
            missions: Vec::new(),
        }
    }

    #[test]
    fn token_round_trips_through_decode() {
        let token = issue_token(&sample_user(), "test-secret").unwrap();
        let claims = decode_token(&token, "test-secret").unwrap();
        assert_eq!(claims.id, 7);
        assert_eq!(claims.email, "creator@example.com");
        assert!(!claims.is_admin);
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn tampered_token_is_rejected() {
        let token = issue_token(&sample_user(), "test-secret").unwrap();
        let mut tampered = token.clone();
        tampered.pop();
        assert!(decode_token(&tampered, "test-secret").is_none());
        assert!(decode_token(&token, "other-secret").is_none());
        assert!(decode_token("not-a-token", "test-secret").is_none());
    }

    #[test]
    fn password_verifies_only_against_its_own_hash() {
        let hash = hash_password("hunter22").unwrap();
        assert!(verify_password("hunter22", &hash));
        assert!(!verify_password("hunter23", &hash));
        assert!(!verify_password("hunter22", "garbage-hash"));
    }

    #[test]
    fn reset_tokens_are_hex_and_unique() {
        let a = generate_reset_token();
        let b = generate_reset_token();
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }
}
