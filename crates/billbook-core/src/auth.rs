//! Password hashing and user registration/login

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use tracing::{info, warn};

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::User;

/// Minimum password length
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum username length
pub const MAX_USERNAME_LENGTH: usize = 80;

fn validate_username(username: &str) -> Result<&str> {
    let username = username.trim();
    if username.is_empty() {
        return Err(Error::InvalidInput("Username cannot be empty".to_string()));
    }
    if username.chars().count() > MAX_USERNAME_LENGTH {
        return Err(Error::InvalidInput(format!(
            "Username must be at most {} characters",
            MAX_USERNAME_LENGTH
        )));
    }
    Ok(username)
}

fn validate_password(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(Error::WeakPassword(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }
    Ok(())
}

/// Hash a password using Argon2id with a random salt (PHC string format)
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::PasswordHash(e.to_string()))
}

/// Verify a password against a stored PHC hash
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

impl Database {
    /// Register a new user, storing only the password hash
    pub fn register_user(&self, username: &str, password: &str) -> Result<User> {
        let username = validate_username(username)?;
        validate_password(password)?;

        let hash = hash_password(password)?;
        let user = self.create_user(username, &hash)?;
        info!(user_id = user.id, username = %user.username, "Registered user");
        Ok(user)
    }

    /// Check a username/password pair.
    ///
    /// Unknown users and wrong passwords both fail with
    /// [`Error::InvalidCredentials`].
    pub fn authenticate(&self, username: &str, password: &str) -> Result<User> {
        let username = username.trim();
        let Some(user) = self.get_user_by_username(username)? else {
            warn!(username = %username, "Login for unknown user");
            return Err(Error::InvalidCredentials);
        };
        let hash = self
            .get_password_hash(&user.username)?
            .ok_or(Error::InvalidCredentials)?;

        if !verify_password(password, &hash) {
            warn!(user_id = user.id, "Login with wrong password");
            return Err(Error::InvalidCredentials);
        }

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("wrong horse", &hash));
        assert!(!verify_password("correct horse", "not-a-hash"));
    }

    #[test]
    fn test_salts_differ() {
        let a = hash_password("same password").unwrap();
        let b = hash_password("same password").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_register_and_authenticate() {
        let db = Database::in_memory().unwrap();
        let user = db.register_user("  alice ", "hunter22hunter").unwrap();
        assert_eq!(user.username, "alice");

        let logged_in = db.authenticate("alice", "hunter22hunter").unwrap();
        assert_eq!(logged_in.id, user.id);

        assert!(matches!(
            db.authenticate("alice", "wrong-password"),
            Err(Error::InvalidCredentials)
        ));
        assert!(matches!(
            db.authenticate("bob", "hunter22hunter"),
            Err(Error::InvalidCredentials)
        ));
    }

    #[test]
    fn test_register_rejects_duplicates_and_weak_passwords() {
        let db = Database::in_memory().unwrap();
        db.register_user("alice", "hunter22hunter").unwrap();

        assert!(matches!(
            db.register_user("alice", "another-password"),
            Err(Error::UsernameTaken(_))
        ));
        assert!(matches!(
            db.register_user("bob", "short"),
            Err(Error::WeakPassword(_))
        ));
        assert!(matches!(
            db.register_user("   ", "long-enough-password"),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_password_is_not_stored_in_plaintext() {
        let db = Database::in_memory().unwrap();
        db.register_user("carol", "plaintext-secret").unwrap();
        let hash = db.get_password_hash("carol").unwrap().unwrap();
        assert!(!hash.contains("plaintext-secret"));
        assert!(verify_password("plaintext-secret", &hash));
    }
}
