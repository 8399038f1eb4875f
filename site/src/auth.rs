use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use password_hash::SaltString;
use rand_core::OsRng;

use crate::entity::user::{self, Role};
use crate::store::{Store, StoreError, users::NewUser};

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("authentication backend not available")]
    Unavailable,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("{0}")]
    Validation(String),
    #[error("user not found")]
    NotFound,
    #[error("a user with email {0} already exists")]
    EmailTaken(String),
    #[error("hash error: {0}")]
    Hash(String),
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for AuthError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Unavailable => AuthError::Unavailable,
            StoreError::NotFound(_) => AuthError::NotFound,
            other => AuthError::Store(other),
        }
    }
}

/// Password authentication over the user table.
pub struct Auth {
    store: Store,
}

impl Auth {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Verify email/password, stamping `last_signed_in` on success.
    ///
    /// Unknown emails, accounts without a password and wrong passwords are
    /// all reported as `InvalidCredentials`.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<user::Model, AuthError> {
        if !self.store.is_available() {
            return Err(AuthError::Unavailable);
        }

        let user = self
            .store
            .find_user_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let Some(stored) = user.password_hash.as_deref() else {
            return Err(AuthError::InvalidCredentials);
        };
        if !verify_password(password, stored)? {
            return Err(AuthError::InvalidCredentials);
        }

        self.store.touch_last_signed_in(user.id).await?;
        Ok(user)
    }

    /// Replace the password of `user_id` after checking `current`.
    pub async fn change_password(
        &self,
        user_id: i32,
        current: &str,
        new: &str,
    ) -> Result<(), AuthError> {
        check_password_len(new)?;

        let user = self
            .store
            .find_user_by_id(user_id)
            .await?
            .ok_or(AuthError::NotFound)?;
        let stored = user
            .password_hash
            .as_deref()
            .ok_or(AuthError::InvalidCredentials)?;
        if !verify_password(current, stored)? {
            return Err(AuthError::InvalidCredentials);
        }

        self.store
            .update_user_password(user.id, hash_password(new)?)
            .await?;
        Ok(())
    }

    /// Create a password user. Emails are unique per account.
    pub async fn create_user(
        &self,
        email: &str,
        password: &str,
        name: Option<String>,
        role: Role,
    ) -> Result<user::Model, AuthError> {
        check_password_len(password)?;
        if !self.store.is_available() {
            return Err(AuthError::Unavailable);
        }
        if self.store.find_user_by_email(email).await?.is_some() {
            return Err(AuthError::EmailTaken(email.to_string()));
        }

        let user = self
            .store
            .create_user(NewUser {
                email: email.to_string(),
                name,
                password_hash: hash_password(password)?,
                role,
            })
            .await?;
        Ok(user)
    }

    /// Overwrite the password of the account registered under `email`.
    pub async fn reset_password(&self, email: &str, password: &str) -> Result<(), AuthError> {
        check_password_len(password)?;
        if !self.store.is_available() {
            return Err(AuthError::Unavailable);
        }
        let user = self
            .store
            .find_user_by_email(email)
            .await?
            .ok_or(AuthError::NotFound)?;
        self.store
            .update_user_password(user.id, hash_password(password)?)
            .await?;
        Ok(())
    }

    /// First-run bootstrap: create the admin account if `email` is unused.
    /// Returns `true` when an account was created.
    pub async fn ensure_admin(
        &self,
        email: &str,
        password: &str,
        default_password: bool,
    ) -> Result<bool, AuthError> {
        if !self.store.is_available() {
            return Err(AuthError::Unavailable);
        }
        if self.store.find_user_by_email(email).await?.is_some() {
            return Ok(false);
        }

        let hash = hash_password(password)?;
        self.store
            .create_user(NewUser {
                email: email.to_string(),
                name: Some("Administrateur".to_string()),
                password_hash: hash,
                role: Role::Admin,
            })
            .await?;

        if default_password {
            tracing::warn!(
                email,
                "Admin account created with the default password. \
                 Change it immediately (ADMIN_PASSWORD or `site user reset-password`)."
            );
        } else {
            tracing::info!(email, "Admin account created");
        }
        Ok(true)
    }
}

fn check_password_len(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::Validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

/// Hash a plaintext password with Argon2id + a random salt.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::Hash(e.to_string()))?
        .to_string();
    Ok(hash)
}

/// `Ok(false)` on mismatch; `Err` only when `stored` is not a PHC string.
pub fn verify_password(password: &str, stored: &str) -> Result<bool, AuthError> {
    let hash = PasswordHash::new(stored).map_err(|e| AuthError::Hash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_support::memory_store;

    async fn setup() -> Auth {
        Auth::new(memory_store().await)
    }

    // --- hash_password ---

    #[test]
    fn test_hash_produces_argon2_format() {
        let hash = hash_password("hunter2").unwrap();
        assert!(hash.starts_with("$argon2"), "Expected Argon2 PHC string, got: {}", hash);
    }

    #[test]
    fn test_hash_unique_per_call() {
        let h1 = hash_password("same").unwrap();
        let h2 = hash_password("same").unwrap();
        assert_ne!(h1, h2, "Same password hashed twice should produce different hashes");
    }

    #[test]
    fn test_verify_roundtrip() {
        let hash = hash_password("correct horse battery staple").unwrap();
        assert!(verify_password("correct horse battery staple", &hash).unwrap());
        assert!(!verify_password("wrong", &hash).unwrap());
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(matches!(verify_password("pw", "plaintext"), Err(AuthError::Hash(_))));
    }

    // --- create_user ---

    #[tokio::test]
    async fn test_create_user_stores_hash_not_plaintext() {
        let auth = setup().await;
        let user = auth
            .create_user("alice@example.be", "supersecret", None, Role::User)
            .await
            .unwrap();

        let stored = user.password_hash.unwrap();
        assert_ne!(stored, "supersecret", "Plaintext must never be stored");
        assert!(stored.starts_with("$argon2"));
        assert_eq!(user.role, Role::User);
    }

    #[tokio::test]
    async fn test_create_user_duplicate_email_errors() {
        let auth = setup().await;
        auth.create_user("alice@example.be", "secret1", None, Role::User)
            .await
            .unwrap();
        let err = auth
            .create_user("alice@example.be", "secret2", None, Role::Admin)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::EmailTaken(_)));
    }

    #[tokio::test]
    async fn test_create_user_short_password_rejected() {
        let auth = setup().await;
        let err = auth
            .create_user("alice@example.be", "12345", None, Role::User)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
    }

    // --- authenticate ---

    #[tokio::test]
    async fn test_authenticate_success_returns_model() {
        let auth = setup().await;
        auth.create_user("root@example.be", "correct", None, Role::Admin)
            .await
            .unwrap();

        let user = auth.authenticate("root@example.be", "correct").await.unwrap();
        assert_eq!(user.email.as_deref(), Some("root@example.be"));
        assert_eq!(user.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_authenticate_updates_last_signed_in() {
        let auth = setup().await;
        let created = auth
            .create_user("alice@example.be", "secret", None, Role::User)
            .await
            .unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        auth.authenticate("alice@example.be", "secret").await.unwrap();

        let after = auth.store().find_user_by_id(created.id).await.unwrap().unwrap();
        assert!(after.last_signed_in > created.last_signed_in);
    }

    #[tokio::test]
    async fn test_authenticate_wrong_password_rejected() {
        let auth = setup().await;
        auth.create_user("alice@example.be", "correct", None, Role::User)
            .await
            .unwrap();

        let err = auth.authenticate("alice@example.be", "wrong").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_authenticate_unknown_user_rejected() {
        let auth = setup().await;
        let err = auth.authenticate("nobody@example.be", "pw").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_authenticate_without_store_is_unavailable() {
        let auth = Auth::new(Store::unavailable());
        let err = auth.authenticate("a@example.be", "pw").await.unwrap_err();
        assert!(matches!(err, AuthError::Unavailable));
    }

    // --- change_password / reset_password ---

    #[tokio::test]
    async fn test_change_password_requires_current() {
        let auth = setup().await;
        let user = auth
            .create_user("alice@example.be", "first-pw", None, Role::User)
            .await
            .unwrap();

        let err = auth
            .change_password(user.id, "not-it", "second-pw")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));

        auth.change_password(user.id, "first-pw", "second-pw")
            .await
            .unwrap();
        assert!(auth.authenticate("alice@example.be", "second-pw").await.is_ok());
        assert!(auth.authenticate("alice@example.be", "first-pw").await.is_err());
    }

    #[tokio::test]
    async fn test_change_password_too_short() {
        let auth = setup().await;
        let user = auth
            .create_user("alice@example.be", "first-pw", None, Role::User)
            .await
            .unwrap();
        let err = auth
            .change_password(user.id, "first-pw", "abc")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
    }

    #[tokio::test]
    async fn test_reset_password_unknown_email() {
        let auth = setup().await;
        let err = auth
            .reset_password("ghost@example.be", "whatever")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::NotFound));
    }

    // --- ensure_admin ---

    #[tokio::test]
    async fn test_ensure_admin_creates_once() {
        let auth = setup().await;
        assert!(auth.ensure_admin("admin@example.be", "admin123", true).await.unwrap());
        assert!(!auth.ensure_admin("admin@example.be", "other-pw", false).await.unwrap());
        assert_eq!(auth.store().count_users().await.unwrap(), 1);

        let admin = auth.authenticate("admin@example.be", "admin123").await.unwrap();
        assert_eq!(admin.role, Role::Admin);
    }
}
