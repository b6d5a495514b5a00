use std::sync::Arc;

use crate::auth::password::{hash_password_blocking, verify_password_blocking};
use crate::error::AppError;
use crate::models::User;
use crate::store::{StoreError, UserRepository};

/// Registration and lookup of identities on top of a [`UserRepository`].
///
/// Hashing happens here, on the blocking pool; the repository only ever sees
/// the finished hash.
#[derive(Clone)]
pub struct CredentialStore {
    users: Arc<dyn UserRepository>,
}

impl CredentialStore {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Creates a new identity. Fails with [`AppError::DuplicateUsername`] if the
    /// username is taken; the repository's unique constraint decides that.
    pub async fn register(&self, username: &str, raw_password: &str) -> Result<User, AppError> {
        let password_hash = hash_password_blocking(raw_password.to_string()).await?;
        self.users
            .insert_user(username, &password_hash)
            .await
            .map_err(|err| match err {
                StoreError::Conflict(_) => AppError::DuplicateUsername,
                other => other.into(),
            })
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        Ok(self.users.find_user_by_username(username).await?)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<User>, AppError> {
        Ok(self.users.find_user_by_id(id).await?)
    }

    pub async fn verify(&self, raw_password: &str, stored_hash: &str) -> Result<bool, AppError> {
        verify_password_blocking(raw_password.to_string(), stored_hash.to_string()).await
    }

    /// Does the bcrypt work a real `verify` would, for a login whose username does
    /// not exist. Keeps that failure from answering measurably faster than a wrong
    /// password.
    pub async fn reject_unknown(&self, raw_password: &str) -> Result<(), AppError> {
        hash_password_blocking(raw_password.to_string())
            .await
            .map(|_| ())
    }

    pub async fn ping(&self) -> Result<(), AppError> {
        Ok(self.users.ping().await?)
    }
}
