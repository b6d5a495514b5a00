pub mod credentials;
pub mod extractors;
pub mod identity;
pub mod middleware;
pub mod ownership;
pub mod password;
pub mod token;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::error::AppError;

pub use credentials::CredentialStore;
pub use extractors::AuthenticatedUserId;
pub use identity::IdentityResolver;
pub use middleware::AuthMiddleware;
pub use ownership::{ensure_task_owner, owned_by};
pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenKeys};

/// bcrypt ignores everything past this many bytes, so longer passwords are refused.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Body of both `POST /auth/register` and `POST /auth/login`.
///
/// Both fields are optional at the type level so that an absent field is
/// answered with the same 400 as an empty one.
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct CredentialsRequest {
    #[validate(length(max = 50))]
    pub username: Option<String>,
    #[validate(custom = "within_bcrypt_limit")]
    pub password: Option<String>,
}

fn within_bcrypt_limit(password: &str) -> Result<(), ValidationError> {
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(ValidationError::new("password_too_long"));
    }
    Ok(())
}

impl CredentialsRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
        }
    }

    /// Returns `(username, password)` once both are present, non-empty and within limits.
    pub fn into_parts(self) -> Result<(String, String), AppError> {
        let (username, password) = match (self.username.as_deref(), self.password.as_deref()) {
            (Some(u), Some(p)) if !u.is_empty() && !p.is_empty() => (u.to_string(), p.to_string()),
            _ => {
                return Err(AppError::MissingFields(
                    "Please provide username and password".into(),
                ))
            }
        };
        self.validate()?;
        Ok((username, password))
    }
}

/// Payload of a successful registration or login.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AuthData {
    pub id: i32,
    pub username: String,
    /// Bearer token to send as `Authorization: Bearer <token>`.
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_parts_accepts_complete_credentials() {
        let (username, password) = CredentialsRequest::new("a", "b").into_parts().unwrap();
        assert_eq!(username, "a");
        assert_eq!(password, "b");
    }

    #[test]
    fn test_into_parts_rejects_missing_or_empty_fields() {
        let cases = vec![
            CredentialsRequest::default(),
            CredentialsRequest {
                username: Some("alice".into()),
                password: None,
            },
            CredentialsRequest {
                username: None,
                password: Some("secret1".into()),
            },
            CredentialsRequest::new("", "secret1"),
            CredentialsRequest::new("alice", ""),
        ];
        for request in cases {
            assert!(matches!(request.into_parts(), Err(AppError::MissingFields(_))));
        }
    }

    #[test]
    fn test_into_parts_enforces_length_limits() {
        let long_username = CredentialsRequest::new("u".repeat(51), "secret1");
        assert!(matches!(
            long_username.into_parts(),
            Err(AppError::ValidationError(_))
        ));

        let long_password = CredentialsRequest::new("alice", "p".repeat(MAX_PASSWORD_BYTES + 1));
        assert!(matches!(
            long_password.into_parts(),
            Err(AppError::ValidationError(_))
        ));

        let edge = CredentialsRequest::new("u".repeat(50), "p".repeat(MAX_PASSWORD_BYTES));
        assert!(edge.into_parts().is_ok());
    }
}
