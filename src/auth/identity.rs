use std::sync::Arc;

use crate::auth::credentials::CredentialStore;
use crate::auth::token::TokenKeys;
use crate::error::{AppError, AuthFailure};

/// Scheme prefix expected at the start of the `Authorization` header.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Turns an `Authorization` header value into a live identity id.
///
/// Each step has its own failure:
/// no usable header is `NoToken`, a token that fails signature or expiry
/// checks is `InvalidToken`, and a valid token naming an identity that no
/// longer exists is `UserNotFound`. Store failures during the lookup are not
/// authentication failures and propagate as server errors.
pub struct IdentityResolver {
    tokens: Arc<TokenKeys>,
    credentials: CredentialStore,
}

impl IdentityResolver {
    pub fn new(tokens: Arc<TokenKeys>, credentials: CredentialStore) -> Self {
        Self {
            tokens,
            credentials,
        }
    }

    pub async fn resolve(&self, authorization: Option<&str>) -> Result<i32, AppError> {
        let token = authorization
            .and_then(|value| value.strip_prefix(BEARER_PREFIX))
            .ok_or(AppError::Unauthorized(AuthFailure::NoToken))?;

        let claims = self.tokens.verify(token).map_err(|e| {
            log::debug!("rejected bearer token: {}", e);
            AppError::Unauthorized(AuthFailure::InvalidToken)
        })?;

        match self.credentials.find_by_id(claims.id).await? {
            Some(user) => Ok(user.id),
            None => {
                log::debug!("token names unknown identity {}", claims.id);
                Err(AppError::Unauthorized(AuthFailure::UserNotFound))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token::{Claims, TOKEN_TTL_DAYS};
    use crate::store::InMemoryStore;
    use chrono::{Duration, Utc};

    struct Fixture {
        store: Arc<InMemoryStore>,
        tokens: Arc<TokenKeys>,
        resolver: IdentityResolver,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(InMemoryStore::new());
        let tokens = Arc::new(TokenKeys::new("resolver-secret"));
        let resolver =
            IdentityResolver::new(Arc::clone(&tokens), CredentialStore::new(store.clone()));
        Fixture {
            store,
            tokens,
            resolver,
        }
    }

    fn failure(result: Result<i32, AppError>) -> AuthFailure {
        match result {
            Err(AppError::Unauthorized(reason)) => reason,
            other => panic!("expected an auth failure, got {:?}", other),
        }
    }

    #[actix_rt::test]
    async fn test_resolves_issued_identity() {
        let fx = fixture();
        let user = fx.resolver.credentials.register("alice", "pw").await.unwrap();
        let header = format!("Bearer {}", fx.tokens.issue(user.id).unwrap());

        assert_eq!(fx.resolver.resolve(Some(&header)).await.unwrap(), user.id);
    }

    #[actix_rt::test]
    async fn test_missing_or_wrong_scheme_is_no_token() {
        let fx = fixture();
        let token = fx.tokens.issue(1).unwrap();

        assert_eq!(failure(fx.resolver.resolve(None).await), AuthFailure::NoToken);
        assert_eq!(
            failure(fx.resolver.resolve(Some(&token)).await),
            AuthFailure::NoToken
        );
        assert_eq!(
            failure(fx.resolver.resolve(Some(&format!("bearer {}", token))).await),
            AuthFailure::NoToken
        );
        assert_eq!(
            failure(fx.resolver.resolve(Some("Basic dXNlcjpwYXNz")).await),
            AuthFailure::NoToken
        );
    }

    #[actix_rt::test]
    async fn test_bad_tokens_are_invalid() {
        let fx = fixture();
        let user = fx.resolver.credentials.register("bob", "pw").await.unwrap();

        assert_eq!(
            failure(fx.resolver.resolve(Some("Bearer garbage")).await),
            AuthFailure::InvalidToken
        );
        assert_eq!(
            failure(fx.resolver.resolve(Some("Bearer ")).await),
            AuthFailure::InvalidToken
        );

        let foreign = TokenKeys::new("other-secret").issue(user.id).unwrap();
        assert_eq!(
            failure(fx.resolver.resolve(Some(&format!("Bearer {}", foreign))).await),
            AuthFailure::InvalidToken
        );

        let issued = Utc::now() - Duration::days(TOKEN_TTL_DAYS + 1);
        let expired = fx
            .tokens
            .sign(&Claims {
                id: user.id,
                iat: issued.timestamp(),
                exp: (issued + Duration::days(TOKEN_TTL_DAYS)).timestamp(),
            })
            .unwrap();
        assert_eq!(
            failure(fx.resolver.resolve(Some(&format!("Bearer {}", expired))).await),
            AuthFailure::InvalidToken
        );
    }

    #[actix_rt::test]
    async fn test_vanished_identity_is_user_not_found() {
        let fx = fixture();
        let user = fx.resolver.credentials.register("carol", "pw").await.unwrap();
        let header = format!("Bearer {}", fx.tokens.issue(user.id).unwrap());

        fx.store.remove_user(user.id).unwrap();

        assert_eq!(
            failure(fx.resolver.resolve(Some(&header)).await),
            AuthFailure::UserNotFound
        );
    }
}
