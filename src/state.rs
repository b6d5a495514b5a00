use std::sync::Arc;

use actix_web::web;

use crate::auth::{CredentialStore, IdentityResolver, TokenKeys};
use crate::error::AppError;
use crate::store::{TaskRepository, UserRepository};

/// Largest JSON body accepted by any handler.
const JSON_LIMIT: usize = 16 * 1024;

/// Everything the handlers and the auth middleware need, built once at startup
/// and handed to each worker's `App` through [`AppState::configure`].
#[derive(Clone)]
pub struct AppState {
    credentials: web::Data<CredentialStore>,
    tokens: web::Data<TokenKeys>,
    identity: web::Data<IdentityResolver>,
    tasks: web::Data<dyn TaskRepository>,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserRepository>,
        tasks: Arc<dyn TaskRepository>,
        jwt_secret: &str,
    ) -> Self {
        let credentials = CredentialStore::new(users);
        let tokens = Arc::new(TokenKeys::new(jwt_secret));
        let identity = IdentityResolver::new(Arc::clone(&tokens), credentials.clone());

        Self {
            credentials: web::Data::new(credentials),
            tokens: web::Data::from(tokens),
            identity: web::Data::new(identity),
            tasks: web::Data::from(tasks),
        }
    }

    pub fn tokens(&self) -> &TokenKeys {
        self.tokens.get_ref()
    }

    pub fn credentials(&self) -> &CredentialStore {
        self.credentials.get_ref()
    }

    /// Registers the shared state and the JSON and path extractor settings on an app.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.credentials.clone())
            .app_data(self.tokens.clone())
            .app_data(self.identity.clone())
            .app_data(self.tasks.clone())
            .app_data(json_config())
            .app_data(path_config());
    }
}

/// The only path parameters are task ids, so an id that does not parse names no task.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, req| {
        log::debug!("rejected path {}: {}", req.path(), err);
        AppError::NotFound("Task not found".into()).into()
    })
}

/// Malformed or oversized bodies get the usual `{status, message}` 400.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_LIMIT)
        .error_handler(|err, _req| {
            log::debug!("rejected request body: {}", err);
            AppError::BadRequest("Invalid request body".into()).into()
        })
}
