use actix_web::{get, web, HttpResponse, Responder};
use chrono::Utc;
use serde_json::json;

use crate::auth::CredentialStore;

/// Health check endpoint
///
/// Reports whether the server is up and its identity store answers.
/// Answers `503` when the store cannot be reached.
#[get("/health")]
pub async fn health(credentials: web::Data<CredentialStore>) -> impl Responder {
    match credentials.ping().await {
        Ok(()) => HttpResponse::Ok().json(json!({
            "status": "ok",
            "database": "up",
            "timestamp": Utc::now()
        })),
        Err(err) => {
            log::warn!("health check failed: {}", err);
            HttpResponse::ServiceUnavailable().json(json!({
                "status": "error",
                "database": "down",
                "timestamp": Utc::now()
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{InMemoryStore, StoreError, StoreResult, UserRepository};
    use crate::models::User;
    use actix_web::test;
    use async_trait::async_trait;
    use std::sync::Arc;

    struct Unreachable;

    #[async_trait]
    impl UserRepository for Unreachable {
        async fn insert_user(&self, _: &str, _: &str) -> StoreResult<User> {
            Err(StoreError::Unavailable("down".into()))
        }
        async fn find_user_by_username(&self, _: &str) -> StoreResult<Option<User>> {
            Err(StoreError::Unavailable("down".into()))
        }
        async fn find_user_by_id(&self, _: i32) -> StoreResult<Option<User>> {
            Err(StoreError::Unavailable("down".into()))
        }
        async fn ping(&self) -> StoreResult<()> {
            Err(StoreError::Unavailable("down".into()))
        }
    }

    #[actix_web::test]
    async fn test_health_endpoint() {
        let credentials = CredentialStore::new(Arc::new(InMemoryStore::new()));
        let app = test::init_service(
            actix_web::App::new()
                .app_data(web::Data::new(credentials))
                .service(health),
        )
        .await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;

        assert!(resp.status().is_success());

        let body = test::read_body(resp).await;
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["status"], "ok");
        assert_eq!(json["database"], "up");
        assert!(json["timestamp"].is_string());
    }

    #[actix_web::test]
    async fn test_health_reports_unreachable_store() {
        let credentials = CredentialStore::new(Arc::new(Unreachable));
        let app = test::init_service(
            actix_web::App::new()
                .app_data(web::Data::new(credentials))
                .service(health),
        )
        .await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 503);

        let json: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(json["database"], "down");
    }
}
