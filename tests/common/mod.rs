#![allow(dead_code)]

use std::sync::Arc;

use actix_http::Request;
use actix_web::{
    body::MessageBody,
    dev::{Service, ServiceResponse},
    http::{header, StatusCode},
    middleware::Logger,
    test, web, App,
};
use serde_json::{json, Value};
use tasknest::{routes, routes::health, store::InMemoryStore, AppState};

pub const TEST_SECRET: &str = "integration-test-secret";

/// App state over a fresh in-memory store. The store handle is returned so tests
/// can reach behind the API (e.g. to delete an account).
pub fn state() -> (AppState, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::new());
    let state = AppState::new(store.clone(), store.clone(), TEST_SECRET);
    (state, store)
}

/// The same routing tree the binary serves.
pub async fn init_app(
    state: &AppState,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error> {
    let state = state.clone();
    test::init_service(
        App::new()
            .wrap(Logger::default())
            .configure(move |cfg| state.configure(cfg))
            .service(health::health)
            .service(web::scope("/api").configure(routes::config)),
    )
    .await
}

pub fn with_token(req: test::TestRequest, token: &str) -> test::TestRequest {
    req.insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
}

/// Sends `req` and returns the status with the body parsed as JSON (`Null` when empty).
pub async fn send<S, B>(app: &S, req: test::TestRequest) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let resp = test::call_service(app, req.to_request()).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or_else(|_| {
            panic!(
                "non-JSON body for {}: {:?}",
                status,
                String::from_utf8_lossy(&body)
            )
        })
    };
    (status, json)
}

pub async fn register<S, B>(app: &S, username: &str, password: &str) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "username": username, "password": password }));
    send(app, req).await
}

pub async fn login<S, B>(app: &S, username: &str, password: &str) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "username": username, "password": password }));
    send(app, req).await
}

/// Registers `username` and returns `(id, token)`, panicking on failure.
pub async fn registered_user<S, B>(app: &S, username: &str) -> (i64, String)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let (status, body) = register(app, username, "password123").await;
    assert_eq!(status, StatusCode::CREATED, "register {} failed: {}", username, body);
    let id = body["data"]["id"].as_i64().unwrap();
    let token = body["data"]["token"].as_str().unwrap().to_string();
    (id, token)
}
