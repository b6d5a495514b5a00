//! Typed HTTP client for the TaskNest API.
//!
//! Every call returns `Result<T, ApiError>`; callers match on the error kind
//! instead of inspecting raw response bodies. The client keeps the session
//! returned by `register`/`login` and sends its token on task calls.

use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use uuid::Uuid;

use crate::auth::{AuthData, CredentialsRequest};
use crate::models::response::MessageResponse;
use crate::models::{ApiResponse, NewTask, Task, TaskUpdate};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// A protected call was attempted before `register`/`login`.
    #[error("not logged in")]
    NotLoggedIn,

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl ApiError {
    fn from_status(status: StatusCode, message: String) -> Self {
        match status {
            StatusCode::BAD_REQUEST => ApiError::BadRequest(message),
            StatusCode::UNAUTHORIZED => ApiError::Unauthorized(message),
            StatusCode::FORBIDDEN => ApiError::Forbidden(message),
            StatusCode::NOT_FOUND => ApiError::NotFound(message),
            other => ApiError::Server {
                status: other.as_u16(),
                message,
            },
        }
    }
}

pub struct ApiClient {
    http: Client,
    /// API root, e.g. `http://127.0.0.1:5000/api`.
    base_url: String,
    session: Option<AuthData>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session: None,
        }
    }

    pub fn session(&self) -> Option<&AuthData> {
        self.session.as_ref()
    }

    /// Restores a session obtained earlier, e.g. from disk.
    pub fn set_session(&mut self, session: AuthData) {
        self.session = Some(session);
    }

    pub fn logout(&mut self) {
        self.session = None;
    }

    pub async fn register(&mut self, username: &str, password: &str) -> Result<AuthData, ApiError> {
        self.authenticate("auth/register", username, password).await
    }

    pub async fn login(&mut self, username: &str, password: &str) -> Result<AuthData, ApiError> {
        self.authenticate("auth/login", username, password).await
    }

    pub async fn list_tasks(&self) -> Result<Vec<Task>, ApiError> {
        let request = self.authorized(Method::GET, "tasks")?;
        Ok(self.send::<ApiResponse<Vec<Task>>>(request).await?.data)
    }

    pub async fn create_task(&self, task: &NewTask) -> Result<Task, ApiError> {
        let request = self.authorized(Method::POST, "tasks")?.json(task);
        Ok(self.send::<ApiResponse<Task>>(request).await?.data)
    }

    pub async fn update_task(&self, id: Uuid, update: &TaskUpdate) -> Result<Task, ApiError> {
        let request = self
            .authorized(Method::PUT, &format!("tasks/{}", id))?
            .json(update);
        Ok(self.send::<ApiResponse<Task>>(request).await?.data)
    }

    pub async fn delete_task(&self, id: Uuid) -> Result<(), ApiError> {
        let request = self.authorized(Method::DELETE, &format!("tasks/{}", id))?;
        self.send::<MessageResponse>(request).await.map(|_| ())
    }

    async fn authenticate(
        &mut self,
        path: &str,
        username: &str,
        password: &str,
    ) -> Result<AuthData, ApiError> {
        let request = self
            .http
            .post(self.url(path))
            .json(&CredentialsRequest::new(username, password));
        let session = self.send::<ApiResponse<AuthData>>(request).await?.data;
        self.session = Some(session.clone());
        Ok(session)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn authorized(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let session = self.session.as_ref().ok_or(ApiError::NotLoggedIn)?;
        Ok(self
            .http
            .request(method, self.url(path))
            .bearer_auth(&session.token))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if status.is_success() {
            return serde_json::from_slice(&body).map_err(|e| ApiError::Decode(e.to_string()));
        }

        let message = serde_json::from_slice::<MessageResponse>(&body)
            .map(|b| b.message)
            .unwrap_or_else(|_| String::from_utf8_lossy(&body).into_owned());
        Err(ApiError::from_status(status, message))
    }
}
