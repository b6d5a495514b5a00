use crate::{
    auth::{AuthData, CredentialStore, CredentialsRequest, TokenKeys},
    error::{AppError, AuthFailure},
    models::ApiResponse,
};
use actix_web::{post, web, HttpResponse, Responder};

/// Register a new user
///
/// Creates a new account and returns it together with a bearer token.
///
/// ## Responses:
/// - `201 Created`: `{status: "success", data: {id, username, token}}`.
/// - `400 Bad Request`: missing/empty fields, over-long fields, or a taken username.
/// - `500 Internal Server Error`: hashing or persistence failure.
#[post("/register")]
pub async fn register(
    credentials: web::Data<CredentialStore>,
    tokens: web::Data<TokenKeys>,
    body: web::Json<CredentialsRequest>,
) -> Result<impl Responder, AppError> {
    let (username, password) = body.into_inner().into_parts()?;

    let user = credentials.register(&username, &password).await?;
    let token = tokens.issue(user.id)?;
    log::info!("registered user {} ({})", user.id, user.username);

    Ok(HttpResponse::Created().json(ApiResponse::success(AuthData {
        id: user.id,
        username: user.username,
        token,
    })))
}

/// Login user
///
/// Checks the credentials and returns a fresh bearer token.
///
/// ## Responses:
/// - `200 OK`: `{status: "success", data: {id, username, token}}`.
/// - `400 Bad Request`: missing/empty fields.
/// - `401 Unauthorized`: `"Invalid credentials"`, for an unknown username and a wrong
///   password alike.
#[post("/login")]
pub async fn login(
    credentials: web::Data<CredentialStore>,
    tokens: web::Data<TokenKeys>,
    body: web::Json<CredentialsRequest>,
) -> Result<impl Responder, AppError> {
    let (username, password) = body.into_inner().into_parts()?;

    let user = match credentials.find_by_username(&username).await? {
        Some(user) => user,
        None => {
            credentials.reject_unknown(&password).await?;
            return Err(AppError::Unauthorized(AuthFailure::InvalidCredentials));
        }
    };

    if !credentials.verify(&password, &user.password_hash).await? {
        return Err(AppError::Unauthorized(AuthFailure::InvalidCredentials));
    }

    let token = tokens.issue(user.id)?;
    log::info!("user {} logged in", user.id);

    Ok(HttpResponse::Ok().json(ApiResponse::success(AuthData {
        id: user.id,
        username: user.username,
        token,
    })))
}
