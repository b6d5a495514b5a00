use crate::error::AppError;
use actix_web::web;
use bcrypt::{hash, verify};

/// bcrypt work factor applied to every new password hash.
pub const HASH_COST: u32 = 10;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    Ok(hash(password, HASH_COST)?)
}

/// A malformed stored hash is a server-side failure, not a wrong password.
pub fn verify_password(password: &str, hashed_password: &str) -> Result<bool, AppError> {
    Ok(verify(password, hashed_password)?)
}

/// Hashes on the blocking thread pool so request workers keep serving other connections.
pub async fn hash_password_blocking(password: String) -> Result<String, AppError> {
    web::block(move || hash_password(&password)).await?
}

/// Verifies on the blocking thread pool.
pub async fn verify_password_blocking(
    password: String,
    hashed_password: String,
) -> Result<bool, AppError> {
    web::block(move || verify_password(&password, &hashed_password)).await?
}
