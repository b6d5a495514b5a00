use serde::Serialize;
use sqlx::FromRow;

/// A registered account as persisted in the `users` table.
///
/// `id` and `username` never change after registration. The password hash is
/// never serialized into API responses.
#[derive(Debug, Clone, Serialize, FromRow, PartialEq, Eq)]
pub struct User {
    pub id: i32,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}
