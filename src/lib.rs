#![doc = "The `tasknest` library crate."]
#![doc = ""]
#![doc = "Authentication (credential storage, token issuance, bearer-token identity"]
#![doc = "middleware), per-user task CRUD, persistence backends, error handling and a"]
#![doc = "typed HTTP client. The binary (`main.rs`) wires these into an actix-web server."]

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;

pub use error::{AppError, AuthFailure};
pub use state::AppState;
