use crate::state::AppState;
use axum::{
    routing::{patch, post},
    Router,
};

pub mod codes;
mod dto;
pub(crate) mod extractors;
pub mod handlers;
pub mod jwt;
pub mod password;
pub mod repo;
pub mod repo_types;
pub mod validation;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(handlers::signup))
        .route("/signin", post(handlers::signin))
        .route("/logout", post(handlers::logout))
        .route("/sendcode", patch(handlers::send_verification_code))
        .route("/verify", patch(handlers::verify_verification_code))
        .route("/changepassword", patch(handlers::change_password))
}
