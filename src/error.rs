use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Business-rule failures for the auth flows. Every variant maps to a fixed
/// HTTP status and a client-facing message; internals never leak past
/// `Internal`.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),
    #[error("Email already exists")]
    DuplicateEmail,
    /// Unknown email and wrong password intentionally share one message so
    /// responses cannot be used to enumerate accounts.
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("User not found")]
    NotFound,
    #[error("You are already verified")]
    AlreadyVerified,
    #[error("Something is wrong with the code!")]
    NoCodeIssued,
    #[error("Code has expired")]
    CodeExpired,
    #[error("Invalid verification code")]
    CodeMismatch,
    #[error("You are not verified")]
    NotVerified,
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Verification code sent failed")]
    MailDelivery(#[source] anyhow::Error),
    #[error("Server error")]
    Internal(#[from] anyhow::Error),
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            // Validation and duplicate email return 401, not 400; the
            // public API contract pins these statuses.
            AuthError::Validation(_)
            | AuthError::DuplicateEmail
            | AuthError::InvalidCredentials
            | AuthError::NotVerified => StatusCode::UNAUTHORIZED,
            AuthError::NotFound => StatusCode::NOT_FOUND,
            AuthError::AlreadyVerified
            | AuthError::NoCodeIssued
            | AuthError::CodeExpired
            | AuthError::CodeMismatch
            | AuthError::MailDelivery(_) => StatusCode::BAD_REQUEST,
            AuthError::Unauthorized => StatusCode::FORBIDDEN,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match &self {
            AuthError::Internal(e) => error!(error = %e, "internal error"),
            AuthError::MailDelivery(e) => error!(error = %e, "mail transport rejected message"),
            _ => {}
        }
        let body = Json(json!({
            "success": false,
            "message": self.to_string(),
        }));
        (self.status(), body).into_response()
    }
}

impl From<sqlx::Error> for AuthError {
    fn from(e: sqlx::Error) -> Self {
        AuthError::Internal(e.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_match_contract() {
        assert_eq!(
            AuthError::Validation("bad email".into()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AuthError::DuplicateEmail.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AuthError::InvalidCredentials.status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AuthError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(AuthError::AlreadyVerified.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AuthError::NoCodeIssued.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AuthError::CodeExpired.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AuthError::CodeMismatch.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AuthError::NotVerified.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::Unauthorized.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            AuthError::Internal(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_error_does_not_leak_cause() {
        let err = AuthError::Internal(anyhow::anyhow!("connection refused on 10.0.0.3"));
        assert_eq!(err.to_string(), "Server error");
    }

    #[tokio::test]
    async fn response_body_has_envelope_shape() {
        let resp = AuthError::CodeExpired.into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let v: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(v["success"], false);
        assert_eq!(v["message"], "Code has expired");
    }
}
