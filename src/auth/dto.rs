use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::repo_types::User;

/// Request body for signup and signin.
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

/// Request body for requesting a verification code.
#[derive(Debug, Deserialize)]
pub struct SendCodeRequest {
    pub email: String,
}

/// Request body for redeeming a verification code.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyCodeRequest {
    pub email: String,
    pub provided_code: String,
}

/// Request body for rotating the password.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

/// Public projection of an account; no secret fields.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
    pub verified: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            verified: user.verified,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub success: bool,
    pub message: String,
    pub result: PublicUser,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub success: bool,
    pub token: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub success: bool,
    pub message: String,
}

impl StatusResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_user_omits_secret_fields() {
        let user = User {
            id: Uuid::new_v4(),
            email: "user@test.com".into(),
            password_hash: "$2b$12$secret".into(),
            verified: false,
            verification_code: Some("digest".into()),
            verification_code_sent_at: Some(OffsetDateTime::now_utc()),
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        };
        let json = serde_json::to_string(&PublicUser::from(&user)).unwrap();
        assert!(json.contains("user@test.com"));
        assert!(!json.contains("secret"));
        assert!(!json.contains("digest"));
    }

    #[test]
    fn camel_case_request_fields_deserialize() {
        let req: VerifyCodeRequest =
            serde_json::from_str(r#"{"email":"user@test.com","providedCode":"123456"}"#).unwrap();
        assert_eq!(req.provided_code, "123456");

        let req: ChangePasswordRequest =
            serde_json::from_str(r#"{"oldPassword":"Abcd1234!","newPassword":"Efgh5678!"}"#)
                .unwrap();
        assert_eq!(req.old_password, "Abcd1234!");
        assert_eq!(req.new_password, "Efgh5678!");
    }
}
