use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Account record in the database. Secret-bearing fields never serialize.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // bcrypt digest, not exposed in JSON
    pub verified: bool,
    #[serde(skip_serializing)]
    pub verification_code: Option<String>, // keyed digest of the last issued code
    #[serde(skip_serializing)]
    pub verification_code_sent_at: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}
