use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::repo_types::User;
use crate::error::AuthError;

impl User {
    /// Find an account by its normalized email.
    pub async fn find_by_email(db: &PgPool, email: &str) -> Result<Option<User>, AuthError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, verified, verification_code,
                   verification_code_sent_at, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> Result<Option<User>, AuthError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, verified, verification_code,
                   verification_code_sent_at, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Create an account with a hashed password. The unique constraint on
    /// `email` closes the check-then-insert race; its violation maps to the
    /// duplicate-email error rather than a 500.
    pub async fn create(db: &PgPool, email: &str, password_hash: &str) -> Result<User, AuthError> {
        let result = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash)
            VALUES ($1, $2)
            RETURNING id, email, password_hash, verified, verification_code,
                      verification_code_sent_at, created_at, updated_at
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(db)
        .await;

        match result {
            Ok(user) => Ok(user),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(AuthError::DuplicateEmail)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Store a freshly issued code digest with its issuance timestamp.
    pub async fn set_verification_code(
        db: &PgPool,
        id: Uuid,
        code_digest: &str,
    ) -> Result<(), AuthError> {
        sqlx::query(
            r#"
            UPDATE users
            SET verification_code = $2,
                verification_code_sent_at = now(),
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(code_digest)
        .execute(db)
        .await?;
        Ok(())
    }

    /// Flip the account to verified and clear both code fields together.
    pub async fn mark_verified(db: &PgPool, id: Uuid) -> Result<(), AuthError> {
        sqlx::query(
            r#"
            UPDATE users
            SET verified = TRUE,
                verification_code = NULL,
                verification_code_sent_at = NULL,
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(db)
        .await?;
        Ok(())
    }

    pub async fn update_password(
        db: &PgPool,
        id: Uuid,
        password_hash: &str,
    ) -> Result<(), AuthError> {
        sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $2,
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(password_hash)
        .execute(db)
        .await?;
        Ok(())
    }
}
