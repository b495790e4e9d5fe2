use crate::auth::repo_types::User;
use sqlx::PgPool;
use time::OffsetDateTime;

const USER_COLUMNS: &str = "id, email, password_hash, role_id, email_verified, \
                            reset_token, reset_token_expiry, reset_nonce, created_at, updated_at";

impl User {
    /// Find a user by email. Exact, case-sensitive match.
    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn find_by_id(db: &PgPool, id: i32) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Create a new user with an already-hashed password. The role link is a
    /// NOT NULL foreign key, so the row either lands complete or not at all;
    /// a duplicate email surfaces as the store's unique-violation error.
    pub async fn create(
        db: &PgPool,
        email: &str,
        password_hash: &str,
        role_id: i32,
    ) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (email, password_hash, role_id)
             VALUES ($1, $2, $3)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(email)
        .bind(password_hash)
        .bind(role_id)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    /// Persist a freshly issued reset token. Overwrites any outstanding
    /// token, expiry and nonce in one atomic write, so issuing supersedes.
    pub async fn store_reset_token(
        db: &PgPool,
        id: i32,
        token: &str,
        expiry: OffsetDateTime,
        nonce: &str,
    ) -> anyhow::Result<()> {
        sqlx::query(
            "UPDATE users
             SET reset_token = $2, reset_token_expiry = $3, reset_nonce = $4, updated_at = now()
             WHERE id = $1",
        )
        .bind(id)
        .bind(token)
        .bind(expiry)
        .bind(nonce)
        .execute(db)
        .await?;
        Ok(())
    }

    /// Replace the password hash and clear the reset-token state in the same
    /// atomic write, so a consumed token cannot be replayed.
    pub async fn reset_password(db: &PgPool, id: i32, new_hash: &str) -> anyhow::Result<()> {
        sqlx::query(
            "UPDATE users
             SET password_hash = $2,
                 reset_token = NULL, reset_token_expiry = NULL, reset_nonce = NULL,
                 updated_at = now()
             WHERE id = $1",
        )
        .bind(id)
        .bind(new_hash)
        .execute(db)
        .await?;
        Ok(())
    }
}
