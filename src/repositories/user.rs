use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;

use super::{StoreError, UserStore};
use crate::models::User;

const SCHEMA_SQL: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/sql/schema.sql"));

/// PostgreSQL 実装のユーザーリポジトリ
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// users テーブルが存在しなければ作成
    pub async fn ensure_schema(&self) -> Result<(), sqlx::Error> {
        sqlx::query(SCHEMA_SQL).execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash)
            VALUES ($1, $2)
            RETURNING id, email, password_hash, created_at, reset_token, reset_token_expires_at
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            // UNIQUE制約違反チェック
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                return StoreError::EmailTaken;
            }
            StoreError::Database(e)
        })
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, created_at, reset_token, reset_token_expires_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn update_reset_token(
        &self,
        email: &str,
        token_hash: &str,
        expires_at: OffsetDateTime,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET reset_token = $1, reset_token_expires_at = $2
            WHERE email = $3
            "#,
        )
        .bind(token_hash)
        .bind(expires_at)
        .bind(email)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// # Note
    /// password_hash はログに出力しないこと
    async fn update_password(&self, user_id: i32, password_hash: &str) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            UPDATE users
            SET password_hash = $2, reset_token = NULL, reset_token_expires_at = NULL
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use sqlx::{Postgres, Type, TypeInfo};

    use super::*;

    /// 既存の SERIAL (INT4) 主キーのテーブルとも互換であること
    #[test]
    fn test_id_column_matches_int4() {
        assert!(SCHEMA_SQL.contains("id SERIAL PRIMARY KEY"));
        assert_eq!(<i32 as Type<Postgres>>::type_info().name(), "INT4");
    }

    #[test]
    fn test_schema_is_idempotent() {
        assert!(SCHEMA_SQL.contains("CREATE TABLE IF NOT EXISTS users"));
        assert!(SCHEMA_SQL.contains("email TEXT UNIQUE NOT NULL"));
    }
}
