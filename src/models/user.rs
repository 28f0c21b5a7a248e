use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

/// 認証情報を保持するユーザー
///
/// `reset_token` には平文ではなく SHA256 ハッシュを保存する。
/// `reset_token` と `reset_token_expires_at` は常に両方 NULL か両方設定済み。
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub password_hash: String,
    pub created_at: OffsetDateTime,
    pub reset_token: Option<String>,
    pub reset_token_expires_at: Option<OffsetDateTime>,
}

/// クライアントに返却するユーザー情報（password_hash を含まない）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicUser {
    pub id: i32,
    pub email: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            created_at: user.created_at,
        }
    }
}
