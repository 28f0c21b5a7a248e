pub mod memory;
pub mod user;

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::models::User;

pub use memory::MemoryUserStore;
pub use user::UserRepository;

/// ストア層のエラー
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// email の UNIQUE 制約違反
    #[error("email already exists")]
    EmailTaken,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// ユーザー（認証情報）ストア
///
/// 各操作は単一行・単一ステートメントで完結する。
/// email は呼び出し側で正規化済み（trim + 小文字化）であること。
#[async_trait]
pub trait UserStore: Send + Sync {
    /// 新しいユーザーを作成
    ///
    /// # Errors
    /// - email が既に存在する場合: `StoreError::EmailTaken`
    async fn create_user(&self, email: &str, password_hash: &str) -> Result<User, StoreError>;

    /// メールアドレスでユーザーを検索
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// リセットトークン（ハッシュ）と有効期限を設定
    ///
    /// # Returns
    /// 該当ユーザーが存在し更新された場合 `true`
    async fn update_reset_token(
        &self,
        email: &str,
        token_hash: &str,
        expires_at: OffsetDateTime,
    ) -> Result<bool, StoreError>;

    /// パスワードを更新し、リセットトークンを同一ステートメントで破棄
    async fn update_password(&self, user_id: i32, password_hash: &str) -> Result<(), StoreError>;
}
