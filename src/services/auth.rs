use std::sync::{Arc, LazyLock};

use time::{Duration, OffsetDateTime};

use crate::error::AppError;
use crate::models::PublicUser;
use crate::repositories::UserStore;
use crate::services::password::{hash_password, verify_password};
use crate::services::reset_token::{generate_token, hash_token, tokens_match};

pub const EMAIL_AND_PASSWORD_REQUIRED: &str = "Email and password required";
pub const EMAIL_REQUIRED: &str = "Email required";
pub const RESET_FIELDS_REQUIRED: &str = "Email, token, newPassword required";
pub const INVALID_TOKEN: &str = "Invalid token";
pub const TOKEN_EXPIRED: &str = "Token expired";

/// ユーザー不在時の検証に使うダミーハッシュ
///
/// 起動時に `prepare_dummy_hash` で生成しておくこと（初回ログインに生成コストを乗せない）
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("keygate-dummy-password").ok());

/// パスワードリセット要求の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForgotOutcome {
    /// 発行したトークン（平文）。ユーザー不在時は `None`
    pub token: Option<String>,
}

/// 認証サービス
///
/// ストアは外部から注入する（プロセス共有のグローバル状態は持たない）。
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn UserStore>,
    reset_token_ttl: Duration,
}

impl AuthService {
    /// 新しい AuthService を作成
    pub fn new(store: Arc<dyn UserStore>, reset_token_ttl: Duration) -> Self {
        Self {
            store,
            reset_token_ttl,
        }
    }

    /// ユーザー登録
    ///
    /// # Errors
    /// - email が空: `AppError::Validation`
    /// - email が既に存在: `AppError::Conflict`
    pub async fn signup(&self, email: &str, password: &str) -> Result<PublicUser, AppError> {
        let email = normalize_email(email)
            .ok_or_else(|| AppError::validation(EMAIL_AND_PASSWORD_REQUIRED))?;
        if password.is_empty() {
            return Err(AppError::validation(EMAIL_AND_PASSWORD_REQUIRED));
        }

        let password_hash = hash_blocking(password).await?;
        let user = self.store.create_user(&email, &password_hash).await?;

        tracing::info!(user_id = user.id, email = %user.email, "ユーザー登録成功");

        Ok(user.into())
    }

    /// ログイン（資格情報の照合のみ、セッションは発行しない）
    ///
    /// タイミング攻撃対策: ユーザーが存在しない場合もダミーのパスワード検証を実行
    pub async fn login(&self, email: &str, password: &str) -> Result<(), AppError> {
        let email = normalize_email(email)
            .ok_or_else(|| AppError::validation(EMAIL_AND_PASSWORD_REQUIRED))?;
        if password.is_empty() {
            return Err(AppError::validation(EMAIL_AND_PASSWORD_REQUIRED));
        }

        match self.store.find_by_email(&email).await? {
            Some(user) => {
                if verify_blocking(password, &user.password_hash).await? {
                    tracing::info!(user_id = user.id, "認証成功");
                    Ok(())
                } else {
                    tracing::warn!(email = %email, "認証失敗: パスワード不一致");
                    Err(AppError::Authentication)
                }
            }
            None => {
                let _ = verify_dummy_blocking(password).await;
                tracing::warn!(email = %email, "認証失敗: ユーザー不在");
                Err(AppError::Authentication)
            }
        }
    }

    /// パスワードリセットトークンを発行
    ///
    /// # Security
    /// - ユーザーが存在しない場合も成功を返す（`token: None`）
    /// - DB にはトークンのハッシュのみ保存し、平文はログに出力しない
    pub async fn forgot_password(&self, email: &str) -> Result<ForgotOutcome, AppError> {
        let email = normalize_email(email).ok_or_else(|| AppError::validation(EMAIL_REQUIRED))?;

        let token = generate_token();
        let expires_at = OffsetDateTime::now_utc() + self.reset_token_ttl;

        // 同一ユーザーへの同時リクエストは後勝ち（最新のトークンのみ有効）
        let updated = self
            .store
            .update_reset_token(&email, &hash_token(&token), expires_at)
            .await?;

        if !updated {
            tracing::info!(email = %email, "パスワードリセット: ユーザー不在（成功レスポンス返却）");
            return Ok(ForgotOutcome { token: None });
        }

        tracing::info!(email = %email, expires_at = %expires_at, "パスワードリセットトークン発行");

        Ok(ForgotOutcome { token: Some(token) })
    }

    /// パスワードをリセット
    ///
    /// 成功時はトークンを破棄するため、同じトークンは二度使えない。
    ///
    /// # Security
    /// - トークン・新パスワードはログに出力しない
    pub async fn reset_password(
        &self,
        email: &str,
        token: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        let email =
            normalize_email(email).ok_or_else(|| AppError::validation(RESET_FIELDS_REQUIRED))?;
        if token.is_empty() || new_password.is_empty() {
            return Err(AppError::validation(RESET_FIELDS_REQUIRED));
        }

        let user = self
            .store
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AppError::validation(INVALID_TOKEN))?;

        let (Some(stored_hash), Some(expires_at)) =
            (user.reset_token.as_deref(), user.reset_token_expires_at)
        else {
            tracing::warn!(user_id = user.id, "リセットトークン未発行");
            return Err(AppError::validation(INVALID_TOKEN));
        };

        if !tokens_match(stored_hash, token) {
            tracing::warn!(user_id = user.id, "リセットトークン不一致");
            return Err(AppError::validation(INVALID_TOKEN));
        }

        if expires_at < OffsetDateTime::now_utc() {
            tracing::warn!(user_id = user.id, "期限切れトークン");
            return Err(AppError::validation(TOKEN_EXPIRED));
        }

        let password_hash = hash_blocking(new_password).await?;
        self.store.update_password(user.id, &password_hash).await?;

        tracing::info!(user_id = user.id, "パスワードリセット完了");

        Ok(())
    }
}

/// メールアドレスを正規化（前後の空白除去 + 小文字化）
///
/// 正規化後に空になる場合は `None`
pub fn normalize_email(email: &str) -> Option<String> {
    let normalized = email.trim().to_lowercase();
    (!normalized.is_empty()).then_some(normalized)
}

/// ダミーハッシュを生成（ブロッキング処理、`spawn_blocking` から呼ぶこと）
///
/// # Returns
/// 生成に成功した場合 `true`
pub fn prepare_dummy_hash() -> bool {
    DUMMY_HASH.is_some()
}

/// argon2 は CPU 負荷が高いためブロッキングスレッドで実行
async fn hash_blocking(password: &str) -> Result<String, AppError> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(e.into()))?
}

async fn verify_blocking(password: &str, hash: &str) -> Result<bool, AppError> {
    let password = password.to_string();
    let hash = hash.to_string();
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| AppError::Internal(e.into()))?
}

/// ユーザー不在時のダミー検証（未生成ならブロッキングスレッド上で生成）
async fn verify_dummy_blocking(password: &str) -> Result<bool, AppError> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || match DUMMY_HASH.as_deref() {
        Some(dummy_hash) => verify_password(&password, dummy_hash),
        None => Ok(false),
    })
    .await
    .map_err(|e| AppError::Internal(e.into()))?
}
