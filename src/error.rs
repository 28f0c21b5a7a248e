use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::repositories::StoreError;

/// 認証失敗時のメッセージ（ユーザー不在・パスワード不一致で共通）
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

const INTERNAL_SERVER_ERROR: &str = "Internal server error";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("バリデーションエラー: {0}")]
    Validation(String),

    #[error("競合エラー: {0}")]
    Conflict(String),

    #[error("認証エラー")]
    Authentication,

    #[error("データベースエラー")]
    Database(#[from] sqlx::Error),

    #[error("内部エラー")]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Authentication => StatusCode::UNAUTHORIZED,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::EmailTaken => Self::Conflict("Email already exists".to_string()),
            StoreError::Database(e) => Self::Database(e),
        }
    }
}

/// JSON として解釈できないボディも `{error}` 形式の 400 で返す
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "リクエストボディの解析に失敗");
        Self::Validation("Invalid JSON body".to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            Self::Validation(msg) | Self::Conflict(msg) => msg,
            Self::Authentication => INVALID_CREDENTIALS.to_string(),
            Self::Database(e) => {
                tracing::error!(error = ?e, "データベースエラー");
                INTERNAL_SERVER_ERROR.to_string()
            }
            Self::Internal(e) => {
                tracing::error!(error = ?e, "内部エラー");
                INTERNAL_SERVER_ERROR.to_string()
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
