use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use garde::Validate;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::services::auth::EMAIL_AND_PASSWORD_REQUIRED;
use crate::state::AppState;

/// ログインリクエスト
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[garde(length(min = 1))]
    pub email: String,
    #[serde(default)]
    #[garde(length(min = 1))]
    pub password: String,
}

/// ログインレスポンス
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
}

/// ログインハンドラー
///
/// POST /api/login
///
/// 資格情報の照合のみ行う（セッション・トークンは発行しない）。
/// ユーザー不在とパスワード不一致は同一の 401 を返す。
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let Json(request) = payload?;
    request
        .validate()
        .map_err(|_| AppError::validation(EMAIL_AND_PASSWORD_REQUIRED))?;

    state
        .auth_service
        .login(&request.email, &request.password)
        .await?;

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
    }))
}
