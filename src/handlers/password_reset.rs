use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use garde::Validate;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::services::auth::{EMAIL_REQUIRED, RESET_FIELDS_REQUIRED};
use crate::state::AppState;

// === リセットトークン発行 ===

#[derive(Debug, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[serde(default)]
    #[garde(length(min = 1))]
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct ForgotPasswordResponse {
    pub message: String,
    /// デモ用: 本来はメール等の別経路で届けるべきトークン
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// POST /api/forgot
///
/// # Security
/// ユーザー不在でも 200 を返す（存在有無を漏洩しない）
pub async fn forgot_password(
    State(state): State<AppState>,
    payload: Result<Json<ForgotPasswordRequest>, JsonRejection>,
) -> Result<Json<ForgotPasswordResponse>, AppError> {
    let Json(request) = payload?;
    request
        .validate()
        .map_err(|_| AppError::validation(EMAIL_REQUIRED))?;

    let outcome = state.auth_service.forgot_password(&request.email).await?;

    let response = match outcome.token {
        Some(token) => ForgotPasswordResponse {
            message: "Reset token generated".to_string(),
            token: Some(token),
        },
        None => ForgotPasswordResponse {
            message: "If that email exists, reset link sent".to_string(),
            token: None,
        },
    };

    Ok(Json(response))
}

// === パスワードリセット実行 ===

#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[serde(default)]
    #[garde(length(min = 1))]
    pub email: String,
    #[serde(default)]
    #[garde(length(min = 1))]
    pub token: String,
    #[serde(default, rename = "newPassword")]
    #[garde(length(min = 1))]
    pub new_password: String,
}

#[derive(Debug, Serialize)]
pub struct ResetPasswordResponse {
    pub message: String,
}

/// POST /api/reset
///
/// # Security
/// - token, newPassword はログに出力しない
pub async fn reset_password(
    State(state): State<AppState>,
    payload: Result<Json<ResetPasswordRequest>, JsonRejection>,
) -> Result<Json<ResetPasswordResponse>, AppError> {
    let Json(request) = payload?;
    request
        .validate()
        .map_err(|_| AppError::validation(RESET_FIELDS_REQUIRED))?;

    state
        .auth_service
        .reset_password(&request.email, &request.token, &request.new_password)
        .await?;

    Ok(Json(ResetPasswordResponse {
        message: "Password reset successful".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_empty_email() {
        let request = ForgotPasswordRequest {
            email: "".to_string(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_forgot_response_omits_missing_token() {
        let response = ForgotPasswordResponse {
            message: "If that email exists, reset link sent".to_string(),
            token: None,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("token").is_none());
    }

    #[test]
    fn test_reset_request_uses_camel_case_new_password() {
        let request: ResetPasswordRequest =
            serde_json::from_str(r#"{"email":"a@x.com","token":"t","newPassword":"pw2"}"#)
                .unwrap();
        assert_eq!(request.new_password, "pw2");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_validate_missing_token() {
        let request: ResetPasswordRequest =
            serde_json::from_str(r#"{"email":"a@x.com","newPassword":"pw2"}"#).unwrap();
        assert!(request.validate().is_err());
    }
}
