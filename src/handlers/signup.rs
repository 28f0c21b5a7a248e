use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use garde::Validate;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::PublicUser;
use crate::services::auth::EMAIL_AND_PASSWORD_REQUIRED;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[serde(default)]
    #[garde(length(min = 1))]
    pub email: String,
    #[serde(default)]
    #[garde(length(min = 1))]
    pub password: String, // SecretBox不要（Deserialize後すぐハッシュ化）
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub user: PublicUser,
}

/// ユーザー登録ハンドラー
///
/// POST /api/signup
///
/// # Security
/// - パスワードはログに出力しない
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SignupResponse>), AppError> {
    let Json(request) = payload?;
    request
        .validate()
        .map_err(|_| AppError::validation(EMAIL_AND_PASSWORD_REQUIRED))?;

    let user = state
        .auth_service
        .signup(&request.email, &request.password)
        .await?;

    Ok((StatusCode::CREATED, Json(SignupResponse { user })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_empty_email() {
        let request = SignupRequest {
            email: "".to_string(),
            password: "pw1".to_string(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_validate_empty_password() {
        let request = SignupRequest {
            email: "a@x.com".to_string(),
            password: "".to_string(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_missing_fields_deserialize_as_empty() {
        let request: SignupRequest = serde_json::from_str(r#"{"email":"a@x.com"}"#).unwrap();
        assert_eq!(request.password, "");
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_validate_valid_request() {
        let request = SignupRequest {
            email: "a@x.com".to_string(),
            password: "pw1".to_string(),
        };
        assert!(request.validate().is_ok());
    }
}
