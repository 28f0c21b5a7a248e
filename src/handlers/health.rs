use axum::Json;
use serde::Serialize;

/// ヘルスチェックレスポンス
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
}

/// ヘルスチェックハンドラー
///
/// GET /api/health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { ok: true })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_check_returns_ok() {
        let response = health_check().await;
        assert!(response.ok);
        assert_eq!(
            serde_json::to_value(&response.0).unwrap(),
            serde_json::json!({ "ok": true })
        );
    }
}
