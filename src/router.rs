use axum::{
    Router,
    body::Body,
    extract::MatchedPath,
    routing::{get, post},
};
use http::{HeaderValue, Method, Request, header::CONTENT_TYPE};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::{Span, info_span};

use crate::handlers;
use crate::state::AppState;

/// Router の構築
///
/// API は `/api` 配下、それ以外のパスはクライアントUI（静的ファイル）を返す。
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins());
    let static_files = ServeDir::new(&state.config.static_dir);

    Router::new()
        .route("/api/health", get(handlers::health_check))
        .route("/api/signup", post(handlers::signup))
        .route("/api/login", post(handlers::login))
        .route("/api/forgot", post(handlers::forgot_password))
        .route("/api/reset", post(handlers::reset_password))
        .fallback_service(static_files)
        .layer(cors)
        .layer(TraceLayer::new_for_http().make_span_with(make_span))
        .with_state(state)
}

/// CORS レイヤー
///
/// 許可オリジン未設定時は全オリジンを許可する（デモ用途のみ）
fn cors_layer(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_headers([CONTENT_TYPE])
        .allow_methods([Method::GET, Method::POST]);

    if origins.is_empty() {
        tracing::warn!("CORS: 全オリジンを許可（本番環境では CORS_ALLOWED_ORIGINS を設定すること）");
        return cors.allow_origin(Any);
    }

    cors.allow_origin(AllowOrigin::list(allowed_origins(origins)))
}

/// 設定値をヘッダー値に変換（不正なオリジンは警告して除外）
fn allowed_origins(origins: &[String]) -> Vec<HeaderValue> {
    origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(origin = %origin, error = ?e, "無効な CORS オリジンを無視");
                None
            }
        })
        .collect()
}

fn make_span(request: &Request<Body>) -> Span {
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
    )
}
