use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::repositories::{UserRepository, UserStore};
use crate::services::AuthService;

/// アプリケーション共有状態
///
/// axum の State として全ハンドラーで共有される。
/// Clone は必須（axum が内部で clone するため）。
#[derive(Clone)]
pub struct AppState {
    /// 認証サービス（ストアは注入済み）
    pub auth_service: AuthService,
    /// アプリケーション設定（Arc で共有）
    pub config: Arc<Config>,
}

impl AppState {
    /// PostgreSQL プールから AppState を作成
    pub fn new(db_pool: PgPool, config: Config) -> Self {
        Self::with_store(Arc::new(UserRepository::new(db_pool)), config)
    }

    /// 任意のストア実装から AppState を作成
    pub fn with_store(store: Arc<dyn UserStore>, config: Config) -> Self {
        let auth_service = AuthService::new(store, config.reset_token_ttl());
        Self {
            auth_service,
            config: Arc::new(config),
        }
    }
}
