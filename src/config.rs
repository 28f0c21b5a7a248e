use secrecy::SecretBox;
use serde::Deserialize;
use time::Duration;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub database_url: SecretBox<String>,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_database_max_connections")]
    pub database_max_connections: u32,

    // パスワードリセット設定
    #[serde(default = "default_password_reset_token_ttl_secs")]
    pub password_reset_token_ttl_secs: i64,

    // クライアントUI（静的ファイル）の配置ディレクトリ
    #[serde(default = "default_static_dir")]
    pub static_dir: String,

    /// CORS 許可オリジン（カンマ区切り、未設定なら全オリジン許可）
    #[serde(default)]
    pub cors_allowed_origins: Option<String>,
}

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3001;
const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_PASSWORD_RESET_TOKEN_TTL_SECS: i64 = 15 * 60;
const DEFAULT_STATIC_DIR: &str = "static";

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_database_max_connections() -> u32 {
    DEFAULT_DATABASE_MAX_CONNECTIONS
}

fn default_password_reset_token_ttl_secs() -> i64 {
    DEFAULT_PASSWORD_RESET_TOKEN_TTL_SECS
}

fn default_static_dir() -> String {
    DEFAULT_STATIC_DIR.to_string()
}

impl Config {
    pub fn load() -> Result<Self, envy::Error> {
        envy::from_env()
    }

    /// リセットトークンの有効期間
    pub fn reset_token_ttl(&self) -> Duration {
        Duration::seconds(self.password_reset_token_ttl_secs)
    }

    /// CORS 許可オリジン一覧（空なら全オリジン許可）
    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_allowed_origins
            .as_deref()
            .map(|origins| {
                origins
                    .split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<Vec<_>>();
        envy::from_iter(vars).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[("DATABASE_URL", "postgres://localhost/keygate")]);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3001);
        assert_eq!(config.database_max_connections, 5);
        assert_eq!(config.reset_token_ttl(), Duration::minutes(15));
        assert_eq!(config.static_dir, "static");
        assert!(config.cors_origins().is_empty());
    }

    #[test]
    fn test_missing_database_url() {
        let result = envy::from_iter::<_, Config>(vec![("PORT".to_string(), "8080".to_string())]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cors_origins_are_trimmed() {
        let config = config_from(&[
            ("DATABASE_URL", "postgres://localhost/keygate"),
            (
                "CORS_ALLOWED_ORIGINS",
                "http://localhost:5173, https://app.example.com ,",
            ),
        ]);
        assert_eq!(
            config.cors_origins(),
            vec!["http://localhost:5173", "https://app.example.com"]
        );
    }
}
