/*
 * Responsibility
 * - 環境変数や設定の読み込み (DATABASE_URL, archive config の場所, session cookie, HTTP 制限など)
 * - 設定値のバリデーション (不足なら起動失敗)
 * - リクエストごとに読み直す archive config は services::archive 側の責務
 */
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn parse(value: Option<&str>) -> Self {
        match value
            .unwrap_or("development")
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Transport limits applied by `middleware::http`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpLimits {
    pub request_timeout: Duration,
    pub body_limit_bytes: usize,
}

impl Default for HttpLimits {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            body_limit_bytes: 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub database_url: String,

    pub app_env: AppEnv,

    pub archive_config_path: PathBuf,
    pub session_cookie_name: String,

    pub http: HttpLimits,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup (tests pass a map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = match lookup("PORT") {
            Some(v) => v.parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };
        let addr = SocketAddr::from(([0, 0, 0, 0], port));

        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let app_env = AppEnv::parse(lookup("APP_ENV").as_deref());

        let archive_config_path = lookup("ARCHIVE_CONFIG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("config/archive.toml"));

        let session_cookie_name = lookup("SESSION_COOKIE_NAME")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| "_session_id".to_string());

        let defaults = HttpLimits::default();

        let request_timeout = match lookup("REQUEST_TIMEOUT_SECONDS") {
            Some(v) => v
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or(ConfigError::Invalid("REQUEST_TIMEOUT_SECONDS"))?,
            None => defaults.request_timeout,
        };

        let body_limit_bytes = match lookup("REQUEST_BODY_LIMIT_BYTES") {
            Some(v) => v
                .parse::<usize>()
                .map_err(|_| ConfigError::Invalid("REQUEST_BODY_LIMIT_BYTES"))?,
            None => defaults.body_limit_bytes,
        };

        Ok(Self {
            addr,
            database_url,
            app_env,
            archive_config_path,
            session_cookie_name,
            http: HttpLimits {
                request_timeout,
                body_limit_bytes,
            },
        })
    }
}
