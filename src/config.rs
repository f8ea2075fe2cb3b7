use std::env;
use std::path::PathBuf;

/// Process configuration, read from the environment exactly once at startup
/// and passed to the components that need it. Nothing else reads env vars.
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Base for public object URLs; when unset, derived from the bound port.
    pub public_base_url: Option<String>,
    /// Directory the filesystem storage backend writes into.
    pub media_root: PathBuf,
    pub jwt_secret: String,
    pub access_token_hours: i64,
    pub refresh_token_days: i64,
    pub cors_allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Self {
        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://coursenotes.db?mode=rwc".to_string());

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            if cfg!(debug_assertions) {
                "secret".to_string()
            } else {
                panic!("JWT_SECRET environment variable must be set in production");
            }
        });

        Self {
            database_url,
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
            public_base_url: env::var("PUBLIC_BASE_URL").ok(),
            media_root: env::var("MEDIA_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("media")),
            jwt_secret,
            access_token_hours: env::var("ACCESS_TOKEN_HOURS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(24),
            refresh_token_days: env::var("REFRESH_TOKEN_DAYS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(7),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .ok()
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_else(Vec::new),
        }
    }
}
