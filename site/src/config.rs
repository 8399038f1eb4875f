use std::path::PathBuf;

use rand_core::{OsRng, RngCore};

pub const DEFAULT_ADMIN_EMAIL: &str = "admin@rommelaere-renov.com";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";
pub const DEFAULT_COOKIE_NAME: &str = "app_session_id";

/// Process configuration, read from the environment (and `.env`, if present).
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: Option<String>,
    pub session: SessionConfig,
    pub admin_email: String,
    pub admin_password: String,
    pub host: String,
    pub port: u16,
    /// How many consecutive ports to try when `port` is busy.
    pub port_attempts: u16,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub static_dir: Option<PathBuf>,
    pub site_url: String,
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub secret: String,
    pub cookie_name: String,
    pub ttl_days: u64,
    pub secure_cookies: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let secret = get("JWT_SECRET").unwrap_or_else(|| {
            tracing::warn!(
                "JWT_SECRET not set; using a random secret. \
                 Sessions will be invalidated on every restart."
            );
            random_secret()
        });

        Self {
            database_url: get("DATABASE_URL"),
            session: SessionConfig {
                secret,
                cookie_name: get("SESSION_COOKIE_NAME")
                    .unwrap_or_else(|| DEFAULT_COOKIE_NAME.to_string()),
                ttl_days: parse_or(get("SESSION_TTL_DAYS"), 365),
                secure_cookies: parse_or(get("SECURE_COOKIES"), false),
            },
            admin_email: get("ADMIN_EMAIL").unwrap_or_else(|| DEFAULT_ADMIN_EMAIL.to_string()),
            admin_password: get("ADMIN_PASSWORD")
                .unwrap_or_else(|| DEFAULT_ADMIN_PASSWORD.to_string()),
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(get("PORT"), 3000),
            port_attempts: 20,
            upload_dir: get("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("uploads")),
            max_upload_bytes: parse_or(get("MAX_UPLOAD_BYTES"), 50 * 1024 * 1024),
            static_dir: get("STATIC_DIR").map(PathBuf::from),
            site_url: get("SITE_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|| "https://rommelaere-renov.be".to_string()),
            cors_allowed_origins: get("CORS_ALLOWED_ORIGINS")
                .unwrap_or_default()
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn uses_default_admin_password(&self) -> bool {
        self.admin_password == DEFAULT_ADMIN_PASSWORD
    }
}

fn parse_or<T: std::str::FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

fn random_secret() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
