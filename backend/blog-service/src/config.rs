/// Configuration management for Blog Service
///
/// Everything is read from environment variables (after an optional `.env`
/// file). Database pool settings live in `db_pool::DbConfig`.
use db_pool::env_utils::{parse_env_flag, parse_env_or_default};
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// CORS configuration
    pub cors: CorsConfig,
    /// Blog behaviour knobs
    pub blog: BlogConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// Server port to bind to
    pub port: u16,
    /// Apply embedded migrations on startup
    pub run_migrations: bool,
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated list of allowed origins
    pub allowed_origins: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogConfig {
    /// Size of the `/posts/best` ranking
    pub best_posts_limit: i64,
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self { best_posts_limit: 3 }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        let is_production = app_env.eq_ignore_ascii_case("production");

        let allowed_origins = match std::env::var("CORS_ALLOWED_ORIGINS") {
            Ok(value) => value,
            Err(_) if is_production => {
                return Err("CORS_ALLOWED_ORIGINS must be set in production".to_string())
            }
            Err(_) => "http://localhost:3000".to_string(),
        };

        if is_production && allowed_origins.trim() == "*" {
            return Err("CORS_ALLOWED_ORIGINS cannot be '*' in production".to_string());
        }

        let best_posts_limit: i64 = parse_env_or_default("BEST_POSTS_LIMIT", 3)?;
        if best_posts_limit < 1 {
            return Err(format!(
                "BEST_POSTS_LIMIT must be at least 1, got {}",
                best_posts_limit
            ));
        }

        Ok(Config {
            app: AppConfig {
                env: app_env,
                host: std::env::var("BLOG_SERVICE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or_default("BLOG_SERVICE_PORT", 8080)?,
                run_migrations: parse_env_flag("RUN_MIGRATIONS", true)?,
            },
            cors: CorsConfig { allowed_origins },
            blog: BlogConfig { best_posts_limit },
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.app.host, self.app.port)
    }
}
