use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub cache: CacheConfig,
    pub bmkg: BmkgConfig,
    pub sync: SyncConfig,
    pub auth: AuthConfig,
    pub swagger: SwaggerConfig,
}

/// Run mode of the service, mirrors the usual debug/release split
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Debug,
    Release,
}

impl RunMode {
    fn parse(value: &str) -> Result<Self, String> {
        match value.trim().to_lowercase().as_str() {
            "debug" | "" => Ok(Self::Debug),
            "release" => Ok(Self::Release),
            other => Err(format!(
                "Invalid RUN_MODE '{}': expected 'debug' or 'release'",
                other
            )),
        }
    }

    /// Log filter used when RUST_LOG is not set
    pub fn default_log_filter(&self) -> &'static str {
        match self {
            Self::Debug => "debug,hyper=info,sqlx=warn",
            Self::Release => "info",
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub run_mode: RunMode,
    /// Empty means every origin is allowed
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub redis_url: String,
}

/// Upstream BMKG (Badan Meteorologi, Klimatologi, dan Geofisika) API settings
#[derive(Debug, Clone)]
pub struct BmkgConfig {
    pub base_url: String,
    /// Requests per minute the upstream tolerates
    pub rate_limit_per_minute: u32,
}

#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub interval: Duration,
    pub batch_size: i64,
}

#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_leeway: Duration,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Config {
    /// Reads the process environment; `.env` must already be loaded by the caller
    pub fn from_env() -> Result<Self, String> {
        Ok(Config {
            app: AppConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            cache: CacheConfig::from_env(),
            bmkg: BmkgConfig::from_env()?,
            sync: SyncConfig::from_env()?,
            auth: AuthConfig::from_env()?,
            swagger: SwaggerConfig::from_env(),
        })
    }
}

/// Reads a variable, treating an empty value the same as an unset one
fn env_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T, String> {
    match env::var(key).ok().filter(|v| !v.trim().is_empty()) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| format!("{} must be a valid number", key)),
        None => Ok(default),
    }
}

/// Splits a comma-separated origin list, dropping blanks
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let host = env_or("HOST", "0.0.0.0");
        let port = env_or("PORT", "8080")
            .parse::<u16>()
            .map_err(|e| format!("Invalid PORT: {}", e))?;
        let run_mode = RunMode::parse(&env_or("RUN_MODE", "debug"))?;
        let cors_allowed_origins = parse_origins(&env_or("ALLOWED_ORIGINS", ""));

        Ok(Self {
            host,
            port,
            run_mode,
            cors_allowed_origins,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    const DEFAULT_URL: &'static str =
        "postgresql://localhost:5432/eamagine_weather?sslmode=disable";
    const DEFAULT_MAX_CONNECTIONS: u32 = 10;
    const DEFAULT_MIN_CONNECTIONS: u32 = 1;
    const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600; // 10 minutes
    const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800; // 30 minutes

    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            url: env_or("DATABASE_URL", Self::DEFAULT_URL),
            max_connections: parse_env("DB_MAX_CONNECTIONS", Self::DEFAULT_MAX_CONNECTIONS)?,
            min_connections: parse_env("DB_MIN_CONNECTIONS", Self::DEFAULT_MIN_CONNECTIONS)?,
            acquire_timeout_secs: parse_env(
                "DB_ACQUIRE_TIMEOUT_SECS",
                Self::DEFAULT_ACQUIRE_TIMEOUT_SECS,
            )?,
            idle_timeout_secs: parse_env("DB_IDLE_TIMEOUT_SECS", Self::DEFAULT_IDLE_TIMEOUT_SECS)?,
            max_lifetime_secs: parse_env("DB_MAX_LIFETIME_SECS", Self::DEFAULT_MAX_LIFETIME_SECS)?,
        })
    }
}

impl CacheConfig {
    pub fn from_env() -> Self {
        Self {
            redis_url: env_or("REDIS_URL", "redis://localhost:6379"),
        }
    }
}

impl BmkgConfig {
    const DEFAULT_RATE_LIMIT: u32 = 60;

    pub fn from_env() -> Result<Self, String> {
        let base_url = env_or("BMKG_API_BASE_URL", "https://api.bmkg.go.id/publik")
            .trim_end_matches('/')
            .to_string();
        let rate_limit_per_minute = parse_env("BMKG_API_RATE_LIMIT", Self::DEFAULT_RATE_LIMIT)?;
        if rate_limit_per_minute == 0 {
            return Err("BMKG_API_RATE_LIMIT must be greater than zero".to_string());
        }

        Ok(Self {
            base_url,
            rate_limit_per_minute,
        })
    }

    /// Minimum gap between two upstream calls made by background work
    pub fn request_spacing(&self) -> Duration {
        Duration::from_millis(60_000 / u64::from(self.rate_limit_per_minute.max(1)))
    }
}

impl SyncConfig {
    const DEFAULT_INTERVAL_SECS: u64 = 3 * 60 * 60;
    const DEFAULT_BATCH_SIZE: i64 = 50;

    pub fn from_env() -> Result<Self, String> {
        let interval_secs = parse_env("WEATHER_SYNC_INTERVAL_SECS", Self::DEFAULT_INTERVAL_SECS)?;
        if interval_secs == 0 {
            return Err("WEATHER_SYNC_INTERVAL_SECS must be greater than zero".to_string());
        }

        Ok(Self {
            interval: Duration::from_secs(interval_secs),
            batch_size: parse_env("WEATHER_SYNC_BATCH_SIZE", Self::DEFAULT_BATCH_SIZE)?,
        })
    }
}

impl AuthConfig {
    const DEFAULT_JWT_LEEWAY_SECS: u64 = 60;

    pub fn from_env() -> Result<Self, String> {
        let jwt_secret = env_or("JWT_SECRET", "your-super-secret-jwt-key");
        let jwt_leeway_secs = parse_env("JWT_LEEWAY", Self::DEFAULT_JWT_LEEWAY_SECS)?;

        Ok(Self {
            jwt_secret,
            jwt_leeway: Duration::from_secs(jwt_leeway_secs),
        })
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Self {
        Self {
            title: env_or("SWAGGER_TITLE", "Cuaca API"),
            version: env_or("SWAGGER_VERSION", env!("CARGO_PKG_VERSION")),
            description: env_or(
                "SWAGGER_DESCRIPTION",
                "Weather and Indonesian administrative region API",
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_mode_parse() {
        assert_eq!(RunMode::parse("release").unwrap(), RunMode::Release);
        assert_eq!(RunMode::parse(" DEBUG ").unwrap(), RunMode::Debug);
        assert!(RunMode::parse("staging").is_err());
    }

    #[test]
    fn test_parse_origins_skips_blanks() {
        let origins = parse_origins("https://a.example, ,https://b.example,");
        assert_eq!(origins, vec!["https://a.example", "https://b.example"]);
        assert!(parse_origins("").is_empty());
    }

    #[test]
    fn test_request_spacing_from_rate_limit() {
        let config = BmkgConfig {
            base_url: "http://localhost".to_string(),
            rate_limit_per_minute: 60,
        };
        assert_eq!(config.request_spacing(), Duration::from_secs(1));
    }
}
