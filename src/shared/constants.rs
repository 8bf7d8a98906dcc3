/// Default page size for paginated listings
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Maximum page size allowed; larger requests fall back to the default
pub const MAX_PAGE_SIZE: i64 = 50;

/// Service name reported by the health endpoint
pub const SERVICE_NAME: &str = "eamagine-weather-api";

// =============================================================================
// CACHE KEYS
// =============================================================================

/// Cached province listing response
pub const PROVINCES_CACHE_KEY: &str = "regions:provinces";

/// Province listing changes only when the reference data is re-imported
pub const PROVINCES_CACHE_TTL_SECS: u64 = 24 * 60 * 60;

/// Prefix for cached upstream weather payloads, keyed by region code
pub const WEATHER_CACHE_PREFIX: &str = "weather:";

/// Upstream weather payload TTL
pub const WEATHER_CACHE_TTL_SECS: u64 = 30 * 60;

pub fn weather_cache_key(region_code: &str) -> String {
    format!("{}{}", WEATHER_CACHE_PREFIX, region_code)
}
