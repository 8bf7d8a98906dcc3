use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::weather::handlers;
use crate::features::weather::services::WeatherService;

/// Create routes for the weather feature
pub fn routes(service: Arc<WeatherService>) -> Router {
    Router::new()
        .route(
            "/api/v1/weather/current/{region_code}",
            get(handlers::get_current_weather),
        )
        .route(
            "/api/v1/weather/forecast/{region_code}",
            get(handlers::get_forecast),
        )
        .route("/api/v1/weather/search", get(handlers::search_regions))
        .route(
            "/api/v1/weather/sync/{region_code}",
            post(handlers::sync_weather),
        )
        .with_state(service)
}
