use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::regions::handlers;
use crate::features::regions::services::RegionService;

/// Create routes for the regions feature
pub fn routes(service: Arc<RegionService>) -> Router {
    Router::new()
        .route("/api/v1/regions/provinces", get(handlers::list_provinces))
        .route(
            "/api/v1/regions/regencies/{province_code}",
            get(handlers::list_regencies),
        )
        .route(
            "/api/v1/regions/villages/{regency_code}",
            get(handlers::list_villages),
        )
        .route("/api/v1/regions/search", get(handlers::search_regions))
        .with_state(service)
}
