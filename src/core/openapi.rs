use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth;
use crate::features::regions::{dtos as regions_dtos, handlers as regions_handlers};
use crate::features::users::{
    dtos as users_dtos,
    handlers::{favorite_handler, profile_handler},
};
use crate::features::weather::{
    dtos as weather_dtos, handlers as weather_handlers, models as weather_models,
};
use crate::shared::types::{ErrorBody, ListResponse, PaginatedResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Weather
        weather_handlers::get_current_weather,
        weather_handlers::get_forecast,
        weather_handlers::search_regions,
        weather_handlers::sync_weather,
        // Regions
        regions_handlers::list_provinces,
        regions_handlers::list_regencies,
        regions_handlers::list_villages,
        regions_handlers::search_regions,
        // Users
        profile_handler::get_profile,
        profile_handler::update_profile,
        favorite_handler::list_favorites,
        favorite_handler::add_favorite,
        favorite_handler::remove_favorite,
    ),
    components(
        schemas(
            // Shared
            ErrorBody,
            // Auth
            auth::model::AuthenticatedUser,
            // Weather
            weather_models::WeatherReading,
            weather_dtos::CurrentWeatherResponseDto,
            weather_dtos::ForecastResponseDto,
            weather_dtos::WeatherSearchResponseDto,
            weather_dtos::SyncResponseDto,
            // Regions
            regions_dtos::ProvinceResponseDto,
            regions_dtos::RegencyResponseDto,
            regions_dtos::VillageResponseDto,
            regions_dtos::RegionSummaryDto,
            ListResponse<regions_dtos::ProvinceResponseDto>,
            ListResponse<regions_dtos::RegencyResponseDto>,
            ListResponse<regions_dtos::RegionSummaryDto>,
            PaginatedResponse<regions_dtos::VillageResponseDto>,
            // Users
            users_dtos::UserProfileResponseDto,
            users_dtos::UpdateProfileDto,
            users_dtos::AddFavoriteDto,
            users_dtos::FavoriteResponseDto,
            ListResponse<users_dtos::FavoriteResponseDto>,
        )
    ),
    tags(
        (name = "weather", description = "Current conditions and forecasts from BMKG"),
        (name = "regions", description = "Indonesian administrative regions (provinces, regencies, districts, villages)"),
        (name = "users", description = "User profile and favourite regions"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Cuaca API",
        version = "0.1.0",
        description = "Weather forecasts for Indonesian administrative regions",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_routes_and_bearer_scheme() {
        let mut doc = ApiDoc::openapi();
        SwaggerInfoModifier {
            title: "Cuaca".to_string(),
            version: "9.9.9".to_string(),
            description: "test".to_string(),
        }
        .modify(&mut doc);

        assert_eq!(doc.info.version, "9.9.9");
        assert!(doc
            .paths
            .paths
            .contains_key("/api/v1/weather/current/{regionCode}"));
        assert!(doc.paths.paths.contains_key("/api/v1/users/favorites"));
        let components = doc.components.unwrap();
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
