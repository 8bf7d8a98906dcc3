use axum::{routing::get, Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use utoipa_swagger_ui::SwaggerUi;

use crate::core::middleware;
use crate::features::auth::JwtValidator;
use crate::features::regions::{routes as regions_routes, RegionService};
use crate::features::users::{routes as users_routes, UserService};
use crate::features::weather::{routes as weather_routes, WeatherService};
use crate::shared::constants::SERVICE_NAME;

/// Upper bound on a single inbound request; dropping the future cancels downstream calls
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Shared services handed to the feature routers
pub struct AppServices {
    pub region_service: Arc<RegionService>,
    pub weather_service: Arc<WeatherService>,
    pub user_service: Arc<UserService>,
    pub jwt_validator: Arc<JwtValidator>,
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().timestamp(),
        "service": SERVICE_NAME,
    }))
}

pub fn build_router(
    services: AppServices,
    cors_allowed_origins: Vec<String>,
    openapi: utoipa::openapi::OpenApi,
) -> Router {
    let swagger =
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi));

    // Protected routes (require JWT authentication)
    let protected_routes = Router::new()
        .merge(users_routes::routes(services.user_service))
        .route_layer(axum::middleware::from_fn_with_state(
            services.jwt_validator,
            middleware::auth_middleware,
        ));

    // Public routes (no auth required)
    let public_routes = Router::new()
        .merge(weather_routes::routes(services.weather_service))
        .merge(regions_routes::routes(services.region_service))
        .route("/health", get(health_check));

    Router::new()
        .merge(swagger)
        .merge(protected_routes)
        .merge(public_routes)
        .layer(axum::middleware::from_fn_with_state(
            REQUEST_TIMEOUT,
            middleware::request_timeout,
        ))
        .layer(middleware::cors_layer(cors_allowed_origins))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{AuthConfig, BmkgConfig};
    use crate::core::openapi::ApiDoc;
    use crate::features::regions::models::Region;
    use crate::modules::bmkg::BmkgClient;
    use crate::modules::cache::CacheStore;
    use crate::shared::test_helpers::{
        bmkg_body, issue_token, region_fixture, village_fixture, InMemoryCache,
        InMemoryRegionStore, InMemoryUserStore, TEST_JWT_SECRET,
    };
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use utoipa::OpenApi;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct TestApp {
        server: TestServer,
        store: Arc<InMemoryRegionStore>,
    }

    fn test_app(regions: Vec<Region>, upstream: &MockServer) -> TestApp {
        let store = Arc::new(InMemoryRegionStore::new(regions));
        let cache: Arc<dyn CacheStore> = Arc::new(InMemoryCache::default());
        let bmkg = BmkgClient::new(
            &BmkgConfig {
                base_url: upstream.uri(),
                rate_limit_per_minute: 60,
            },
            cache.clone(),
        )
        .unwrap();

        let region_service = Arc::new(RegionService::new(store.clone(), cache));
        let weather_service = Arc::new(WeatherService::new(
            region_service.clone(),
            Arc::new(bmkg),
        ));
        let user_service = Arc::new(UserService::new(
            Arc::new(InMemoryUserStore::new(store.clone())),
            store.clone(),
        ));
        let jwt_validator = Arc::new(JwtValidator::new(&AuthConfig {
            jwt_secret: TEST_JWT_SECRET.to_string(),
            jwt_leeway: Duration::from_secs(0),
        }));

        let router = build_router(
            AppServices {
                region_service,
                weather_service,
                user_service,
                jwt_validator,
            },
            Vec::new(),
            ApiDoc::openapi(),
        );

        TestApp {
            server: TestServer::new(router).unwrap(),
            store,
        }
    }

    async fn upstream_with(body: serde_json::Value) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/prakiraan-cuaca"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;
        server
    }

    fn semarang_villages(count: usize) -> Vec<Region> {
        (0..count)
            .map(|i| village_fixture("33.74", i, &format!("Kelurahan {:02}", i)))
            .collect()
    }

    // ==================== Health & plumbing ====================

    #[tokio::test]
    async fn test_health_reports_service() {
        let upstream = MockServer::start().await;
        let app = test_app(Vec::new(), &upstream);

        let response = app.server.get("/health").await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], SERVICE_NAME);
        assert!(body["timestamp"].is_i64());
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_openapi_document_is_served() {
        let upstream = MockServer::start().await;
        let app = test_app(Vec::new(), &upstream);

        let response = app.server.get("/api-docs/openapi.json").await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert!(body["paths"]["/api/v1/regions/search"].is_object());
    }

    // ==================== Regions ====================

    #[tokio::test]
    async fn test_villages_are_paginated() {
        let upstream = MockServer::start().await;
        let app = test_app(semarang_villages(25), &upstream);

        let response = app
            .server
            .get("/api/v1/regions/villages/33.74")
            .add_query_param("page", 1)
            .add_query_param("limit", 10)
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"].as_array().unwrap().len(), 10);
        assert_eq!(body["total"], 25);
        assert_eq!(body["page"], 1);
        assert_eq!(body["pageSize"], 10);
        assert_eq!(body["totalPages"], 3);
        assert_eq!(body["data"][0]["regencyCode"], "33.74");
        assert_eq!(body["data"][0]["hasWeatherData"], true);
    }

    #[tokio::test]
    async fn test_oversized_limit_falls_back_to_default() {
        let upstream = MockServer::start().await;
        let app = test_app(semarang_villages(25), &upstream);

        let response = app
            .server
            .get("/api/v1/regions/villages/33.74")
            .add_query_param("limit", 999)
            .add_query_param("page", "abc")
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["pageSize"], 20);
        assert_eq!(body["page"], 1);
        assert_eq!(body["data"].as_array().unwrap().len(), 20);
    }

    #[tokio::test]
    async fn test_page_far_past_the_end_is_empty() {
        let upstream = MockServer::start().await;
        let app = test_app(semarang_villages(25), &upstream);

        let response = app
            .server
            .get("/api/v1/regions/villages/33.74")
            .add_query_param("page", i64::MAX)
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert!(body["data"].as_array().unwrap().is_empty());
        assert_eq!(body["total"], 25);
    }

    #[tokio::test]
    async fn test_provinces_report_cache_status() {
        let upstream = MockServer::start().await;
        let app = test_app(
            vec![
                region_fixture("33", "Jawa Tengah"),
                region_fixture("35", "Jawa Timur"),
            ],
            &upstream,
        );

        let first = app.server.get("/api/v1/regions/provinces").await;
        first.assert_status_ok();
        assert_eq!(first.header("x-cache"), "MISS");
        assert_eq!(first.header("content-type"), "application/json");

        let second = app.server.get("/api/v1/regions/provinces").await;
        assert_eq!(second.header("x-cache"), "HIT");
        assert_eq!(first.text(), second.text());

        let body: Value = second.json();
        assert_eq!(body["total"], 2);
    }

    #[tokio::test]
    async fn test_regencies_list() {
        let upstream = MockServer::start().await;
        let app = test_app(
            vec![
                region_fixture("33", "Jawa Tengah"),
                region_fixture("33.74", "Kota Semarang"),
                region_fixture("35.07", "Kabupaten Malang"),
            ],
            &upstream,
        );

        let body: Value = app.server.get("/api/v1/regions/regencies/33").await.json();
        assert_eq!(body["total"], 1);
        assert_eq!(body["data"][0]["provinceCode"], "33");
    }

    #[tokio::test]
    async fn test_search_requires_query() {
        let upstream = MockServer::start().await;
        let app = test_app(Vec::new(), &upstream);

        let response = app.server.get("/api/v1/regions/search").await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["error"], "Query parameter 'q' is required");
    }

    #[tokio::test]
    async fn test_search_returns_display_names() {
        let upstream = MockServer::start().await;
        let mut regency = region_fixture("35.07", "Kabupaten Malang");
        regency.province_name = Some("Jawa Timur".to_string());
        let app = test_app(
            vec![regency, region_fixture("35.73", "Kota Malang")],
            &upstream,
        );

        let response = app
            .server
            .get("/api/v1/regions/search")
            .add_query_param("q", "malang")
            .add_query_param("level", "2")
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["total"], 2);
        assert_eq!(body["data"][0]["displayName"], "Kabupaten Malang, Jawa Timur");
        assert_eq!(body["data"][1]["displayName"], "Kota Malang");
    }

    #[tokio::test]
    async fn test_store_failure_is_opaque_500() {
        let upstream = MockServer::start().await;
        let app = test_app(semarang_villages(3), &upstream);
        app.store.set_unavailable(true);

        let response = app.server.get("/api/v1/regions/villages/33.74").await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = response.json();
        assert_eq!(body["error"], "Failed to query region data");
    }

    // ==================== Weather ====================

    #[tokio::test]
    async fn test_current_weather_for_known_region() {
        let upstream = upstream_with(bmkg_body(3)).await;
        let app = test_app(semarang_villages(3), &upstream);

        let response = app.server.get("/api/v1/weather/current/33.74.01.1001").await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["regionCode"], "33.74.01.1001");
        assert_eq!(
            body["region"]["displayName"],
            "Kelurahan 01, Kec. Tembalang, Kota Semarang, Jawa Tengah"
        );
        assert_eq!(body["current"]["temperature"], 25.0);
        assert_eq!(body["current"]["weatherDescEn"], "Mostly Cloudy");
    }

    #[tokio::test]
    async fn test_current_weather_falls_back_when_store_is_down() {
        let upstream = upstream_with(bmkg_body(2)).await;
        let app = test_app(semarang_villages(3), &upstream);
        app.store.set_unavailable(true);

        let response = app.server.get("/api/v1/weather/current/33.74.01.1001").await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert!(body.get("region").is_none());
        assert_eq!(body["current"]["humidity"], 70);
    }

    #[tokio::test]
    async fn test_current_weather_without_records_is_404() {
        let upstream = upstream_with(json!({ "data": [] })).await;
        let app = test_app(Vec::new(), &upstream);

        let response = app.server.get("/api/v1/weather/current/33.74.01.1001").await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_upstream_outage_is_502() {
        let upstream = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&upstream)
            .await;
        let app = test_app(Vec::new(), &upstream);

        let response = app.server.get("/api/v1/weather/forecast/33.74.01.1001").await;
        response.assert_status(StatusCode::BAD_GATEWAY);
        let body: Value = response.json();
        assert_eq!(body["error"], "Failed to fetch weather data");
    }

    #[tokio::test]
    async fn test_forecast_lists_records() {
        let upstream = upstream_with(bmkg_body(4)).await;
        let app = test_app(Vec::new(), &upstream);

        let body: Value = app
            .server
            .get("/api/v1/weather/forecast/33.74.01.1001")
            .await
            .json();
        assert_eq!(body["regionCode"], "33.74.01.1001");
        assert_eq!(body["forecast"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_malformed_region_code_is_400() {
        let upstream = MockServer::start().await;
        let app = test_app(Vec::new(), &upstream);

        let response = app.server.get("/api/v1/weather/current/33..74").await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_weather_search_with_blank_query_is_empty() {
        let upstream = MockServer::start().await;
        let app = test_app(semarang_villages(3), &upstream);

        let body: Value = app.server.get("/api/v1/weather/search").await.json();
        assert_eq!(body["query"], "");
        assert_eq!(body["results"], json!([]));

        let body: Value = app
            .server
            .get("/api/v1/weather/search")
            .add_query_param("q", "kelurahan")
            .await
            .json();
        assert_eq!(body["results"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_sync_always_succeeds() {
        let upstream = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&upstream)
            .await;
        let app = test_app(Vec::new(), &upstream);

        let response = app.server.post("/api/v1/weather/sync/33.74.01.1001").await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["regionCode"], "33.74.01.1001");
        assert_eq!(body["refreshed"], false);
    }

    #[tokio::test]
    async fn test_sync_refreshes_records() {
        let upstream = upstream_with(bmkg_body(2)).await;
        let app = test_app(Vec::new(), &upstream);

        let body: Value = app
            .server
            .post("/api/v1/weather/sync/33.74.01.1001")
            .await
            .json();
        assert_eq!(body["refreshed"], true);
        assert_eq!(body["records"], 2);
    }

    // ==================== Users ====================

    #[tokio::test]
    async fn test_users_require_bearer_token() {
        let upstream = MockServer::start().await;
        let app = test_app(Vec::new(), &upstream);

        let missing = app.server.get("/api/v1/users/profile").await;
        missing.assert_status(StatusCode::UNAUTHORIZED);
        let body: Value = missing.json();
        assert_eq!(body["error"], "Missing authorization header");

        let wrong_scheme = app
            .server
            .get("/api/v1/users/favorites")
            .authorization("Basic dXNlcjpwYXNz")
            .await;
        wrong_scheme.assert_status(StatusCode::UNAUTHORIZED);

        let expired = app
            .server
            .get("/api/v1/users/favorites")
            .authorization_bearer(issue_token("user-1", -3600))
            .await;
        expired.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_profile_update_is_validated() {
        let upstream = MockServer::start().await;
        let app = test_app(Vec::new(), &upstream);

        let response = app
            .server
            .put("/api/v1/users/profile")
            .authorization_bearer(issue_token("user-1", 3600))
            .json(&json!({ "email": "not-an-email" }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["error"], "Validation failed");
        assert_eq!(body["details"][0], "email: Email must be a valid address");
    }

    #[tokio::test]
    async fn test_favorite_body_must_be_json() {
        let upstream = MockServer::start().await;
        let app = test_app(Vec::new(), &upstream);

        let response = app
            .server
            .post("/api/v1/users/favorites")
            .authorization_bearer(issue_token("user-1", 3600))
            .text("regionCode=33.74")
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_profile_is_created_from_token_claims() {
        let upstream = MockServer::start().await;
        let app = test_app(Vec::new(), &upstream);
        let token = issue_token("user-1", 3600);

        let body: Value = app
            .server
            .get("/api/v1/users/profile")
            .authorization_bearer(&token)
            .await
            .json();
        assert_eq!(body["subject"], "user-1");
        assert_eq!(body["email"], "user-1@example.com");
        assert_eq!(body["name"], "Test User");

        let blank = app
            .server
            .put("/api/v1/users/profile")
            .authorization_bearer(&token)
            .json(&json!({ "name": "   " }))
            .await;
        blank.assert_status(StatusCode::BAD_REQUEST);

        let renamed: Value = app
            .server
            .put("/api/v1/users/profile")
            .authorization_bearer(&token)
            .json(&json!({ "name": "  Budi  " }))
            .await
            .json();
        assert_eq!(renamed["name"], "Budi");
        assert_eq!(renamed["id"], body["id"]);
    }

    #[tokio::test]
    async fn test_favorites_lifecycle() {
        let upstream = MockServer::start().await;
        let mut regions = semarang_villages(2);
        regions.push(region_fixture("33.74", "Kota Semarang"));
        let app = test_app(regions, &upstream);
        let token = issue_token("user-1", 3600);

        let added = app
            .server
            .post("/api/v1/users/favorites")
            .authorization_bearer(&token)
            .json(&json!({ "regionCode": "33.74.01.1001" }))
            .await;
        added.assert_status(StatusCode::CREATED);
        let added: Value = added.json();
        assert_eq!(added["sortOrder"], 0);

        app.server
            .post("/api/v1/users/favorites")
            .authorization_bearer(&token)
            .json(&json!({ "regionCode": "33.74" }))
            .await
            .assert_status(StatusCode::CREATED);

        app.server
            .post("/api/v1/users/favorites")
            .authorization_bearer(&token)
            .json(&json!({ "regionCode": "33.74" }))
            .await
            .assert_status(StatusCode::CONFLICT);

        app.server
            .post("/api/v1/users/favorites")
            .authorization_bearer(&token)
            .json(&json!({ "regionCode": "99.99" }))
            .await
            .assert_status(StatusCode::NOT_FOUND);

        let listed: Value = app
            .server
            .get("/api/v1/users/favorites")
            .authorization_bearer(&token)
            .await
            .json();
        assert_eq!(listed["total"], 2);
        assert_eq!(listed["data"][0]["regionCode"], "33.74.01.1001");
        assert_eq!(listed["data"][1]["sortOrder"], 1);

        app.server
            .delete("/api/v1/users/favorites/33.74.01.1001")
            .authorization_bearer(&token)
            .await
            .assert_status(StatusCode::NO_CONTENT);

        app.server
            .delete("/api/v1/users/favorites/33.74.01.1001")
            .authorization_bearer(&token)
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}
