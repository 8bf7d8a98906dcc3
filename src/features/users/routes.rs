use crate::features::users::handlers::{favorite_handler, profile_handler};
use crate::features::users::services::UserService;
use axum::{
    routing::{delete, get},
    Router,
};
use std::sync::Arc;

pub fn routes(service: Arc<UserService>) -> Router {
    Router::new()
        .route(
            "/api/v1/users/profile",
            get(profile_handler::get_profile).put(profile_handler::update_profile),
        )
        .route(
            "/api/v1/users/favorites",
            get(favorite_handler::list_favorites).post(favorite_handler::add_favorite),
        )
        .route(
            "/api/v1/users/favorites/{region_code}",
            delete(favorite_handler::remove_favorite),
        )
        .with_state(service)
}
