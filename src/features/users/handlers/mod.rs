pub mod favorite_handler;
pub mod profile_handler;
