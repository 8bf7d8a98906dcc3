//! HTTP features. Each one owns its DTOs, handlers, services and routes.

pub mod auth;
pub mod regions;
pub mod users;
pub mod weather;
