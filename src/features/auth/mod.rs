//! Bearer-token authentication.
//!
//! Tokens are HS256 JWTs signed with `JWT_SECRET`. The middleware in
//! `core::middleware` verifies them and stores the [`model::AuthenticatedUser`]
//! in request extensions for handlers to extract.

mod validator;

pub mod model;

pub use validator::{Claims, JwtValidator};
