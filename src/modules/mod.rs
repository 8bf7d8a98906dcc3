//! Modules layer - Infrastructure components for external integrations
//!
//! Contains the cache gateway and the upstream BMKG weather client.

pub mod bmkg;
pub mod cache;
