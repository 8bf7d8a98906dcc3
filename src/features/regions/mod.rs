//! Indonesian administrative regions (wilayah) feature.
//!
//! Read-only browsing and search over the four-level hierarchy. Every row
//! carries its ancestors' codes and names, so listings never join.
//!
//! ## Data Hierarchy
//!
//! - Level 1: Provinces (Provinsi), code `33`
//! - Level 2: Regencies/Cities (Kabupaten/Kota), code `33.74`
//! - Level 3: Districts (Kecamatan), code `33.74.10`
//! - Level 4: Villages (Kelurahan/Desa), code `33.74.10.1002`
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/v1/regions/provinces` | List all provinces (cached 24h) |
//! | GET | `/api/v1/regions/regencies/{provinceCode}` | List regencies in a province |
//! | GET | `/api/v1/regions/villages/{regencyCode}` | Paginated villages with weather data |
//! | GET | `/api/v1/regions/search?q=&level=&limit=` | Search with display names |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

pub use services::RegionService;
