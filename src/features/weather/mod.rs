//! Weather feature: current conditions and forecasts from BMKG.
//!
//! Upstream payloads are cached per region for 30 minutes. A background
//! job refreshes the cache for regions with weather data.
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/v1/weather/current/{regionCode}` | Current weather |
//! | GET | `/api/v1/weather/forecast/{regionCode}` | Forecast window |
//! | GET | `/api/v1/weather/search?q=` | Region search |
//! | POST | `/api/v1/weather/sync/{regionCode}` | Refresh cached data |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod workers;

pub use services::WeatherService;
pub use workers::{Scheduler, WeatherSyncJob};
