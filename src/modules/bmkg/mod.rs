//! Client for the BMKG public weather forecast API (`prakiraan-cuaca`).

mod client;
mod models;

pub use client::BmkgClient;
pub use models::{BmkgWeatherRecord, BmkgWeatherResponse};
