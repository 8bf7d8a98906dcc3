mod region_service;

pub use region_service::{CachedBody, RegionService};
