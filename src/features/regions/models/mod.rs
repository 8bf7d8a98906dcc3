mod region;
mod region_code;

pub use region::{Region, RegionLevel};
pub use region_code::RegionCode;
