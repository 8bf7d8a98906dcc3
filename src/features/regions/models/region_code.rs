use std::fmt;

use crate::core::error::AppError;
use crate::features::regions::models::RegionLevel;
use crate::shared::validation::REGION_CODE_REGEX;

/// Validated administrative region code, e.g. `33.74.10.1002`.
///
/// The code encodes its own ancestry: every level adds one dot-delimited
/// segment to the parent's code, so the level is the segment count.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RegionCode(String);

impl RegionCode {
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let trimmed = raw.trim();
        if !REGION_CODE_REGEX.is_match(trimmed) {
            return Err(AppError::InvalidInput(format!(
                "Invalid region code '{}'",
                raw
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }

    pub fn level(&self) -> RegionLevel {
        // The regex caps the segment count at four
        RegionLevel::from_level(self.segments().count() as i32).unwrap_or(RegionLevel::Village)
    }
}

impl fmt::Display for RegionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
