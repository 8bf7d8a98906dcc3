use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Level of a node in the administrative hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RegionLevel {
    /// Provinsi
    Province = 1,
    /// Kabupaten/Kota
    Regency = 2,
    /// Kecamatan
    District = 3,
    /// Kelurahan/Desa
    Village = 4,
}

impl RegionLevel {
    pub fn from_level(level: i32) -> Option<Self> {
        match level {
            1 => Some(Self::Province),
            2 => Some(Self::Regency),
            3 => Some(Self::District),
            4 => Some(Self::Village),
            _ => None,
        }
    }

    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

/// Region model: one row of the flattened administrative hierarchy.
///
/// Ancestor codes and names are denormalized onto every row so a
/// human-readable label can be built without walking up the tree.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Region {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub level: i32,
    pub province_code: Option<String>,
    pub province_name: Option<String>,
    pub regency_code: Option<String>,
    pub regency_name: Option<String>,
    pub district_code: Option<String>,
    pub district_name: Option<String>,
    pub village_code: Option<String>,
    pub village_name: Option<String>,
    pub has_weather_data: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn known(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl Region {
    pub fn region_level(&self) -> Option<RegionLevel> {
        RegionLevel::from_level(self.level)
    }

    /// Human-readable label composed from the region and its known ancestors.
    ///
    /// Unknown ancestor names are dropped, never replaced by placeholders:
    ///
    /// - province: `name`
    /// - regency: `name, province`
    /// - district: `name, regency, province`, else `name, province`
    /// - village: `name, Kec. district, regency, province`, else
    ///   `name, regency, province`, else `name, province`
    pub fn display_name(&self) -> String {
        let name = match self.name.trim() {
            "" => self.code.clone(),
            trimmed => trimmed.to_string(),
        };

        let province = known(&self.province_name);
        let regency = known(&self.regency_name);
        let district = known(&self.district_name);

        match self.region_level() {
            Some(RegionLevel::Regency) => match province {
                Some(p) => format!("{}, {}", name, p),
                None => name,
            },
            Some(RegionLevel::District) => match (regency, province) {
                (Some(r), Some(p)) => format!("{}, {}, {}", name, r, p),
                (_, Some(p)) => format!("{}, {}", name, p),
                _ => name,
            },
            Some(RegionLevel::Village) => match (district, regency, province) {
                (Some(d), Some(r), Some(p)) => format!("{}, Kec. {}, {}, {}", name, d, r, p),
                (_, Some(r), Some(p)) => format!("{}, {}, {}", name, r, p),
                (_, _, Some(p)) => format!("{}, {}", name, p),
                _ => name,
            },
            Some(RegionLevel::Province) | None => name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::region_fixture;

    fn with_names(
        code: &str,
        name: &str,
        province: Option<&str>,
        regency: Option<&str>,
        district: Option<&str>,
    ) -> Region {
        let mut region = region_fixture(code, name);
        region.province_name = province.map(String::from);
        region.regency_name = regency.map(String::from);
        region.district_name = district.map(String::from);
        region
    }

    #[test]
    fn test_display_name_province() {
        let region = with_names("35", "Jawa Timur", Some("Jawa Timur"), None, None);
        assert_eq!(region.display_name(), "Jawa Timur");
    }

    #[test]
    fn test_display_name_regency() {
        let region = with_names("35.07", "Kabupaten Malang", Some("Jawa Timur"), None, None);
        assert_eq!(region.display_name(), "Kabupaten Malang, Jawa Timur");

        let bare = with_names("35.07", "Kabupaten Malang", None, None, None);
        assert_eq!(bare.display_name(), "Kabupaten Malang");
    }

    #[test]
    fn test_display_name_district_fallbacks() {
        let full = with_names(
            "35.07.01",
            "Donomulyo",
            Some("Jawa Timur"),
            Some("Kabupaten Malang"),
            None,
        );
        assert_eq!(
            full.display_name(),
            "Donomulyo, Kabupaten Malang, Jawa Timur"
        );

        let no_regency = with_names("35.07.01", "Donomulyo", Some("Jawa Timur"), None, None);
        assert_eq!(no_regency.display_name(), "Donomulyo, Jawa Timur");

        let regency_only = with_names("35.07.01", "Donomulyo", None, Some("Kabupaten Malang"), None);
        assert_eq!(regency_only.display_name(), "Donomulyo");
    }

    #[test]
    fn test_display_name_village_fallbacks() {
        let full = with_names(
            "33.74.10.1002",
            "Sendangmulyo",
            Some("Jawa Tengah"),
            Some("Kota Semarang"),
            Some("Tembalang"),
        );
        assert_eq!(
            full.display_name(),
            "Sendangmulyo, Kec. Tembalang, Kota Semarang, Jawa Tengah"
        );

        let no_district = with_names(
            "33.74.10.1002",
            "Sendangmulyo",
            Some("Jawa Tengah"),
            Some("Kota Semarang"),
            None,
        );
        assert_eq!(
            no_district.display_name(),
            "Sendangmulyo, Kota Semarang, Jawa Tengah"
        );

        let province_only = with_names(
            "33.74.10.1002",
            "Sendangmulyo",
            Some("Jawa Tengah"),
            None,
            Some("Tembalang"),
        );
        assert_eq!(province_only.display_name(), "Sendangmulyo, Jawa Tengah");

        let bare = with_names("33.74.10.1002", "Sendangmulyo", None, None, Some("Tembalang"));
        assert_eq!(bare.display_name(), "Sendangmulyo");
    }

    #[test]
    fn test_display_name_treats_blank_names_as_unknown() {
        let region = with_names("35.07", "Kabupaten Malang", Some("  "), None, None);
        assert_eq!(region.display_name(), "Kabupaten Malang");

        let nameless = with_names("35.07", "", None, None, None);
        assert_eq!(nameless.display_name(), "35.07");
    }
}
