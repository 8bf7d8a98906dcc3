use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::Claims;
use crate::features::regions::models::{Region, RegionCode, RegionLevel};
use crate::features::regions::store::{RegionSearch, RegionStore};
use crate::features::users::models::{FavoriteRegion, User};
use crate::features::users::store::UserStore;
use crate::modules::cache::CacheStore;
use crate::shared::types::PageRequest;

/// Active region with ancestor codes derived from its code and no ancestor names
pub fn region_fixture(code: &str, name: &str) -> Region {
    let parsed = RegionCode::parse(code).unwrap();
    let level = parsed.level();
    let segments: Vec<&str> = parsed.segments().collect();
    let ancestor = |l: RegionLevel| {
        let depth = l.as_i32() as usize;
        (depth <= segments.len()).then(|| segments[..depth].join("."))
    };
    let now = Utc::now();

    Region {
        id: Uuid::new_v4(),
        code: code.to_string(),
        name: name.to_string(),
        level: level.as_i32(),
        province_code: ancestor(RegionLevel::Province),
        province_name: None,
        regency_code: ancestor(RegionLevel::Regency),
        regency_name: None,
        district_code: ancestor(RegionLevel::District),
        district_name: None,
        village_code: ancestor(RegionLevel::Village),
        village_name: None,
        has_weather_data: level == RegionLevel::Village,
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

/// Village under `regency_code` with full ancestor names
pub fn village_fixture(regency_code: &str, index: usize, name: &str) -> Region {
    let code = format!("{}.01.{:04}", regency_code, 1000 + index);
    let mut village = region_fixture(&code, name);
    village.province_name = Some("Jawa Tengah".to_string());
    village.regency_name = Some("Kota Semarang".to_string());
    village.district_name = Some("Tembalang".to_string());
    village.village_name = Some(name.to_string());
    village
}

/// BMKG payload with `count` records, newest first
pub fn bmkg_body(count: usize) -> Value {
    let data: Vec<Value> = (0..count)
        .map(|i| {
            let hour = 21 - 3 * i;
            json!({
                "utc_datetime": format!("2024-06-01 {:02}:00:00", hour),
                "local_datetime": format!("2024-06-02 {:02}:00:00", (hour + 7) % 24),
                "t": 25.0 + i as f64,
                "hu": 70 + i,
                "weather_desc": "Berawan",
                "weather_desc_en": "Mostly Cloudy",
                "ws": 5.5,
                "wd": "SE",
                "tcc": 80,
                "vs_text": "> 10 km",
                "analysis_date": "2024-06-01T00:00:00"
            })
        })
        .collect();
    json!({ "data": data })
}

pub const TEST_JWT_SECRET: &str = "test-secret";

/// HS256 token for `subject` expiring `ttl_secs` from now (negative = already expired)
pub fn issue_token(subject: &str, ttl_secs: i64) -> String {
    let claims = Claims {
        sub: subject.to_string(),
        exp: (Utc::now().timestamp() + ttl_secs) as u64,
        email: Some(format!("{}@example.com", subject)),
        name: Some("Test User".to_string()),
    };
    jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .unwrap()
}

// =============================================================================
// IN-MEMORY REGION STORE
// =============================================================================

/// Region store over a vector, mirroring the Postgres filters and orderings
#[derive(Default)]
pub struct InMemoryRegionStore {
    regions: Vec<Region>,
    unavailable: AtomicBool,
    lookups: AtomicUsize,
}

impl InMemoryRegionStore {
    pub fn new(regions: Vec<Region>) -> Self {
        Self {
            regions,
            ..Default::default()
        }
    }

    /// Makes every subsequent query fail like a lost database connection
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    fn active(&self) -> Result<impl Iterator<Item = &Region>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::StoreUnavailable(sqlx::Error::PoolTimedOut));
        }
        Ok(self.regions.iter().filter(|r| r.is_active))
    }
}

fn sorted_by_name(mut regions: Vec<Region>) -> Vec<Region> {
    regions.sort_by(|a, b| a.name.cmp(&b.name));
    regions
}

#[async_trait]
impl RegionStore for InMemoryRegionStore {
    async fn find_by_code(&self, code: &str) -> Result<Option<Region>> {
        Ok(self.active()?.find(|r| r.code == code).cloned())
    }

    async fn list_provinces(&self) -> Result<Vec<Region>> {
        Ok(sorted_by_name(
            self.active()?.filter(|r| r.level == 1).cloned().collect(),
        ))
    }

    async fn list_regencies(&self, province_code: &str) -> Result<Vec<Region>> {
        Ok(sorted_by_name(
            self.active()?
                .filter(|r| r.level == 2 && r.province_code.as_deref() == Some(province_code))
                .cloned()
                .collect(),
        ))
    }

    async fn list_villages(
        &self,
        regency_code: &str,
        page: &PageRequest,
    ) -> Result<(Vec<Region>, i64)> {
        let matching = sorted_by_name(
            self.active()?
                .filter(|r| {
                    r.level == 4
                        && r.has_weather_data
                        && r.regency_code.as_deref() == Some(regency_code)
                })
                .cloned()
                .collect(),
        );
        let total = matching.len() as i64;
        let data = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.page_size as usize)
            .collect();
        Ok((data, total))
    }

    async fn search(&self, search: &RegionSearch) -> Result<Vec<Region>> {
        let mut matching: Vec<Region> = self
            .active()?
            .filter(|r| r.name.to_lowercase().contains(&search.query))
            .filter(|r| search.level.map_or(true, |level| r.level == level))
            .cloned()
            .collect();
        matching.sort_by(|a, b| {
            b.has_weather_data
                .cmp(&a.has_weather_data)
                .then(b.level.cmp(&a.level))
                .then(a.name.cmp(&b.name))
        });
        matching.truncate(search.limit as usize);
        Ok(matching)
    }

    async fn list_weather_regions(&self, limit: i64) -> Result<Vec<Region>> {
        let mut matching: Vec<Region> = self
            .active()?
            .filter(|r| r.has_weather_data)
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.code.cmp(&b.code));
        matching.truncate(limit.max(0) as usize);
        Ok(matching)
    }
}

// =============================================================================
// IN-MEMORY CACHE
// =============================================================================

/// Cache store over a map; records TTLs but never expires entries
#[derive(Default)]
pub struct InMemoryCache {
    entries: Mutex<HashMap<String, (String, Duration)>>,
}

impl InMemoryCache {
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap()
            .get(key)
            .map(|(value, _)| value.clone())
    }

    pub fn ttl(&self, key: &str) -> Option<Duration> {
        self.entries.lock().unwrap().get(key).map(|(_, ttl)| *ttl)
    }
}

#[async_trait]
impl CacheStore for InMemoryCache {
    async fn get(&self, key: &str) -> Option<String> {
        self.raw(key)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), (value.to_string(), ttl));
    }
}

// =============================================================================
// IN-MEMORY USER STORE
// =============================================================================

struct FavoriteRow {
    user_id: Uuid,
    region_code: String,
    sort_order: i32,
    added_at: DateTime<Utc>,
}

/// User store over vectors; favourites join against the given region store
pub struct InMemoryUserStore {
    regions: Arc<dyn RegionStore>,
    users: Mutex<Vec<User>>,
    favorites: Mutex<Vec<FavoriteRow>>,
}

impl InMemoryUserStore {
    pub fn new(regions: Arc<dyn RegionStore>) -> Self {
        Self {
            regions,
            users: Mutex::new(Vec::new()),
            favorites: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn get_or_create(&self, user: &AuthenticatedUser) -> Result<User> {
        let mut users = self.users.lock().unwrap();
        if let Some(existing) = users.iter().find(|u| u.subject == user.subject) {
            return Ok(existing.clone());
        }

        let now = Utc::now();
        let created = User {
            id: Uuid::new_v4(),
            subject: user.subject.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            created_at: now,
            updated_at: now,
        };
        users.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: Uuid, name: Option<&str>, email: Option<&str>) -> Result<User> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))?;
        if let Some(name) = name {
            user.name = Some(name.to_string());
        }
        if let Some(email) = email {
            user.email = Some(email.to_string());
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn list_favorites(&self, user_id: Uuid) -> Result<Vec<FavoriteRegion>> {
        let mut rows: Vec<(String, i32, DateTime<Utc>)> = self
            .favorites
            .lock()
            .unwrap()
            .iter()
            .filter(|f| f.user_id == user_id)
            .map(|f| (f.region_code.clone(), f.sort_order, f.added_at))
            .collect();
        rows.sort_by_key(|(_, sort_order, _)| *sort_order);

        let mut favorites = Vec::with_capacity(rows.len());
        for (code, sort_order, added_at) in rows {
            if let Some(region) = self.regions.find_by_code(&code).await? {
                favorites.push(FavoriteRegion {
                    sort_order,
                    added_at,
                    region,
                });
            }
        }
        Ok(favorites)
    }

    async fn insert_favorite(
        &self,
        user_id: Uuid,
        region_code: &str,
    ) -> Result<(i32, DateTime<Utc>)> {
        let mut favorites = self.favorites.lock().unwrap();
        let owned = favorites.iter().filter(|f| f.user_id == user_id);
        if owned.clone().any(|f| f.region_code == region_code) {
            return Err(AppError::Conflict(format!(
                "Region '{}' is already a favorite",
                region_code
            )));
        }

        let sort_order = owned.map(|f| f.sort_order + 1).max().unwrap_or(0);
        let added_at = Utc::now();
        favorites.push(FavoriteRow {
            user_id,
            region_code: region_code.to_string(),
            sort_order,
            added_at,
        });
        Ok((sort_order, added_at))
    }

    async fn delete_favorite(&self, user_id: Uuid, region_code: &str) -> Result<bool> {
        let mut favorites = self.favorites.lock().unwrap();
        let before = favorites.len();
        favorites.retain(|f| !(f.user_id == user_id && f.region_code == region_code));
        Ok(favorites.len() < before)
    }
}
