mod scheduler;
mod weather_sync;

pub use scheduler::{ScheduledJob, Scheduler};
pub use weather_sync::{SyncSummary, WeatherSyncJob};
