// Persistence boundary for all-time best sector times

mod sqlite;

pub use sqlite::SqliteSectorBestStore;

use serde::{Deserialize, Serialize};

use crate::conditions::TrackConditions;
use crate::errors::MiniSectorError;

/// Durable store of the fastest sector time ever recorded per
/// (track, sector, car), together with the conditions it was set in.
///
/// The engine tolerates every error from this trait: a failing store
/// degrades to "no durable record" and never corrupts live timing.
pub trait SectorBestStore {
    /// Idempotently ensure the schema exists.
    fn initialize(&self) -> Result<(), MiniSectorError>;

    /// All-time best in seconds for the key, or -1.0 when the track or
    /// car is blank or no record exists.
    fn best_time(
        &self,
        track_id: &str,
        sector_number: usize,
        car_model: &str,
    ) -> Result<f64, MiniSectorError>;

    /// Insert or improve the record for the key. A no-op when the track
    /// or car is blank; an existing faster time is never overwritten.
    fn save_best(
        &self,
        track_id: &str,
        sector_number: usize,
        time_sec: f64,
        car_model: &str,
        conditions: &TrackConditions,
    ) -> Result<(), MiniSectorError>;

    /// Fill `target` (indexed by sector number) with the stored bests
    /// for a (track, car) pair. Every slot is first reset to -1.0,
    /// regardless of inputs; sectors without a record stay unset.
    fn load_all_bests(
        &self,
        track_id: &str,
        car_model: &str,
        target: &mut [f64],
    ) -> Result<(), MiniSectorError>;
}

/// A stored sector best row, as read back for the records browser.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SectorBestRecord {
    pub id: i64,
    pub track_id: String,
    pub sector_number: usize,
    pub best_time_sec: f64,
    pub car_model: String,
    pub weather_type: String,
    pub track_temp_celsius: f64,
    pub air_temp_celsius: f64,
    pub grip_level: String,
    /// RFC 3339 timestamp of when the best was recorded
    pub recorded_at: String,
}

impl SectorBestRecord {
    /// Best time formatted for display (e.g., "1:23.456")
    pub fn best_time_formatted(&self) -> String {
        let minutes = (self.best_time_sec / 60.0).floor() as u64;
        let seconds = self.best_time_sec - (minutes as f64) * 60.0;
        format!("{}:{:06.3}", minutes, seconds)
    }
}
