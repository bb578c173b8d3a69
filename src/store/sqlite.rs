// SQLite implementation of the sector best store

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use rusqlite::{Connection, OptionalExtension, params};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::conditions::TrackConditions;
use crate::errors::MiniSectorError;
use crate::store::{SectorBestRecord, SectorBestStore};

const UNSET: f64 = -1.0;

/// Sector bests persisted in a single SQLite database. Calls are
/// synchronous; the connection is owned by this store and accessed by
/// one caller sequence at a time. A second read-only store may be opened
/// on the same file for a records browser.
pub struct SqliteSectorBestStore {
    conn: Connection,
}

impl SqliteSectorBestStore {
    /// Open (or create) a database at the given path, creating parent
    /// directories as needed.
    pub fn open(db_path: &Path) -> Result<Self, MiniSectorError> {
        if let Some(parent) = db_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)
                    .map_err(|e| MiniSectorError::StoreDirError { source: e })?;
            }
        }

        let conn = Connection::open(db_path)
            .map_err(|e| MiniSectorError::StoreOpenError { source: e })?;
        debug!("Opened sector best store at {:?}", db_path);

        Ok(Self { conn })
    }

    /// Open the store at the default application data location.
    pub fn open_default() -> Result<Self, MiniSectorError> {
        Self::open(&Self::default_db_path()?)
    }

    /// Default database path under the platform data directory.
    pub fn default_db_path() -> Result<PathBuf, MiniSectorError> {
        let data_dir = dirs::data_dir().ok_or(MiniSectorError::NoDataDir)?;
        Ok(data_dir.join("minisector").join("sector_bests.sqlite"))
    }

    /// In-memory store, used by tests and benchmarks.
    pub fn open_in_memory() -> Result<Self, MiniSectorError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| MiniSectorError::StoreOpenError { source: e })?;
        Ok(Self { conn })
    }

    /// Every stored record, ordered by track, car, and sector. Serves
    /// the records browser; the engine never calls this.
    pub fn records(&self) -> Result<Vec<SectorBestRecord>, MiniSectorError> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, track_id, sector_number, best_time_sec, car_model,
                        weather_type, track_temp_celsius, air_temp_celsius,
                        grip_level, recorded_at
                 FROM sector_bests
                 ORDER BY track_id, car_model, sector_number",
            )
            .map_err(|e| MiniSectorError::StoreQueryError { source: e })?;

        let rows = stmt
            .query_map([], |row| {
                Ok(SectorBestRecord {
                    id: row.get(0)?,
                    track_id: row.get(1)?,
                    sector_number: row.get::<_, i64>(2)? as usize,
                    best_time_sec: row.get(3)?,
                    car_model: row.get(4)?,
                    weather_type: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
                    track_temp_celsius: row.get::<_, Option<f64>>(6)?.unwrap_or_default(),
                    air_temp_celsius: row.get::<_, Option<f64>>(7)?.unwrap_or_default(),
                    grip_level: row.get::<_, Option<String>>(8)?.unwrap_or_default(),
                    recorded_at: row.get(9)?,
                })
            })
            .map_err(|e| MiniSectorError::StoreQueryError { source: e })?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row.map_err(|e| MiniSectorError::StoreQueryError { source: e })?);
        }
        Ok(records)
    }

    /// Delete one stored record by id. Returns whether a row was removed.
    pub fn delete_record(&self, id: i64) -> Result<bool, MiniSectorError> {
        let affected = self
            .conn
            .execute("DELETE FROM sector_bests WHERE id = ?1", params![id])
            .map_err(|e| MiniSectorError::StoreQueryError { source: e })?;
        Ok(affected > 0)
    }

    fn now_rfc3339() -> Result<String, MiniSectorError> {
        OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .map_err(|e| MiniSectorError::TimestampFormatError { source: e })
    }
}

impl SectorBestStore for SqliteSectorBestStore {
    fn initialize(&self) -> Result<(), MiniSectorError> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS sector_bests (
                     id INTEGER PRIMARY KEY AUTOINCREMENT,
                     track_id TEXT NOT NULL,
                     sector_number INTEGER NOT NULL,
                     best_time_sec REAL NOT NULL,
                     car_model TEXT NOT NULL,
                     weather_type TEXT,
                     track_temp_celsius REAL,
                     air_temp_celsius REAL,
                     grip_level TEXT,
                     recorded_at TEXT NOT NULL,
                     UNIQUE(track_id, sector_number, car_model)
                 );

                 CREATE INDEX IF NOT EXISTS idx_sector_bests_lookup
                     ON sector_bests(track_id, car_model);",
            )
            .map_err(|e| MiniSectorError::StoreQueryError { source: e })
    }

    fn best_time(
        &self,
        track_id: &str,
        sector_number: usize,
        car_model: &str,
    ) -> Result<f64, MiniSectorError> {
        if track_id.trim().is_empty() || car_model.trim().is_empty() {
            return Ok(UNSET);
        }

        let best: Option<f64> = self
            .conn
            .query_row(
                "SELECT best_time_sec FROM sector_bests
                 WHERE track_id = ?1 AND sector_number = ?2 AND car_model = ?3",
                params![track_id, sector_number as i64, car_model],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| MiniSectorError::StoreQueryError { source: e })?;

        Ok(best.unwrap_or(UNSET))
    }

    fn save_best(
        &self,
        track_id: &str,
        sector_number: usize,
        time_sec: f64,
        car_model: &str,
        conditions: &TrackConditions,
    ) -> Result<(), MiniSectorError> {
        if track_id.trim().is_empty() || car_model.trim().is_empty() {
            return Ok(());
        }

        // The upsert only replaces a strictly slower stored time, so a
        // concurrent or replayed slower save can never regress a record.
        self.conn
            .execute(
                "INSERT INTO sector_bests (
                     track_id, sector_number, best_time_sec, car_model,
                     weather_type, track_temp_celsius, air_temp_celsius,
                     grip_level, recorded_at
                 )
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                 ON CONFLICT(track_id, sector_number, car_model) DO UPDATE SET
                     best_time_sec = excluded.best_time_sec,
                     weather_type = excluded.weather_type,
                     track_temp_celsius = excluded.track_temp_celsius,
                     air_temp_celsius = excluded.air_temp_celsius,
                     grip_level = excluded.grip_level,
                     recorded_at = excluded.recorded_at
                 WHERE excluded.best_time_sec < sector_bests.best_time_sec",
                params![
                    track_id,
                    sector_number as i64,
                    time_sec,
                    car_model,
                    conditions.weather_type,
                    conditions.track_temp_celsius,
                    conditions.air_temp_celsius,
                    conditions.grip_level,
                    Self::now_rfc3339()?,
                ],
            )
            .map_err(|e| MiniSectorError::StoreQueryError { source: e })?;

        Ok(())
    }

    fn load_all_bests(
        &self,
        track_id: &str,
        car_model: &str,
        target: &mut [f64],
    ) -> Result<(), MiniSectorError> {
        target.fill(UNSET);

        if track_id.trim().is_empty() || car_model.trim().is_empty() {
            return Ok(());
        }

        let mut stmt = self
            .conn
            .prepare(
                "SELECT sector_number, best_time_sec FROM sector_bests
                 WHERE track_id = ?1 AND car_model = ?2",
            )
            .map_err(|e| MiniSectorError::StoreQueryError { source: e })?;

        let rows = stmt
            .query_map(params![track_id, car_model], |row| {
                Ok((row.get::<_, i64>(0)?, row.get::<_, f64>(1)?))
            })
            .map_err(|e| MiniSectorError::StoreQueryError { source: e })?;

        for row in rows {
            let (sector_number, best_time) =
                row.map_err(|e| MiniSectorError::StoreQueryError { source: e })?;
            let sector = sector_number as usize;
            if sector >= 1 && sector < target.len() {
                target[sector] = best_time;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store() -> SqliteSectorBestStore {
        let store = SqliteSectorBestStore::open_in_memory().unwrap();
        store.initialize().unwrap();
        store
    }

    fn dry_conditions() -> TrackConditions {
        TrackConditions {
            car_model: "ferrari_488_gt3".to_string(),
            weather_type: "Dry".to_string(),
            track_temp_celsius: 30.0,
            air_temp_celsius: 25.0,
            grip_level: "Optimal".to_string(),
        }
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let store = test_store();
        store.initialize().unwrap();
        store.initialize().unwrap();
    }

    #[test]
    fn test_best_time_unset_without_data() {
        let store = test_store();
        assert_eq!(store.best_time("monza", 1, "ferrari_488_gt3").unwrap(), -1.0);
    }

    #[test]
    fn test_best_time_unset_for_blank_keys() {
        let store = test_store();
        store
            .save_best("monza", 1, 15.5, "ferrari_488_gt3", &dry_conditions())
            .unwrap();
        assert_eq!(store.best_time("", 1, "ferrari_488_gt3").unwrap(), -1.0);
        assert_eq!(store.best_time("monza", 1, "").unwrap(), -1.0);
        assert_eq!(store.best_time("monza", 1, "  ").unwrap(), -1.0);
    }

    #[test]
    fn test_save_and_retrieve_round_trip() {
        let store = test_store();
        store
            .save_best("monza", 1, 15.5, "ferrari_488_gt3", &dry_conditions())
            .unwrap();
        let best = store.best_time("monza", 1, "ferrari_488_gt3").unwrap();
        assert!((best - 15.5).abs() < 0.001);
    }

    #[test]
    fn test_slower_time_is_rejected() {
        let store = test_store();
        store
            .save_best("monza", 1, 15.5, "ferrari_488_gt3", &dry_conditions())
            .unwrap();
        store
            .save_best("monza", 1, 16.0, "ferrari_488_gt3", &dry_conditions())
            .unwrap();
        let best = store.best_time("monza", 1, "ferrari_488_gt3").unwrap();
        assert!((best - 15.5).abs() < 0.001);
    }

    #[test]
    fn test_faster_time_updates_record() {
        let store = test_store();
        store
            .save_best("monza", 1, 15.5, "ferrari_488_gt3", &dry_conditions())
            .unwrap();
        store
            .save_best("monza", 1, 14.8, "ferrari_488_gt3", &dry_conditions())
            .unwrap();
        let best = store.best_time("monza", 1, "ferrari_488_gt3").unwrap();
        assert!((best - 14.8).abs() < 0.001);
    }

    #[test]
    fn test_bests_are_independent_across_keys() {
        let store = test_store();
        let cond = dry_conditions();
        store.save_best("monza", 1, 15.5, "ferrari_488_gt3", &cond).unwrap();
        store.save_best("monza", 2, 22.3, "ferrari_488_gt3", &cond).unwrap();
        store.save_best("spa", 1, 28.7, "ferrari_488_gt3", &cond).unwrap();
        store
            .save_best("monza", 1, 16.2, "porsche_991ii_gt3_r", &cond)
            .unwrap();

        assert!((store.best_time("monza", 1, "ferrari_488_gt3").unwrap() - 15.5).abs() < 0.001);
        assert!((store.best_time("monza", 2, "ferrari_488_gt3").unwrap() - 22.3).abs() < 0.001);
        assert!((store.best_time("spa", 1, "ferrari_488_gt3").unwrap() - 28.7).abs() < 0.001);
        assert!(
            (store.best_time("monza", 1, "porsche_991ii_gt3_r").unwrap() - 16.2).abs() < 0.001
        );
    }

    #[test]
    fn test_blank_keys_make_save_a_noop() {
        let store = test_store();
        store.save_best("", 1, 15.5, "ferrari_488_gt3", &dry_conditions()).unwrap();
        store.save_best("monza", 1, 15.5, "", &dry_conditions()).unwrap();
        assert!(store.records().unwrap().is_empty());
    }

    #[test]
    fn test_load_all_bests_fills_only_recorded_sectors() {
        let store = test_store();
        let cond = dry_conditions();
        store.save_best("monza", 1, 15.5, "ferrari_488_gt3", &cond).unwrap();
        store.save_best("monza", 2, 22.3, "ferrari_488_gt3", &cond).unwrap();
        store.save_best("monza", 3, 18.1, "ferrari_488_gt3", &cond).unwrap();

        let mut times = [0.0; 61];
        store
            .load_all_bests("monza", "ferrari_488_gt3", &mut times)
            .unwrap();

        assert!((times[1] - 15.5).abs() < 0.001);
        assert!((times[2] - 22.3).abs() < 0.001);
        assert!((times[3] - 18.1).abs() < 0.001);
        assert_eq!(times[4], -1.0);
        assert_eq!(times[60], -1.0);
    }

    #[test]
    fn test_load_all_bests_always_reinitializes_target() {
        let store = test_store();
        let mut times = [99.0; 61];
        store.load_all_bests("unknown", "nobody", &mut times).unwrap();
        assert!(times.iter().all(|&t| t == -1.0));

        let mut times = [99.0; 61];
        store.load_all_bests("", "", &mut times).unwrap();
        assert!(times.iter().all(|&t| t == -1.0));
    }

    #[test]
    fn test_records_lists_stored_bests_in_order() {
        let store = test_store();
        let cond = dry_conditions();
        store.save_best("spa", 1, 28.7, "ferrari_488_gt3", &cond).unwrap();
        store.save_best("monza", 2, 22.3, "ferrari_488_gt3", &cond).unwrap();
        store.save_best("monza", 1, 15.5, "ferrari_488_gt3", &cond).unwrap();

        let records = store.records().unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].track_id, "monza");
        assert_eq!(records[0].sector_number, 1);
        assert_eq!(records[1].sector_number, 2);
        assert_eq!(records[2].track_id, "spa");
        assert_eq!(records[0].weather_type, "Dry");
        assert_eq!(records[0].grip_level, "Optimal");
        assert!(!records[0].recorded_at.is_empty());
    }

    #[test]
    fn test_delete_record() {
        let store = test_store();
        store
            .save_best("monza", 1, 15.5, "ferrari_488_gt3", &dry_conditions())
            .unwrap();
        let records = store.records().unwrap();
        assert_eq!(records.len(), 1);

        assert!(store.delete_record(records[0].id).unwrap());
        assert!(store.records().unwrap().is_empty());
        assert!(!store.delete_record(records[0].id).unwrap());
    }
}
