// Integration test for sector timing with a real SQLite store

use minisector::store::{SectorBestStore, SqliteSectorBestStore};
use minisector::timing::{SectorTimingEngine, TelemetrySample, UNSET_TIME};
use minisector::track_data::BuiltinTrackData;
use minisector::TrackConditions;
use tempfile::TempDir;

fn conditions() -> TrackConditions {
    TrackConditions {
        car_model: "ferrari_488_gt3".to_string(),
        weather_type: "Dry".to_string(),
        track_temp_celsius: 32.0,
        air_temp_celsius: 26.0,
        grip_level: "Optimal".to_string(),
    }
}

fn tick(engine: &mut SectorTimingEngine, position_pct: f64, lap_time_sec: f64) {
    engine.update(
        &TelemetrySample {
            track_id: "Zolder".to_string(),
            position_pct,
            lap_time_sec,
            lap_valid: true,
        },
        &conditions(),
    );
}

/// Drive one clean lap of Zolder through all twelve sectors, then wrap.
fn drive_lap(engine: &mut SectorTimingEngine, pace_offset_sec: f64) {
    let plan = [
        (0.05, 2.0),
        (0.15, 12.0),
        (0.22, 20.0),
        (0.28, 28.0),
        (0.43, 40.0),
        (0.48, 48.0),
        (0.52, 55.0),
        (0.58, 62.0),
        (0.65, 70.0),
        (0.75, 80.0),
        (0.79, 86.0),
        (0.92, 98.0),
        (0.99, 110.0),
    ];
    for (position_pct, lap_time_sec) in plan {
        tick(engine, position_pct, lap_time_sec + pace_offset_sec);
    }
    // lap clock reset closes the lap
    tick(engine, 0.01, 0.3);
}

#[test]
fn test_full_session_with_persistence() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("sector_bests.sqlite");

    let store = SqliteSectorBestStore::open(&db_path).unwrap();
    store.initialize().unwrap();

    let mut engine =
        SectorTimingEngine::with_store(Box::new(BuiltinTrackData), Box::new(store));

    drive_lap(&mut engine, 0.0);

    // every sector of the lap got a time
    for sector in 1..=12 {
        assert!(
            engine.last_lap_sector_time(sector) > 0.0,
            "sector {sector} missing from last lap"
        );
        assert!(engine.session_best_sector_time(sector) > 0.0);
        assert!(engine.all_time_best_sector_time(sector) > 0.0);
    }
    assert_eq!(engine.last_lap_sector_time(13), UNSET_TIME);

    // a second, slower lap must not move the bests
    let session_best_s1 = engine.session_best_sector_time(1);
    drive_lap(&mut engine, 5.0);
    assert_eq!(engine.session_best_sector_time(1), session_best_s1);
    assert_eq!(engine.all_time_best_sector_time(1), session_best_s1);

    // the bests reached the database
    let reread = SqliteSectorBestStore::open(&db_path).unwrap();
    let best = reread.best_time("Zolder", 1, "ferrari_488_gt3").unwrap();
    assert!((best - session_best_s1).abs() < 0.001);
    assert_eq!(reread.records().unwrap().len(), 12);
}

#[test]
fn test_all_time_bests_survive_restart() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("sector_bests.sqlite");

    // first session records bests
    {
        let store = SqliteSectorBestStore::open(&db_path).unwrap();
        store.initialize().unwrap();
        let mut engine =
            SectorTimingEngine::with_store(Box::new(BuiltinTrackData), Box::new(store));
        drive_lap(&mut engine, 0.0);
    }

    // a fresh engine on the same database sees them after the first
    // mapped sample establishes the (track, car) identity
    let store = SqliteSectorBestStore::open(&db_path).unwrap();
    store.initialize().unwrap();
    let mut engine =
        SectorTimingEngine::with_store(Box::new(BuiltinTrackData), Box::new(store));

    assert_eq!(engine.all_time_best_sector_time(1), UNSET_TIME);
    tick(&mut engine, 0.05, 1.0);

    assert!(engine.all_time_best_sector_time(1) > 0.0);
    // session bests never persist
    assert_eq!(engine.session_best_sector_time(1), UNSET_TIME);
}

#[test]
fn test_reset_clears_session_but_not_database() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("sector_bests.sqlite");

    let store = SqliteSectorBestStore::open(&db_path).unwrap();
    store.initialize().unwrap();
    let mut engine =
        SectorTimingEngine::with_store(Box::new(BuiltinTrackData), Box::new(store));

    drive_lap(&mut engine, 0.0);
    assert!(engine.all_time_best_sector_time(1) > 0.0);

    engine.reset();
    assert_eq!(engine.all_time_best_sector_time(1), UNSET_TIME);
    assert_eq!(engine.session_best_sector_time(1), UNSET_TIME);

    // the durable record is untouched
    let reread = SqliteSectorBestStore::open(&db_path).unwrap();
    assert!(reread.best_time("Zolder", 1, "ferrari_488_gt3").unwrap() > 0.0);
}

#[test]
fn test_car_change_scopes_bests_per_car() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("sector_bests.sqlite");

    let store = SqliteSectorBestStore::open(&db_path).unwrap();
    store.initialize().unwrap();
    let mut engine =
        SectorTimingEngine::with_store(Box::new(BuiltinTrackData), Box::new(store));

    drive_lap(&mut engine, 0.0);
    assert!(engine.all_time_best_sector_time(1) > 0.0);

    // switching cars resets the cached bests; the new car has none
    let porsche = TrackConditions {
        car_model: "porsche_991ii_gt3_r".to_string(),
        ..conditions()
    };
    engine.update(
        &TelemetrySample {
            track_id: "Zolder".to_string(),
            position_pct: 0.05,
            lap_time_sec: 1.0,
            lap_valid: true,
        },
        &porsche,
    );
    assert_eq!(engine.all_time_best_sector_time(1), UNSET_TIME);

    // the ferrari record is still there for the next switch back
    let reread = SqliteSectorBestStore::open(&db_path).unwrap();
    assert!(reread.best_time("Zolder", 1, "ferrari_488_gt3").unwrap() > 0.0);
    assert_eq!(
        reread.best_time("Zolder", 1, "porsche_991ii_gt3_r").unwrap(),
        -1.0
    );
}
