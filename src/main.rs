use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::error;

use minisector::replay::replay_file;
use minisector::store::{SectorBestStore, SqliteSectorBestStore};
use minisector::timing::SectorTimingEngine;
use minisector::track_data::BuiltinTrackData;
use minisector::{MAX_SECTORS, MiniSectorError};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a JSON-lines telemetry file through the timing engine and
    /// print the resulting sector breakdown
    Replay {
        /// Telemetry file, one frame per line
        file: PathBuf,

        /// Sector best database; defaults to the application data dir
        #[arg(short, long)]
        db: Option<PathBuf>,

        /// Override the car model of every frame
        #[arg(short, long)]
        car: Option<String>,

        /// Run without persistence
        #[arg(long)]
        no_store: bool,
    },
    /// List all-time best sector records from the store
    Records {
        /// Sector best database; defaults to the application data dir
        #[arg(short, long)]
        db: Option<PathBuf>,

        /// Only show records for this track
        #[arg(short, long)]
        track: Option<String>,

        /// Only show records for this car model
        #[arg(short, long)]
        car: Option<String>,
    },
    /// List the builtin segment tables
    Tracks,
}

fn open_store(db: Option<PathBuf>) -> Result<SqliteSectorBestStore, MiniSectorError> {
    let store = match db {
        Some(path) => SqliteSectorBestStore::open(&path)?,
        None => SqliteSectorBestStore::open_default()?,
    };
    store.initialize()?;
    Ok(store)
}

fn run_replay(
    file: PathBuf,
    db: Option<PathBuf>,
    car: Option<String>,
    no_store: bool,
) -> Result<(), MiniSectorError> {
    let mut engine = if no_store {
        SectorTimingEngine::new(Box::new(BuiltinTrackData))
    } else {
        SectorTimingEngine::with_store(Box::new(BuiltinTrackData), Box::new(open_store(db)?))
    };

    let processed = replay_file(&mut engine, &file, car.as_deref())?;
    println!(
        "Replayed {} frames on '{}' ({} sectors)",
        processed,
        engine.track_id(),
        engine.sector_count()
    );

    println!("sector  last lap  session best  all-time best");
    for sector in 1..=engine.sector_count().min(MAX_SECTORS) {
        println!(
            "{:>6}  {:>8}  {:>12}  {:>13}",
            sector,
            format_time(engine.last_lap_sector_time(sector)),
            format_time(engine.session_best_sector_time(sector)),
            format_time(engine.all_time_best_sector_time(sector)),
        );
    }
    Ok(())
}

/// Render a sector time for the table; the negative sentinel means no
/// time was recorded.
fn format_time(time_sec: f64) -> String {
    if time_sec < 0.0 {
        return "-".to_string();
    }
    let minutes = (time_sec / 60.0).floor() as u64;
    let seconds = time_sec - (minutes as f64) * 60.0;
    format!("{}:{:06.3}", minutes, seconds)
}

fn run_records(
    db: Option<PathBuf>,
    track: Option<String>,
    car: Option<String>,
) -> Result<(), MiniSectorError> {
    let store = open_store(db)?;
    let records = store
        .records()?
        .into_iter()
        .filter(|r| {
            track
                .as_deref()
                .is_none_or(|t| r.track_id.eq_ignore_ascii_case(t))
        })
        .filter(|r| {
            car.as_deref()
                .is_none_or(|c| r.car_model.eq_ignore_ascii_case(c))
        })
        .collect::<Vec<_>>();

    if records.is_empty() {
        println!("No records stored");
        return Ok(());
    }

    for record in records {
        println!(
            "{:<20} S{:<3} {:<24} {:>10}  {} {}°C/{}°C {}  {}",
            record.track_id,
            record.sector_number,
            record.car_model,
            record.best_time_formatted(),
            record.weather_type,
            record.track_temp_celsius,
            record.air_temp_celsius,
            record.grip_level,
            record.recorded_at,
        );
    }
    Ok(())
}

fn run_tracks() {
    for (track_id, ranges) in BuiltinTrackData::tracks() {
        println!("{:<18} {:>3} sectors", track_id, ranges.len());
    }
}

fn main() -> ExitCode {
    colog::init();
    let args = Args::parse();

    let result = match args.command {
        Commands::Replay {
            file,
            db,
            car,
            no_store,
        } => run_replay(file, db, car, no_store),
        Commands::Records { db, track, car } => run_records(db, track, car),
        Commands::Tracks => {
            run_tracks();
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
