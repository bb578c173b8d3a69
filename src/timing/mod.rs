// Sector timing: telemetry samples in, per-sector lap times out

mod engine;

pub use engine::SectorTimingEngine;

use serde::{Deserialize, Serialize};

/// Highest sector number the engine tracks and exposes. Enough headroom
/// for the Nordschleife corner list.
pub const MAX_SECTORS: usize = 60;

/// Sentinel for "no time recorded". Consumers must treat any negative
/// value as missing data, never as a real time.
pub const UNSET_TIME: f64 = -1.0;

/// One normalized telemetry tick as supplied by the host.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySample {
    /// Track identifier; empty means unknown. Compared
    /// case-insensitively for identity changes.
    pub track_id: String,
    /// Fraction of the lap completed, nominally [0, 1]. May be
    /// transiently out of range; such samples are ignored for timing.
    pub position_pct: f64,
    /// Lap clock in seconds, monotonic within a lap, resets toward zero
    /// on lap completion.
    pub lap_time_sec: f64,
    /// Whether the current lap counts for best times (no cuts etc.).
    pub lap_valid: bool,
}

/// Whether a completed sector time should become the new session best.
/// Invalid laps and non-positive times never qualify; an unset best
/// (negative sentinel) is always beaten; equal times never update.
///
/// The same rule, combined with the in-memory all-time comparison, gates
/// all-time best promotion and persistence.
pub fn should_update_session_best(sector_time: f64, current_best: f64, lap_valid: bool) -> bool {
    if !lap_valid {
        return false;
    }
    if sector_time <= 0.0 {
        return false;
    }
    current_best < 0.0 || sector_time < current_best
}
