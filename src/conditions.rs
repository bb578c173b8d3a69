// Ambient track conditions attached to telemetry samples

use serde::{Deserialize, Serialize};

/// Conditions in effect when a telemetry sample was taken. Passed
/// explicitly with every engine update and stored next to persisted
/// sector bests so records can be judged against the weather they were
/// set in. The car model also participates in timing identity: bests are
/// scoped per (track, car).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackConditions {
    /// Car model identifier (e.g., "ferrari_488_gt3"). Blank disables
    /// persistence.
    #[serde(default)]
    pub car_model: String,
    /// Weather description, e.g. "Dry", "LightRain", "Rain"
    #[serde(default)]
    pub weather_type: String,
    #[serde(default)]
    pub track_temp_celsius: f64,
    #[serde(default)]
    pub air_temp_celsius: f64,
    /// Track grip state, e.g. "Green", "Fast", "Optimal"
    #[serde(default)]
    pub grip_level: String,
}
