// Replays recorded telemetry files through the timing engine

use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};
use serde_jsonlines::json_lines;

use crate::conditions::TrackConditions;
use crate::errors::MiniSectorError;
use crate::timing::{SectorTimingEngine, TelemetrySample};

/// One line of a JSON-lines replay file: a telemetry sample plus
/// optionally updated conditions. Conditions carry forward until the
/// next frame that embeds them.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReplayFrame {
    pub track_id: String,
    pub position_pct: f64,
    pub lap_time_sec: f64,
    #[serde(default = "default_lap_valid")]
    pub lap_valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<TrackConditions>,
}

fn default_lap_valid() -> bool {
    true
}

/// Stream a replay file through the engine. `car_override`, when set,
/// replaces the car model of every frame's conditions. Returns the
/// number of frames processed.
pub fn replay_file(
    engine: &mut SectorTimingEngine,
    path: &Path,
    car_override: Option<&str>,
) -> Result<usize, MiniSectorError> {
    let frames =
        json_lines::<ReplayFrame, _>(path).map_err(|e| MiniSectorError::ReplayIoError { source: e })?;

    let mut conditions = TrackConditions::default();
    let mut processed = 0usize;

    for (line_no, frame) in frames.enumerate() {
        let frame = frame.map_err(|e| MiniSectorError::InvalidReplayFrame {
            line: line_no + 1,
            reason: e.to_string(),
        })?;

        if let Some(frame_conditions) = frame.conditions {
            conditions = frame_conditions;
        }
        if let Some(car_model) = car_override {
            conditions.car_model = car_model.to_string();
        }

        let sample = TelemetrySample {
            track_id: frame.track_id,
            position_pct: frame.position_pct,
            lap_time_sec: frame.lap_time_sec,
            lap_valid: frame.lap_valid,
        };
        engine.update(&sample, &conditions);
        processed += 1;
    }

    debug!("Replayed {} frames from {:?}", processed, path);
    Ok(processed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track_data::BuiltinTrackData;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_replay(lines: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_replay_drives_the_engine() {
        let file = write_replay(&[
            r#"{"track_id":"Zolder","position_pct":0.05,"lap_time_sec":1.0}"#,
            r#"{"track_id":"Zolder","position_pct":0.15,"lap_time_sec":12.0}"#,
        ]);

        let mut engine = SectorTimingEngine::new(Box::new(BuiltinTrackData));
        let processed = replay_file(&mut engine, file.path(), None).unwrap();

        assert_eq!(processed, 2);
        assert_eq!(engine.current_sector_number(), 2);
        assert!((engine.current_lap_sector_time(1) - 11.0).abs() < 0.001);
    }

    #[test]
    fn test_conditions_carry_forward_between_frames() {
        let file = write_replay(&[
            r#"{"track_id":"Zolder","position_pct":0.05,"lap_time_sec":1.0,"conditions":{"car_model":"ferrari_488_gt3","weather_type":"Dry"}}"#,
            r#"{"track_id":"Zolder","position_pct":0.15,"lap_time_sec":12.0}"#,
        ]);

        let mut engine = SectorTimingEngine::new(Box::new(BuiltinTrackData));
        replay_file(&mut engine, file.path(), None).unwrap();

        // session best was recorded, so the valid lap with a carried car
        // model made it through both frames
        assert!((engine.session_best_sector_time(1) - 11.0).abs() < 0.001);
    }

    #[test]
    fn test_malformed_frame_is_reported_with_line_number() {
        let file = write_replay(&[
            r#"{"track_id":"Zolder","position_pct":0.05,"lap_time_sec":1.0}"#,
            r#"{"track_id":"#,
        ]);

        let mut engine = SectorTimingEngine::new(Box::new(BuiltinTrackData));
        let err = replay_file(&mut engine, file.path(), None).unwrap_err();
        match err {
            MiniSectorError::InvalidReplayFrame { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }
}
