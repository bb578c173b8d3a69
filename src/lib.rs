// Library interface for minisector
// This allows integration tests to access internal modules

pub mod conditions;
pub mod errors;
pub mod replay;
pub mod store;
pub mod timing;
pub mod track_data;

// Re-export commonly used types
pub use conditions::TrackConditions;
pub use errors::MiniSectorError;
pub use store::{SectorBestRecord, SectorBestStore, SqliteSectorBestStore};
pub use timing::{MAX_SECTORS, SectorTimingEngine, TelemetrySample, UNSET_TIME};
pub use track_data::{BuiltinTrackData, SegmentRange, SegmentSource};
