// Error types for minisector

use snafu::Snafu;
use std::io;

#[derive(Debug, Snafu)]
pub enum MiniSectorError {
    // Errors for the sector best store
    #[snafu(display("Could not find application data directory for the sector best store"))]
    NoDataDir,
    #[snafu(display("Error creating sector best store directory"))]
    StoreDirError { source: io::Error },
    #[snafu(display("Error opening sector best store"))]
    StoreOpenError { source: rusqlite::Error },
    #[snafu(display("Error querying sector best store"))]
    StoreQueryError { source: rusqlite::Error },
    #[snafu(display("Error formatting record timestamp"))]
    TimestampFormatError { source: time::error::Format },

    // Replay errors
    #[snafu(display("Error reading replay file"))]
    ReplayIoError { source: io::Error },
    #[snafu(display("Invalid replay frame at line {line}: {reason}"))]
    InvalidReplayFrame { line: usize, reason: String },
}
