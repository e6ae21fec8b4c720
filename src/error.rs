use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading and compiling rule databases.
///
/// Loading is the only fallible phase: once an [`Engine`](crate::Engine) is
/// built, execution cannot fail.
#[derive(Debug, Error)]
pub enum LoadError {
    /// A database file could not be opened or read.
    #[error("database file {path} does not exist or could not be opened: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A metric field did not parse as a number after stripping comments and
    /// whitespace.
    #[error("invalid metric value {value:?} in clause: {clause}")]
    InvalidMetric { value: String, clause: String },

    /// A metric section contained a character outside the metric alphabet.
    #[error("invalid character {found:?} in metric section of clause: {clause}")]
    InvalidMetricText { found: char, clause: String },
}
