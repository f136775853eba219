//! Error types.
//!
//! Engine operations never fail: unmeasured sizes and missing platform
//! features degrade to no-ops or static presentation. Errors only arise at
//! the configuration boundary.

use std::io;
use std::path::PathBuf;

/// Errors raised while loading or validating configuration.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The config file could not be read.
    #[error("failed to read config {}: {source}", path.display())]
    ReadConfig {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// The config document is not valid TOML or has unknown keys.
    #[error("invalid config syntax: {0}")]
    ParseConfig(#[from] toml::de::Error),

    /// The config could not be rendered as TOML.
    #[error("failed to encode config: {0}")]
    EncodeConfig(#[from] toml::ser::Error),

    /// A value is outside its allowed range.
    #[error("invalid value for `{field}`: {reason}")]
    InvalidConfig {
        /// Dotted path of the offending key.
        field: &'static str,
        /// What the value must satisfy.
        reason: String,
    },
}

/// A specialized [`Result`](std::result::Result) for glide operations.
pub type Result<T> = std::result::Result<T, Error>;
