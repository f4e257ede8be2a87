use std::path::PathBuf;

/// Errors produced when building or driving a generator.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Skew exponent must be a finite value > 0.
    #[error("skew exponent must be finite and > 0, got {0}")]
    InvalidSkew(f64),

    /// `next()` was called before any record was inserted, so there is
    /// no domain to sample from.
    #[error("no records inserted yet; sampling domain is empty")]
    NoRecords,

    /// Config file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file was not valid TOML.
    #[error("failed to parse config {path}: {source}")]
    InvalidConfig {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
