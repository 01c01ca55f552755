//! Error types shared by the library.

use std::path::PathBuf;

use thiserror::Error;

/// Failure talking to the persistence gateway.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("rejected: {0}")]
    Rejected(String),
}

/// A single lookup or write that failed while reconciling personal records.
#[derive(Error, Debug)]
pub enum ReconciliationError {
    #[error("record lookup failed: {0}")]
    Lookup(#[source] GatewayError),

    #[error("record write failed: {0}")]
    Write(#[source] GatewayError),
}

/// Errors raised before a set-log batch ever reaches the gateway.
#[derive(Error, Debug)]
pub enum SubmissionError {
    #[error("malformed submission: {}", .0.join(" "))]
    Malformed(Vec<String>),
}

#[derive(Error, Debug)]
pub enum ProgrammeError {
    #[error("invalid programme: {}", .0.join(" "))]
    Invalid(Vec<String>),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("cannot read `{path}`: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse `{path}`: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not determine config directory")]
    NoConfigDir,

    #[error("config I/O error on `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file `{path}`: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("cannot serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}
