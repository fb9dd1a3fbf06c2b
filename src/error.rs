use std::path::PathBuf;

use thiserror::Error;

use crate::types::NotificationId;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("telemetry initialization failed: {0}")]
    Telemetry(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration: {0}")]
    Parse(String),
    #[error("invalid configuration for {field}: {message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },
    #[error("configuration error: {0}")]
    Other(String),
}

/// Reasons the store refuses a dispatched notification.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("notification message cannot be empty")]
    EmptyMessage,
    #[error("notification {0} is already in the store")]
    DuplicateId(NotificationId),
    #[error("notification id {0} was already used and removed")]
    RetiredId(NotificationId),
}
