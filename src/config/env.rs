use std::time::Duration;

use humantime::parse_duration;

use crate::error::ConfigError;

pub(super) fn env_string(key: &'static str) -> std::result::Result<Option<String>, ConfigError> {
    match std::env::var(key) {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => Ok(Some(value.trim().to_string())),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(err) => Err(ConfigError::Other(format!("{key}: {err}"))),
    }
}

pub(super) fn env_parse<T>(key: &'static str) -> std::result::Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    env_string(key)?
        .map(|value| {
            value.parse::<T>().map_err(|err| ConfigError::InvalidField {
                field: key,
                message: err.to_string(),
            })
        })
        .transpose()
}

/// Accepts humantime strings ("250ms") and bare integers as milliseconds.
pub(super) fn env_duration(
    key: &'static str,
) -> std::result::Result<Option<Duration>, ConfigError> {
    env_string(key)?
        .map(|value| parse_duration_value(&value).map_err(|message| ConfigError::InvalidField {
            field: key,
            message,
        }))
        .transpose()
}

fn parse_duration_value(value: &str) -> Result<Duration, String> {
    if let Ok(ms) = value.parse::<u64>() {
        return Ok(Duration::from_millis(ms));
    }
    parse_duration(value).map_err(|err| err.to_string())
}
