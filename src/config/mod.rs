use std::ops::RangeInclusive;
use std::path::Path;
use std::time::Duration;

use crate::Result;
use crate::error::Error as ToastError;

mod defaults;
mod env;
mod raw;
mod serde;

pub(crate) use serde::HumantimeDuration;

const MAX_VISIBLE_BOUNDS: RangeInclusive<usize> = 1..=50;

#[derive(Debug, Clone)]
pub struct Config {
    pub timing: ToastTiming,
    pub store: StoreSettings,
    pub event_queue_bound: usize,
}

/// Timer periods driving every mounted toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToastTiming {
    /// Period of the progress tick. The per-tick decrement is derived from it.
    pub tick_interval: Duration,
    /// Delay between a toast turning invisible and its close callback.
    pub exit_grace: Duration,
    /// Delay between marking a closed toast read and deleting it.
    pub removal_delay: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreSettings {
    pub default_duration: Duration,
    pub max_visible: usize,
    pub max_retained: usize,
    pub retired_ids: usize,
}

impl Config {
    /// Load configuration from a file and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error when the configuration file cannot be parsed, when
    /// environment overrides are invalid, or when the resulting values fail
    /// validation.
    pub fn from_env_and_file(path: impl AsRef<Path>) -> Result<Self> {
        let mut raw = raw::load(path).map_err(ToastError::from)?;
        raw.apply_env_overrides().map_err(ToastError::from)?;
        raw.validate_and_build()
    }

    /// Load configuration from a file only, ignoring the environment.
    ///
    /// # Errors
    ///
    /// Same as [`Config::from_env_and_file`], minus environment failures.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        raw::load_file(path)
            .map_err(ToastError::from)?
            .validate_and_build()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timing: ToastTiming::default(),
            store: StoreSettings::default(),
            event_queue_bound: defaults::default_event_queue_bound(),
        }
    }
}

impl Default for ToastTiming {
    fn default() -> Self {
        Self {
            tick_interval: defaults::default_tick_interval(),
            exit_grace: defaults::default_exit_grace(),
            removal_delay: defaults::default_removal_delay(),
        }
    }
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            default_duration: defaults::default_duration(),
            max_visible: defaults::default_max_visible(),
            max_retained: defaults::default_max_retained(),
            retired_ids: defaults::default_retired_ids(),
        }
    }
}
