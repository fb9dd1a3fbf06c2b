use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use serde_with::serde_as;

use crate::Result;
use crate::error::ConfigError;

use super::defaults::{
    default_duration, default_event_queue_bound, default_exit_grace, default_max_retained,
    default_max_visible, default_removal_delay, default_retired_ids, default_tick_interval,
};
use super::env::{env_duration, env_parse};
use super::{Config, HumantimeDuration, MAX_VISIBLE_BOUNDS, StoreSettings, ToastTiming};

pub(super) fn load(path: impl AsRef<Path>) -> std::result::Result<RawConfig, ConfigError> {
    let builder = ::config::Config::builder()
        .add_source(::config::File::from(path.as_ref()).required(false))
        .add_source(
            ::config::Environment::with_prefix("TOASTS")
                .separator("__")
                .try_parsing(true),
        );
    deserialize(builder)
}

pub(super) fn load_file(path: impl AsRef<Path>) -> std::result::Result<RawConfig, ConfigError> {
    let builder = ::config::Config::builder()
        .add_source(::config::File::from(path.as_ref()).required(false));
    deserialize(builder)
}

fn deserialize(
    builder: ::config::ConfigBuilder<::config::builder::DefaultState>,
) -> std::result::Result<RawConfig, ConfigError> {
    builder
        .build()
        .map_err(|err| ConfigError::Other(err.to_string()))?
        .try_deserialize()
        .map_err(|err| ConfigError::Parse(err.to_string()))
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct RawConfig {
    #[serde(default)]
    pub(super) timing: RawTiming,
    #[serde(default)]
    pub(super) store: RawStore,
    #[serde(default)]
    pub(super) app: RawApp,
}

#[serde_as]
#[derive(Debug, Deserialize)]
pub(super) struct RawTiming {
    #[serde(default = "default_tick_interval")]
    #[serde_as(as = "HumantimeDuration")]
    pub(super) tick_interval: Duration,
    #[serde(default = "default_exit_grace")]
    #[serde_as(as = "HumantimeDuration")]
    pub(super) exit_grace: Duration,
    #[serde(default = "default_removal_delay")]
    #[serde_as(as = "HumantimeDuration")]
    pub(super) removal_delay: Duration,
}

#[serde_as]
#[derive(Debug, Deserialize)]
pub(super) struct RawStore {
    #[serde(default = "default_duration")]
    #[serde_as(as = "HumantimeDuration")]
    pub(super) default_duration: Duration,
    #[serde(default = "default_max_visible")]
    pub(super) max_visible: usize,
    #[serde(default = "default_max_retained")]
    pub(super) max_retained: usize,
    #[serde(default = "default_retired_ids")]
    pub(super) retired_ids: usize,
}

#[derive(Debug, Deserialize)]
pub(super) struct RawApp {
    #[serde(default = "default_event_queue_bound")]
    pub(super) event_queue_bound: usize,
}

impl RawConfig {
    pub(super) fn apply_env_overrides(&mut self) -> std::result::Result<(), ConfigError> {
        if let Some(tick) = env_duration("TOAST_TICK_INTERVAL")? {
            self.timing.tick_interval = tick;
        }
        if let Some(grace) = env_duration("TOAST_EXIT_GRACE")? {
            self.timing.exit_grace = grace;
        }
        if let Some(delay) = env_duration("TOAST_REMOVAL_DELAY")? {
            self.timing.removal_delay = delay;
        }
        if let Some(duration) = env_duration("TOAST_DEFAULT_DURATION")? {
            self.store.default_duration = duration;
        }
        if let Some(max_visible) = env_parse::<usize>("TOAST_MAX_VISIBLE")? {
            self.store.max_visible = max_visible;
        }
        if let Some(max_retained) = env_parse::<usize>("TOAST_MAX_RETAINED")? {
            self.store.max_retained = max_retained;
        }
        if let Some(retired) = env_parse::<usize>("TOAST_RETIRED_IDS")? {
            self.store.retired_ids = retired;
        }
        if let Some(bound) = env_parse::<usize>("TOAST_QUEUE_BOUND")? {
            self.app.event_queue_bound = bound;
        }
        Ok(())
    }

    pub(super) fn validate_and_build(self) -> Result<Config> {
        if self.timing.tick_interval.is_zero() {
            return Err(ConfigError::InvalidField {
                field: "timing.tick_interval",
                message: "tick interval must be greater than zero".to_string(),
            }
            .into());
        }
        if !MAX_VISIBLE_BOUNDS.contains(&self.store.max_visible) {
            return Err(ConfigError::InvalidField {
                field: "store.max_visible",
                message: format!(
                    "expected between {} and {}, got {}",
                    MAX_VISIBLE_BOUNDS.start(),
                    MAX_VISIBLE_BOUNDS.end(),
                    self.store.max_visible
                ),
            }
            .into());
        }
        if self.store.max_retained < self.store.max_visible {
            return Err(ConfigError::InvalidField {
                field: "store.max_retained",
                message: format!(
                    "must be at least max_visible ({})",
                    self.store.max_visible
                ),
            }
            .into());
        }
        if self.store.retired_ids == 0 {
            return Err(ConfigError::InvalidField {
                field: "store.retired_ids",
                message: "retired id cache must be greater than zero".to_string(),
            }
            .into());
        }
        if self.app.event_queue_bound == 0 {
            return Err(ConfigError::InvalidField {
                field: "app.event_queue_bound",
                message: "queue bound must be greater than zero".to_string(),
            }
            .into());
        }

        Ok(Config {
            timing: ToastTiming {
                tick_interval: self.timing.tick_interval,
                exit_grace: self.timing.exit_grace,
                removal_delay: self.timing.removal_delay,
            },
            store: StoreSettings {
                default_duration: self.store.default_duration,
                max_visible: self.store.max_visible,
                max_retained: self.store.max_retained,
                retired_ids: self.store.retired_ids,
            },
            event_queue_bound: self.app.event_queue_bound,
        })
    }
}

impl Default for RawTiming {
    fn default() -> Self {
        Self {
            tick_interval: default_tick_interval(),
            exit_grace: default_exit_grace(),
            removal_delay: default_removal_delay(),
        }
    }
}

impl Default for RawStore {
    fn default() -> Self {
        Self {
            default_duration: default_duration(),
            max_visible: default_max_visible(),
            max_retained: default_max_retained(),
            retired_ids: default_retired_ids(),
        }
    }
}

impl Default for RawApp {
    fn default() -> Self {
        Self {
            event_queue_bound: default_event_queue_bound(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::RawConfig;

    #[test]
    fn retained_below_visible_is_rejected() {
        let mut raw = RawConfig::default();
        raw.store.max_visible = 10;
        raw.store.max_retained = 4;
        assert!(raw.validate_and_build().is_err());
    }

    #[test]
    fn zero_queue_bound_is_rejected() {
        let mut raw = RawConfig::default();
        raw.app.event_queue_bound = 0;
        assert!(raw.validate_and_build().is_err());
    }
}
