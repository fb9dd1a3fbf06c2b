use std::time::Duration;

use serde::Deserialize;
use serde_with::{DisplayFromStr, serde_as};
use toasts::types::{NotificationDraft, NotificationId};

/// One line of a toast script.
#[serde_as]
#[derive(Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ScriptLine {
    Close {
        close: NotificationId,
    },
    MarkAllRead {
        mark_all_read: bool,
    },
    Wait {
        #[serde_as(as = "DisplayFromStr")]
        wait: humantime::Duration,
    },
    Show(NotificationDraft),
}

impl ScriptLine {
    pub fn pause(&self) -> Option<Duration> {
        match self {
            Self::Wait { wait } => Some((*wait).into()),
            _ => None,
        }
    }
}

/// Blank lines and `#` comments yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<ScriptLine>, serde_json::Error> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    serde_json::from_str(line).map(Some)
}
