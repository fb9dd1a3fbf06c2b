use std::fmt::{self, Display};
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{DurationMilliSeconds, serde_as};
use uuid::Uuid;

/// Opaque identity key of a notification.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct NotificationId(String);

impl NotificationId {
    /// Fresh random id.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NotificationId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for NotificationId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    #[default]
    Info,
}

impl NotificationKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "success" | "ok" => Ok(Self::Success),
            "error" | "err" => Ok(Self::Error),
            "warning" | "warn" => Ok(Self::Warning),
            "info" | "information" => Ok(Self::Info),
            other => Err(format!("unknown notification type: {other}")),
        }
    }
}

/// A notification record as held by the store.
#[serde_as]
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Notification {
    pub id: NotificationId,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub message: String,
    /// Zero means the toast stays until closed by hand.
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub duration: Duration,
    #[serde(default)]
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    #[must_use]
    pub const fn is_permanent(&self) -> bool {
        self.duration.is_zero()
    }
}

/// What callers hand to the store when showing a notification.
#[serde_as]
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct NotificationDraft {
    #[serde(default)]
    pub id: Option<NotificationId>,
    #[serde(rename = "type", default)]
    pub kind: NotificationKind,
    #[serde(default)]
    pub title: Option<String>,
    pub message: String,
    #[serde(default)]
    #[serde_as(as = "Option<DurationMilliSeconds<u64>>")]
    pub duration: Option<Duration>,
}

impl NotificationDraft {
    pub fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            id: None,
            kind,
            title: None,
            message: message.into(),
            duration: None,
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<NotificationId>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub const fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Builds the stored record, falling back to `default_duration`.
    #[must_use]
    pub fn into_notification(self, default_duration: Duration) -> Notification {
        Notification {
            id: self.id.unwrap_or_else(NotificationId::generate),
            kind: self.kind,
            title: self.title.filter(|t| !t.trim().is_empty()),
            message: self.message,
            duration: self.duration.unwrap_or(default_duration),
            read: false,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{NotificationDraft, NotificationId, NotificationKind};
    use std::str::FromStr;
    use std::time::Duration;

    #[test]
    fn kind_from_str_accepts_variants() {
        assert_eq!(NotificationKind::from_str("ERROR"), Ok(NotificationKind::Error));
        assert_eq!(NotificationKind::from_str("warn"), Ok(NotificationKind::Warning));
        assert_eq!(NotificationKind::from_str("ok"), Ok(NotificationKind::Success));
        assert!(NotificationKind::from_str("fatal").is_err());
    }

    #[test]
    fn draft_parses_millisecond_duration() {
        let draft: NotificationDraft = match serde_json::from_str(
            r#"{"id":"n1","type":"error","message":"Network failed","duration":4000}"#,
        ) {
            Ok(value) => value,
            Err(err) => panic!("failed to parse draft: {err}"),
        };
        assert_eq!(draft.id, Some(NotificationId::from("n1")));
        assert_eq!(draft.kind, NotificationKind::Error);
        assert_eq!(draft.duration, Some(Duration::from_millis(4000)));
    }

    #[test]
    fn draft_without_duration_uses_default() {
        let notification = NotificationDraft::new(NotificationKind::Info, "hello")
            .with_title("  ")
            .into_notification(Duration::from_secs(5));
        assert_eq!(notification.duration, Duration::from_secs(5));
        assert!(notification.title.is_none());
        assert!(!notification.read);
        assert!(!notification.is_permanent());
    }

    #[test]
    fn generated_ids_are_distinct() {
        assert_ne!(NotificationId::generate(), NotificationId::generate());
    }
}
