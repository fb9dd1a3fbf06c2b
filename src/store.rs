//! Notification store consumed by the toast container.
//!
//! [`NotificationStore`] is the capability set the container needs; any part
//! of an application can own a [`MemoryStore`] and dispatch into it while the
//! container observes its visible projection.

use std::num::NonZeroUsize;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use lru::LruCache;
use tokio::sync::watch;
use tracing::debug;

use crate::config::StoreSettings;
use crate::error::DispatchError;
use crate::types::{Notification, NotificationDraft, NotificationId};

/// Read/mutate interface the container is given.
pub trait NotificationStore: Send + Sync + 'static {
    /// Currently visible notifications, in insertion order.
    fn visible(&self) -> Vec<Notification>;

    /// Excludes `id` from future projections without deleting it. Unknown ids
    /// are ignored.
    fn mark_as_read(&self, id: &NotificationId);

    /// Deletes the record. Idempotent.
    fn remove(&self, id: &NotificationId);

    /// Revision counter bumped on every mutation.
    fn subscribe(&self) -> watch::Receiver<u64>;
}

#[derive(Debug)]
pub struct MemoryStore {
    settings: StoreSettings,
    inner: RwLock<Inner>,
    revision: watch::Sender<u64>,
}

#[derive(Debug)]
struct Inner {
    entries: Vec<Notification>,
    retired: LruCache<NotificationId, ()>,
}

impl MemoryStore {
    #[must_use]
    pub fn new(settings: StoreSettings) -> Self {
        let retired = NonZeroUsize::new(settings.retired_ids).unwrap_or(NonZeroUsize::MIN);
        let (revision, _) = watch::channel(0);
        Self {
            settings,
            inner: RwLock::new(Inner {
                entries: Vec::new(),
                retired: LruCache::new(retired),
            }),
            revision,
        }
    }

    /// Dispatches a draft, generating an id when the draft has none.
    ///
    /// # Errors
    ///
    /// Rejects empty messages and ids that are held or were already used.
    pub fn add(&self, draft: NotificationDraft) -> Result<NotificationId, DispatchError> {
        if draft.message.trim().is_empty() {
            return Err(DispatchError::EmptyMessage);
        }
        let notification = draft.into_notification(self.settings.default_duration);
        let id = notification.id.clone();
        self.push(notification)?;
        Ok(id)
    }

    /// Dispatches a fully formed record.
    ///
    /// # Errors
    ///
    /// Same as [`MemoryStore::add`].
    pub fn push(&self, notification: Notification) -> Result<(), DispatchError> {
        if notification.message.trim().is_empty() {
            return Err(DispatchError::EmptyMessage);
        }
        let mut inner = self.write();
        if inner.entries.iter().any(|n| n.id == notification.id) {
            return Err(DispatchError::DuplicateId(notification.id));
        }
        if inner.retired.contains(&notification.id) {
            return Err(DispatchError::RetiredId(notification.id));
        }
        debug!(
            id = %notification.id,
            kind = %notification.kind,
            duration_ms = u64::try_from(notification.duration.as_millis()).unwrap_or(u64::MAX),
            "notification dispatched"
        );
        inner.entries.push(notification);
        self.purge_read(&mut inner);
        drop(inner);
        self.bump();
        Ok(())
    }

    pub fn mark_all_read(&self) {
        let mut inner = self.write();
        let mut changed = false;
        for entry in inner.entries.iter_mut().filter(|n| !n.read) {
            entry.read = true;
            changed = true;
        }
        drop(inner);
        if changed {
            self.bump();
        }
    }

    /// Drops every record; their ids become retired.
    pub fn clear(&self) {
        let mut inner = self.write();
        if inner.entries.is_empty() {
            return;
        }
        let drained: Vec<_> = inner.entries.drain(..).map(|n| n.id).collect();
        for id in drained {
            inner.retired.put(id, ());
        }
        drop(inner);
        self.bump();
    }

    #[must_use]
    pub fn get(&self, id: &NotificationId) -> Option<Notification> {
        self.read().entries.iter().find(|n| &n.id == id).cloned()
    }

    #[must_use]
    pub fn unread_count(&self) -> usize {
        self.read().entries.iter().filter(|n| !n.read).count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.read().entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().entries.is_empty()
    }

    /// Oldest read records go first; unread records are never purged.
    fn purge_read(&self, inner: &mut Inner) {
        while inner.entries.len() > self.settings.max_retained {
            let Some(pos) = inner.entries.iter().position(|n| n.read) else {
                break;
            };
            let evicted = inner.entries.remove(pos);
            debug!(id = %evicted.id, "purging read notification beyond retention");
            inner.retired.put(evicted.id, ());
        }
    }

    fn bump(&self) {
        self.revision.send_modify(|rev| *rev = rev.wrapping_add(1));
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(StoreSettings::default())
    }
}

impl NotificationStore for MemoryStore {
    fn visible(&self) -> Vec<Notification> {
        self.read()
            .entries
            .iter()
            .filter(|n| !n.read)
            .take(self.settings.max_visible)
            .cloned()
            .collect()
    }

    fn mark_as_read(&self, id: &NotificationId) {
        let mut inner = self.write();
        let Some(entry) = inner.entries.iter_mut().find(|n| &n.id == id) else {
            return;
        };
        if entry.read {
            return;
        }
        entry.read = true;
        drop(inner);
        self.bump();
    }

    fn remove(&self, id: &NotificationId) {
        let mut inner = self.write();
        let Some(pos) = inner.entries.iter().position(|n| &n.id == id) else {
            return;
        };
        let removed = inner.entries.remove(pos);
        inner.retired.put(removed.id, ());
        drop(inner);
        self.bump();
    }

    fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }
}
