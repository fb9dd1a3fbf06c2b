use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use async_channel::{Receiver, Sender, bounded};
use tokio::sync::watch;
use tracing::{debug, trace};

use crate::config::{Config, ToastTiming};
use crate::style::ToastStyle;
use crate::store::NotificationStore;
use crate::types::{NotificationId, NotificationKind};

use super::item::{Phase, ToastItem};
use super::timers::{AbortOnDrop, LifecycleTimers, MountId, TimerEvent, ToastEvent, spawn_removal};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ExitReason {
    Expired,
    Closed,
}

/// Observable state changes, in the order they happened.
#[derive(Clone, Debug, PartialEq)]
pub enum Transition {
    Mounted { id: NotificationId },
    Progress { id: NotificationId, progress: f32 },
    Exiting { id: NotificationId, reason: ExitReason },
    MarkedRead { id: NotificationId },
    Unmounted { id: NotificationId },
    Removed { id: NotificationId },
}

impl Transition {
    #[must_use]
    pub const fn id(&self) -> &NotificationId {
        match self {
            Self::Mounted { id }
            | Self::Progress { id, .. }
            | Self::Exiting { id, .. }
            | Self::MarkedRead { id }
            | Self::Unmounted { id }
            | Self::Removed { id } => id,
        }
    }
}

/// What a mounted toast looks like right now.
#[derive(Clone, Debug, PartialEq)]
pub struct ToastView<'a> {
    pub id: &'a NotificationId,
    pub kind: NotificationKind,
    pub title: Option<&'a str>,
    pub message: &'a str,
    pub progress: f32,
    pub visible: bool,
    pub style: ToastStyle,
}

struct MountedToast {
    item: ToastItem,
    mount: MountId,
    timers: LifecycleTimers,
}

/// Projects a store's visible notifications into mounted toasts and runs
/// their lifecycles.
///
/// Dropping the container, or a toast leaving the projection, cancels every
/// timer the affected toasts own.
pub struct ToastContainer<S: NotificationStore> {
    store: Arc<S>,
    timing: ToastTiming,
    mounted: Vec<MountedToast>,
    pending_removals: HashMap<NotificationId, (MountId, AbortOnDrop)>,
    events_tx: Sender<ToastEvent>,
    events_rx: Receiver<ToastEvent>,
    changes: watch::Receiver<u64>,
    store_open: bool,
    synced: bool,
    outbox: VecDeque<Transition>,
    next_mount: u64,
}

impl<S: NotificationStore> ToastContainer<S> {
    #[must_use]
    pub fn new(store: Arc<S>, config: &Config) -> Self {
        Self::with_timing(store, config.timing, config.event_queue_bound)
    }

    #[must_use]
    pub fn with_timing(store: Arc<S>, timing: ToastTiming, queue_bound: usize) -> Self {
        let (events_tx, events_rx) = bounded(queue_bound.max(1));
        let changes = store.subscribe();
        Self {
            store,
            timing,
            mounted: Vec::new(),
            pending_removals: HashMap::new(),
            events_tx,
            events_rx,
            changes,
            store_open: true,
            synced: false,
            outbox: VecDeque::new(),
            next_mount: 0,
        }
    }

    #[must_use]
    pub const fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Re-reads the store projection: mounts new notifications, unmounts the
    /// ones that left, and follows the projection's order.
    pub fn sync(&mut self) {
        self.synced = true;
        let visible = self.store.visible();
        let keep: HashSet<&NotificationId> = visible.iter().map(|n| &n.id).collect();

        let mut retained = Vec::with_capacity(self.mounted.len());
        for mut mounted in std::mem::take(&mut self.mounted) {
            if keep.contains(mounted.item.id()) {
                retained.push(mounted);
            } else {
                debug!(id = %mounted.item.id(), phase = ?mounted.item.phase(), "unmounting toast");
                mounted.item.retire();
                self.outbox.push_back(Transition::Unmounted {
                    id: mounted.item.id().clone(),
                });
            }
        }

        let mut next: Vec<MountedToast> = Vec::with_capacity(visible.len());
        for notification in visible {
            // One mounted instance, and so one timer set, per id.
            if next.iter().any(|m| m.item.id() == &notification.id) {
                continue;
            }
            if let Some(pos) = retained
                .iter()
                .position(|m| m.item.id() == &notification.id)
            {
                next.push(retained.swap_remove(pos));
            } else if !self.pending_removals.contains_key(&notification.id) {
                next.push(self.mount(ToastItem::new(notification, self.timing.tick_interval)));
            }
        }
        self.mounted = next;
    }

    /// Hides a toast immediately, independent of its remaining time.
    /// Returns `false` when the toast is unknown or already leaving.
    pub fn close(&mut self, id: &NotificationId) -> bool {
        let Some(slot) = self.mounted.iter_mut().find(|m| m.item.id() == id) else {
            return false;
        };
        if !slot.item.begin_exit() {
            return false;
        }
        slot.timers.request_close();
        debug!(%id, "toast closed by hand");
        self.outbox.push_back(Transition::Exiting {
            id: id.clone(),
            reason: ExitReason::Closed,
        });
        true
    }

    /// Waits for and returns the next transition.
    ///
    /// Cancel safe: dropping the future loses no event, so it can sit in a
    /// `select!` next to other work.
    pub async fn next(&mut self) -> Transition {
        loop {
            if let Some(transition) = self.outbox.pop_front() {
                return transition;
            }
            if !self.synced {
                self.sync();
                continue;
            }
            tokio::select! {
                biased;
                changed = self.changes.changed(), if self.store_open => {
                    if changed.is_ok() {
                        self.sync();
                    } else {
                        self.store_open = false;
                    }
                }
                event = self.events_rx.recv() => {
                    if let Ok(event) = event {
                        self.apply(event);
                    }
                }
            }
        }
    }

    /// Processes whatever is already queued without waiting.
    pub fn drain_ready(&mut self) -> Vec<Transition> {
        if !self.synced || (self.store_open && matches!(self.changes.has_changed(), Ok(true))) {
            self.changes.borrow_and_update();
            self.sync();
        }
        while let Ok(event) = self.events_rx.try_recv() {
            self.apply(event);
        }
        self.outbox.drain(..).collect()
    }

    /// Current toasts in projection order, or `None` when there is nothing to
    /// show.
    #[must_use]
    pub fn render(&self) -> Option<Vec<ToastView<'_>>> {
        if self.mounted.is_empty() {
            return None;
        }
        Some(
            self.mounted
                .iter()
                .map(|m| {
                    let notification = m.item.notification();
                    ToastView {
                        id: &notification.id,
                        kind: notification.kind,
                        title: notification.title.as_deref(),
                        message: &notification.message,
                        progress: m.item.progress(),
                        visible: m.item.is_visible(),
                        style: ToastStyle::for_kind(notification.kind),
                    }
                })
                .collect(),
        )
    }

    #[must_use]
    pub fn mounted_ids(&self) -> Vec<NotificationId> {
        self.mounted.iter().map(|m| m.item.id().clone()).collect()
    }

    /// Lifecycle and removal timers still running.
    #[must_use]
    pub fn live_timers(&self) -> usize {
        self.mounted
            .iter()
            .filter(|m| !m.timers.is_finished())
            .count()
            + self
                .pending_removals
                .values()
                .filter(|(_, timer)| !timer.is_finished())
                .count()
    }

    /// Nothing mounted, nothing awaiting removal and nothing left to report.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.mounted.is_empty() && self.pending_removals.is_empty() && self.outbox.is_empty()
    }

    fn mount(&mut self, item: ToastItem) -> MountedToast {
        let mount = MountId(self.next_mount);
        self.next_mount += 1;
        debug!(id = %item.id(), kind = %item.notification().kind, "mounting toast");
        let timers = LifecycleTimers::spawn(
            item.id().clone(),
            mount,
            item.auto_dismiss_after(),
            self.timing,
            self.events_tx.clone(),
        );
        self.outbox.push_back(Transition::Mounted {
            id: item.id().clone(),
        });
        MountedToast {
            item,
            mount,
            timers,
        }
    }

    fn apply(&mut self, event: ToastEvent) {
        if event.kind == TimerEvent::RemovalDue {
            self.finish_removal(&event);
            return;
        }

        let Some(slot) = self
            .mounted
            .iter_mut()
            .find(|m| m.item.id() == &event.id && m.mount == event.mount)
        else {
            trace!(id = %event.id, kind = ?event.kind, "dropping event from unmounted toast");
            return;
        };

        match event.kind {
            TimerEvent::Tick => {
                if slot.item.tick() {
                    trace!(id = %event.id, progress = slot.item.progress(), "toast tick");
                    self.outbox.push_back(Transition::Progress {
                        id: event.id,
                        progress: slot.item.progress(),
                    });
                }
            }
            TimerEvent::Expired => {
                if slot.item.begin_exit() {
                    debug!(id = %event.id, "toast expired");
                    self.outbox.push_back(Transition::Exiting {
                        id: event.id,
                        reason: ExitReason::Expired,
                    });
                }
            }
            TimerEvent::ExitElapsed => {
                if slot.item.finish_exit() {
                    self.begin_removal(event.id, event.mount);
                }
            }
            TimerEvent::RemovalDue => {}
        }
    }

    /// Marks the toast read, which takes it out of the projection, and
    /// schedules the record's deletion.
    fn begin_removal(&mut self, id: NotificationId, mount: MountId) {
        debug!(%id, "toast exit finished, marking read");
        self.store.mark_as_read(&id);
        self.outbox
            .push_back(Transition::MarkedRead { id: id.clone() });
        let timer = spawn_removal(
            id.clone(),
            mount,
            self.timing.removal_delay,
            self.events_tx.clone(),
        );
        self.pending_removals.insert(id, (mount, timer));
        self.sync();
    }

    fn finish_removal(&mut self, event: &ToastEvent) {
        match self.pending_removals.get(&event.id) {
            Some((mount, _)) if *mount == event.mount => {}
            _ => {
                trace!(id = %event.id, "dropping stale removal event");
                return;
            }
        }
        self.pending_removals.remove(&event.id);
        self.store.remove(&event.id);
        debug!(id = %event.id, "toast removed from store");
        self.outbox.push_back(Transition::Removed {
            id: event.id.clone(),
        });
        // A store that kept listing the record keeps it mounted until now.
        if self
            .mounted
            .iter()
            .any(|m| m.item.id() == &event.id && m.item.phase() == Phase::PendingRemoval)
        {
            self.sync();
        }
    }
}
