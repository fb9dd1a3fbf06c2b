use std::time::Duration;

use async_channel::Sender;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{Instant, interval_at, sleep, sleep_until};
use tracing::trace;

use crate::config::ToastTiming;
use crate::types::NotificationId;

/// Distinguishes successive mounts so events from a cancelled instance are
/// never applied to a newer one.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct MountId(pub(crate) u64);

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TimerEvent {
    Tick,
    Expired,
    ExitElapsed,
    RemovalDue,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ToastEvent {
    pub id: NotificationId,
    pub mount: MountId,
    pub kind: TimerEvent,
}

/// Aborts the wrapped task when dropped.
#[derive(Debug)]
pub(crate) struct AbortOnDrop(JoinHandle<()>);

impl AbortOnDrop {
    pub(crate) fn is_finished(&self) -> bool {
        self.0.is_finished()
    }
}

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Timer handles of one mounted toast, released when dropped.
#[derive(Debug)]
pub(crate) struct LifecycleTimers {
    close: Option<oneshot::Sender<()>>,
    task: AbortOnDrop,
}

impl LifecycleTimers {
    /// Starts the tick and dismiss timers for a freshly mounted toast. A
    /// `None` duration starts neither; the task then waits for a close.
    pub(crate) fn spawn(
        id: NotificationId,
        mount: MountId,
        duration: Option<Duration>,
        timing: ToastTiming,
        events: Sender<ToastEvent>,
    ) -> Self {
        let (close_tx, close_rx) = oneshot::channel();
        let lifecycle = Lifecycle {
            id,
            mount,
            timing,
            events,
        };
        let task = tokio::spawn(lifecycle.run(duration, close_rx));
        Self {
            close: Some(close_tx),
            task: AbortOnDrop(task),
        }
    }

    /// Stops ticking and starts the exit grace now. Only the first call has
    /// an effect.
    pub(crate) fn request_close(&mut self) -> bool {
        self.close
            .take()
            .is_some_and(|close| close.send(()).is_ok())
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// One-shot removal delay, outliving the toast it belongs to.
pub(crate) fn spawn_removal(
    id: NotificationId,
    mount: MountId,
    delay: Duration,
    events: Sender<ToastEvent>,
) -> AbortOnDrop {
    AbortOnDrop(tokio::spawn(async move {
        sleep(delay).await;
        let _ = events
            .send(ToastEvent {
                id,
                mount,
                kind: TimerEvent::RemovalDue,
            })
            .await;
    }))
}

struct Lifecycle {
    id: NotificationId,
    mount: MountId,
    timing: ToastTiming,
    events: Sender<ToastEvent>,
}

impl Lifecycle {
    async fn run(self, duration: Option<Duration>, mut close: oneshot::Receiver<()>) {
        let mounted_at = Instant::now();

        match duration {
            Some(duration) => {
                let tick = self.timing.tick_interval;
                let ticking = tick <= duration;
                let mut ticker = interval_at(mounted_at + tick, tick);
                let deadline = sleep_until(mounted_at + duration);
                tokio::pin!(deadline);

                loop {
                    // Ticks due at the deadline land before it, so the bar
                    // reaches zero as the toast turns invisible.
                    tokio::select! {
                        biased;
                        closed = &mut close => {
                            if closed.is_err() {
                                return;
                            }
                            break;
                        }
                        _ = ticker.tick(), if ticking => {
                            if !self.emit(TimerEvent::Tick).await {
                                return;
                            }
                        }
                        () = &mut deadline => {
                            if !self.emit(TimerEvent::Expired).await {
                                return;
                            }
                            break;
                        }
                    }
                }
            }
            None => {
                if close.await.is_err() {
                    return;
                }
            }
        }

        trace!(id = %self.id, "exit grace started");
        sleep(self.timing.exit_grace).await;
        self.emit(TimerEvent::ExitElapsed).await;
    }

    async fn emit(&self, kind: TimerEvent) -> bool {
        self.events
            .send(ToastEvent {
                id: self.id.clone(),
                mount: self.mount,
                kind,
            })
            .await
            .is_ok()
    }
}
