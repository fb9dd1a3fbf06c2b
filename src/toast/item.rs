use std::time::Duration;

use crate::types::{Notification, NotificationId};

pub const FULL_PROGRESS: f32 = 100.0;

/// Lifecycle phase of a mounted toast. Transitions only move forward.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub enum Phase {
    Visible,
    Exiting,
    PendingRemoval,
    Gone,
}

/// Display state of one notification while it is mounted.
#[derive(Clone, Debug)]
pub struct ToastItem {
    notification: Notification,
    progress: f32,
    decay_per_tick: f32,
    phase: Phase,
}

/// Percentage removed from the progress bar on each tick.
///
/// The decrement is tied to the tick period: `100 * tick / duration`, which is
/// `100 / (duration / 100)` when ticking every 100 ms.
#[must_use]
pub fn decay_per_tick(duration: Duration, tick: Duration) -> f32 {
    if duration.is_zero() {
        return 0.0;
    }
    #[allow(clippy::cast_possible_truncation)]
    let step = (f64::from(FULL_PROGRESS) * tick.as_secs_f64() / duration.as_secs_f64()) as f32;
    step
}

impl ToastItem {
    #[must_use]
    pub fn new(notification: Notification, tick: Duration) -> Self {
        let decay_per_tick = decay_per_tick(notification.duration, tick);
        Self {
            notification,
            progress: FULL_PROGRESS,
            decay_per_tick,
            phase: Phase::Visible,
        }
    }

    #[must_use]
    pub const fn id(&self) -> &NotificationId {
        &self.notification.id
    }

    #[must_use]
    pub const fn notification(&self) -> &Notification {
        &self.notification
    }

    #[must_use]
    pub const fn progress(&self) -> f32 {
        self.progress
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.phase == Phase::Visible
    }

    /// `None` for permanent toasts.
    #[must_use]
    pub const fn auto_dismiss_after(&self) -> Option<Duration> {
        if self.notification.is_permanent() {
            None
        } else {
            Some(self.notification.duration)
        }
    }

    /// Applies one progress tick. Returns whether progress changed.
    pub fn tick(&mut self) -> bool {
        self.assert_live();
        if self.phase != Phase::Visible || self.decay_per_tick == 0.0 || self.progress <= 0.0 {
            return false;
        }
        self.progress = (self.progress - self.decay_per_tick).max(0.0);
        true
    }

    /// `Visible -> Exiting`, from either auto-dismiss or a manual close.
    pub fn begin_exit(&mut self) -> bool {
        self.assert_live();
        self.advance(Phase::Visible, Phase::Exiting)
    }

    /// `Exiting -> PendingRemoval`, once the exit grace has elapsed. Returns
    /// `true` exactly once per instance.
    pub fn finish_exit(&mut self) -> bool {
        self.assert_live();
        self.advance(Phase::Exiting, Phase::PendingRemoval)
    }

    /// Marks the item as unmounted; no timer may touch it afterwards.
    pub const fn retire(&mut self) {
        self.phase = Phase::Gone;
    }

    fn advance(&mut self, from: Phase, to: Phase) -> bool {
        if self.phase != from {
            return false;
        }
        self.phase = to;
        true
    }

    fn assert_live(&self) {
        debug_assert!(
            self.phase != Phase::Gone,
            "timer event delivered to unmounted toast {}",
            self.notification.id
        );
    }
}

#[cfg(test)]
mod tests {
    use super::{Phase, ToastItem, decay_per_tick};
    use crate::types::{NotificationDraft, NotificationKind};
    use std::time::Duration;

    const TICK: Duration = Duration::from_millis(100);

    fn item(duration_ms: u64) -> ToastItem {
        let notification = NotificationDraft::new(NotificationKind::Info, "hello")
            .with_duration(Duration::from_millis(duration_ms))
            .into_notification(Duration::from_secs(5));
        ToastItem::new(notification, TICK)
    }

    #[test]
    fn decrement_matches_fixed_tick_formula() {
        let duration = Duration::from_millis(4000);
        let expected = 100.0 / (4000.0 / 100.0);
        assert!((decay_per_tick(duration, TICK) - expected).abs() < f32::EPSILON);
        assert!((decay_per_tick(duration, Duration::from_millis(50)) - expected / 2.0).abs() < 1e-6);
    }

    #[test]
    fn progress_follows_linear_decay() {
        for duration_ms in [1000_u64, 2000, 3000, 4500] {
            let mut toast = item(duration_ms);
            let ticks = duration_ms / 100;
            for n in 1..=ticks {
                assert!(toast.tick());
                #[allow(clippy::cast_precision_loss)]
                let expected = 100.0 * (1.0 - (n * 100) as f32 / duration_ms as f32);
                assert!(
                    (toast.progress() - expected.clamp(0.0, 100.0)).abs() < 0.01,
                    "duration {duration_ms} tick {n}: {} vs {expected}",
                    toast.progress()
                );
            }
        }
    }

    #[test]
    fn progress_clamps_at_zero() {
        let mut toast = item(250);
        for _ in 0..5 {
            toast.tick();
        }
        assert!(toast.progress().abs() < f32::EPSILON);
        assert!(!toast.tick());
    }

    #[test]
    fn permanent_toast_never_decays() {
        let mut toast = item(0);
        assert!(toast.auto_dismiss_after().is_none());
        assert!(!toast.tick());
        assert!((toast.progress() - 100.0).abs() < f32::EPSILON);
    }

    #[test]
    fn phases_advance_once_in_order() {
        let mut toast = item(2000);
        assert!(!toast.finish_exit());
        assert!(toast.begin_exit());
        assert!(!toast.is_visible());
        assert!(!toast.begin_exit());
        assert!(!toast.tick());
        assert!(toast.finish_exit());
        assert!(!toast.finish_exit());
        assert_eq!(toast.phase(), Phase::PendingRemoval);
        toast.retire();
        assert_eq!(toast.phase(), Phase::Gone);
    }
}
