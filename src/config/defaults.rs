use std::time::Duration;

pub(super) const fn default_tick_interval() -> Duration {
    Duration::from_millis(100)
}

pub(super) const fn default_exit_grace() -> Duration {
    Duration::from_millis(300)
}

pub(super) const fn default_removal_delay() -> Duration {
    Duration::from_millis(100)
}

pub(super) const fn default_duration() -> Duration {
    Duration::from_secs(5)
}

pub(super) const fn default_max_visible() -> usize {
    5
}

pub(super) const fn default_max_retained() -> usize {
    100
}

pub(super) const fn default_retired_ids() -> usize {
    1024
}

pub(super) const fn default_event_queue_bound() -> usize {
    64
}
