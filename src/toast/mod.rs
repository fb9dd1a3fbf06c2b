//! Toast lifecycle: per-notification state machines, their timers, and the
//! container that mounts them from a store projection.

mod container;
mod item;
mod timers;

pub use container::{ExitReason, ToastContainer, ToastView, Transition};
pub use item::{FULL_PROGRESS, Phase, ToastItem, decay_per_tick};
pub use timers::{MountId, TimerEvent, ToastEvent};
