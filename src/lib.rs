#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod config;
pub mod error;
pub mod store;
pub mod style;
pub mod telemetry;
pub mod toast;
pub mod types;

pub use store::{MemoryStore, NotificationStore};
pub use toast::{ToastContainer, Transition};

pub type Result<T> = std::result::Result<T, error::Error>;
