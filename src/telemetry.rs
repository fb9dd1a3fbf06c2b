use tracing_subscriber::{EnvFilter, Registry, layer::SubscriberExt};

use crate::Result;
use crate::error::Error;

const DEFAULT_FILTER: &str = "toasts=info";

/// Installs the global tracing subscriber.
///
/// The filter is taken from `explicit_filter`, then `RUST_LOG`, then
/// `toasts=info`; the first candidate that parses wins.
///
/// # Errors
///
/// Fails when no filter candidate parses, when JSON output is requested from a
/// build without the `json-logs` feature, or when a global subscriber is
/// already installed.
pub fn init_tracing(explicit_filter: Option<&str>, use_json: bool) -> Result<()> {
    let filter = resolve_filter(explicit_filter, std::env::var("RUST_LOG").ok())?;

    #[cfg(feature = "json-logs")]
    if use_json {
        let subscriber = Registry::default().with(filter).with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .json()
                .flatten_event(true),
        );
        return tracing::subscriber::set_global_default(subscriber)
            .map_err(|err| Error::Telemetry(err.to_string()));
    }

    #[cfg(not(feature = "json-logs"))]
    if use_json {
        return Err(Error::Telemetry(
            "binary was built without the `json-logs` feature".to_string(),
        ));
    }

    // Frames go to stdout, so logs stay on stderr.
    let subscriber = Registry::default().with(filter).with(
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_writer(std::io::stderr),
    );
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|err| Error::Telemetry(err.to_string()))
}

fn resolve_filter(explicit: Option<&str>, from_env: Option<String>) -> Result<EnvFilter> {
    explicit
        .map(str::to_string)
        .into_iter()
        .chain(from_env)
        .chain(std::iter::once(DEFAULT_FILTER.to_string()))
        .find_map(|candidate| EnvFilter::try_new(candidate).ok())
        .ok_or_else(|| Error::Telemetry("invalid log filter".to_string()))
}

#[cfg(test)]
mod tests {
    use super::resolve_filter;

    #[test]
    fn falls_back_when_explicit_filter_is_invalid() {
        let filter = match resolve_filter(Some("toasts=notalevel"), None) {
            Ok(filter) => filter,
            Err(err) => panic!("expected fallback filter: {err}"),
        };
        assert_eq!(filter.to_string(), "toasts=info");
    }

    #[test]
    fn explicit_filter_wins_over_env() {
        let filter = match resolve_filter(Some("toasts=trace"), Some("warn".into())) {
            Ok(filter) => filter,
            Err(err) => panic!("expected explicit filter: {err}"),
        };
        assert_eq!(filter.to_string(), "toasts=trace");
    }
}
