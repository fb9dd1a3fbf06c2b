use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::signal;
use tokio::time::{Instant, sleep};
use toasts::Result;
use toasts::config::Config;
use toasts::error::ConfigError;
use toasts::store::MemoryStore;
use toasts::telemetry::init_tracing;
use toasts::toast::{ToastContainer, Transition};
use tracing::{debug, info, trace, warn};

use super::cli::Cli;
use super::render::frame;
use super::script::{ScriptLine, parse_line};

const DEFAULT_CONFIG: &str = "toasts.toml";

pub async fn run(cli: Cli) -> Result<()> {
    init_tracing(cli.log_filter.as_deref(), cli.json_logs)?;

    // The default file is optional; one named on the command line is not.
    let config_path = match &cli.config {
        Some(path) => {
            tokio::fs::metadata(path)
                .await
                .map_err(|source| ConfigError::FileRead {
                    path: path.clone(),
                    source,
                })?;
            path.clone()
        }
        None => PathBuf::from(DEFAULT_CONFIG),
    };
    let config = Config::from_env_and_file(&config_path)?;

    let input: Box<dyn AsyncBufRead + Unpin + Send> = match &cli.script {
        Some(path) => Box::new(BufReader::new(File::open(path).await?)),
        None => Box::new(BufReader::new(tokio::io::stdin())),
    };
    let mut lines = input.lines();

    let store = Arc::new(MemoryStore::new(config.store));
    let mut container = ToastContainer::new(store, &config);

    let hold = sleep(Duration::ZERO);
    tokio::pin!(hold);
    let mut holding = false;
    let mut input_open = true;
    let mut line_no = 0_usize;

    info!(config = %config_path.display(), "toast stack started");

    loop {
        tokio::select! {
            biased;
            _ = signal::ctrl_c() => {
                info!("shutdown signal received, stopping");
                break;
            }
            () = &mut hold, if holding => {
                holding = false;
            }
            line = lines.next_line(), if input_open && !holding => {
                if let Some(line) = line? {
                    line_no += 1;
                    if let Some(pause) = dispatch(&mut container, &line, line_no) {
                        hold.as_mut().reset(Instant::now() + pause);
                        holding = true;
                    }
                } else {
                    debug!(lines = line_no, "input exhausted");
                    input_open = false;
                }
            }
            transition = container.next() => {
                report(&container, &transition, &cli);
            }
        }

        if !input_open && !holding && container.is_idle() {
            break;
        }
    }

    Ok(())
}

/// Applies one script line. Returns how long to pause reading input.
pub(super) fn dispatch(
    container: &mut ToastContainer<MemoryStore>,
    line: &str,
    line_no: usize,
) -> Option<Duration> {
    let parsed = match parse_line(line) {
        Ok(Some(parsed)) => parsed,
        Ok(None) => return None,
        Err(err) => {
            warn!(line = line_no, error = %err, "skipping invalid script line");
            return None;
        }
    };
    if let Some(pause) = parsed.pause() {
        return Some(pause);
    }

    match parsed {
        ScriptLine::Show(draft) => match container.store().add(draft) {
            Ok(id) => debug!(%id, line = line_no, "notification queued"),
            Err(err) => warn!(line = line_no, error = %err, "notification rejected"),
        },
        ScriptLine::Close { close } => {
            if !container.close(&close) {
                warn!(id = %close, line = line_no, "no visible toast to close");
            }
        }
        ScriptLine::MarkAllRead { mark_all_read } => {
            if mark_all_read {
                container.store().mark_all_read();
            }
        }
        ScriptLine::Wait { .. } => {}
    }

    // Mount right away so an input that ends here still sees its toasts.
    container.sync();
    None
}

fn report(container: &ToastContainer<MemoryStore>, transition: &Transition, cli: &Cli) {
    if let Transition::Progress { id, progress } = transition {
        trace!(%id, progress, "toast progress");
        if !cli.progress {
            return;
        }
    } else {
        info!(id = %transition.id(), ?transition, "toast transition");
    }
    println!(
        "{}\n",
        frame(container.render().as_deref(), !cli.no_color)
    );
}

#[cfg(test)]
mod tests {
    use super::dispatch;
    use std::sync::Arc;
    use std::time::Duration;
    use toasts::config::Config;
    use toasts::store::MemoryStore;
    use toasts::toast::{ExitReason, ToastContainer, Transition};
    use toasts::types::NotificationId;

    fn container() -> ToastContainer<MemoryStore> {
        ToastContainer::new(Arc::new(MemoryStore::default()), &Config::default())
    }

    #[tokio::test(start_paused = true)]
    async fn script_lines_drive_the_container() {
        let mut container = container();
        let id = NotificationId::from("n1");

        assert_eq!(
            dispatch(
                &mut container,
                r#"{"id":"n1","type":"error","message":"Network failed","duration":4000}"#,
                1
            ),
            None
        );
        assert_eq!(container.mounted_ids(), vec![id.clone()]);

        assert_eq!(
            dispatch(&mut container, r#"{"wait":"2s"}"#, 2),
            Some(Duration::from_secs(2))
        );

        assert_eq!(dispatch(&mut container, r#"{"close":"n1"}"#, 3), None);
        assert_eq!(
            container.drain_ready(),
            vec![
                Transition::Mounted { id: id.clone() },
                Transition::Exiting {
                    id,
                    reason: ExitReason::Closed
                },
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn bad_lines_change_nothing() {
        let mut container = container();
        assert_eq!(dispatch(&mut container, "{oops", 1), None);
        assert_eq!(dispatch(&mut container, r#"{"message":"   "}"#, 2), None);
        assert_eq!(dispatch(&mut container, r#"{"close":"ghost"}"#, 3), None);
        assert!(container.store().is_empty());
        assert!(container.render().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn mark_all_read_unmounts_everything() {
        let mut container = container();
        dispatch(&mut container, r#"{"message":"one"}"#, 1);
        dispatch(&mut container, r#"{"message":"two","duration":0}"#, 2);
        assert_eq!(container.mounted_ids().len(), 2);
        dispatch(&mut container, r#"{"mark_all_read":true}"#, 3);
        assert!(container.mounted_ids().is_empty());
        assert_eq!(container.store().unread_count(), 0);
    }
}
