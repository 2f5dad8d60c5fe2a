//! Tracing setup for the API binary.

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing::Subscriber;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::fmt::{self, format::DefaultFields, format::Format};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "skinai_api=debug,skinai_model=info,tower_http=debug";

/// Open `path` for appending, creating missing parent directories.
pub fn open_log_file(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Plain-text fmt layer writing every event to `file`.
pub fn file_layer<S>(file: File) -> fmt::Layer<S, DefaultFields, Format, Mutex<File>>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fmt::layer()
        .with_ansi(false)
        .with_writer(Mutex::new(file))
}

/// Install the global subscriber: stdout always, plus `log_file` if given.
///
/// A log file that cannot be opened is reported and skipped.
pub fn init(log_file: Option<&Path>) {
    let opened = log_file.map(|path| (path, open_log_file(path)));
    let (file, open_error) = match opened {
        Some((_, Ok(file))) => (Some(file), None),
        Some((path, Err(e))) => (None, Some((path, e))),
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_FILTER.into()),
        )
        .with(fmt::layer())
        .with(file.map(file_layer))
        .init();

    match (log_file, open_error) {
        (_, Some((path, e))) => {
            tracing::warn!(path = %path.display(), error = %e, "Could not open log file");
        }
        (Some(path), None) => tracing::info!(path = %path.display(), "Writing logs to file"),
        (None, None) => {}
    }
}
