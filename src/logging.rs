use std::{fs, path::Path};

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// File-only logging; the terminal belongs to the UI.
///
/// Respects `RUST_LOG`, defaulting to `info`. The returned guard must stay
/// alive until exit so buffered lines are flushed.
pub fn setup_logging(path: &Path) -> Result<tracing_appender::non_blocking::WorkerGuard> {
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
    fs::create_dir_all(dir).with_context(|| format!("creating log directory {}", dir.display()))?;
    let file_name = path.file_name().context("log path has no file name")?;

    let file_appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(writer)
        .with_filter(filter);

    tracing_subscriber::registry().with(file_layer).try_init()?;

    Ok(guard)
}
