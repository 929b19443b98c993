/// Logging configuration.
///
/// Logs go to stderr by default, or to `{log_dir}/chatstats.log` when a log
/// directory is given. Each run appends to the log file with a separator.
use anyhow::{Context, Result};
use std::path::Path;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_FILE_NAME: &str = "chatstats.log";

fn default_filter(verbose: bool) -> EnvFilter {
    // RUST_LOG wins over the verbosity flag
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "chatstats=debug" } else { "chatstats=info" })
    })
}

/// Initializes logging for one analysis run.
///
/// # Arguments
///
/// * `log_dir` - Directory for the log file; stderr when `None`
/// * `verbose` - Log at debug level unless `RUST_LOG` says otherwise
pub fn init_logging(log_dir: Option<&Path>, verbose: bool) -> Result<()> {
    let Some(log_dir) = log_dir else {
        let stderr_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false);

        tracing_subscriber::registry()
            .with(default_filter(verbose))
            .with(stderr_layer)
            .try_init()
            .ok(); // Ignore error if already initialized

        return Ok(());
    };

    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;

    // Write run separator with timestamp
    let separator = format!(
        "\n{sep}\n[{ts}] New analysis run\n{sep}\n",
        sep = "=".repeat(80),
        ts = chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
    );

    use std::io::Write;
    if let Ok(mut file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join(LOG_FILE_NAME))
    {
        let _ = writeln!(file, "{}", separator);
    }

    let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE_NAME);
    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false) // No ANSI codes in log files
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(default_filter(verbose))
        .with(file_layer)
        .try_init()
        .ok(); // Ignore error if already initialized

    tracing::info!("Logging to {}", log_dir.join(LOG_FILE_NAME).display());

    Ok(())
}
