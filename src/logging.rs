use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initializes logging for a batch CLI run: compact console output by
/// default, plus a daily-rotated JSON file when XDM_BRIDGE_LOG_DIR points
/// at a directory (schedulers that capture stdout don't need the file).
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("xdm_bridge=info"));

    let console_layer = fmt::layer().compact().with_writer(std::io::stdout);
    let registry = tracing_subscriber::registry().with(filter).with(console_layer);

    if let Ok(dir) = std::env::var("XDM_BRIDGE_LOG_DIR") {
        let _ = std::fs::create_dir_all(&dir);
        let file_appender = tracing_appender::rolling::daily(dir, "bridge.log");
        let (non_blocking_writer, guard) = tracing_appender::non_blocking(file_appender);
        registry
            .with(fmt::layer().json().with_writer(non_blocking_writer))
            .init();
        // Keep the guard alive for the life of the process so buffered
        // lines are flushed on exit
        std::mem::forget(guard);
    } else {
        registry.init();
    }
}
