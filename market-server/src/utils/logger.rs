//! Logging setup
//!
//! One tracing subscriber shared by the binary and tooling. `RUST_LOG`
//! wins when set, otherwise the level passed in (`LOG_LEVEL` from the
//! environment) applies globally. With a log directory configured,
//! output rolls daily into `market-server.log.*` files.

use tracing_subscriber::EnvFilter;

pub fn init_logger() {
    init_logger_with_file(None, None);
}

pub fn init_logger_with_file(log_level: Option<&str>, log_dir: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.unwrap_or("info")));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    match log_dir {
        Some(dir) if std::fs::create_dir_all(dir).is_ok() => {
            let appender = tracing_appender::rolling::daily(dir, "market-server.log");
            builder.with_ansi(false).with_writer(appender).init();
        }
        Some(dir) => {
            builder.init();
            tracing::warn!(dir, "Could not create log directory, logging to stdout");
        }
        None => builder.init(),
    }
}
