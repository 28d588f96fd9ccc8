use chrono::Local;
use colored::*;
use env_logger::{Builder, Env};
use log::info;
use std::io::Write;

/// Target of the activity log: uploads, downloads and deletions.
pub const ACTIVITY_TARGET: &str = "activity";

/// Initializes the logger with a custom format and colors.
///
/// `RUST_LOG` takes precedence over the default level, which is `debug` when
/// `verbose` is set and `info` otherwise.
pub fn init_logger(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };

    Builder::from_env(Env::default().default_filter_or(default_level))
        .format(|buf, record| {
            let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
            let level = match record.level() {
                log::Level::Error => record.level().to_string().red(),
                log::Level::Warn => record.level().to_string().yellow(),
                log::Level::Info => record.level().to_string().green(),
                log::Level::Debug => record.level().to_string().blue(),
                log::Level::Trace => record.level().to_string().white(),
            };
            writeln!(buf, "[{}] [{}] {}", timestamp, level, record.args())
        })
        .init();
}

pub fn log_activity(message: &str) {
    info!(target: ACTIVITY_TARGET, "{}", message);
}
