use chrono::Local;
use dotenv::dotenv;
use env_logger::{Builder, Env};
use log::Level;
use std::io::Write;
use std::path::Path;

fn level_color(level: Level) -> &'static str {
    match level {
        Level::Error => "\x1b[31m\x1b[1m",
        Level::Warn => "\x1b[33m\x1b[1m",
        Level::Info => "\x1b[32m\x1b[1m",
        Level::Debug => "\x1b[36m\x1b[1m",
        Level::Trace => "\x1b[90m\x1b[1m",
    }
}

fn build_logger(default_filter: &str) -> Builder {
    let mut builder = Builder::from_env(Env::default().default_filter_or(default_filter));
    builder
        .target(env_logger::Target::Stderr)
        .format(|buf, record| {
            let time = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
            writeln!(
                buf,
                "{}{} {}\x1b[0m [{}:{}] {}",
                time,
                level_color(record.level()),
                record.level(),
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                record.args(),
            )
        });
    builder
}

/// Loads `env_file` (`.env` when `None`) and then installs the global logger, so a
/// `RUST_LOG` from the file takes effect. `RUST_LOG` overrides `default_filter`.
///
/// Logs go to stderr so they don't interleave with the reports printed on stdout.
pub fn init_logger(env_file: Option<&Path>, default_filter: &str) {
    let _ = match env_file {
        Some(path) => dotenv::from_path(path).is_ok(),
        None => dotenv().is_ok(),
    };

    if let Err(e) = build_logger(default_filter).try_init() {
        eprintln!("Logger already initialized: {}", e);
    }
}
