use std::env;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::bounded;
use log::{error, info, warn};

use sensor_logger::app::{console, events, LoggerSession};
use sensor_logger::config::{AppConfig, DEFAULT_CONFIG_PATH};
use sensor_logger::feed::{feed_channels, spawn_feed};
use sensor_logger::logger;
use sensor_logger::types::HELP_TEXT;
use sensor_logger::LoggerError;

const FEED_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(3);

fn main() {
    logger::init_logger(None, "info");
    info!("Sensor logger starting");

    if let Err(e) = run() {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), LoggerError> {
    let config_path = env::var("SENSOR_LOGGER_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = AppConfig::load_or_default(&config_path)?;
    info!("Using {:?} feed, buffer capacity {}", config.feed.source, config.logger.capacity);

    let (senders, receivers) = feed_channels(config.channels.sample_channel_capacity);
    let shutdown_signal = Arc::new(AtomicBool::new(false));
    let feed_handle = spawn_feed(&config, senders, Arc::clone(&shutdown_signal))?;

    let (command_sender, command_receiver) = bounded(config.channels.command_channel_capacity);
    console::spawn_console_reader(command_sender)?;

    let mut session = LoggerSession::new(&config, receivers);
    println!("{}", HELP_TEXT);
    print!("{}{}{}", session.info(), session.zero_info(), session.analyze_info());

    let refresh_period = Duration::from_millis(config.logger.refresh_period_ms);
    let mut stdout = io::stdout();
    let result = events::run(&mut session, command_receiver, refresh_period, &mut stdout);

    // closing the queues unblocks a feed waiting on a full channel
    info!("Shutting down feed");
    shutdown_signal.store(true, Ordering::Relaxed);
    drop(session);
    join_feed(feed_handle);

    Ok(result?)
}

fn join_feed(handle: JoinHandle<()>) {
    let deadline = Instant::now() + FEED_SHUTDOWN_TIMEOUT;
    while !handle.is_finished() && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(20));
    }
    if !handle.is_finished() {
        warn!("Feed thread did not shut down within timeout");
    } else if handle.join().is_err() {
        error!("Feed thread panicked");
    }
}
