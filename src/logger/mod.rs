//! Logger module
//!
//! Provides logging utilities for the server including:
//! - Startup banner
//! - Access logging with multiple formats
//! - Error and warning logging
//! - File-based logging support
//!
//! Before [`init`] every message goes to stdout/stderr, so library users
//! and tests get output without any setup.

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::config::{Config, LoggingConfig};
use std::net::SocketAddr;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &LoggingConfig) -> std::io::Result<()> {
    writer::init(
        config.access_log_file.as_deref(),
        config.error_log_file.as_deref(),
    )
}

/// Write to info/access log
fn write_info(message: &str) {
    match writer::get() {
        Some(w) => w.write_access(message),
        None => println!("{message}"),
    }
}

/// Write to error log
fn write_error(message: &str) {
    match writer::get() {
        Some(w) => w.write_error(message),
        None => eprintln!("{message}"),
    }
}

/// Startup banner
///
/// `assets` is the size of the asset table, `None` in dev mode.
pub fn log_server_start(addr: &SocketAddr, config: &Config, assets: Option<usize>) {
    write_info("======================================");
    write_info("staticd is ready");
    write_info(&format!("Listening on: http://{addr}"));
    match assets {
        Some(count) => write_info(&format!("Serving: {} ({count} assets)", config.dir)),
        None => write_info(&format!("Serving: {} (dev mode, live lookups)", config.dir)),
    }
    if let Some(workers) = config.server.workers {
        write_info(&format!("Worker threads: {workers}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        write_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_info(&format!("Error log: {path}"));
    }
    write_info("======================================\n");
}

pub fn log_info(message: &str) {
    write_info(message);
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_info(&entry.format(format));
}
