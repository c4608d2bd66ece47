//! Logger module
//!
//! Provides logging utilities for the server including:
//! - Server lifecycle logging
//! - Route table listing at startup
//! - Access logging with multiple formats
//! - Error and warning logging
//! - File-based logging support

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use std::net::SocketAddr;

use crate::config::Config;
use crate::routing::RouteEntry;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

/// Write to info/access log
fn write_info(message: &str) {
    if writer::is_initialized() {
        writer::get().write_info(message);
    } else {
        println!("{message}");
    }
}

/// Write to error log
fn write_error(message: &str) {
    if writer::is_initialized() {
        writer::get().write_error(message);
    } else {
        eprintln!("{message}");
    }
}

/// Write to access log specifically
fn write_access(message: &str) {
    if writer::is_initialized() {
        writer::get().write_access(message);
    } else {
        println!("{message}");
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    write_info("======================================");
    write_info("Server started successfully");
    write_info(&format!("Listening on: http://{addr}"));
    write_info(&format!("Log level: {}", config.logging.level));
    if let Some(workers) = config.server.workers {
        write_info(&format!("Worker threads: {workers}"));
    }
    write_info("======================================");
}

/// Human-readable listing of the route table, one `VERB path` per line.
pub fn log_route_table(entries: &[RouteEntry]) {
    write_info(&format!("Routes ({}):", entries.len()));
    for entry in entries {
        write_info(&format!("  {:<6} {}", entry.verb, entry.path));
    }
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    write_access(&format!("[CONN] Accepted connection from {peer_addr}"));
}

/// Write one formatted access-log entry.
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_access(&entry.format(format));
}

pub fn log_headers_count(count: usize) {
    write_info(&format!("[HEADERS] {count} request headers"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_connection_error(err: &hyper::Error) {
    // Clients dropping a keep-alive connection mid-handshake is routine
    if !err.is_incomplete_message() {
        write_error(&format!("[ERROR] Connection error: {err}"));
    }
}
