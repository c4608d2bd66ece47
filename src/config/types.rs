// Configuration types module
// Serde-deserialized sections; defaults are applied by the loader.

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub http: HttpConfig,
    pub performance: PerformanceConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Tokio worker threads; `None` uses the CPU core count.
    #[serde(default)]
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format: `combined`, `common`, `json`, or a custom
    /// `$variable` pattern (e.g. `"$remote_addr $request $status"`).
    pub access_log_format: String,
    /// Access log file path; `None` writes to stdout.
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path; `None` writes to stderr.
    #[serde(default)]
    pub error_log_file: Option<String>,
    pub show_headers: bool,
}

/// HTTP response configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    pub default_content_type: String,
    pub enable_cors: bool,
    /// Maximum declared request body size in bytes.
    pub max_body_size: u64,
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    #[serde(default)]
    pub max_connections: Option<u64>,
}
