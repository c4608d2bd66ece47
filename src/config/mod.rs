// Configuration module entry point
// Layered load: built-in defaults, optional config.toml, SKIFF_* environment.

mod types;

use std::net::SocketAddr;

pub use types::{Config, HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig};

impl Config {
    /// Load configuration from the default `config.toml` location.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from the specified file path (without extension).
    /// The file is optional; every key has a default.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("SKIFF"))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 9292)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("logging.show_headers", false)?
            .set_default("http.server_name", "Skiff/0.1")?
            .set_default("http.default_content_type", "text/plain; charset=utf-8")?
            .set_default("http.enable_cors", false)?
            .set_default("http.max_body_size", 10_485_760)? // 10MB
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .build()?;

        settings.try_deserialize()
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_config_file() {
        let cfg = Config::load_from("no_such_config_file").unwrap();
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 9292);
        assert_eq!(cfg.server.workers, None);
        assert!(cfg.logging.access_log);
        assert_eq!(cfg.logging.access_log_format, "combined");
        assert_eq!(cfg.http.max_body_size, 10_485_760);
        assert_eq!(cfg.performance.max_connections, None);
    }

    #[test]
    fn test_socket_addr_from_defaults() {
        let cfg = Config::load_from("no_such_config_file").unwrap();
        let addr = cfg.socket_addr().unwrap();
        assert_eq!(addr.port(), 9292);
        assert!(addr.is_ipv4());
    }
}
