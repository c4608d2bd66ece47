//! Access log format module
//!
//! Supports multiple log formats:
//! - `combined` (Apache/Nginx combined format)
//! - `common` (Common Log Format - CLF)
//! - `json` (JSON structured logging)
//! - Custom patterns with `$variable` substitution

use chrono::Local;

/// Access log entry containing all request/response information
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    /// Client IP address
    pub remote_addr: String,
    /// Request timestamp
    pub time: chrono::DateTime<Local>,
    /// HTTP method (GET, POST, etc.)
    pub method: String,
    /// Request URI path
    pub path: String,
    /// Query string (without leading ?)
    pub query: Option<String>,
    /// HTTP version (1.0, 1.1, 2)
    pub http_version: String,
    /// Response status code
    pub status: u16,
    /// Response body size in bytes
    pub body_bytes: usize,
    /// Referer header
    pub referer: Option<String>,
    /// User-Agent header
    pub user_agent: Option<String>,
    /// Request processing time in microseconds
    pub request_time_us: u64,
}

impl AccessLogEntry {
    /// Create a new access log entry with current timestamp
    pub fn new(remote_addr: String, method: String, path: String) -> Self {
        Self {
            remote_addr,
            time: Local::now(),
            method,
            path,
            query: None,
            http_version: "1.1".to_string(),
            status: 200,
            body_bytes: 0,
            referer: None,
            user_agent: None,
            request_time_us: 0,
        }
    }

    /// Format the log entry according to the specified format.
    /// Anything other than the named formats is treated as a custom
    /// `$variable` pattern.
    #[must_use]
    pub fn format(&self, format: &str) -> String {
        match format {
            "combined" => self.format_combined(),
            "common" => self.format_common(),
            "json" => self.format_json(),
            custom => self.format_custom(custom),
        }
    }

    /// Full request line: `METHOD /path?query HTTP/version`
    fn request_line(&self) -> String {
        let uri = self.query.as_ref().map_or_else(
            || self.path.clone(),
            |q| format!("{}?{}", self.path, q),
        );
        format!("{} {} HTTP/{}", self.method, uri, self.http_version)
    }

    /// Apache/Nginx Combined Log Format
    /// `$remote_addr - - [$time_local] "$request" $status $body_bytes_sent "$http_referer" "$http_user_agent"`
    fn format_combined(&self) -> String {
        format!(
            "{} - - [{}] \"{}\" {} {} \"{}\" \"{}\"",
            self.remote_addr,
            self.time.format("%d/%b/%Y:%H:%M:%S %z"),
            self.request_line(),
            self.status,
            self.body_bytes,
            self.referer.as_deref().unwrap_or("-"),
            self.user_agent.as_deref().unwrap_or("-"),
        )
    }

    /// Common Log Format (CLF)
    fn format_common(&self) -> String {
        format!(
            "{} - - [{}] \"{}\" {} {}",
            self.remote_addr,
            self.time.format("%d/%b/%Y:%H:%M:%S %z"),
            self.request_line(),
            self.status,
            self.body_bytes,
        )
    }

    /// JSON structured log format
    fn format_json(&self) -> String {
        serde_json::json!({
            "remote_addr": self.remote_addr,
            "time": self.time.to_rfc3339(),
            "method": self.method,
            "path": self.path,
            "query": self.query,
            "http_version": self.http_version,
            "status": self.status,
            "body_bytes": self.body_bytes,
            "referer": self.referer,
            "user_agent": self.user_agent,
            "request_time_us": self.request_time_us,
        })
        .to_string()
    }

    /// Custom format with variable substitution
    ///
    /// Supported variables:
    /// - `$remote_addr` - Client IP address
    /// - `$time_local` - Local time in Common Log Format
    /// - `$time_iso8601` - ISO 8601 timestamp
    /// - `$request` - Full request line ("METHOD /path HTTP/version")
    /// - `$request_method` - HTTP method
    /// - `$request_uri` - Request URI with query string
    /// - `$status` - Response status code
    /// - `$body_bytes_sent` - Response body size
    /// - `$http_referer` - Referer header
    /// - `$http_user_agent` - User-Agent header
    /// - `$request_time` - Request processing time in seconds (3 decimal places)
    fn format_custom(&self, pattern: &str) -> String {
        let request_uri = self.query.as_ref().map_or_else(
            || self.path.clone(),
            |q| format!("{}?{}", self.path, q),
        );

        let mut result = pattern.to_string();
        result = result.replace("$remote_addr", &self.remote_addr);
        result = result.replace(
            "$time_local",
            &self.time.format("%d/%b/%Y:%H:%M:%S %z").to_string(),
        );
        result = result.replace("$time_iso8601", &self.time.to_rfc3339());
        // Longer variables first so $request does not clobber $request_time,
        // $request_method, or $request_uri
        #[allow(clippy::cast_precision_loss)]
        let request_time = self.request_time_us as f64 / 1_000_000.0;
        result = result.replace("$request_time", &format!("{request_time:.3}"));
        result = result.replace("$request_method", &self.method);
        result = result.replace("$request_uri", &request_uri);
        result = result.replace("$request", &self.request_line());
        result = result.replace("$status", &self.status.to_string());
        result = result.replace("$body_bytes_sent", &self.body_bytes.to_string());
        result = result.replace("$http_referer", self.referer.as_deref().unwrap_or("-"));
        result = result.replace(
            "$http_user_agent",
            self.user_agent.as_deref().unwrap_or("-"),
        );

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_entry() -> AccessLogEntry {
        let mut entry = AccessLogEntry::new(
            "192.168.1.1".to_string(),
            "GET".to_string(),
            "/hello".to_string(),
        );
        entry.query = Some("name=world".to_string());
        entry.http_version = "1.1".to_string();
        entry.status = 200;
        entry.body_bytes = 11;
        entry.referer = Some("https://example.com".to_string());
        entry.user_agent = Some("curl/8.0".to_string());
        entry.request_time_us = 1500;
        entry
    }

    #[test]
    fn test_format_combined() {
        let entry = create_test_entry();
        let log = entry.format("combined");
        assert!(log.contains("192.168.1.1"));
        assert!(log.contains("GET /hello?name=world HTTP/1.1"));
        assert!(log.contains("200 11"));
        assert!(log.contains("https://example.com"));
        assert!(log.contains("curl/8.0"));
    }

    #[test]
    fn test_format_common() {
        let entry = create_test_entry();
        let log = entry.format("common");
        assert!(log.contains("192.168.1.1"));
        assert!(log.contains("GET /hello?name=world HTTP/1.1"));
        assert!(log.contains("200 11"));
        // Common format does not include referer/user-agent
        assert!(!log.contains("https://example.com"));
    }

    #[test]
    fn test_format_json() {
        let entry = create_test_entry();
        let log = entry.format("json");
        assert!(log.contains(r#""remote_addr":"192.168.1.1""#));
        assert!(log.contains(r#""method":"GET""#));
        assert!(log.contains(r#""status":200"#));
        assert!(log.contains(r#""body_bytes":11"#));
    }

    #[test]
    fn test_format_custom() {
        let entry = create_test_entry();
        let log = entry.format("$remote_addr - $status - $request_time");
        assert!(log.contains("192.168.1.1"));
        assert!(log.contains("200"));
        // 1500us = 0.0015s, formatted to 3 decimal places
        assert!(log.contains("0.00"), "Expected '0.00' in: {log}");
    }

    #[test]
    fn test_custom_pattern_expands_method_and_status() {
        let mut entry = create_test_entry();
        entry.status = 201;
        assert_eq!(entry.format("$request_method $status"), "GET 201");
    }

    #[test]
    fn test_custom_request_line_and_uri() {
        let entry = create_test_entry();
        assert_eq!(
            entry.format("$request"),
            "GET /hello?name=world HTTP/1.1"
        );
        assert_eq!(entry.format("$request_uri"), "/hello?name=world");
        assert_eq!(entry.format("$http_referer"), "https://example.com");
    }

    #[test]
    fn test_missing_optional_fields() {
        let entry = AccessLogEntry::new(
            "10.0.0.1".to_string(),
            "POST".to_string(),
            "/".to_string(),
        );
        let log = entry.format("combined");
        assert!(log.contains("POST / HTTP/1.1"));
        assert!(log.contains("\"-\" \"-\""));
    }
}
