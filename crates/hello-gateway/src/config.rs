//! Application configuration

use std::env;

/// Route templates bound to the greeting handler when none are configured
pub const DEFAULT_HELLO_ROUTES: &[&str] = &["/hello", "/hello/{name}"];

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the gateway binds to
    pub bind_addr: String,

    /// Port for the gateway
    pub port: u16,

    /// Handler request timeout in seconds
    pub handler_timeout_secs: u64,

    /// Maximum request body size in bytes
    pub max_body_bytes: usize,

    /// Route templates served by the greeting handler
    pub hello_routes: Vec<String>,

    /// Route template that parses a CSV body into JSON
    pub csv_read_route: String,

    /// Route template that renders a JSON body as CSV
    pub csv_write_route: String,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            bind_addr: lookup("HELLO_GATEWAY_BIND_ADDR")
                .unwrap_or_else(|| "0.0.0.0".to_string()),

            port: lookup("HELLO_GATEWAY_PORT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(8080),

            handler_timeout_secs: lookup("HELLO_GATEWAY_HANDLER_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),

            max_body_bytes: lookup("HELLO_GATEWAY_MAX_BODY_BYTES")
                .and_then(|s| s.parse().ok())
                .unwrap_or(1024 * 1024),

            hello_routes: lookup("HELLO_GATEWAY_HELLO_ROUTES")
                .map(|s| parse_route_list(&s))
                .filter(|routes| !routes.is_empty())
                .unwrap_or_else(|| DEFAULT_HELLO_ROUTES.iter().map(|r| r.to_string()).collect()),

            csv_read_route: lookup("HELLO_GATEWAY_CSV_READ_ROUTE")
                .filter(|r| !r.trim().is_empty())
                .unwrap_or_else(|| "/csv/read".to_string()),

            csv_write_route: lookup("HELLO_GATEWAY_CSV_WRITE_ROUTE")
                .filter(|r| !r.trim().is_empty())
                .unwrap_or_else(|| "/csv/write".to_string()),
        }
    }

    /// Socket address string to bind
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

fn parse_route_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string)
        .collect()
}
