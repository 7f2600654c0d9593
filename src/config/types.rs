// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub files: FilesConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Served files configuration
#[derive(Debug, Deserialize, Clone)]
pub struct FilesConfig {
    /// Base directory prepended to every request path
    pub root: String,
    /// URL prefix the files are exposed under (e.g. "/static")
    #[serde(default = "default_mount_prefix")]
    pub mount_prefix: String,
}

#[allow(clippy::missing_const_for_fn)]
fn default_mount_prefix() -> String {
    "/".to_string()
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Minimum level written: error, warn, info or debug
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    /// Idle seconds before a keep-alive connection is closed; 0 disables keep-alive
    pub keep_alive_timeout: u64,
    /// Seconds allowed to receive request headers
    pub read_timeout: u64,
    /// Seconds a blocked write may go without progress; also the shutdown grace
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}
