// Application state module
// Holds the immutable responder and settings shared by every connection

use tokio_util::sync::CancellationToken;

use super::types::Config;
use crate::responder::FileResponder;

/// Application state
pub struct AppState {
    pub config: Config,
    pub responder: FileResponder,
    /// Mount prefix without trailing `/`; empty when files are mounted at the root
    pub mount_prefix: String,
    /// Cancelled once when the server should stop; every connection watches it
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
            responder: FileResponder::new(config.files.root.clone()),
            mount_prefix: normalize_mount_prefix(&config.files.mount_prefix),
            shutdown: CancellationToken::new(),
        }
    }
}

/// "/static/", "static" and "/static" all become "/static"; "/" becomes ""
fn normalize_mount_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_mount_prefix() {
        assert_eq!(normalize_mount_prefix("/"), "");
        assert_eq!(normalize_mount_prefix(""), "");
        assert_eq!(normalize_mount_prefix("/static"), "/static");
        assert_eq!(normalize_mount_prefix("/static/"), "/static");
        assert_eq!(normalize_mount_prefix("static"), "/static");
        assert_eq!(normalize_mount_prefix("/a/b/"), "/a/b");
    }
}
