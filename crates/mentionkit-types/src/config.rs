//! Global configuration types for mentionkit.
//!
//! `GlobalConfig` represents the top-level `config.toml` that controls the
//! mention marker, seed and upload locations, and the HTTP listener.

use serde::{Deserialize, Serialize};

/// Top-level configuration.
///
/// Loaded from `~/.mentionkit/config.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Character that introduces a mention (`@order_123`).
    #[serde(default = "default_mention_marker")]
    pub mention_marker: char,

    /// Entity seed file, relative to the data directory unless absolute.
    #[serde(default = "default_seed_file")]
    pub seed_file: String,

    /// Directory holding uploaded attachment bytes, relative to the data directory.
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,

    /// Number of thread items returned by default when listing a thread.
    #[serde(default = "default_history_limit")]
    pub history_limit: u32,

    #[serde(default)]
    pub server: ServerConfig,
}

fn default_mention_marker() -> char {
    '@'
}

fn default_seed_file() -> String {
    "entities.toml".to_string()
}

fn default_upload_dir() -> String {
    "uploads".to_string()
}

fn default_history_limit() -> u32 {
    20
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            mention_marker: default_mention_marker(),
            seed_file: default_seed_file(),
            upload_dir: default_upload_dir(),
            history_limit: default_history_limit(),
            server: ServerConfig::default(),
        }
    }
}

/// HTTP listener settings for `mkit serve`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_config_default_values() {
        let config = GlobalConfig::default();
        assert_eq!(config.mention_marker, '@');
        assert_eq!(config.seed_file, "entities.toml");
        assert_eq!(config.upload_dir, "uploads");
        assert_eq!(config.history_limit, 20);
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn test_global_config_deserialize_with_defaults() {
        let config: GlobalConfig = toml::from_str("").unwrap();
        assert_eq!(config.mention_marker, '@');
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn test_global_config_deserialize_with_values() {
        let toml_str = r##"
mention_marker = "#"
seed_file = "/etc/mentionkit/entities.toml"
history_limit = 50

[server]
port = 9090
"##;
        let config: GlobalConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.mention_marker, '#');
        assert_eq!(config.seed_file, "/etc/mentionkit/entities.toml");
        assert_eq!(config.history_limit, 50);
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn test_marker_must_be_single_char() {
        let result: Result<GlobalConfig, _> = toml::from_str(r#"mention_marker = "@@""#);
        assert!(result.is_err());
    }
}
