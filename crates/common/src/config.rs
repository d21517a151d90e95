//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Render service connection settings.
    pub render_service: RenderServiceConfig,

    /// Defaults applied to newly created overlays.
    pub editor: EditorDefaults,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Connection and retry settings for the remote render service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderServiceConfig {
    /// Base URL of the render service (no trailing slash required).
    pub base_url: String,

    /// Timeout for the submit round trip, in seconds. A submission with
    /// no acknowledgment within this bound fails.
    pub submit_timeout_secs: u64,

    /// Interval between job status polls, in milliseconds.
    pub poll_interval_ms: u64,

    /// Per-poll idle timeout, in seconds. A poll with no response within
    /// this bound counts as a transient fault.
    pub idle_timeout_secs: u64,

    /// Consecutive failed polls tolerated before the job is marked
    /// unreachable.
    pub max_reconnect_attempts: u32,
}

/// Defaults for newly created overlays.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorDefaults {
    /// Payload for a freshly added text overlay.
    pub default_text: String,

    /// Length of the default visibility window, in seconds.
    pub default_window_secs: f64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "overcut=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for RenderServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            submit_timeout_secs: 30,
            poll_interval_ms: 1000,
            idle_timeout_secs: 10,
            max_reconnect_attempts: 5,
        }
    }
}

impl Default for EditorDefaults {
    fn default() -> Self {
        Self {
            default_text: "New Text".to_string(),
            default_window_secs: 5.0,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl RenderServiceConfig {
    /// Base URL normalized for joining with endpoint paths.
    pub fn endpoint_base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }
}

/// Standard config file location.
fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("overcut").join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_sane() {
        let config = AppConfig::default();
        assert_eq!(config.render_service.base_url, "http://127.0.0.1:8000");
        assert!(config.render_service.max_reconnect_attempts > 0);
        assert_eq!(config.editor.default_window_secs, 5.0);
    }

    #[test]
    fn test_endpoint_base_strips_trailing_slash() {
        let service = RenderServiceConfig {
            base_url: "http://render.example/".to_string(),
            ..Default::default()
        };
        assert_eq!(service.endpoint_base(), "http://render.example");
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"render_service": {"base_url": "http://10.0.0.2:8000"}}"#)
                .unwrap();
        assert_eq!(config.render_service.base_url, "http://10.0.0.2:8000");
        assert_eq!(config.render_service.poll_interval_ms, 1000);
        assert_eq!(config.editor.default_text, "New Text");
    }
}
