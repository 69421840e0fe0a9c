//! TOML-based configuration for terminal-sync hosts.
//!
//! The core library itself needs no configuration; this describes how the
//! daemon and CLI bind a [`Terminal`](crate::sync::Terminal) to a file and
//! which session values they stamp onto the packet at startup.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::ConfigError;
use crate::packet::{CmdMode, Packet, VisualStyle};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Top-level application configuration loaded from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Tick loop settings.
    #[serde(default)]
    pub daemon: DaemonConfig,

    /// The external text file.
    pub endpoint: EndpointConfig,

    /// Values applied to the packet before the first tick.
    #[serde(default)]
    pub session: SessionConfig,
}

// ---------------------------------------------------------------------------
// Daemon
// ---------------------------------------------------------------------------

/// Tick loop configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Milliseconds between sync ticks (default 100).
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,

    /// Minimum tracing level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Write the local canonical text before the first tick so configured
    /// session values reach the endpoint instead of being merged away.
    #[serde(default = "default_true")]
    pub push_on_start: bool,
}

fn default_tick_interval() -> u64 {
    100
}
fn default_log_level() -> String {
    "info".into()
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval(),
            log_level: default_log_level(),
            push_on_start: default_true(),
        }
    }
}

// ---------------------------------------------------------------------------
// Endpoint
// ---------------------------------------------------------------------------

/// Location of the externally editable text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Path of the text file.
    pub path: PathBuf,

    /// Treat a missing file as empty text and create it on first push.
    #[serde(default = "default_true")]
    pub create_if_missing: bool,
}

fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Optional startup values for the packet. Unset fields keep their defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub user: Option<String>,

    #[serde(default)]
    pub session_id: Option<String>,

    /// One of `CMDTerminal`, `CMDInput`, `Custom`.
    #[serde(default)]
    pub cmd_mode: Option<String>,

    /// One of `Debug`, `Default`, `Custom`, `NoHighlight`.
    #[serde(default)]
    pub visual_style: Option<String>,
}

impl SessionConfig {
    /// Stamp the configured values onto `packet`.
    ///
    /// Enum names are expected to have passed [`AppConfig::validate`];
    /// unknown names are skipped.
    pub fn apply(&self, packet: &mut Packet) {
        if let Some(ref user) = self.user {
            packet.set_user(user.as_str());
        }
        if let Some(ref id) = self.session_id {
            packet.set_session_id(id.as_str());
        }
        if let Some(mode) = self.cmd_mode.as_deref().and_then(|m| m.parse::<CmdMode>().ok()) {
            packet.set_cmd_mode(mode);
        }
        if let Some(style) = self
            .visual_style
            .as_deref()
            .and_then(|s| s.parse::<VisualStyle>().ok())
        {
            packet.set_visual_style(style);
        }
        debug!("session values applied to packet");
    }
}

// ---------------------------------------------------------------------------
// Loading & validation
// ---------------------------------------------------------------------------

impl AppConfig {
    /// Load an [`AppConfig`] from a TOML file at the given path.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!(path = %path.display(), "loading configuration");

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        debug!("configuration parsed successfully");
        Ok(config)
    }

    /// Validate that all required fields are present and sane.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoint.path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "endpoint.path".into(),
                detail: "endpoint path must not be empty".into(),
            });
        }
        if self.daemon.tick_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "daemon.tick_interval_ms".into(),
                detail: "tick interval must be > 0".into(),
            });
        }
        if let Some(ref mode) = self.session.cmd_mode {
            mode.parse::<CmdMode>()
                .map_err(|detail| ConfigError::InvalidValue {
                    field: "session.cmd_mode".into(),
                    detail,
                })?;
        }
        if let Some(ref style) = self.session.visual_style {
            style
                .parse::<VisualStyle>()
                .map_err(|detail| ConfigError::InvalidValue {
                    field: "session.visual_style".into(),
                    detail,
                })?;
        }

        Ok(())
    }

    /// Convenience: load and validate in one call.
    pub fn load_and_validate<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let config = Self::load_from_file(path)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sample_toml() -> &'static str {
        r#"
[daemon]
tick_interval_ms = 50
log_level = "debug"
push_on_start = false

[endpoint]
path = "/tmp/terminal/custom_data.ini"
create_if_missing = false

[session]
user = "engineer-42"
session_id = "7f3a"
cmd_mode = "CMDInput"
visual_style = "NoHighlight"
"#
    }

    #[test]
    fn test_parse_full_config() {
        let config: AppConfig = toml::from_str(sample_toml()).expect("failed to parse toml");
        assert_eq!(config.daemon.tick_interval_ms, 50);
        assert_eq!(config.daemon.log_level, "debug");
        assert!(!config.daemon.push_on_start);
        assert_eq!(
            config.endpoint.path,
            PathBuf::from("/tmp/terminal/custom_data.ini")
        );
        assert!(!config.endpoint.create_if_missing);
        assert_eq!(config.session.user.as_deref(), Some("engineer-42"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults() {
        let minimal = r#"
[endpoint]
path = "custom_data.ini"
"#;
        let config: AppConfig = toml::from_str(minimal).unwrap();
        assert_eq!(config.daemon.tick_interval_ms, 100);
        assert_eq!(config.daemon.log_level, "info");
        assert!(config.daemon.push_on_start);
        assert!(config.endpoint.create_if_missing);
        assert!(config.session.user.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(sample_toml().as_bytes()).unwrap();

        let config = AppConfig::load_and_validate(&path).expect("load failed");
        assert_eq!(config.session.session_id.as_deref(), Some("7f3a"));
    }

    #[test]
    fn test_file_not_found() {
        let result = AppConfig::load_from_file("/nonexistent/config.toml");
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[endpoint\npath = 1").unwrap();
        assert!(matches!(
            AppConfig::load_from_file(&path),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_validate_rejects_zero_interval() {
        let mut config: AppConfig = toml::from_str(sample_toml()).unwrap();
        config.daemon.tick_interval_ms = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "daemon.tick_interval_ms"
        ));
    }

    #[test]
    fn test_validate_rejects_unknown_style() {
        let mut config: AppConfig = toml::from_str(sample_toml()).unwrap();
        config.session.visual_style = Some("Neon".into());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "session.visual_style"
        ));
    }

    #[test]
    fn test_session_apply() {
        let config: AppConfig = toml::from_str(sample_toml()).unwrap();
        let mut packet = Packet::new();
        config.session.apply(&mut packet);

        assert_eq!(packet.user(), "engineer-42");
        assert_eq!(packet.session_id(), "7f3a");
        assert_eq!(packet.cmd_mode(), CmdMode::CmdInput);
        assert_eq!(packet.visual_style(), VisualStyle::NoHighlight);
    }
}
