use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

const CONFIG_FILE: &str = "unreal-panel/config.json";
const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("no config directory available on this platform")]
    NoConfigDir,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PanelConfig {
    #[serde(default)]
    pub paths: BTreeMap<String, String>,
    #[serde(default)]
    pub panel: PanelSettings,
    #[serde(default)]
    pub build: BuildSettings,
    #[serde(default)]
    pub tools: ToolSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PanelSettings {
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
        }
    }
}

fn default_poll_interval() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}

#[derive(Debug, Clone, Deserialize)]
pub struct BuildSettings {
    #[serde(default = "default_msbuild")]
    pub msbuild: String,
    #[serde(default = "default_configuration")]
    pub configuration: String,
    #[serde(default = "default_platform")]
    pub platform: String,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            msbuild: default_msbuild(),
            configuration: default_configuration(),
            platform: default_platform(),
        }
    }
}

fn default_msbuild() -> String {
    "msbuild".to_string()
}

fn default_configuration() -> String {
    "Development Editor".to_string()
}

fn default_platform() -> String {
    "Win64".to_string()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToolSettings {
    /// Terminal command line; the project directory becomes its working directory.
    #[serde(default)]
    pub terminal: Option<Vec<String>>,
}

impl PanelConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.panel.poll_interval_secs.max(1))
    }

    /// Problems worth reporting that do not stop the panel from starting.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        for (key, value) in &self.paths {
            let value = value.trim();
            if value.is_empty() {
                warnings.push(format!("path '{}' is empty", key));
            } else if !Path::new(value).is_absolute() {
                warnings.push(format!("path '{}' is not absolute: {}", key, value));
            }
        }
        if self.panel.poll_interval_secs == 0 {
            warnings.push("poll_interval_secs is 0, using 1 second".to_string());
        }
        warnings
    }
}

pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    Ok(dir.join(CONFIG_FILE))
}

pub fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("unreal-panel").join("logs"))
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_paths_and_ignores_unknown_sections() {
        let config = PanelConfig::from_json(
            r#"{
                "paths": {"unreal_project": "/tmp/proj"},
                "git": {"token": ""},
                "theme": {"mode": "dark"}
            }"#,
        )
        .unwrap();

        assert_eq!(config.paths["unreal_project"], "/tmp/proj");
        assert_eq!(config.panel.poll_interval_secs, 5);
        assert_eq!(config.build.configuration, "Development Editor");
        assert!(config.tools.terminal.is_none());
    }

    #[test]
    fn missing_paths_section_is_empty_table() {
        let config = PanelConfig::from_json("{}").unwrap();
        assert!(config.paths.is_empty());
    }

    #[test]
    fn zero_interval_is_clamped_and_reported() {
        let config = PanelConfig::from_json(r#"{"panel": {"poll_interval_secs": 0}}"#).unwrap();
        assert_eq!(config.poll_interval(), Duration::from_secs(1));
        assert!(config.warnings().iter().any(|w| w.contains("poll_interval_secs")));
    }

    #[test]
    fn warns_about_relative_and_empty_paths() {
        let config = PanelConfig::from_json(
            r#"{"paths": {"vscode": "code", "unreal": "", "unreal_project": "/abs"}}"#,
        )
        .unwrap();
        let warnings = config.warnings();
        assert_eq!(warnings.len(), 2);
        assert!(warnings.iter().any(|w| w.contains("'vscode'")));
        assert!(warnings.iter().any(|w| w.contains("'unreal' is empty")));
    }

    #[test]
    fn surrounding_whitespace_does_not_make_a_path_relative() {
        let config =
            PanelConfig::from_json(r#"{"paths": {"unreal_project": " /work/MyGame \n"}}"#).unwrap();
        assert!(config.warnings().is_empty());
    }

    #[test]
    fn load_reports_offending_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let err = PanelConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("config.json"));

        let missing = PanelConfig::load(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(missing, ConfigError::Read { .. }));
    }
}
