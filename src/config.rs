use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domains::navigation::ClientSettings;

/// File looked up when no configuration path is given.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub navigation: NavigationConfig,
    #[serde(default)]
    pub kafka: KafkaConfig,
    #[serde(default)]
    pub mission: MissionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Kafka,
    Simulated,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationConfig {
    /// Name of the navigation action server
    #[serde(default = "default_action_name")]
    pub action_name: String,

    #[serde(default = "default_backend")]
    pub backend: BackendKind,

    /// Give up waiting for the server after this many seconds (unset: wait forever)
    #[serde(default)]
    pub connect_timeout_secs: Option<f64>,

    /// Cancel a goal with no result after this many seconds (unset: wait forever)
    #[serde(default)]
    pub goal_timeout_secs: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KafkaConfig {
    #[serde(default = "default_brokers")]
    pub brokers: Vec<String>,
    #[serde(default = "default_client_id")]
    pub client_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissionConfig {
    #[serde(default = "default_mission_file")]
    pub file_name: String,

    /// Directory holding the mission file. Resolved next to the executable when unset.
    #[serde(default)]
    pub directory: Option<PathBuf>,

    /// Pause between goals in milliseconds
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_action_name() -> String {
    "move_base".to_string()
}
fn default_backend() -> BackendKind {
    BackendKind::Kafka
}
fn default_brokers() -> Vec<String> {
    vec!["localhost:9092".to_string()]
}
fn default_client_id() -> String {
    "waypoint-navigator".to_string()
}
fn default_mission_file() -> String {
    "mission.yaml".to_string()
}
fn default_settle_delay_ms() -> u64 {
    1000
}
fn default_log_file() -> String {
    "./mission.log".to_string()
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            action_name: default_action_name(),
            backend: default_backend(),
            connect_timeout_secs: None,
            goal_timeout_secs: None,
        }
    }
}

impl Default for KafkaConfig {
    fn default() -> Self {
        Self {
            brokers: default_brokers(),
            client_id: default_client_id(),
        }
    }
}

impl Default for MissionConfig {
    fn default() -> Self {
        Self {
            file_name: default_mission_file(),
            directory: None,
            settle_delay_ms: default_settle_delay_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: default_log_file(),
        }
    }
}

impl Config {
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let timeouts = [
            ("connect_timeout_secs", self.navigation.connect_timeout_secs),
            ("goal_timeout_secs", self.navigation.goal_timeout_secs),
        ];
        for (name, value) in timeouts {
            if value.is_some_and(f64::is_nan) {
                anyhow::bail!("navigation.{} must be a number of seconds, got nan", name);
            }
        }
        Ok(())
    }

    /// Load `path` if given (it must exist), otherwise `config.toml` when
    /// present, otherwise the defaults.
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path).await,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(DEFAULT_CONFIG_FILE).await
            }
            None => Ok(Self::default()),
        }
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            connect_timeout: self.navigation.connect_timeout_secs.and_then(secs),
            goal_timeout: self.navigation.goal_timeout_secs.and_then(secs),
        }
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.mission.settle_delay_ms)
    }
}

// Negative values are clamped to zero; values too large for a Duration mean no limit.
fn secs(value: f64) -> Option<Duration> {
    Duration::try_from_secs_f64(value.max(0.0)).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.navigation.action_name, "move_base");
        assert_eq!(config.navigation.backend, BackendKind::Kafka);
        assert_eq!(config.mission.file_name, "mission.yaml");
        assert_eq!(config.settle_delay(), Duration::from_secs(1));
        assert_eq!(config.client_settings(), ClientSettings::default());
    }

    #[test]
    fn test_timeouts_and_backend_kind() {
        let config = Config::from_toml(
            r#"
[navigation]
backend = "simulated"
connect_timeout_secs = 2.5
goal_timeout_secs = 120

[mission]
settle_delay_ms = 0
"#,
        )
        .unwrap();

        assert_eq!(config.navigation.backend, BackendKind::Simulated);
        let settings = config.client_settings();
        assert_eq!(settings.connect_timeout, Some(Duration::from_millis(2500)));
        assert_eq!(settings.goal_timeout, Some(Duration::from_secs(120)));
        assert_eq!(config.settle_delay(), Duration::ZERO);
    }

    #[test]
    fn test_unbounded_timeouts_mean_no_limit() {
        let config = Config::from_toml(
            "[navigation]\nconnect_timeout_secs = inf\ngoal_timeout_secs = 1e300\n",
        )
        .unwrap();
        assert_eq!(config.client_settings(), ClientSettings::default());

        let config = Config::from_toml("[navigation]\ngoal_timeout_secs = -3\n").unwrap();
        assert_eq!(config.client_settings().goal_timeout, Some(Duration::ZERO));
    }

    #[test]
    fn test_nan_timeout_is_rejected() {
        assert!(Config::from_toml("[navigation]\ngoal_timeout_secs = nan\n").is_err());
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        assert!(Config::from_toml("[navigation]\nbackend = \"ros\"\n").is_err());
    }
}
