//! Connector configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Connector configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// MQTT broker settings.
    pub mqtt: MqttConfig,
    /// Storage settings.
    pub storage: StorageConfig,
    /// Ingest filtering settings.
    pub ingest: IngestConfig,
}

impl Config {
    /// Load configuration from the default path.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = default_config_path();
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Read {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.as_ref().to_path_buf(),
            source: e,
        })
    }

    /// Validate the configuration.
    ///
    /// Checks the broker URL (scheme and port), client id, topic, and
    /// storage path.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.mqtt.broker_parts()?;

        if self.mqtt.client_id.is_empty() {
            return Err(ConfigError::Invalid(
                "mqtt.client_id cannot be empty".to_string(),
            ));
        }
        if self.mqtt.topic.is_empty() {
            return Err(ConfigError::Invalid(
                "mqtt.topic cannot be empty".to_string(),
            ));
        }
        if self.storage.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid(
                "storage.path cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

/// MQTT broker settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MqttConfig {
    /// Broker URL (`mqtt://host:port` or `mqtts://host:port`).
    pub broker: String,
    /// Client identifier presented to the broker.
    pub client_id: String,
    /// Username (TTN: the application id, e.g. `pax-demo@ttn`).
    pub username: Option<String>,
    /// Password (TTN: an API key).
    pub password: Option<String>,
    /// Uplink topic filter.
    pub topic: String,
    /// Keep-alive interval in seconds.
    pub keep_alive: u64,
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            broker: "mqtts://eu1.cloud.thethings.network".to_string(),
            client_id: "paxcount-connector".to_string(),
            username: None,
            password: None,
            topic: "v3/+/devices/+/up".to_string(),
            keep_alive: 20,
        }
    }
}

impl MqttConfig {
    /// Split the broker URL into `(host, port, use_tls)`.
    ///
    /// `mqtt://` defaults to port 1883, `mqtts://` to 8883.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBroker`] for an unknown scheme, an
    /// empty host, or an unparsable port.
    pub fn broker_parts(&self) -> Result<(String, u16, bool), ConfigError> {
        let invalid = |msg: &str| ConfigError::InvalidBroker {
            url: self.broker.clone(),
            reason: msg.to_string(),
        };

        let (use_tls, rest) = if let Some(stripped) = self.broker.strip_prefix("mqtt://") {
            (false, stripped)
        } else if let Some(stripped) = self.broker.strip_prefix("mqtts://") {
            (true, stripped)
        } else {
            return Err(invalid("URL must start with mqtt:// or mqtts://"));
        };

        let default_port = if use_tls { 8883 } else { 1883 };

        let (host, port) = if let Some((h, p)) = rest.rsplit_once(':') {
            let port = p.parse::<u16>().map_err(|_| invalid("invalid port"))?;
            (h.to_string(), port)
        } else {
            (rest.to_string(), default_port)
        };

        if host.is_empty() {
            return Err(invalid("host cannot be empty"));
        }

        Ok((host, port, use_tls))
    }
}

/// Storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Database file path.
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: paxcount_store::default_db_path(),
        }
    }
}

/// Ingest filtering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Only uplinks on this LoRaWAN port are stored. PAX counter firmware
    /// sends counts on port 1.
    pub uplink_port: u8,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self { uplink_port: 1 }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid MQTT broker URL '{url}': {reason}")]
    InvalidBroker { url: String, reason: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Default configuration file path.
///
/// - Linux: `~/.config/paxcount/connector.toml`
/// - macOS: `~/Library/Application Support/paxcount/connector.toml`
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("paxcount")
        .join("connector.toml")
}
