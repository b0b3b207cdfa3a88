//! TTN MQTT connector for PAX counter uplinks.
//!
//! The connector subscribes to a TTN application's uplink topic
//! (`v3/+/devices/+/up`), filters uplinks to the configured LoRaWAN port,
//! and persists the raw base64 payload plus device metadata. Decoding the
//! payload into counts is left to the query side (the UDF server).
//!
//! # Configuration
//!
//! The connector reads configuration from `~/.config/paxcount/connector.toml`:
//!
//! ```toml
//! [mqtt]
//! broker = "mqtts://eu1.cloud.thethings.network"
//! username = "pax-demo@ttn"
//! password = "NNSXS.XXXXXXXX"
//!
//! [storage]
//! path = "~/.local/share/paxcount/data.db"
//!
//! [ingest]
//! uplink_port = 1
//! ```

pub mod config;
pub mod ingest;
pub mod ttn;

pub use config::{Config, ConfigError, IngestConfig, MqttConfig, StorageConfig};
