//! UDF server exposing the PAX counter payload decoder.
//!
//! This crate hosts scalar user-defined functions for a streaming/query
//! engine. Functions are registered by name into a [`UdfRegistry`] at
//! startup and invoked remotely over HTTP+JSON. The one shipped function is
//! `ttn_payload_decoder`: base64 payload text in, a record of two 32-bit
//! integers (`wifi_count`, `ble_count`) out.
//!
//! # Endpoints
//!
//! - `GET /api/health` - Service health check
//! - `GET /api/functions` - Registered function names
//! - `POST /api/functions/{name}` - Invoke a function on one argument row
//!
//! # Configuration
//!
//! The server reads configuration from `~/.config/paxcount/udf.toml`:
//!
//! ```toml
//! [server]
//! bind = "0.0.0.0:8815"
//! ```
//!
//! Both the config path and the bind address can be overridden on the
//! command line.

pub mod api;
pub mod config;
pub mod registry;

pub use config::{Config, ConfigError, ServerConfig};
pub use registry::{PayloadDecoder, ScalarUdf, UdfError, UdfRegistry};
