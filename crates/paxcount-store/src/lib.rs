//! Local data persistence for TTN PAX counter uplinks.
//!
//! This crate provides SQLite-based storage for uplinks delivered by the
//! connector, enabling offline queries over the raw payload stream.
//!
//! # Features
//!
//! - Store uplinks with TTN device metadata and receive timestamps
//! - Query by device, time range, with pagination
//! - Payloads are stored verbatim; decoding stays a query-time concern
//!
//! # Example
//!
//! ```no_run
//! use paxcount_store::{Store, UplinkQuery};
//!
//! let store = Store::open_default()?;
//!
//! // Latest 10 uplinks for a device
//! let query = UplinkQuery::new()
//!     .device("eui-70b3d57ed0001234")
//!     .limit(10);
//! let uplinks = store.query_uplinks(&query)?;
//! # Ok::<(), paxcount_store::Error>(())
//! ```

mod error;
mod models;
mod queries;
mod schema;
mod store;

pub use error::{Error, Result};
pub use models::StoredUplink;
pub use queries::UplinkQuery;
pub use store::Store;

/// Default database path following platform conventions.
///
/// - Linux: `~/.local/share/paxcount/data.db`
/// - macOS: `~/Library/Application Support/paxcount/data.db`
/// - Windows: `C:\Users\<user>\AppData\Local\paxcount\data.db`
pub fn default_db_path() -> std::path::PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("paxcount")
        .join("data.db")
}
