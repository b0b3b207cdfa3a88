//! Main store implementation.

use std::path::Path;

use rusqlite::{Connection, OptionalExtension};
use time::OffsetDateTime;
use tracing::info;

use crate::error::{Error, Result};
use crate::models::StoredUplink;
use crate::queries::UplinkQuery;
use crate::schema;

/// SQLite-based store for TTN uplinks.
///
/// `Connection` is not `Sync`; the store is designed to be owned by a single
/// ingest task (or wrapped in a mutex by callers that need sharing).
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open or create a database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| Error::CreateDirectory {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        info!("Opening database at {}", path.display());
        let conn = Connection::open(path)?;

        // WAL keeps the reader side cheap while the connector streams inserts
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;

        schema::initialize(&conn)?;

        Ok(Self { conn })
    }

    /// Open the default database location.
    pub fn open_default() -> Result<Self> {
        Self::open(crate::default_db_path())
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::initialize(&conn)?;
        Ok(Self { conn })
    }

    /// Insert an uplink row.
    pub fn insert_uplink(&self, uplink: &StoredUplink) -> Result<()> {
        self.conn.execute(
            "INSERT INTO uplinks (id, device_id, dev_addr, application_id, payload, f_port, f_cnt, received_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            rusqlite::params![
                uplink.id,
                uplink.device_id,
                uplink.dev_addr,
                uplink.application_id,
                uplink.payload,
                uplink.f_port,
                uplink.f_cnt,
                uplink.received_at.unix_timestamp(),
            ],
        )?;

        Ok(())
    }

    /// Get the most recent uplink for a device.
    pub fn latest_uplink(&self, device_id: &str) -> Result<Option<StoredUplink>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, device_id, dev_addr, application_id, payload, f_port, f_cnt, received_at
             FROM uplinks WHERE device_id = ?
             ORDER BY received_at DESC LIMIT 1",
        )?;

        let uplink = stmt.query_row([device_id], row_to_uplink).optional()?;

        Ok(uplink)
    }

    /// Query uplinks with filters and pagination.
    pub fn query_uplinks(&self, query: &UplinkQuery) -> Result<Vec<StoredUplink>> {
        let sql = query.build_sql();
        let (_, params) = query.build_where();

        let mut stmt = self.conn.prepare(&sql)?;
        let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let rows = stmt.query_map(param_refs.as_slice(), row_to_uplink)?;

        let mut uplinks = Vec::new();
        for row in rows {
            uplinks.push(row?);
        }

        Ok(uplinks)
    }

    /// Count all stored uplinks.
    pub fn count_uplinks(&self) -> Result<u64> {
        let count: u64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM uplinks", [], |row| row.get(0))?;
        Ok(count)
    }

    /// List the distinct device IDs seen so far, most recent first.
    pub fn list_devices(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT device_id FROM uplinks GROUP BY device_id ORDER BY MAX(received_at) DESC",
        )?;

        let rows = stmt.query_map([], |row| row.get(0))?;

        let mut devices = Vec::new();
        for row in rows {
            devices.push(row?);
        }

        Ok(devices)
    }
}

/// Map a SELECT row (in canonical column order) to a [`StoredUplink`].
fn row_to_uplink(row: &rusqlite::Row<'_>) -> rusqlite::Result<StoredUplink> {
    Ok(StoredUplink {
        id: row.get(0)?,
        device_id: row.get(1)?,
        dev_addr: row.get(2)?,
        application_id: row.get(3)?,
        payload: row.get(4)?,
        f_port: row.get(5)?,
        f_cnt: row.get(6)?,
        received_at: OffsetDateTime::from_unix_timestamp(row.get(7)?)
            .unwrap_or(OffsetDateTime::UNIX_EPOCH),
    })
}
