//! Database schema and migrations.

use rusqlite::Connection;

use crate::error::Result;

/// Current schema version.
pub const SCHEMA_VERSION: i32 = 1;

/// Initialize the database schema.
pub fn initialize(conn: &Connection) -> Result<()> {
    let version = get_schema_version(conn)?;

    if version == 0 {
        // Fresh database - create all tables
        create_schema_v1(conn)?;
        set_schema_version(conn, SCHEMA_VERSION)?;
    } else if version < SCHEMA_VERSION {
        migrate(conn, version)?;
    }

    Ok(())
}

/// Get the current schema version.
fn get_schema_version(conn: &Connection) -> Result<i32> {
    // Check if the schema_version table exists
    let exists: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name='schema_version'",
        [],
        |row| row.get(0),
    )?;

    if !exists {
        return Ok(0);
    }

    let version: i32 =
        conn.query_row("SELECT version FROM schema_version", [], |row| row.get(0))?;

    Ok(version)
}

/// Set the schema version.
fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO schema_version (id, version) VALUES (1, ?)",
        [version],
    )?;
    Ok(())
}

/// Create the initial schema (version 1).
fn create_schema_v1(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- Schema version tracking
        CREATE TABLE IF NOT EXISTS schema_version (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            version INTEGER NOT NULL
        );

        -- Raw TTN uplinks (payload kept as delivered, decoded at query time)
        CREATE TABLE IF NOT EXISTS uplinks (
            id TEXT PRIMARY KEY,
            device_id TEXT NOT NULL,
            dev_addr TEXT NOT NULL,
            application_id TEXT NOT NULL,
            payload TEXT NOT NULL,
            f_port INTEGER NOT NULL,
            f_cnt INTEGER,
            received_at INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_uplinks_device_time
            ON uplinks(device_id, received_at);
        CREATE INDEX IF NOT EXISTS idx_uplinks_time
            ON uplinks(received_at);
        "#,
    )?;

    Ok(())
}

/// Run migrations from an older schema version.
fn migrate(_conn: &Connection, from_version: i32) -> Result<()> {
    // No migrations yet; version 1 is the only schema.
    tracing::warn!(
        "No migration path from schema version {} to {}",
        from_version,
        SCHEMA_VERSION
    );
    Ok(())
}
