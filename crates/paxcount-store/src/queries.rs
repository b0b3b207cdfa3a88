//! Query builder for stored uplinks.
//!
//! [`UplinkQuery`] follows the builder pattern for filtering and paginating
//! uplink rows. All filter methods are optional and can be chained in any
//! order.
//!
//! # Example
//!
//! ```
//! use paxcount_store::{Store, UplinkQuery};
//! use time::{Duration, OffsetDateTime};
//!
//! let store = Store::open_in_memory()?;
//! let yesterday = OffsetDateTime::now_utc() - Duration::hours(24);
//!
//! // Last 50 uplinks for one device since yesterday
//! let query = UplinkQuery::new()
//!     .device("eui-70b3d57ed0001234")
//!     .since(yesterday)
//!     .limit(50);
//!
//! let uplinks = store.query_uplinks(&query)?;
//! # Ok::<(), paxcount_store::Error>(())
//! ```

use time::OffsetDateTime;

/// Fluent query builder for stored uplinks.
///
/// By default, queries return results ordered by `received_at` descending
/// (newest first).
#[derive(Debug, Default, Clone)]
pub struct UplinkQuery {
    /// Filter by TTN device ID.
    pub device_id: Option<String>,
    /// Filter uplinks received at or after this time.
    pub since: Option<OffsetDateTime>,
    /// Filter uplinks received at or before this time.
    pub until: Option<OffsetDateTime>,
    /// Maximum number of results.
    pub limit: Option<u32>,
    /// Offset for pagination.
    pub offset: Option<u32>,
    /// Order by received_at descending (newest first).
    pub newest_first: bool,
}

impl UplinkQuery {
    /// Create a new query with default settings.
    ///
    /// Default behavior:
    /// - No device filter (all devices)
    /// - No time range filter
    /// - No limit (all matching rows)
    /// - Ordered by newest first
    pub fn new() -> Self {
        Self {
            newest_first: true,
            ..Default::default()
        }
    }

    /// Filter by TTN device ID.
    pub fn device(mut self, device_id: &str) -> Self {
        self.device_id = Some(device_id.to_string());
        self
    }

    /// Filter to uplinks received at or after this time.
    pub fn since(mut self, time: OffsetDateTime) -> Self {
        self.since = Some(time);
        self
    }

    /// Filter to uplinks received at or before this time.
    ///
    /// Use with `since()` to query a specific time range.
    pub fn until(mut self, time: OffsetDateTime) -> Self {
        self.until = Some(time);
        self
    }

    /// Limit the maximum number of results returned.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Skip the first N results.
    ///
    /// Use with `limit()` for pagination. For example, page 2 with 50 rows
    /// per page is `.limit(50).offset(50)`.
    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Order results by oldest first (ascending by `received_at`).
    pub fn oldest_first(mut self) -> Self {
        self.newest_first = false;
        self
    }

    /// Build the SQL WHERE clause and parameters.
    pub(crate) fn build_where(&self) -> (String, Vec<Box<dyn rusqlite::ToSql>>) {
        let mut conditions = Vec::new();
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref device_id) = self.device_id {
            conditions.push("device_id = ?");
            params.push(Box::new(device_id.clone()));
        }

        if let Some(since) = self.since {
            conditions.push("received_at >= ?");
            params.push(Box::new(since.unix_timestamp()));
        }

        if let Some(until) = self.until {
            conditions.push("received_at <= ?");
            params.push(Box::new(until.unix_timestamp()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        (where_clause, params)
    }

    /// Build the full SQL query.
    pub(crate) fn build_sql(&self) -> String {
        let (where_clause, _) = self.build_where();
        let order = if self.newest_first { "DESC" } else { "ASC" };

        let mut sql = format!(
            "SELECT id, device_id, dev_addr, application_id, payload, f_port, f_cnt, received_at \
             FROM uplinks {} ORDER BY received_at {}",
            where_clause, order
        );

        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }

        if let Some(offset) = self.offset {
            sql.push_str(&format!(" OFFSET {}", offset));
        }

        sql
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query_has_no_where_clause() {
        let query = UplinkQuery::new();
        let (where_clause, params) = query.build_where();
        assert!(where_clause.is_empty());
        assert!(params.is_empty());
    }

    #[test]
    fn test_device_filter() {
        let query = UplinkQuery::new().device("eui-1234");
        let (where_clause, params) = query.build_where();
        assert_eq!(where_clause, "WHERE device_id = ?");
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_time_range_filters_combine() {
        let now = OffsetDateTime::now_utc();
        let query = UplinkQuery::new()
            .device("eui-1234")
            .since(now - time::Duration::hours(1))
            .until(now);
        let (where_clause, params) = query.build_where();
        assert_eq!(
            where_clause,
            "WHERE device_id = ? AND received_at >= ? AND received_at <= ?"
        );
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn test_sql_ordering_and_pagination() {
        let sql = UplinkQuery::new().limit(50).offset(50).build_sql();
        assert!(sql.contains("ORDER BY received_at DESC"));
        assert!(sql.ends_with("LIMIT 50 OFFSET 50"));

        let sql = UplinkQuery::new().oldest_first().build_sql();
        assert!(sql.contains("ORDER BY received_at ASC"));
    }
}
