//! Data models for stored uplinks.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use paxcount_types::{ParseResult, PaxReading};

/// A TTN uplink stored in the database.
///
/// The payload is kept exactly as TTN delivered it (base64 text); decoding
/// into counts happens at query time, not at ingest time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredUplink {
    /// Row identifier (UUIDv7, assigned by the connector).
    pub id: String,
    /// TTN end-device identifier.
    pub device_id: String,
    /// LoRaWAN device address.
    pub dev_addr: String,
    /// TTN application identifier.
    pub application_id: String,
    /// Raw base64 payload (`frm_payload`).
    pub payload: String,
    /// LoRaWAN port the uplink arrived on.
    pub f_port: u8,
    /// LoRaWAN frame counter, when present.
    pub f_cnt: Option<i64>,
    /// When TTN received the uplink.
    #[serde(with = "time::serde::rfc3339")]
    pub received_at: OffsetDateTime,
}

impl StoredUplink {
    /// Decode this uplink's payload into a [`PaxReading`].
    ///
    /// # Errors
    ///
    /// Fails when the stored payload is not valid base64 or decodes to
    /// fewer than 4 bytes.
    pub fn reading(&self) -> ParseResult<PaxReading> {
        PaxReading::from_base64(&self.payload)
    }
}
