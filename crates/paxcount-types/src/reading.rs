//! Decoded people-counter readings.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::ParseError;

/// Minimum number of bytes required to parse a [`PaxReading`].
pub const MIN_PAYLOAD_BYTES: usize = 4;

/// Decoded reading from a PAX counter uplink.
///
/// The payload packs two counters at the start of the raw buffer:
/// - bytes 0-1: devices seen over WiFi (u16 LE)
/// - bytes 2-3: devices seen over BLE (u16 LE)
///
/// Anything after byte 3 (GPS frames or battery telemetry on some firmware
/// builds) is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PaxReading {
    /// Devices counted over WiFi.
    pub wifi_count: u16,
    /// Devices counted over BLE.
    pub ble_count: u16,
}

impl PaxReading {
    /// Parse a `PaxReading` from raw payload bytes.
    ///
    /// The byte format is:
    /// - bytes 0-1: WiFi count (u16 LE)
    /// - bytes 2-3: BLE count (u16 LE)
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::InsufficientBytes`] if `data` contains fewer
    /// than [`MIN_PAYLOAD_BYTES`] (4) bytes.
    #[must_use = "parsing returns a Result that should be handled"]
    pub fn from_bytes(data: &[u8]) -> Result<Self, ParseError> {
        use bytes::Buf;

        if data.len() < MIN_PAYLOAD_BYTES {
            return Err(ParseError::InsufficientBytes {
                expected: MIN_PAYLOAD_BYTES,
                actual: data.len(),
            });
        }

        let mut buf = data;
        let wifi_count = buf.get_u16_le();
        let ble_count = buf.get_u16_le();

        Ok(PaxReading {
            wifi_count,
            ble_count,
        })
    }

    /// Decode a base64 payload (`frm_payload` as delivered by TTN) and
    /// parse it.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::InvalidBase64`] if `payload` is not valid
    /// standard-alphabet base64, or [`ParseError::InsufficientBytes`] if
    /// the decoded buffer is shorter than [`MIN_PAYLOAD_BYTES`].
    ///
    /// # Examples
    ///
    /// ```
    /// use paxcount_types::PaxReading;
    ///
    /// let reading = PaxReading::from_base64("AQACAA==").unwrap();
    /// assert_eq!(reading.wifi_count, 1);
    /// assert_eq!(reading.ble_count, 2);
    /// ```
    #[must_use = "parsing returns a Result that should be handled"]
    pub fn from_base64(payload: &str) -> Result<Self, ParseError> {
        let raw = STANDARD.decode(payload)?;
        Self::from_bytes(&raw)
    }

    /// Total devices counted across both radios.
    #[must_use]
    pub fn total(&self) -> u32 {
        u32::from(self.wifi_count) + u32::from(self.ble_count)
    }
}

impl fmt::Display for PaxReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "wifi={} ble={}", self.wifi_count, self.ble_count)
    }
}
