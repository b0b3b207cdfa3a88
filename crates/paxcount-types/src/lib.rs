//! Platform-agnostic types for PAX counter uplink payloads.
//!
//! A PAX counter is a LoRaWAN sensor that counts nearby WiFi and BLE
//! devices as a presence proxy. Its uplink payload starts with the two
//! counters as little-endian 16-bit fields; TTN delivers the payload as a
//! base64 string.
//!
//! This crate provides the shared types used by the connector and the UDF
//! server:
//!
//! - [`PaxReading`] and its byte-level / base64 parsing
//! - Error types for payload decoding
//!
//! # Example
//!
//! ```
//! use paxcount_types::PaxReading;
//!
//! let reading = PaxReading::from_base64("//8AAA==")?;
//! assert_eq!(reading.wifi_count, 65535);
//! assert_eq!(reading.ble_count, 0);
//! # Ok::<(), paxcount_types::ParseError>(())
//! ```

pub mod error;
pub mod reading;

pub use error::{ParseError, ParseResult};
pub use reading::{MIN_PAYLOAD_BYTES, PaxReading};

#[cfg(test)]
mod tests {
    use super::*;

    // --- PaxReading byte-level parsing tests ---

    #[test]
    fn test_parse_reading_from_valid_bytes() {
        // WiFi: 800 (0x0320 LE -> [0x20, 0x03])
        // BLE: 300 (0x012C LE -> [0x2C, 0x01])
        let bytes: [u8; 4] = [0x20, 0x03, 0x2C, 0x01];

        let reading = PaxReading::from_bytes(&bytes).unwrap();

        assert_eq!(reading.wifi_count, 800);
        assert_eq!(reading.ble_count, 300);
    }

    #[test]
    fn test_parse_reading_exactly_four_bytes() {
        let bytes: [u8; 4] = [0x01, 0x00, 0x02, 0x00];

        let reading = PaxReading::from_bytes(&bytes).unwrap();
        assert_eq!(reading.wifi_count, 1);
        assert_eq!(reading.ble_count, 2);
    }

    #[test]
    fn test_parse_reading_from_insufficient_bytes() {
        let bytes: [u8; 3] = [0x01, 0x00, 0x02];

        let result = PaxReading::from_bytes(&bytes);

        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(err.to_string().contains("requires 4 bytes"));
    }

    #[test]
    fn test_parse_reading_zero_bytes() {
        let bytes: [u8; 0] = [];

        let result = PaxReading::from_bytes(&bytes);
        assert!(matches!(
            result,
            Err(ParseError::InsufficientBytes {
                expected: 4,
                actual: 0
            })
        ));
    }

    #[test]
    fn test_parse_reading_all_zeros() {
        let bytes: [u8; 4] = [0; 4];

        let reading = PaxReading::from_bytes(&bytes).unwrap();
        assert_eq!(reading.wifi_count, 0);
        assert_eq!(reading.ble_count, 0);
        assert_eq!(reading.total(), 0);
    }

    #[test]
    fn test_parse_reading_max_values() {
        let bytes: [u8; 4] = [0xFF, 0xFF, 0xFF, 0xFF];

        let reading = PaxReading::from_bytes(&bytes).unwrap();
        assert_eq!(reading.wifi_count, 65535);
        assert_eq!(reading.ble_count, 65535);
        assert_eq!(reading.total(), 131_070);
    }

    #[test]
    fn test_parse_reading_extra_bytes_ignored() {
        // Payloads longer than 4 bytes parse fine; trailing telemetry is
        // not consumed.
        let bytes: [u8; 9] = [0x20, 0x03, 0x2C, 0x01, 0xAA, 0xBB, 0xCC, 0xDD, 0xEE];

        let reading = PaxReading::from_bytes(&bytes).unwrap();
        assert_eq!(reading.wifi_count, 800);
        assert_eq!(reading.ble_count, 300);

        let without_tail = PaxReading::from_bytes(&bytes[..4]).unwrap();
        assert_eq!(reading, without_tail);
    }

    // --- Base64 decoding tests ---

    #[test]
    fn test_from_base64_known_payloads() {
        // [0x01, 0x00, 0x02, 0x00]
        let reading = PaxReading::from_base64("AQACAA==").unwrap();
        assert_eq!(reading.wifi_count, 1);
        assert_eq!(reading.ble_count, 2);

        // [0xFF, 0xFF, 0x00, 0x00]
        let reading = PaxReading::from_base64("//8AAA==").unwrap();
        assert_eq!(reading.wifi_count, 65535);
        assert_eq!(reading.ble_count, 0);
    }

    #[test]
    fn test_from_base64_invalid_text() {
        let result = PaxReading::from_base64("not base64!!!");
        assert!(matches!(result, Err(ParseError::InvalidBase64(_))));
    }

    #[test]
    fn test_from_base64_truncated_buffer() {
        // "AQA=" decodes to 2 bytes
        let result = PaxReading::from_base64("AQA=");
        assert!(matches!(
            result,
            Err(ParseError::InsufficientBytes {
                expected: 4,
                actual: 2
            })
        ));
    }

    #[test]
    fn test_from_base64_is_idempotent() {
        let first = PaxReading::from_base64("AQACAA==").unwrap();
        let second = PaxReading::from_base64("AQACAA==").unwrap();
        assert_eq!(first, second);
    }

    // --- Display / serialization tests ---

    #[test]
    fn test_reading_display() {
        let reading = PaxReading {
            wifi_count: 12,
            ble_count: 7,
        };
        assert_eq!(reading.to_string(), "wifi=12 ble=7");
    }

    #[test]
    fn test_reading_serialization_roundtrip() {
        let reading = PaxReading {
            wifi_count: 800,
            ble_count: 300,
        };

        let json = serde_json::to_string(&reading).unwrap();
        assert!(json.contains("\"wifi_count\":800"));
        assert!(json.contains("\"ble_count\":300"));

        let deserialized: PaxReading = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, reading);
    }

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::InsufficientBytes {
            expected: 4,
            actual: 3,
        };
        assert_eq!(err.to_string(), "truncated payload: requires 4 bytes, got 3");
    }

    // --- Property tests ---

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn decodes_any_four_plus_byte_buffer(data in proptest::collection::vec(any::<u8>(), 4..64)) {
                let reading = PaxReading::from_bytes(&data).unwrap();
                prop_assert_eq!(
                    reading.wifi_count,
                    u16::from(data[0]) + u16::from(data[1]) * 256
                );
                prop_assert_eq!(
                    reading.ble_count,
                    u16::from(data[2]) + u16::from(data[3]) * 256
                );
            }

            #[test]
            fn rejects_any_short_buffer(data in proptest::collection::vec(any::<u8>(), 0..4)) {
                prop_assert!(PaxReading::from_bytes(&data).is_err());
            }
        }
    }
}
