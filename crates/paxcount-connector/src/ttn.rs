//! TTN v3 uplink message envelope.
//!
//! Only the fields the connector consumes are modeled; TTN sends far more.
//! Field names follow the wire format of the `v3/{app}/devices/{id}/up`
//! MQTT topic.

use serde::Deserialize;

/// Top-level uplink envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub end_device_ids: EndDeviceIds,
    pub received_at: String,
    pub uplink_message: UplinkMessage,
}

/// Identity of the sending end device.
#[derive(Debug, Clone, Deserialize)]
pub struct EndDeviceIds {
    pub device_id: String,
    pub application_ids: ApplicationIds,
    pub dev_addr: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationIds {
    pub application_id: String,
}

/// The uplink itself.
#[derive(Debug, Clone, Deserialize)]
pub struct UplinkMessage {
    pub f_port: Option<i64>,
    pub f_cnt: Option<i64>,
    /// Application payload, base64-encoded. Absent on empty uplinks.
    pub frm_payload: Option<String>,
    #[serde(default)]
    pub rx_metadata: Vec<RxMetadata>,
    pub received_at: String,
    pub consumed_airtime: Option<String>,
}

/// Per-gateway reception metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct RxMetadata {
    pub gateway_ids: GatewayIds,
    pub rssi: f64,
    pub channel_rssi: f64,
    pub snr: Option<f64>,
    pub location: Option<Location>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GatewayIds {
    pub gateway_id: String,
    pub eui: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: Option<f64>,
    pub source: Option<String>,
}

/// A realistic uplink envelope, shared by tests across the crate.
#[cfg(test)]
pub(crate) const SAMPLE_UPLINK: &str = r#"{
        "end_device_ids": {
            "device_id": "eui-70b3d57ed0001234",
            "application_ids": { "application_id": "pax-demo" },
            "dev_addr": "260B1234"
        },
        "received_at": "2023-11-14T22:13:20.598Z",
        "uplink_message": {
            "f_port": 1,
            "f_cnt": 42,
            "frm_payload": "AQACAA==",
            "rx_metadata": [
                {
                    "gateway_ids": { "gateway_id": "rooftop-gw", "eui": "58A0CBFFFE801234" },
                    "rssi": -104.0,
                    "channel_rssi": -104.0,
                    "snr": 7.25,
                    "location": {
                        "latitude": 52.37,
                        "longitude": 4.89,
                        "altitude": 12.0,
                        "source": "SOURCE_REGISTRY"
                    }
                }
            ],
            "received_at": "2023-11-14T22:13:20.371Z",
            "consumed_airtime": "0.051456s"
        }
    }"#;
