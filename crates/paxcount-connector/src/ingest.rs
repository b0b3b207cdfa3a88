//! MQTT ingest loop: TTN uplinks in, stored rows out.
//!
//! Per-message failures (malformed JSON, bad timestamps) are logged and
//! skipped; the loop must outlive bad messages. Connection-level errors
//! are retried after a delay.

use std::time::Duration;

use rumqttc::{AsyncClient, Event, MqttOptions, Packet, QoS};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::{debug, info, warn};
use uuid::Uuid;

use paxcount_store::{Store, StoredUplink};

use crate::config::Config;
use crate::ttn;

/// Delay before polling again after a connection-level error.
const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Run the ingest loop.
///
/// Connects to the configured broker, subscribes to the uplink topic, and
/// stores every matching uplink until the task is cancelled.
pub async fn run(config: Config, store: Store) -> anyhow::Result<()> {
    let (host, port, use_tls) = config.mqtt.broker_parts()?;

    let mut mqtt_options = MqttOptions::new(&config.mqtt.client_id, host, port);
    mqtt_options.set_keep_alive(Duration::from_secs(config.mqtt.keep_alive));

    if let (Some(username), Some(password)) = (&config.mqtt.username, &config.mqtt.password) {
        mqtt_options.set_credentials(username, password);
    }

    if use_tls {
        mqtt_options.set_transport(rumqttc::Transport::tls_with_default_config());
    }

    let (client, mut eventloop) = AsyncClient::new(mqtt_options, 100);

    info!(
        "Connecting to {} for topic '{}'",
        config.mqtt.broker, config.mqtt.topic
    );

    loop {
        match eventloop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(_))) => {
                info!("MQTT connected, subscribing to '{}'", config.mqtt.topic);
                // Subscriptions do not survive reconnects; renew on every
                // connection acknowledgement.
                client
                    .subscribe(&config.mqtt.topic, QoS::AtMostOnce)
                    .await?;
            }
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                match handle_uplink(&store, config.ingest.uplink_port, &publish.payload) {
                    Ok(Some(uplink)) => match uplink.reading() {
                        Ok(reading) => {
                            debug!("Stored uplink from {}: {}", uplink.device_id, reading);
                        }
                        Err(e) => {
                            debug!(
                                "Stored uplink from {} (payload does not decode: {})",
                                uplink.device_id, e
                            );
                        }
                    },
                    Ok(None) => {}
                    Err(e) => {
                        warn!("Dropping message on '{}': {}", publish.topic, e);
                    }
                }
            }
            Ok(_) => {}
            Err(e) => {
                warn!("MQTT connection error: {}. Reconnecting...", e);
                tokio::time::sleep(RECONNECT_DELAY).await;
            }
        }
    }
}

/// Handle one raw MQTT publish payload.
///
/// Returns the stored row, or `None` when the uplink is filtered out
/// (wrong port, or no application payload). Malformed envelopes are
/// errors, surfaced to the caller for logging.
fn handle_uplink(
    store: &Store,
    uplink_port: u8,
    raw: &[u8],
) -> anyhow::Result<Option<StoredUplink>> {
    let message: ttn::Message = serde_json::from_slice(raw)?;
    let device_id = &message.end_device_ids.device_id;
    let uplink = &message.uplink_message;

    if uplink.f_port != Some(i64::from(uplink_port)) {
        debug!(
            "Ignoring uplink from {} on port {:?}",
            device_id, uplink.f_port
        );
        return Ok(None);
    }

    let Some(payload) = uplink.frm_payload.clone() else {
        debug!("Ignoring uplink from {} without frm_payload", device_id);
        return Ok(None);
    };

    let received_at = OffsetDateTime::parse(&uplink.received_at, &Rfc3339)?;

    let row = StoredUplink {
        id: Uuid::now_v7().hyphenated().to_string(),
        device_id: message.end_device_ids.device_id.clone(),
        dev_addr: message.end_device_ids.dev_addr.clone(),
        application_id: message.end_device_ids.application_ids.application_id.clone(),
        payload,
        f_port: uplink_port,
        f_cnt: uplink.f_cnt,
        received_at,
    };

    store.insert_uplink(&row)?;
    Ok(Some(row))
}
