//! MQTT broker transport.
//!
//! The ESP-IDF client delivers events on its own task.  The callback only
//! translates them into [`Inbound`] and parks them in
//! [`BROKER_INBOUND`](crate::remote::queue::BROKER_INBOUND); everything else
//! happens on the control loop through [`QueuedLink`](super::remote_link::QueuedLink).

use log::warn;

use crate::remote::{Inbound, RemoteKind};

/// Translate a received broker message.  Non-UTF-8 or oversized payloads
/// are dropped with a warning.
pub fn inbound_from_message(topic: Option<&str>, data: &[u8]) -> Option<Inbound> {
    let Some(topic) = topic else {
        warn!("mqtt: message without topic dropped");
        return None;
    };
    let Ok(payload) = core::str::from_utf8(data) else {
        warn!("mqtt: non-UTF-8 payload on {topic} dropped");
        return None;
    };
    let msg = Inbound::broker(topic, payload);
    if msg.is_none() {
        warn!("mqtt: message on {topic} exceeds capacity, dropped");
    }
    msg
}

pub fn connection_event(connected: bool) -> Inbound {
    if connected {
        Inbound::Connected(RemoteKind::Broker)
    } else {
        Inbound::Disconnected(RemoteKind::Broker)
    }
}

#[cfg(feature = "espidf")]
pub use esp::{EspMqttPublisher, connect};

#[cfg(feature = "espidf")]
mod esp {
    use esp_idf_svc::mqtt::client::{EspMqttClient, EventPayload, MqttClientConfiguration, QoS};
    use log::{info, warn};

    use super::{connection_event, inbound_from_message};
    use crate::adapters::remote_link::Publisher;
    use crate::config::BrokerConfig;
    use crate::error::CommsError;
    use crate::remote::queue::BROKER_INBOUND;
    use crate::remote::{Outbound, topics};

    pub struct EspMqttPublisher {
        client: EspMqttClient<'static>,
    }

    /// Start the client.  Connection happens in the background; the
    /// `Connected` event arrives through the inbound queue.
    pub fn connect(cfg: &BrokerConfig) -> Result<EspMqttPublisher, CommsError> {
        let conf = MqttClientConfiguration {
            client_id: Some(cfg.client_id.as_str()),
            ..Default::default()
        };

        let client = EspMqttClient::new_cb(cfg.url.as_str(), &conf, |event| {
            let msg = match event.payload() {
                EventPayload::Connected(_) => Some(connection_event(true)),
                EventPayload::Disconnected => Some(connection_event(false)),
                EventPayload::Received { topic, data, .. } => inbound_from_message(topic, data),
                _ => None,
            };
            if let Some(msg) = msg {
                if BROKER_INBOUND.push(msg).is_err() {
                    warn!("mqtt: inbound queue full, message dropped");
                }
            }
        })
        .map_err(|_| CommsError::BrokerConnectFailed)?;

        info!("mqtt: client started for {}", cfg.url);
        Ok(EspMqttPublisher { client })
    }

    impl Publisher for EspMqttPublisher {
        fn publish(&mut self, msg: &Outbound) -> Result<(), CommsError> {
            let Outbound::Broker { topic, payload } = msg else {
                return Ok(());
            };
            self.client
                .enqueue(topic, QoS::AtMostOnce, false, payload.as_bytes())
                .map(|_| ())
                .map_err(|_| CommsError::BrokerPublishFailed)
        }

        fn on_connected(&mut self) {
            for topic in topics::SUBSCRIPTIONS {
                if let Err(e) = self.client.subscribe(topic, QoS::AtMostOnce) {
                    warn!("mqtt: subscribe {topic} failed: {e}");
                }
            }
        }
    }
}
