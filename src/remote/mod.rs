//! Remote wire model shared by every transport.
//!
//! Both remotes (the dashboard and the MQTT broker) are reduced to one
//! inbound type and one outbound type.  Transports translate their native
//! callbacks into [`Inbound`] and render [`Outbound`]; nothing above this
//! layer knows which SDK sits underneath.

pub mod codec;
pub mod queue;
pub mod topics;

use core::fmt;

use heapless::{String, Vec};
use log::warn;

/// Dashboard value capacity ("True", "100", ...).
pub const VALUE_CAP: usize = 16;
/// Broker topic capacity.
pub const TOPIC_CAP: usize = 48;
/// Broker payload capacity (fits the JSON state snapshot).
pub const PAYLOAD_CAP: usize = 384;
/// Outbound messages produced by one dispatch or tick.
pub const OUTBOX_CAP: usize = 32;

pub type Value = String<VALUE_CAP>;
pub type Topic = String<TOPIC_CAP>;
pub type Payload = String<PAYLOAD_CAP>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteKind {
    Dashboard,
    Broker,
}

impl fmt::Display for RemoteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dashboard => write!(f, "dashboard"),
            Self::Broker => write!(f, "broker"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// A dashboard control (virtual pin) changed.
    Control { id: u8, value: Value },
    /// A message arrived on a subscribed broker topic.
    Broker { topic: Topic, payload: Payload },
    Connected(RemoteKind),
    Disconnected(RemoteKind),
}

impl Inbound {
    /// Build a control message, or `None` if the value does not fit.
    pub fn control(id: u8, value: &str) -> Option<Self> {
        Some(Self::Control { id, value: bounded(value)? })
    }

    pub fn broker(topic: &str, payload: &str) -> Option<Self> {
        Some(Self::Broker {
            topic: bounded(topic)?,
            payload: bounded(payload)?,
        })
    }
}

/// Value written to a dashboard control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireValue {
    Int(i32),
    /// Rendered as `"True"` / `"False"` for label widgets.
    Flag(bool),
}

impl fmt::Display for WireValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Flag(true) => write!(f, "True"),
            Self::Flag(false) => write!(f, "False"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    Dashboard { id: u8, value: WireValue },
    Broker { topic: Topic, payload: Payload },
}

impl Outbound {
    pub fn kind(&self) -> RemoteKind {
        match self {
            Self::Dashboard { .. } => RemoteKind::Dashboard,
            Self::Broker { .. } => RemoteKind::Broker,
        }
    }
}

pub type Outbox = Vec<Outbound, OUTBOX_CAP>;

/// Append to the outbox; overflow drops the message with a warning.  A
/// later resync restores anything lost.
pub fn post(outbox: &mut Outbox, msg: Outbound) {
    if let Err(dropped) = outbox.push(msg) {
        warn!("outbox full, dropping {:?}", dropped);
    }
}

pub fn post_dashboard(outbox: &mut Outbox, id: u8, value: WireValue) {
    post(outbox, Outbound::Dashboard { id, value });
}

pub fn post_broker(outbox: &mut Outbox, topic: &str, payload: &str) {
    match (bounded(topic), bounded(payload)) {
        (Some(topic), Some(payload)) => post(outbox, Outbound::Broker { topic, payload }),
        _ => warn!("broker message for {topic} exceeds capacity, dropped"),
    }
}

/// Copy `s` into a fixed-capacity string, or `None` if it does not fit.
pub fn bounded<const N: usize>(s: &str) -> Option<String<N>> {
    let mut out = String::new();
    out.push_str(s).ok()?;
    Some(out)
}
