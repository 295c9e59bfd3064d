//! Inbound hand-off from transport callbacks to the control loop.
//!
//! Transport SDKs deliver messages on their own tasks.  They push into a
//! static bounded `embassy-sync` channel; the control loop drains it
//! without blocking.
//!
//! ```text
//! ┌──────────────┐   Inbound   ┌──────────────┐
//! │ MQTT / app   │────────────▶│ Control loop │
//! │ callback     │  try_send   │ try_receive  │
//! └──────────────┘             └──────────────┘
//! ```

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use super::Inbound;
use crate::error::CommsError;

/// Depth of each transport's inbound queue.
pub const QUEUE_DEPTH: usize = 16;

pub struct InboundQueue<const N: usize> {
    channel: Channel<CriticalSectionRawMutex, Inbound, N>,
}

impl<const N: usize> InboundQueue<N> {
    pub const fn new() -> Self {
        Self { channel: Channel::new() }
    }

    /// Non-blocking push from a callback.  A full queue drops the message.
    pub fn push(&self, msg: Inbound) -> Result<(), CommsError> {
        self.channel.try_send(msg).map_err(|_| CommsError::QueueFull)
    }

    /// Non-blocking pop from the control loop.
    pub fn pop(&self) -> Option<Inbound> {
        self.channel.try_receive().ok()
    }

    pub fn len(&self) -> usize {
        self.channel.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }
}

impl<const N: usize> Default for InboundQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Broker (MQTT) callback → control loop.
pub static BROKER_INBOUND: InboundQueue<QUEUE_DEPTH> = InboundQueue::new();

/// Dashboard callback → control loop.
pub static DASHBOARD_INBOUND: InboundQueue<QUEUE_DEPTH> = InboundQueue::new();
