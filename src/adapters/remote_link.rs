//! Queue-backed [`RemoteLink`] shared by every transport.
//!
//! Inbound traffic arrives on a transport task and is parked in an
//! [`InboundQueue`]; the control loop polls it from there.  Outbound
//! traffic goes straight to a [`Publisher`] on the loop thread.

use log::debug;

use crate::app::ports::RemoteLink;
use crate::error::CommsError;
use crate::remote::queue::InboundQueue;
use crate::remote::{Inbound, Outbound, RemoteKind};

/// Outbound half of a transport.
pub trait Publisher {
    fn publish(&mut self, msg: &Outbound) -> Result<(), CommsError>;

    /// Called from the loop when the transport reports (re)connection,
    /// before the resync is generated.  Brokers subscribe here.
    fn on_connected(&mut self) {}
}

pub struct QueuedLink<'q, P, const N: usize> {
    kind: RemoteKind,
    inbound: &'q InboundQueue<N>,
    publisher: P,
}

impl<'q, P: Publisher, const N: usize> QueuedLink<'q, P, N> {
    pub fn new(kind: RemoteKind, inbound: &'q InboundQueue<N>, publisher: P) -> Self {
        Self { kind, inbound, publisher }
    }

    pub fn publisher(&self) -> &P {
        &self.publisher
    }
}

impl<P: Publisher, const N: usize> RemoteLink for QueuedLink<'_, P, N> {
    fn kind(&self) -> RemoteKind {
        self.kind
    }

    fn poll(&mut self) -> Option<Inbound> {
        let msg = self.inbound.pop()?;
        if msg == Inbound::Connected(self.kind) {
            self.publisher.on_connected();
        }
        Some(msg)
    }

    fn send(&mut self, msg: &Outbound) -> Result<(), CommsError> {
        if msg.kind() != self.kind {
            return Ok(());
        }
        self.publisher.publish(msg)
    }
}

/// Publisher for a remote with no transport wired in.  Writes are dropped.
#[derive(Debug, Default)]
pub struct NullPublisher;

impl Publisher for NullPublisher {
    fn publish(&mut self, msg: &Outbound) -> Result<(), CommsError> {
        debug!("null publisher: dropped {msg:?}");
        Ok(())
    }
}
