//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them.

use crate::error::CommandError;
use crate::remote::RemoteKind;

use super::commands::AppCommand;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The service started with this many arming channels.
    Started { channels: u8 },

    /// A channel crossed the long-press threshold and the feeder fired.
    Fired { channel: u8 },

    /// A channel's hold elapsed and it returned to idle.
    HoldReleased { channel: u8 },

    /// An actuator setting was accepted and applied.
    SettingApplied(AppCommand),

    /// An inbound value was rejected; nothing changed.
    CommandRejected(CommandError),

    RemoteConnected(RemoteKind),

    RemoteDisconnected(RemoteKind),

    /// A broker settings block was processed.
    ImportApplied { accepted: u8, rejected: u8 },

    /// Every actuator was driven to its safe state.
    Shutdown,
}
