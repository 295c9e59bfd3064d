//! Inbound commands to the application service.
//!
//! The [`router`](super::router) decodes every remote message into one of
//! these.  Values inside a command are already validated: a command that
//! exists is a command that will be applied.

use crate::remote::{Payload, RemoteKind};

use super::ports::MotorId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    /// Arming button went down.
    ArmPress { channel: u8 },

    /// Arming button came up.
    ArmRelease { channel: u8 },

    /// Start or stop the servo sweep.
    ServoEnable(bool),

    /// Select a servo speed level (1..=5).
    ServoLevel(u8),

    /// Run or stop both drive motors.
    MotorsEnable(bool),

    /// Set one motor's speed from a dashboard panel value (1..=100).
    MotorPanel { motor: MotorId, panel: u8 },

    /// A remote (re)connected; republish everything to it.
    Resync(RemoteKind),

    /// A remote dropped.  Actuators are untouched.
    LinkDown(RemoteKind),

    /// Apply a `key:value` settings block from the broker.
    ImportSettings(Payload),
}

impl AppCommand {
    /// Commands that change actuator configuration.  Accepting one clears
    /// every channel's status label.
    pub fn is_actuator_setting(&self) -> bool {
        matches!(
            self,
            Self::ServoEnable(_)
                | Self::ServoLevel(_)
                | Self::MotorsEnable(_)
                | Self::MotorPanel { .. }
        )
    }
}
