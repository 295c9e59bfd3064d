//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (actuators, remote links, clock, event sinks) implement
//! these traits.  The [`AppService`](super::service::AppService) and the
//! [`ControlLoop`](crate::control_loop::ControlLoop) consume them via
//! generics, so the domain core never touches hardware or an SDK directly.

use crate::drivers::motor::{Direction, MotorState};
use crate::drivers::servo::ServoState;
use crate::error::CommsError;
use crate::remote::{Inbound, Outbound, RemoteKind};

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// The two drive wheels of the launcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotorId {
    Top,
    Bottom,
}

impl MotorId {
    pub const ALL: [Self; 2] = [Self::Top, Self::Bottom];
}

/// Write-side port: the domain calls this to command actuators.
///
/// Methods are infallible from the domain's point of view.  An
/// implementation that hits a write failure logs it and drives the affected
/// actuator to its safe state; the reported state then reflects that.
pub trait ActuatorPort {
    /// Run a motor in `direction` at `speed_percent` (0–100).
    fn drive_motor(&mut self, motor: MotorId, direction: Direction, speed_percent: f32);

    /// Change a motor's configured speed; duty only changes while it runs.
    fn set_motor_speed(&mut self, motor: MotorId, speed_percent: f32);

    /// Coast to a stop.  The configured speed is kept.
    fn stop_motor(&mut self, motor: MotorId);

    /// Short-brake a motor.
    fn brake_motor(&mut self, motor: MotorId);

    fn motor_state(&self, motor: MotorId) -> MotorState;

    /// Rotate the servo at −100..=100 % (0 = standstill).
    fn set_servo_speed(&mut self, speed_percent: i8);

    fn servo_state(&self) -> ServoState;

    fn set_feeder(&mut self, on: bool);

    fn is_feeder_on(&self) -> bool;

    /// Motors stopped, servo centred, feeder off.
    fn all_off(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Remote link port (driving + driven: dashboard / broker ↔ domain)
// ───────────────────────────────────────────────────────────────

/// One remote control surface.
///
/// `poll` must never block: the control loop drains a bounded number of
/// messages per pass and moves on.  `send` failures are transient; the
/// loop logs them and relies on the resync after reconnection.
pub trait RemoteLink {
    fn kind(&self) -> RemoteKind;

    fn poll(&mut self) -> Option<Inbound>;

    fn send(&mut self, msg: &Outbound) -> Result<(), CommsError>;
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond clock.  Wraps at `u32::MAX`; callers compare with
/// `wrapping_sub`.
pub trait Clock {
    fn now_ms(&self) -> u32;

    fn sleep_ms(&self, ms: u32);
}
