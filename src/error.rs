//! Unified error types for the pongBot firmware.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! control loop's error handling uniform.  All variants are `Copy` so they
//! can be passed through the router and the loop without allocation.

use core::fmt;

use crate::drivers::hw_init::HwInitError;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// An actuator write failed.
    Actuator(ActuatorError),
    /// An inbound command was malformed or out of range.
    Command(CommandError),
    /// Configuration failed validation.
    Config(ConfigError),
    /// A remote link failed.
    Comms(CommsError),
    /// Peripheral initialisation or pin-map check failed.
    Init(HwInitError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Actuator(e) => write!(f, "actuator: {e}"),
            Self::Command(e) => write!(f, "command: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Comms(e) => write!(f, "comms: {e}"),
            Self::Init(e) => write!(f, "init: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Actuator(e) => Some(e),
            Self::Command(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Comms(e) => Some(e),
            Self::Init(e) => Some(e),
        }
    }
}

impl From<HwInitError> for Error {
    fn from(e: HwInitError) -> Self {
        Self::Init(e)
    }
}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// PWM duty-cycle write failed.
    PwmWriteFailed,
    /// Direction or feeder line write failed.
    GpioWriteFailed,
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PwmWriteFailed => write!(f, "PWM write failed"),
            Self::GpioWriteFailed => write!(f, "GPIO write failed"),
        }
    }
}

impl std::error::Error for ActuatorError {}

impl From<ActuatorError> for Error {
    fn from(e: ActuatorError) -> Self {
        Self::Actuator(e)
    }
}

// ---------------------------------------------------------------------------
// Command errors
// ---------------------------------------------------------------------------

/// Rejections produced while decoding or validating inbound remote values.
/// A rejected command never mutates actuator or arming state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    /// The control ID is not mapped to anything.
    UnknownControl(u8),
    /// The value could not be parsed in the encoding the control expects.
    Malformed,
    /// A discrete level or panel value fell outside its accepted range.
    OutOfRange { value: i32, min: i32, max: i32 },
    /// A config-import key is not recognised.
    UnknownKey,
    /// A broker message arrived on a topic nothing handles.
    UnknownTopic,
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownControl(id) => write!(f, "unknown control V{id}"),
            Self::Malformed => write!(f, "malformed value"),
            Self::OutOfRange { value, min, max } => {
                write!(f, "value {value} outside {min}..={max}")
            }
            Self::UnknownKey => write!(f, "unknown import key"),
            Self::UnknownTopic => write!(f, "unknown broker topic"),
        }
    }
}

impl std::error::Error for CommandError {}

impl From<CommandError> for Error {
    fn from(e: CommandError) -> Self {
        Self::Command(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A field failed range validation.  The `&'static str` names it.
    ValidationFailed(&'static str),
    /// The JSON override could not be deserialised.
    Corrupted,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValidationFailed(msg) => write!(f, "validation failed: {msg}"),
            Self::Corrupted => write!(f, "config corrupted"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Communications errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommsError {
    WifiConnectFailed,
    BrokerConnectFailed,
    BrokerPublishFailed,
    DashboardWriteFailed,
    /// The inbound queue was full; the message was dropped.
    QueueFull,
}

impl fmt::Display for CommsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WifiConnectFailed => write!(f, "WiFi connect failed"),
            Self::BrokerConnectFailed => write!(f, "MQTT connect failed"),
            Self::BrokerPublishFailed => write!(f, "MQTT publish failed"),
            Self::DashboardWriteFailed => write!(f, "dashboard write failed"),
            Self::QueueFull => write!(f, "inbound queue full"),
        }
    }
}

impl std::error::Error for CommsError {}

impl From<CommsError> for Error {
    fn from(e: CommsError) -> Self {
        Self::Comms(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
