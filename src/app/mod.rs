//! Application core: pure domain logic, zero I/O.
//!
//! Long-press arming, command routing and remote synchronization for the
//! pongBot launcher.  All interaction with hardware and transports happens
//! through **port traits** defined in [`ports`], keeping this layer fully
//! testable without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod router;
pub mod service;
pub mod sync;
