//! pongBot launcher firmware library.
//!
//! Exposes the pure-logic modules for integration testing. All
//! ESP-IDF-specific code is guarded by `#[cfg(feature = "espidf")]` within
//! each module.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod arming;
pub mod config;
pub mod control_loop;
pub mod drivers;
pub mod error;
pub mod pins;
pub mod remote;
