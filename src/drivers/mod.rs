//! Actuator drivers and hardware initialisation.
//!
//! Drivers are generic over `embedded-hal` 1.0 pin traits and return
//! `Result<_, ActuatorError>`; they hold no policy.

pub mod feeder;
pub mod hw_init;
pub mod motor;
pub mod servo;

#[cfg(test)]
pub(crate) mod mock;
