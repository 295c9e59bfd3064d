//! Ball feeder solenoid / relay.  HIGH = energised.

use embedded_hal::digital::OutputPin;

use crate::error::ActuatorError;

pub struct Feeder<PIN> {
    pin: PIN,
    active: bool,
}

impl<PIN: OutputPin> Feeder<PIN> {
    /// Take the pin and drive it low.
    pub fn new(pin: PIN) -> Result<Self, ActuatorError> {
        let mut feeder = Self { pin, active: true };
        feeder.deactivate()?;
        Ok(feeder)
    }

    pub fn activate(&mut self) -> Result<(), ActuatorError> {
        self.pin.set_high().map_err(|_| ActuatorError::GpioWriteFailed)?;
        self.active = true;
        Ok(())
    }

    pub fn deactivate(&mut self) -> Result<(), ActuatorError> {
        self.pin.set_low().map_err(|_| ActuatorError::GpioWriteFailed)?;
        self.active = false;
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}
