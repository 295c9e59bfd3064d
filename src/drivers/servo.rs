//! Continuous-rotation servo on a 50 Hz PWM channel.
//!
//! Speed −100..=100 maps linearly onto the configured pulse bounds, split at
//! the centre pulse so asymmetric bounds still stop at 0.

use embedded_hal::pwm::SetDutyCycle;

use crate::config::ServoPulse;
use crate::error::ActuatorError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServoState {
    pub rotation_speed_percent: i8,
    pub pulse_width_us: u32,
}

pub struct ContinuousServo<P> {
    pwm: P,
    pulse: ServoPulse,
    state: ServoState,
    duty: u16,
}

impl<P: SetDutyCycle> ContinuousServo<P> {
    /// Take the PWM channel and centre the servo.
    pub fn new(pwm: P, pulse: ServoPulse) -> Result<Self, ActuatorError> {
        let mut servo = Self {
            pwm,
            pulse,
            state: ServoState {
                rotation_speed_percent: 0,
                pulse_width_us: pulse.center_us,
            },
            duty: 0,
        };
        servo.stop()?;
        Ok(servo)
    }

    pub fn set_rotation_speed(&mut self, speed_percent: i8) -> Result<(), ActuatorError> {
        let speed = speed_percent.clamp(-100, 100);
        let pulse_us = pulse_for_speed(&self.pulse, speed);
        let duty = duty_for_pulse(self.pwm.max_duty_cycle(), pulse_us, self.pulse.period_us);

        self.pwm
            .set_duty_cycle(duty)
            .map_err(|_| ActuatorError::PwmWriteFailed)?;

        self.duty = duty;
        self.state = ServoState {
            rotation_speed_percent: speed,
            pulse_width_us: pulse_us,
        };
        Ok(())
    }

    /// Centre pulse (standstill).
    pub fn stop(&mut self) -> Result<(), ActuatorError> {
        self.set_rotation_speed(0)
    }

    pub fn state(&self) -> ServoState {
        self.state
    }

    pub fn current_duty(&self) -> u16 {
        self.duty
    }
}

/// Linear interpolation: −100 → `min_us`, 0 → `center_us`, +100 → `max_us`.
pub fn pulse_for_speed(pulse: &ServoPulse, speed: i8) -> u32 {
    let magnitude = u32::from(speed.unsigned_abs().min(100));
    if speed >= 0 {
        pulse.center_us + (pulse.max_us - pulse.center_us) * magnitude / 100
    } else {
        pulse.center_us - (pulse.center_us - pulse.min_us) * magnitude / 100
    }
}

pub fn duty_for_pulse(max_duty: u16, pulse_us: u32, period_us: u32) -> u16 {
    if period_us == 0 {
        return 0;
    }
    let duty = u64::from(max_duty) * u64::from(pulse_us) / u64::from(period_us);
    duty.min(u64::from(max_duty)) as u16
}
