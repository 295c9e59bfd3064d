//! Bidirectional DC drive motor (one TB6612FNG half).
//!
//! Two direction lines plus one PWM speed line.
//!
//! | IN1 | IN2 | PWM  | Motor      |
//! |-----|-----|------|------------|
//! | 1   | 0   | duty | Forward    |
//! | 0   | 1   | duty | Reverse    |
//! | 0   | 0   | 0    | Stop/coast |
//! | 1   | 1   | max  | Brake      |
//!
//! ## Write ordering
//!
//! Both lines are never high while duty > 0 outside of brake.  Stopping
//! drives the lines low before zeroing duty.  Changing direction on a
//! running motor zeroes duty first, releases the old line before raising
//! the new one, and writes duty last.

use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;

use crate::error::ActuatorError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Reverse,
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotorState {
    pub direction: Direction,
    /// Configured speed (%).  Survives `stop()` so a re-enable resumes it.
    pub speed_percent: f32,
    pub is_running: bool,
    pub is_braking: bool,
}

impl MotorState {
    const STOPPED: Self = Self {
        direction: Direction::Stopped,
        speed_percent: 0.0,
        is_running: false,
        is_braking: false,
    };
}

pub struct DcMotor<IN1, IN2, P> {
    in1: IN1,
    in2: IN2,
    pwm: P,
    state: MotorState,
    duty: u16,
}

impl<IN1, IN2, P> DcMotor<IN1, IN2, P>
where
    IN1: OutputPin,
    IN2: OutputPin,
    P: SetDutyCycle,
{
    /// Take ownership of the pins and force the motor into the stopped state.
    pub fn new(in1: IN1, in2: IN2, pwm: P) -> Result<Self, ActuatorError> {
        let mut motor = Self {
            in1,
            in2,
            pwm,
            state: MotorState::STOPPED,
            duty: 0,
        };
        motor.stop()?;
        Ok(motor)
    }

    pub fn set_direction_and_speed(
        &mut self,
        direction: Direction,
        speed_percent: f32,
    ) -> Result<(), ActuatorError> {
        let speed = clamp_speed(speed_percent);

        let forward = match direction {
            Direction::Forward => true,
            Direction::Reverse => false,
            Direction::Stopped => {
                self.stop()?;
                self.state.speed_percent = speed;
                return Ok(());
            }
        };

        let reversing = self.state.is_running && self.state.direction != direction;
        if reversing || self.state.is_braking {
            self.write_duty(0)?;
        }

        // Release before raise.
        if forward {
            self.line2(false)?;
            self.line1(true)?;
        } else {
            self.line1(false)?;
            self.line2(true)?;
        }

        self.write_duty(self.duty_for(speed))?;

        self.state = MotorState {
            direction,
            speed_percent: speed,
            is_running: true,
            is_braking: false,
        };
        Ok(())
    }

    /// Lines low, then duty 0.  Out of a brake the duty drops first so
    /// releasing one line never drives the motor.  The configured speed is kept.
    pub fn stop(&mut self) -> Result<(), ActuatorError> {
        if self.state.is_braking {
            self.write_duty(0)?;
        }
        self.line1(false)?;
        self.line2(false)?;
        self.write_duty(0)?;
        self.state.direction = Direction::Stopped;
        self.state.is_running = false;
        self.state.is_braking = false;
        Ok(())
    }

    /// Short brake: both lines high, duty max.
    pub fn brake(&mut self) -> Result<(), ActuatorError> {
        self.line1(true)?;
        self.line2(true)?;
        self.write_duty(self.pwm.max_duty_cycle())?;
        self.state.direction = Direction::Stopped;
        self.state.is_running = false;
        self.state.is_braking = true;
        Ok(())
    }

    /// Record a new speed; duty is only written while the motor runs.
    pub fn set_speed_only(&mut self, speed_percent: f32) -> Result<(), ActuatorError> {
        let speed = clamp_speed(speed_percent);
        self.state.speed_percent = speed;
        if self.state.is_running {
            self.write_duty(self.duty_for(speed))?;
        }
        Ok(())
    }

    pub fn state(&self) -> MotorState {
        self.state
    }

    pub fn current_duty(&self) -> u16 {
        self.duty
    }

    fn duty_for(&self, speed: f32) -> u16 {
        (speed * f32::from(self.pwm.max_duty_cycle()) / 100.0) as u16
    }

    fn write_duty(&mut self, duty: u16) -> Result<(), ActuatorError> {
        self.pwm
            .set_duty_cycle(duty)
            .map_err(|_| ActuatorError::PwmWriteFailed)?;
        self.duty = duty;
        Ok(())
    }

    fn line1(&mut self, high: bool) -> Result<(), ActuatorError> {
        set_line(&mut self.in1, high)
    }

    fn line2(&mut self, high: bool) -> Result<(), ActuatorError> {
        set_line(&mut self.in2, high)
    }
}

fn set_line<PIN: OutputPin>(pin: &mut PIN, high: bool) -> Result<(), ActuatorError> {
    let res = if high { pin.set_high() } else { pin.set_low() };
    res.map_err(|_| ActuatorError::GpioWriteFailed)
}

fn clamp_speed(speed: f32) -> f32 {
    if speed.is_nan() { 0.0 } else { speed.clamp(0.0, 100.0) }
}
