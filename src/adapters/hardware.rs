//! Hardware adapter: bridges real peripherals to the domain port traits.
//!
//! Owns both drive motors, the servo and the feeder, exposing them through
//! [`ActuatorPort`].  This is the only module in the system that calls into
//! the actuator drivers.  It is generic over the `embedded-hal` pin types so
//! the same adapter runs on ESP-IDF drivers and on host test mocks.
//!
//! Write failures never propagate into the domain: the failure is logged and
//! the affected actuator is driven to its safe state (motor stopped, servo
//! centred, feeder off).

use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;
use log::error;

use crate::app::ports::{ActuatorPort, MotorId};
use crate::drivers::feeder::Feeder;
use crate::drivers::motor::{DcMotor, Direction, MotorState};
use crate::drivers::servo::{ContinuousServo, ServoState};
use crate::error::ActuatorError;

/// Concrete adapter that combines all actuators behind [`ActuatorPort`].
pub struct HardwareAdapter<PIN, PWM> {
    top: DcMotor<PIN, PIN, PWM>,
    bottom: DcMotor<PIN, PIN, PWM>,
    servo: ContinuousServo<PWM>,
    feeder: Feeder<PIN>,
}

impl<PIN, PWM> HardwareAdapter<PIN, PWM>
where
    PIN: OutputPin,
    PWM: SetDutyCycle,
{
    pub fn new(
        top: DcMotor<PIN, PIN, PWM>,
        bottom: DcMotor<PIN, PIN, PWM>,
        servo: ContinuousServo<PWM>,
        feeder: Feeder<PIN>,
    ) -> Self {
        Self {
            top,
            bottom,
            servo,
            feeder,
        }
    }

    fn motor(&mut self, id: MotorId) -> &mut DcMotor<PIN, PIN, PWM> {
        match id {
            MotorId::Top => &mut self.top,
            MotorId::Bottom => &mut self.bottom,
        }
    }

    fn motor_ref(&self, id: MotorId) -> &DcMotor<PIN, PIN, PWM> {
        match id {
            MotorId::Top => &self.top,
            MotorId::Bottom => &self.bottom,
        }
    }

    fn motor_result(&mut self, id: MotorId, what: &str, res: Result<(), ActuatorError>) {
        if let Err(e) = res {
            error!("motor {id:?}: {what} failed: {e}, stopping");
            if let Err(e) = self.motor(id).stop() {
                error!("motor {id:?}: safe stop failed: {e}");
            }
        }
    }

    fn servo_result(&mut self, res: Result<(), ActuatorError>) {
        if let Err(e) = res {
            error!("servo: write failed: {e}, centring");
            if let Err(e) = self.servo.stop() {
                error!("servo: safe centre failed: {e}");
            }
        }
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<PIN, PWM> ActuatorPort for HardwareAdapter<PIN, PWM>
where
    PIN: OutputPin,
    PWM: SetDutyCycle,
{
    fn drive_motor(&mut self, motor: MotorId, direction: Direction, speed_percent: f32) {
        let res = self.motor(motor).set_direction_and_speed(direction, speed_percent);
        self.motor_result(motor, "drive", res);
    }

    fn set_motor_speed(&mut self, motor: MotorId, speed_percent: f32) {
        let res = self.motor(motor).set_speed_only(speed_percent);
        self.motor_result(motor, "set speed", res);
    }

    fn stop_motor(&mut self, motor: MotorId) {
        let res = self.motor(motor).stop();
        self.motor_result(motor, "stop", res);
    }

    fn brake_motor(&mut self, motor: MotorId) {
        let res = self.motor(motor).brake();
        self.motor_result(motor, "brake", res);
    }

    fn motor_state(&self, motor: MotorId) -> MotorState {
        self.motor_ref(motor).state()
    }

    fn set_servo_speed(&mut self, speed_percent: i8) {
        let res = self.servo.set_rotation_speed(speed_percent);
        self.servo_result(res);
    }

    fn servo_state(&self) -> ServoState {
        self.servo.state()
    }

    fn set_feeder(&mut self, on: bool) {
        let res = if on { self.feeder.activate() } else { self.feeder.deactivate() };
        if let Err(e) = res {
            error!("feeder: write failed: {e}, releasing");
            if let Err(e) = self.feeder.deactivate() {
                error!("feeder: safe release failed: {e}");
            }
        }
    }

    fn is_feeder_on(&self) -> bool {
        self.feeder.is_active()
    }

    fn all_off(&mut self) {
        self.set_feeder(false);
        self.stop_motor(MotorId::Top);
        self.stop_motor(MotorId::Bottom);
        self.set_servo_speed(0);
    }
}
