//! Command router: remote values in, validated commands and actuator calls out.
//!
//! Decoding and validation happen together so nothing downstream sees an
//! out-of-range value.  Out-of-range input is rejected, never clamped.

use log::debug;

use crate::config::{ControlMap, MotorConfig, SERVO_LEVELS, ServoConfig};
use crate::drivers::motor::Direction;
use crate::error::CommandError;
use crate::remote::codec::{parse_flag, parse_in_range};
use crate::remote::{Inbound, topics};

use super::commands::AppCommand;
use super::ports::{ActuatorPort, MotorId};

/// Highest dashboard motor panel value.
pub const PANEL_MAX: i32 = 100;

/// Operator-selected launcher settings.  Motor speeds live in the motor
/// drivers themselves (they survive stop), so only what the hardware cannot
/// report is kept here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Settings {
    pub servo_enabled: bool,
    /// `None` until the operator picks a level.
    pub servo_level: Option<u8>,
    pub motors_enabled: bool,
}

pub struct Router {
    controls: ControlMap,
    servo: ServoConfig,
    motors: MotorConfig,
    settings: Settings,
}

impl Router {
    pub fn new(controls: ControlMap, servo: ServoConfig, motors: MotorConfig) -> Self {
        Self {
            controls,
            servo,
            motors,
            settings: Settings::default(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn controls(&self) -> &ControlMap {
        &self.controls
    }

    // ── Decoding ──────────────────────────────────────────────

    pub fn decode(&self, msg: &Inbound) -> Result<AppCommand, CommandError> {
        match msg {
            Inbound::Control { id, value } => self.decode_control(*id, value),
            Inbound::Broker { topic, payload } => match topic.as_str() {
                topics::POWER => Ok(AppCommand::MotorsEnable(parse_flag(payload)?)),
                topics::CONFIG_IMPORT => Ok(AppCommand::ImportSettings(payload.clone())),
                _ => Err(CommandError::UnknownTopic),
            },
            Inbound::Connected(kind) => Ok(AppCommand::Resync(*kind)),
            Inbound::Disconnected(kind) => Ok(AppCommand::LinkDown(*kind)),
        }
    }

    fn decode_control(&self, id: u8, value: &str) -> Result<AppCommand, CommandError> {
        let c = &self.controls;

        if let Some(channel) = c.channels.iter().position(|ch| ch.button == id) {
            let channel = channel as u8;
            return Ok(if parse_flag(value)? {
                AppCommand::ArmPress { channel }
            } else {
                AppCommand::ArmRelease { channel }
            });
        }

        match id {
            _ if id == c.servo_enable => Ok(AppCommand::ServoEnable(parse_flag(value)?)),
            _ if id == c.servo_level => decode_level(value),
            _ if id == c.motors_enable => Ok(AppCommand::MotorsEnable(parse_flag(value)?)),
            _ if id == c.motor_top_speed => decode_panel(MotorId::Top, value),
            _ if id == c.motor_bottom_speed => decode_panel(MotorId::Bottom, value),
            _ => Err(CommandError::UnknownControl(id)),
        }
    }

    /// Decode one `key:value` entry of a settings import.
    pub fn decode_setting(&self, key: &str, value: &str) -> Result<AppCommand, CommandError> {
        match key {
            "servo" => Ok(AppCommand::ServoEnable(parse_flag(value)?)),
            "servo_level" => decode_level(value),
            "motors" => Ok(AppCommand::MotorsEnable(parse_flag(value)?)),
            "motor_top" => decode_panel(MotorId::Top, value),
            "motor_bottom" => decode_panel(MotorId::Bottom, value),
            _ => Err(CommandError::UnknownKey),
        }
    }

    // ── Applying ──────────────────────────────────────────────

    /// Apply an actuator setting.  Non-setting commands are ignored here.
    pub fn apply(&mut self, cmd: &AppCommand, hw: &mut impl ActuatorPort) {
        match *cmd {
            AppCommand::ServoEnable(true) => {
                let level = self.settings.servo_level.unwrap_or(self.servo.default_level);
                self.settings.servo_level = Some(level);
                self.settings.servo_enabled = true;
                hw.set_servo_speed(self.servo.speed_for_level(level));
            }
            AppCommand::ServoEnable(false) => {
                self.settings.servo_enabled = false;
                hw.set_servo_speed(0);
            }
            AppCommand::ServoLevel(level) => {
                self.settings.servo_level = Some(level);
                if self.settings.servo_enabled {
                    hw.set_servo_speed(self.servo.speed_for_level(level));
                }
            }
            AppCommand::MotorsEnable(true) => {
                self.settings.motors_enabled = true;
                for motor in MotorId::ALL {
                    let configured = hw.motor_state(motor).speed_percent;
                    let speed = if configured > 0.0 {
                        configured
                    } else {
                        self.motors.default_speed_percent
                    };
                    hw.drive_motor(motor, Direction::Forward, speed);
                }
            }
            AppCommand::MotorsEnable(false) => {
                self.settings.motors_enabled = false;
                for motor in MotorId::ALL {
                    hw.stop_motor(motor);
                }
            }
            AppCommand::MotorPanel { motor, panel } => {
                hw.set_motor_speed(motor, self.motors.speed_for_panel(panel));
            }
            _ => debug!("router: {cmd:?} is not an actuator setting"),
        }
    }

    /// Selected level reported outward (0 = none yet).
    pub fn reported_level(&self) -> u8 {
        self.settings.servo_level.unwrap_or(0)
    }

    /// Panel value matching a motor's configured speed.
    pub fn reported_panel(&self, hw: &impl ActuatorPort, motor: MotorId) -> u8 {
        self.motors.panel_for_speed(hw.motor_state(motor).speed_percent)
    }
}

fn decode_level(value: &str) -> Result<AppCommand, CommandError> {
    let level = parse_in_range(value, 1, SERVO_LEVELS as i32)?;
    Ok(AppCommand::ServoLevel(level as u8))
}

fn decode_panel(motor: MotorId, value: &str) -> Result<AppCommand, CommandError> {
    let panel = parse_in_range(value, 1, PANEL_MAX)?;
    Ok(AppCommand::MotorPanel { motor, panel: panel as u8 })
}
