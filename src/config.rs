//! System configuration parameters
//!
//! All tunable parameters for the pongBot launcher.  Differences between
//! deployed launcher variants (speed tables, panel scaling, servo
//! direction, pin wiring, control IDs) live here rather than in code.
//! Configuration is in-memory only.  [`LauncherConfig::load`] builds the boot
//! configuration from the defaults or from a JSON override baked into the
//! firmware image.

use heapless::{String, Vec};
use serde::{Deserialize, Serialize};

use crate::arming::MAX_CHANNELS;
use crate::drivers::hw_init::check_pin_map;
use crate::error::{self, ConfigError};
use crate::pins;

/// Number of discrete servo speed levels selectable from the dashboard.
pub const SERVO_LEVELS: usize = 5;

/// Core launcher configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherConfig {
    pub arming: ArmingConfig,
    pub controls: ControlMap,
    pub servo: ServoConfig,
    pub motors: MotorConfig,
    pub pins: PinMap,
    pub broker: BrokerConfig,
    /// Control loop period (milliseconds).  Bounds the latency between
    /// hold expiry and feeder release.
    pub loop_period_ms: u32,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            arming: ArmingConfig::default(),
            controls: ControlMap::default(),
            servo: ServoConfig::default(),
            motors: MotorConfig::default(),
            pins: PinMap::default(),
            broker: BrokerConfig::default(),
            loop_period_ms: 10,
        }
    }
}

impl LauncherConfig {
    /// Boot configuration: `override_json` when given, the defaults
    /// otherwise.  Either way the result is validated, pin map included.
    pub fn load(override_json: Option<&str>) -> error::Result<Self> {
        let config = match override_json {
            Some(json) => Self::from_json(json)?,
            None => {
                let config = Self::default();
                config.validate()?;
                config
            }
        };
        check_pin_map(&config.pins)?;
        Ok(config)
    }

    /// Parse a JSON override and validate it.  Missing fields take their
    /// defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|_| ConfigError::Corrupted)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject out-of-range values.  Nothing is clamped: a bad field fails the
    /// whole config.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.arming.validate()?;
        self.controls.validate()?;
        self.servo.validate()?;
        self.motors.validate()?;
        if !(1..=100).contains(&self.loop_period_ms) {
            return Err(ConfigError::ValidationFailed("loop_period_ms must be 1..=100"));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Arming timings
// ---------------------------------------------------------------------------

/// Long-press arming timings, shared by every channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArmingConfig {
    /// Continuous hold required before the launcher fires.
    pub long_press_ms: u32,
    /// Feeder dwell after firing before the channel auto-resets.
    pub hold_ms: u32,
    /// Minimum spacing between progress reports.
    pub progress_interval_ms: u32,
}

impl Default for ArmingConfig {
    fn default() -> Self {
        Self {
            long_press_ms: 3000,
            hold_ms: 3000,
            progress_interval_ms: 30,
        }
    }
}

impl ArmingConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.long_press_ms == 0 {
            return Err(ConfigError::ValidationFailed("long_press_ms must be > 0"));
        }
        if self.hold_ms == 0 {
            return Err(ConfigError::ValidationFailed("hold_ms must be > 0"));
        }
        if self.progress_interval_ms == 0 || self.progress_interval_ms >= self.long_press_ms {
            return Err(ConfigError::ValidationFailed(
                "progress_interval_ms must be 1..long_press_ms",
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Dashboard control IDs
// ---------------------------------------------------------------------------

/// Dashboard virtual pins belonging to one arming channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelControls {
    /// Push button: inbound pressed/released, outbound "fired" 0/1.
    pub button: u8,
    /// Radial gauge: outbound progress 0–100.
    pub gauge: u8,
    /// Label: outbound "True"/"False" status flag.
    pub status: u8,
}

/// Mapping from dashboard virtual pins to launcher functions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlMap {
    pub servo_enable: u8,
    pub servo_level: u8,
    pub motors_enable: u8,
    pub motor_top_speed: u8,
    pub motor_bottom_speed: u8,
    pub channels: Vec<ChannelControls, MAX_CHANNELS>,
}

impl Default for ControlMap {
    fn default() -> Self {
        let mut channels = Vec::new();
        let _ = channels.push(ChannelControls { button: 10, gauge: 11, status: 14 });
        let _ = channels.push(ChannelControls { button: 12, gauge: 13, status: 15 });
        Self {
            servo_enable: 0,
            servo_level: 1,
            motors_enable: 2,
            motor_top_speed: 3,
            motor_bottom_speed: 4,
            channels,
        }
    }
}

impl ControlMap {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.channels.is_empty() {
            return Err(ConfigError::ValidationFailed("at least one arming channel required"));
        }

        let mut seen: Vec<u8, { 5 + 3 * MAX_CHANNELS }> = Vec::new();
        let fixed = [
            self.servo_enable,
            self.servo_level,
            self.motors_enable,
            self.motor_top_speed,
            self.motor_bottom_speed,
        ];
        let per_channel = self
            .channels
            .iter()
            .flat_map(|c| [c.button, c.gauge, c.status]);

        for id in fixed.into_iter().chain(per_channel) {
            if seen.contains(&id) {
                return Err(ConfigError::ValidationFailed("control IDs must be unique"));
            }
            // Capacity matches the number of IDs, so this cannot fail.
            let _ = seen.push(id);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Servo
// ---------------------------------------------------------------------------

/// Pulse-width bounds for a continuous-rotation servo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServoPulse {
    /// Pulse at full reverse (−100).
    pub min_us: u32,
    /// Pulse at standstill (0).
    pub center_us: u32,
    /// Pulse at full forward (+100).
    pub max_us: u32,
    /// Frame period (20 000 µs for 50 Hz).
    pub period_us: u32,
}

impl Default for ServoPulse {
    fn default() -> Self {
        Self {
            min_us: 500,
            center_us: 1500,
            max_us: 2500,
            period_us: 20_000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServoConfig {
    /// Rotation speed (%) for dashboard levels 1..=5.
    pub speed_table: [u8; SERVO_LEVELS],
    /// Level used when the servo is enabled before any level was chosen.
    pub default_level: u8,
    /// Mount is mirrored: positive table speeds rotate the other way.
    pub reversed: bool,
    pub pulse: ServoPulse,
}

impl Default for ServoConfig {
    fn default() -> Self {
        Self {
            speed_table: [30, 50, 70, 90, 100],
            default_level: 1,
            reversed: false,
            pulse: ServoPulse::default(),
        }
    }
}

impl ServoConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.speed_table.iter().any(|&s| s == 0 || s > 100) {
            return Err(ConfigError::ValidationFailed("servo speed_table entries must be 1..=100"));
        }
        if !(1..=SERVO_LEVELS as u8).contains(&self.default_level) {
            return Err(ConfigError::ValidationFailed("servo default_level must be 1..=5"));
        }
        let p = &self.pulse;
        if !(p.min_us < p.center_us && p.center_us < p.max_us && p.max_us < p.period_us) {
            return Err(ConfigError::ValidationFailed(
                "servo pulse must satisfy min < center < max < period",
            ));
        }
        Ok(())
    }

    /// Rotation speed for a level.  Levels outside `1..=SERVO_LEVELS` are
    /// clamped; the router rejects them before they get here.
    pub fn speed_for_level(&self, level: u8) -> i8 {
        let idx = usize::from(level.clamp(1, SERVO_LEVELS as u8) - 1);
        let speed = self.speed_table[idx].min(100) as i8;
        if self.reversed { -speed } else { speed }
    }
}

// ---------------------------------------------------------------------------
// Drive motors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotorConfig {
    /// Dashboard panel (1..=100) to speed (%) factor.
    pub panel_scale: f32,
    /// Speed used when the motors are enabled with no speed set.
    pub default_speed_percent: f32,
    pub pwm_freq_hz: u32,
}

impl Default for MotorConfig {
    fn default() -> Self {
        Self {
            panel_scale: 0.5,
            default_speed_percent: 25.0,
            pwm_freq_hz: pins::MOTOR_PWM_FREQ_HZ,
        }
    }
}

impl MotorConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.panel_scale > 0.0 && self.panel_scale <= 1.0) {
            return Err(ConfigError::ValidationFailed("motor panel_scale must be in (0, 1]"));
        }
        if !(self.default_speed_percent > 0.0 && self.default_speed_percent <= 100.0) {
            return Err(ConfigError::ValidationFailed(
                "motor default_speed_percent must be in (0, 100]",
            ));
        }
        Ok(())
    }

    /// Speed (%) for a validated dashboard panel value.
    pub fn speed_for_panel(&self, panel: u8) -> f32 {
        f32::from(panel) * self.panel_scale
    }

    /// Panel value that reproduces `speed_percent`, for reporting state.
    pub fn panel_for_speed(&self, speed_percent: f32) -> u8 {
        (speed_percent / self.panel_scale).round().clamp(0.0, 100.0) as u8
    }
}

// ---------------------------------------------------------------------------
// Pin map
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotorPins {
    pub in1: i32,
    pub in2: i32,
    pub pwm: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PinMap {
    pub motor_top: MotorPins,
    pub motor_bottom: MotorPins,
    pub servo: i32,
    pub feeder: i32,
}

impl Default for PinMap {
    fn default() -> Self {
        Self {
            motor_top: MotorPins {
                in1: pins::MOTOR_A_IN1_GPIO,
                in2: pins::MOTOR_A_IN2_GPIO,
                pwm: pins::MOTOR_A_PWM_GPIO,
            },
            motor_bottom: MotorPins {
                in1: pins::MOTOR_B_IN1_GPIO,
                in2: pins::MOTOR_B_IN2_GPIO,
                pwm: pins::MOTOR_B_PWM_GPIO,
            },
            servo: pins::SERVO_PWM_GPIO,
            feeder: pins::FEEDER_GPIO,
        }
    }
}

// ---------------------------------------------------------------------------
// Broker
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrokerConfig {
    pub url: String<64>,
    pub client_id: String<32>,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        let mut url = String::new();
        let _ = url.push_str("mqtt://broker.hivemq.com:1883");
        let mut client_id = String::new();
        let _ = client_id.push_str("pongBot");
        Self { url, client_id }
    }
}
