//! One-shot hardware peripheral initialization.
//!
//! Checks the pin map, configures the LEDC timers/channels and GPIO
//! outputs, and hands back a ready [`HardwareAdapter`] with every actuator
//! in its safe state.  Called once from `main()` before the loop starts;
//! any failure here is fatal.

use crate::config::{MotorPins, PinMap};
use crate::error::ActuatorError;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    /// GPIO does not exist or cannot drive an output.
    InvalidPin(i32),
    /// The same GPIO is assigned to two functions.
    DuplicatePin(i32),
    GpioConfigFailed(i32),
    LedcInitFailed,
    /// Driving the initial safe state failed.
    Actuator(ActuatorError),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidPin(pin)       => write!(f, "GPIO{} cannot be used as an output", pin),
            Self::DuplicatePin(pin)     => write!(f, "GPIO{} assigned twice", pin),
            Self::GpioConfigFailed(pin) => write!(f, "GPIO{} config failed", pin),
            Self::LedcInitFailed        => write!(f, "LEDC timer/channel config failed"),
            Self::Actuator(e)           => write!(f, "initial safe state failed: {}", e),
        }
    }
}

impl std::error::Error for HwInitError {}

impl From<ActuatorError> for HwInitError {
    fn from(e: ActuatorError) -> Self {
        Self::Actuator(e)
    }
}

// ── Pin map validation ────────────────────────────────────────

/// ESP32 GPIOs usable as outputs: 0..=33 minus the SPI-flash pins 6..=11.
/// 34..=39 are input-only.
pub fn is_output_capable(gpio: i32) -> bool {
    (0..=33).contains(&gpio) && !(6..=11).contains(&gpio)
}

/// Reject pin maps that would short two functions together or use a pin
/// that cannot drive.
pub fn check_pin_map(map: &PinMap) -> Result<(), HwInitError> {
    let motor = |m: &MotorPins| [m.in1, m.in2, m.pwm];
    let [a1, a2, ap] = motor(&map.motor_top);
    let [b1, b2, bp] = motor(&map.motor_bottom);
    let all = [a1, a2, ap, b1, b2, bp, map.servo, map.feeder];

    for (i, &pin) in all.iter().enumerate() {
        if !is_output_capable(pin) {
            return Err(HwInitError::InvalidPin(pin));
        }
        if all[..i].contains(&pin) {
            return Err(HwInitError::DuplicatePin(pin));
        }
    }
    Ok(())
}

// ── ESP-IDF construction ──────────────────────────────────────

#[cfg(feature = "espidf")]
pub use esp::{EspHardware, EspPin, EspPwm, init_hardware};

#[cfg(feature = "espidf")]
mod esp {
    use esp_idf_hal::gpio::{AnyOutputPin, Output, PinDriver};
    use esp_idf_hal::ledc::config::TimerConfig;
    use esp_idf_hal::ledc::{LEDC, LedcDriver, LedcTimerDriver, Resolution};
    use esp_idf_hal::units::FromValueType;
    use log::info;

    use super::{HwInitError, check_pin_map};
    use crate::adapters::hardware::HardwareAdapter;
    use crate::config::LauncherConfig;
    use crate::drivers::feeder::Feeder;
    use crate::drivers::motor::DcMotor;
    use crate::drivers::servo::ContinuousServo;
    use crate::pins;

    pub type EspPin = PinDriver<'static, AnyOutputPin, Output>;
    pub type EspPwm = LedcDriver<'static>;
    pub type EspHardware = HardwareAdapter<EspPin, EspPwm>;

    fn output(gpio: i32) -> Result<EspPin, HwInitError> {
        // SAFETY: check_pin_map has verified the GPIO exists, is output
        // capable and is claimed by exactly one function.
        let pin = unsafe { AnyOutputPin::new(gpio) };
        PinDriver::output(pin).map_err(|_| HwInitError::GpioConfigFailed(gpio))
    }

    pub fn init_hardware(ledc: LEDC, cfg: &LauncherConfig) -> Result<EspHardware, HwInitError> {
        let map = &cfg.pins;
        check_pin_map(map)?;

        // Timers live for the whole program; the channels borrow them.
        let motor_timer = LedcTimerDriver::new(
            ledc.timer0,
            &TimerConfig::default()
                .frequency(cfg.motors.pwm_freq_hz.Hz().into())
                .resolution(Resolution::Bits10),
        )
        .map_err(|_| HwInitError::LedcInitFailed)?;
        let motor_timer = Box::leak(Box::new(motor_timer));

        let servo_timer = LedcTimerDriver::new(
            ledc.timer1,
            &TimerConfig::default()
                .frequency(pins::SERVO_PWM_FREQ_HZ.Hz().into())
                .resolution(Resolution::Bits14),
        )
        .map_err(|_| HwInitError::LedcInitFailed)?;
        let servo_timer = Box::leak(Box::new(servo_timer));

        // SAFETY: as for `output`; each LEDC channel gets a distinct GPIO.
        let pwm_a = LedcDriver::new(ledc.channel0, &*motor_timer, unsafe {
            AnyOutputPin::new(map.motor_top.pwm)
        })
        .map_err(|_| HwInitError::LedcInitFailed)?;
        let pwm_b = LedcDriver::new(ledc.channel1, &*motor_timer, unsafe {
            AnyOutputPin::new(map.motor_bottom.pwm)
        })
        .map_err(|_| HwInitError::LedcInitFailed)?;
        let pwm_servo = LedcDriver::new(ledc.channel2, &*servo_timer, unsafe {
            AnyOutputPin::new(map.servo)
        })
        .map_err(|_| HwInitError::LedcInitFailed)?;

        let top = DcMotor::new(output(map.motor_top.in1)?, output(map.motor_top.in2)?, pwm_a)?;
        let bottom = DcMotor::new(output(map.motor_bottom.in1)?, output(map.motor_bottom.in2)?, pwm_b)?;
        let servo = ContinuousServo::new(pwm_servo, cfg.servo.pulse)?;
        let feeder = Feeder::new(output(map.feeder)?)?;

        info!("hw_init: motors, servo and feeder configured");
        Ok(HardwareAdapter::new(top, bottom, servo, feeder))
    }
}
