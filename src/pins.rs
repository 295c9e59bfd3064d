//! Default GPIO / peripheral assignments for the pongBot launcher board.
//!
//! These seed [`PinMap::default`](crate::config::PinMap); a deployment with
//! different wiring overrides the map in config rather than editing drivers.

// ---------------------------------------------------------------------------
// Drive motors (TB6612FNG dual H-bridge)
// ---------------------------------------------------------------------------

/// Motor A (top wheel) direction line 1: AIN1 (D1).
pub const MOTOR_A_IN1_GPIO: i32 = 5;
/// Motor A direction line 2: AIN2 (D2).
pub const MOTOR_A_IN2_GPIO: i32 = 4;
/// Motor A speed PWM: PWMA (D5).
pub const MOTOR_A_PWM_GPIO: i32 = 14;

/// Motor B (bottom wheel) direction line 1: BIN1 (D6).
pub const MOTOR_B_IN1_GPIO: i32 = 12;
/// Motor B direction line 2: BIN2 (D7).
pub const MOTOR_B_IN2_GPIO: i32 = 13;
/// Motor B speed PWM: PWMB (D8).
pub const MOTOR_B_PWM_GPIO: i32 = 15;

// ---------------------------------------------------------------------------
// Continuous-rotation servo (launcher head sweep)
// ---------------------------------------------------------------------------

/// Servo signal line (D3).
pub const SERVO_PWM_GPIO: i32 = 0;

// ---------------------------------------------------------------------------
// Feeder solenoid / relay
// ---------------------------------------------------------------------------

/// Digital output: HIGH = feeder energised.
/// AIN1 already occupies GPIO5, so the feeder relay sits on D4.
pub const FEEDER_GPIO: i32 = 2;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// Drive motor PWM carrier frequency.
pub const MOTOR_PWM_FREQ_HZ: u32 = 1_000;
/// Servo frame rate (20 ms period).
pub const SERVO_PWM_FREQ_HZ: u32 = 50;
