//! Broker topic names.

/// Published: selected servo level 0–5 (0 = none selected).
pub const SERVO_LEVEL: &str = "pongBot/servo/level";
/// Published: servo enable "1"/"0".
pub const SERVO_ENABLED: &str = "pongBot/servo/enabled";
/// Published: top motor speed in panel units 0–100.
pub const MOTOR_TOP: &str = "pongBot/motor/top";
/// Published: bottom motor speed in panel units 0–100.
pub const MOTOR_BOTTOM: &str = "pongBot/motor/bottom";
/// Published: drive motors enable "1"/"0".
pub const MOTORS_ENABLED: &str = "pongBot/motor/enabled";
/// Published: JSON snapshot of the whole launcher.
pub const STATE: &str = "pongBot/state";

/// Subscribed: `key:value` settings block.
pub const CONFIG_IMPORT: &str = "pongBot/config/import";
/// Subscribed: drive motors on/off.
pub const POWER: &str = "pongBot/power";

/// Topics the broker adapter subscribes to after connecting.
pub const SUBSCRIPTIONS: [&str; 2] = [CONFIG_IMPORT, POWER];
