//! Value encodings used on the wire.
//!
//! Dashboard switches send `"0"`/`"1"`, sliders send integers (some apps
//! send `"50.0"`), the broker power topic also accepts `"on"`/`"off"`.
//! Parsing is strict about range and lenient only about surrounding
//! whitespace and case.

use core::fmt::Write as _;

use crate::error::CommandError;

use super::{Payload, WireValue};

/// Parse a boolean switch value.
pub fn parse_flag(raw: &str) -> Result<bool, CommandError> {
    let s = raw.trim();
    if s == "1" || s.eq_ignore_ascii_case("on") || s.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if s == "0" || s.eq_ignore_ascii_case("off") || s.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(CommandError::Malformed)
    }
}

/// Parse an integer value.  Integral floats (`"50.0"`) are accepted.
pub fn parse_int(raw: &str) -> Result<i32, CommandError> {
    let s = raw.trim();
    if let Ok(v) = s.parse::<i32>() {
        return Ok(v);
    }
    match s.parse::<f32>() {
        Ok(f) if f.is_finite() && f.fract() == 0.0 && f.abs() <= 1.0e9 => Ok(f as i32),
        _ => Err(CommandError::Malformed),
    }
}

/// Parse an integer and require it to fall in `min..=max`.
pub fn parse_in_range(raw: &str, min: i32, max: i32) -> Result<i32, CommandError> {
    let value = parse_int(raw)?;
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(CommandError::OutOfRange { value, min, max })
    }
}

/// Render a dashboard value as a broker payload.
pub fn to_payload(value: WireValue) -> Payload {
    let mut out = Payload::new();
    // A rendered WireValue is at most 11 bytes.
    let _ = write!(out, "{value}");
    out
}

/// Render a switch for the broker ("1"/"0").
pub fn flag_payload(on: bool) -> Payload {
    to_payload(WireValue::Int(i32::from(on)))
}
