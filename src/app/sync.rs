//! Synchronization bridge between the launcher and its two remotes.
//!
//! The launcher is the single source of truth.  Whenever a remote
//! (re)connects it gets the full current state; the broker also gets a
//! snapshot on every fire so logging clients can record what was launched
//! with which settings.

use heapless::Vec;
use log::warn;
use serde::Serialize;

use crate::arming::{ArmingEngine, MAX_CHANNELS};
use crate::config::ControlMap;
use crate::error::CommandError;
use crate::remote::codec::{flag_payload, to_payload};
use crate::remote::{Outbox, WireValue, post_broker, post_dashboard, topics};

use super::ports::{ActuatorPort, MotorId};
use super::router::Router;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChannelSnapshot {
    pub channel: u8,
    pub fired: bool,
    pub progress: u8,
    pub status: bool,
}

/// Point-in-time view of everything a remote can display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LauncherSnapshot {
    pub servo_enabled: bool,
    /// 0 = no level selected yet.
    pub servo_level: u8,
    pub servo_speed: i8,
    pub motors_enabled: bool,
    /// Panel units (1–100), matching the dashboard sliders.
    pub motor_top: u8,
    pub motor_bottom: u8,
    pub feeder: bool,
    pub channels: Vec<ChannelSnapshot, MAX_CHANNELS>,
}

impl LauncherSnapshot {
    pub fn capture(router: &Router, engine: &ArmingEngine, hw: &impl ActuatorPort) -> Self {
        let settings = router.settings();
        let channels = engine
            .channels()
            .iter()
            .map(|c| ChannelSnapshot {
                channel: c.channel_id(),
                fired: c.fired_indicator(),
                progress: c.progress(),
                status: c.status_flag(),
            })
            .collect();

        Self {
            servo_enabled: settings.servo_enabled,
            servo_level: router.reported_level(),
            servo_speed: hw.servo_state().rotation_speed_percent,
            motors_enabled: settings.motors_enabled,
            motor_top: router.reported_panel(hw, MotorId::Top),
            motor_bottom: router.reported_panel(hw, MotorId::Bottom),
            feeder: hw.is_feeder_on(),
            channels,
        }
    }
}

// ── Dashboard ─────────────────────────────────────────────────

/// Write the actuator settings controls.
pub fn mirror_settings(snap: &LauncherSnapshot, controls: &ControlMap, outbox: &mut Outbox) {
    post_dashboard(outbox, controls.servo_enable, WireValue::Int(snap.servo_enabled.into()));
    post_dashboard(outbox, controls.servo_level, WireValue::Int(snap.servo_level.into()));
    post_dashboard(outbox, controls.motors_enable, WireValue::Int(snap.motors_enabled.into()));
    post_dashboard(outbox, controls.motor_top_speed, WireValue::Int(snap.motor_top.into()));
    post_dashboard(outbox, controls.motor_bottom_speed, WireValue::Int(snap.motor_bottom.into()));
}

/// Full dashboard resync: settings plus every channel's button, gauge and label.
pub fn resync_dashboard(snap: &LauncherSnapshot, controls: &ControlMap, outbox: &mut Outbox) {
    mirror_settings(snap, controls, outbox);
    for (ch, ids) in snap.channels.iter().zip(controls.channels.iter()) {
        post_dashboard(outbox, ids.button, WireValue::Int(ch.fired.into()));
        post_dashboard(outbox, ids.gauge, WireValue::Int(ch.progress.into()));
        post_dashboard(outbox, ids.status, WireValue::Flag(ch.status));
    }
}

// ── Broker ────────────────────────────────────────────────────

/// Full broker resync.
pub fn resync_broker(snap: &LauncherSnapshot, outbox: &mut Outbox) {
    post_broker(outbox, topics::SERVO_ENABLED, &flag_payload(snap.servo_enabled));
    post_broker(outbox, topics::MOTORS_ENABLED, &flag_payload(snap.motors_enabled));
    publish_fire(snap, outbox);
}

/// Published on every fire: the settings the ball was launched with.
pub fn publish_fire(snap: &LauncherSnapshot, outbox: &mut Outbox) {
    post_broker(outbox, topics::SERVO_LEVEL, &to_payload(WireValue::Int(snap.servo_level.into())));
    post_broker(outbox, topics::MOTOR_TOP, &to_payload(WireValue::Int(snap.motor_top.into())));
    post_broker(outbox, topics::MOTOR_BOTTOM, &to_payload(WireValue::Int(snap.motor_bottom.into())));
    match serde_json::to_string(snap) {
        Ok(json) => post_broker(outbox, topics::STATE, &json),
        Err(e) => warn!("sync: state snapshot encode failed: {e}"),
    }
}

// ── Settings import ───────────────────────────────────────────

/// One entry of a `key:value` import block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportEntry<'a> {
    pub key: &'a str,
    pub value: &'a str,
}

/// Split an import block into entries.  Entries are separated by newlines
/// or commas; key and value by `:` or `=`.  Blank entries are skipped.
pub fn parse_import(block: &str) -> impl Iterator<Item = Result<ImportEntry<'_>, CommandError>> {
    block
        .split(|c: char| c == '\n' || c == ',')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            let (key, value) = line
                .split_once(|c: char| c == ':' || c == '=')
                .ok_or(CommandError::Malformed)?;
            let key = key.trim();
            if key.is_empty() {
                return Err(CommandError::Malformed);
            }
            Ok(ImportEntry { key, value: value.trim() })
        })
}
