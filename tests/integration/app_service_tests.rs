//! Integration tests for the inbound → AppService → actuators pipeline.
//!
//! These run on the host and drive the service exactly as the control loop
//! does: one `handle` per inbound message, one `tick` per pass, asserting
//! on actuator calls, emitted events and the returned outbox.

use pongbot::app::commands::AppCommand;
use pongbot::app::events::AppEvent;
use pongbot::app::ports::{ActuatorPort, MotorId};
use pongbot::app::service::AppService;
use pongbot::config::LauncherConfig;
use pongbot::drivers::motor::Direction;
use pongbot::error::CommandError;
use pongbot::remote::topics;
use pongbot::remote::{Inbound, Outbound, RemoteKind, WireValue};

use super::mock_hw::{
    ActuatorCall, MockHardware, RecordingSink, broker, control, last_dashboard, published,
};

// Default dashboard IDs.
const SERVO_ENABLE: u8 = 0;
const SERVO_LEVEL: u8 = 1;
const MOTORS_ENABLE: u8 = 2;
const MOTOR_TOP: u8 = 3;
const MOTOR_BOTTOM: u8 = 4;
const CH0_BUTTON: u8 = 10;
const CH0_GAUGE: u8 = 11;
const CH0_STATUS: u8 = 14;
const CH1_BUTTON: u8 = 12;
const CH1_STATUS: u8 = 15;

fn make_app() -> (AppService, MockHardware, RecordingSink) {
    let mut app = AppService::new(LauncherConfig::default());
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    app.start(&mut hw, &mut sink);
    (app, hw, sink)
}

fn handle(
    app: &mut AppService,
    hw: &mut MockHardware,
    sink: &mut RecordingSink,
    msg: Inbound,
    now: u32,
) -> Vec<Outbound> {
    app.handle(&msg, now, hw, sink).into_iter().collect()
}

fn tick(app: &mut AppService, hw: &mut MockHardware, sink: &mut RecordingSink, now: u32) -> Vec<Outbound> {
    app.tick(now, hw, sink).into_iter().collect()
}

// ── Lifecycle ─────────────────────────────────────────────────

#[test]
fn start_drives_everything_off_and_announces_channels() {
    let (_app, hw, sink) = make_app();
    assert_eq!(hw.calls, [ActuatorCall::AllOff]);
    assert_eq!(sink.events, [AppEvent::Started { channels: 2 }]);
}

#[test]
fn shutdown_is_idempotent_and_releases_feeder() {
    let (mut app, mut hw, mut sink) = make_app();
    handle(&mut app, &mut hw, &mut sink, control(CH0_BUTTON, "1"), 0);
    tick(&mut app, &mut hw, &mut sink, 3000);
    assert!(hw.is_feeder_on());

    app.shutdown(3100, &mut hw, &mut sink);
    app.shutdown(3200, &mut hw, &mut sink);

    assert!(!hw.is_feeder_on());
    assert!(app.is_shut_down());
    assert!(!app.engine().any_triggered());
    assert_eq!(sink.count(|e| *e == AppEvent::Shutdown), 1);
}

// ── Fire cycle ────────────────────────────────────────────────

#[test]
fn press_fire_release_reset_cycle() {
    let (mut app, mut hw, mut sink) = make_app();

    let out = handle(&mut app, &mut hw, &mut sink, control(CH0_BUTTON, "1"), 0);
    assert_eq!(last_dashboard(&out, CH0_GAUGE), Some(WireValue::Int(0)));
    assert_eq!(last_dashboard(&out, CH0_BUTTON), Some(WireValue::Int(0)));

    let out = tick(&mut app, &mut hw, &mut sink, 2999);
    assert!(!hw.is_feeder_on());
    assert!(published(&out, topics::SERVO_LEVEL).is_empty());

    let out = tick(&mut app, &mut hw, &mut sink, 3000);
    assert!(hw.is_feeder_on());
    assert_eq!(last_dashboard(&out, CH0_BUTTON), Some(WireValue::Int(1)));
    assert_eq!(last_dashboard(&out, CH0_STATUS), Some(WireValue::Flag(true)));
    assert_eq!(published(&out, topics::SERVO_LEVEL), ["0"]);
    assert_eq!(published(&out, topics::MOTOR_TOP), ["0"]);
    assert_eq!(published(&out, topics::MOTOR_BOTTOM), ["0"]);
    assert_eq!(published(&out, topics::STATE).len(), 1);
    assert_eq!(sink.count(|e| *e == AppEvent::Fired { channel: 0 }), 1);

    // Release during the hold re-asserts the fired indicator.
    let out = handle(&mut app, &mut hw, &mut sink, control(CH0_BUTTON, "0"), 3100);
    assert_eq!(last_dashboard(&out, CH0_BUTTON), Some(WireValue::Int(1)));
    assert!(hw.is_feeder_on());

    tick(&mut app, &mut hw, &mut sink, 5999);
    assert!(hw.is_feeder_on());

    let out = tick(&mut app, &mut hw, &mut sink, 6000);
    assert!(!hw.is_feeder_on());
    assert_eq!(last_dashboard(&out, CH0_GAUGE), Some(WireValue::Int(0)));
    assert_eq!(last_dashboard(&out, CH0_BUTTON), Some(WireValue::Int(0)));
    assert_eq!(sink.count(|e| *e == AppEvent::HoldReleased { channel: 0 }), 1);
    assert_eq!(hw.feeder_switches(), [true, false]);
}

#[test]
fn early_release_never_fires() {
    let (mut app, mut hw, mut sink) = make_app();
    handle(&mut app, &mut hw, &mut sink, control(CH0_BUTTON, "1"), 0);
    let out = handle(&mut app, &mut hw, &mut sink, control(CH0_BUTTON, "0"), 2999);
    assert_eq!(last_dashboard(&out, CH0_GAUGE), Some(WireValue::Int(0)));

    for now in (3000..9000).step_by(10) {
        tick(&mut app, &mut hw, &mut sink, now);
    }
    assert!(hw.feeder_switches().is_empty());
    assert_eq!(sink.count(|e| matches!(e, AppEvent::Fired { .. })), 0);
}

#[test]
fn fire_reports_current_settings() {
    let (mut app, mut hw, mut sink) = make_app();
    handle(&mut app, &mut hw, &mut sink, control(SERVO_LEVEL, "4"), 0);
    handle(&mut app, &mut hw, &mut sink, control(MOTOR_TOP, "60"), 0);
    handle(&mut app, &mut hw, &mut sink, control(MOTOR_BOTTOM, "40"), 0);
    handle(&mut app, &mut hw, &mut sink, control(CH1_BUTTON, "1"), 10);

    let out = tick(&mut app, &mut hw, &mut sink, 3010);
    assert_eq!(published(&out, topics::SERVO_LEVEL), ["4"]);
    assert_eq!(published(&out, topics::MOTOR_TOP), ["60"]);
    assert_eq!(published(&out, topics::MOTOR_BOTTOM), ["40"]);

    let state = &published(&out, topics::STATE)[0];
    let json: serde_json::Value = serde_json::from_str(state).unwrap();
    assert_eq!(json["feeder"], true);
    assert_eq!(json["channels"][1]["status"], true);
    assert_eq!(json["channels"][0]["status"], false);
}

#[test]
fn two_channels_share_the_feeder() {
    let (mut app, mut hw, mut sink) = make_app();
    handle(&mut app, &mut hw, &mut sink, control(CH0_BUTTON, "1"), 0);
    handle(&mut app, &mut hw, &mut sink, control(CH1_BUTTON, "1"), 1000);

    tick(&mut app, &mut hw, &mut sink, 3000);
    tick(&mut app, &mut hw, &mut sink, 4000);
    assert!(app.engine().channel(0).unwrap().is_triggered());
    assert!(app.engine().channel(1).unwrap().is_triggered());

    // Channel 0's hold ends first; channel 1 still holds the feeder.
    tick(&mut app, &mut hw, &mut sink, 6000);
    assert!(hw.is_feeder_on());

    tick(&mut app, &mut hw, &mut sink, 7000);
    assert!(!hw.is_feeder_on());
}

// ── Settings ──────────────────────────────────────────────────

#[test]
fn servo_enable_uses_default_level_until_one_is_chosen() {
    let (mut app, mut hw, mut sink) = make_app();
    handle(&mut app, &mut hw, &mut sink, control(SERVO_ENABLE, "1"), 0);
    assert_eq!(hw.servo_state().rotation_speed_percent, 30);
    assert_eq!(app.settings().servo_level, Some(1));

    handle(&mut app, &mut hw, &mut sink, control(SERVO_LEVEL, "5"), 0);
    assert_eq!(hw.servo_state().rotation_speed_percent, 100);

    handle(&mut app, &mut hw, &mut sink, control(SERVO_ENABLE, "0"), 0);
    assert_eq!(hw.servo_state().rotation_speed_percent, 0);
    assert_eq!(app.settings().servo_level, Some(5));
}

#[test]
fn level_out_of_range_is_rejected_without_side_effects() {
    let (mut app, mut hw, mut sink) = make_app();
    let before = hw.calls.len();

    for bad in ["0", "6", "x"] {
        let out = handle(&mut app, &mut hw, &mut sink, control(SERVO_LEVEL, bad), 0);
        assert!(out.is_empty());
    }

    assert_eq!(hw.calls.len(), before);
    assert_eq!(app.settings().servo_level, None);
    assert_eq!(
        sink.events[1],
        AppEvent::CommandRejected(CommandError::OutOfRange { value: 0, min: 1, max: 5 })
    );
    assert_eq!(sink.count(|e| matches!(e, AppEvent::CommandRejected(_))), 3);
}

#[test]
fn motors_enable_resumes_configured_speed_or_default() {
    let (mut app, mut hw, mut sink) = make_app();

    handle(&mut app, &mut hw, &mut sink, control(MOTORS_ENABLE, "1"), 0);
    let top = hw.motor_state(MotorId::Top);
    assert!(top.is_running);
    assert_eq!(top.direction, Direction::Forward);
    assert_eq!(top.speed_percent, 25.0);

    handle(&mut app, &mut hw, &mut sink, control(MOTOR_TOP, "80"), 0);
    assert_eq!(hw.motor_state(MotorId::Top).speed_percent, 40.0);

    handle(&mut app, &mut hw, &mut sink, control(MOTORS_ENABLE, "0"), 0);
    assert!(!hw.motor_state(MotorId::Top).is_running);

    handle(&mut app, &mut hw, &mut sink, control(MOTORS_ENABLE, "1"), 0);
    assert_eq!(hw.motor_state(MotorId::Top).speed_percent, 40.0);
    assert_eq!(hw.motor_state(MotorId::Bottom).speed_percent, 25.0);
}

#[test]
fn panel_change_while_stopped_only_stores_speed() {
    let (mut app, mut hw, mut sink) = make_app();
    handle(&mut app, &mut hw, &mut sink, control(MOTOR_BOTTOM, "50"), 0);
    let bottom = hw.motor_state(MotorId::Bottom);
    assert!(!bottom.is_running);
    assert_eq!(bottom.speed_percent, 25.0);
}

#[test]
fn accepted_setting_clears_every_status_label() {
    let (mut app, mut hw, mut sink) = make_app();
    handle(&mut app, &mut hw, &mut sink, control(CH0_BUTTON, "1"), 0);
    tick(&mut app, &mut hw, &mut sink, 3000);
    assert!(app.engine().channel(0).unwrap().status_flag());

    let out = handle(&mut app, &mut hw, &mut sink, control(SERVO_LEVEL, "2"), 3100);
    assert_eq!(last_dashboard(&out, CH0_STATUS), Some(WireValue::Flag(false)));
    assert_eq!(last_dashboard(&out, CH1_STATUS), Some(WireValue::Flag(false)));
    assert!(!app.engine().channel(0).unwrap().status_flag());
    // The hold itself is unaffected.
    assert!(hw.is_feeder_on());
}

#[test]
fn status_label_survives_reset_and_early_release_of_partner() {
    let (mut app, mut hw, mut sink) = make_app();
    handle(&mut app, &mut hw, &mut sink, control(CH0_BUTTON, "1"), 0);
    tick(&mut app, &mut hw, &mut sink, 3000);
    tick(&mut app, &mut hw, &mut sink, 6000);

    handle(&mut app, &mut hw, &mut sink, control(CH1_BUTTON, "1"), 6100);
    handle(&mut app, &mut hw, &mut sink, control(CH1_BUTTON, "0"), 6200);

    assert!(app.engine().channel(0).unwrap().status_flag());
}

// ── Broker ────────────────────────────────────────────────────

#[test]
fn power_topic_switches_motors_and_mirrors_to_dashboard() {
    let (mut app, mut hw, mut sink) = make_app();
    let out = handle(&mut app, &mut hw, &mut sink, broker(topics::POWER, "on"), 0);

    assert!(hw.motor_state(MotorId::Top).is_running);
    assert!(hw.motor_state(MotorId::Bottom).is_running);
    assert_eq!(last_dashboard(&out, MOTORS_ENABLE), Some(WireValue::Int(1)));
    assert_eq!(last_dashboard(&out, MOTOR_TOP), Some(WireValue::Int(50)));
    assert_eq!(
        sink.events.last(),
        Some(&AppEvent::SettingApplied(AppCommand::MotorsEnable(true)))
    );
}

#[test]
fn dashboard_setting_is_not_echoed_back() {
    let (mut app, mut hw, mut sink) = make_app();
    let out = handle(&mut app, &mut hw, &mut sink, control(MOTORS_ENABLE, "1"), 0);
    assert_eq!(last_dashboard(&out, MOTORS_ENABLE), None);
}

#[test]
fn unknown_topic_is_rejected() {
    let (mut app, mut hw, mut sink) = make_app();
    let out = handle(&mut app, &mut hw, &mut sink, broker("pongBot/nope", "1"), 0);
    assert!(out.is_empty());
    assert_eq!(
        sink.events.last(),
        Some(&AppEvent::CommandRejected(CommandError::UnknownTopic))
    );
}

#[test]
fn import_applies_good_entries_and_counts_bad_ones() {
    let (mut app, mut hw, mut sink) = make_app();
    let block = "servo_level:3\nservo=on, motors:1\nmotor_top:200\nbogus:1\nnonsense";
    let out = handle(&mut app, &mut hw, &mut sink, broker(topics::CONFIG_IMPORT, block), 0);

    assert_eq!(app.settings().servo_level, Some(3));
    assert!(app.settings().servo_enabled);
    assert!(app.settings().motors_enabled);
    assert_eq!(hw.servo_state().rotation_speed_percent, 70);
    assert_eq!(last_dashboard(&out, SERVO_LEVEL), Some(WireValue::Int(3)));
    assert_eq!(
        sink.events.last(),
        Some(&AppEvent::ImportApplied { accepted: 3, rejected: 3 })
    );
}

#[test]
fn long_import_still_mirrors_settings() {
    let (mut app, mut hw, mut sink) = make_app();
    let block = "motor_top:10,motor_bottom:20,motor_top:30,motor_bottom:40,\
                 motor_top:10,motor_bottom:20,motor_top:30,motor_bottom:40,\
                 motor_top:10,motor_bottom:20,motor_top:30,motor_bottom:40,\
                 motor_top:10,motor_bottom:20,motor_bottom:50,servo_level:4";
    let out = handle(&mut app, &mut hw, &mut sink, broker(topics::CONFIG_IMPORT, block), 0);

    assert_eq!(last_dashboard(&out, SERVO_LEVEL), Some(WireValue::Int(4)));
    assert!(last_dashboard(&out, MOTOR_BOTTOM).is_some());
    let status_writes = out
        .iter()
        .filter(|m| matches!(m, Outbound::Dashboard { id: CH0_STATUS, .. }))
        .count();
    assert_eq!(status_writes, 1);
    assert_eq!(
        sink.events.last(),
        Some(&AppEvent::ImportApplied { accepted: 16, rejected: 0 })
    );
}

// ── Resync ────────────────────────────────────────────────────

#[test]
fn dashboard_connect_pushes_full_state() {
    let (mut app, mut hw, mut sink) = make_app();
    handle(&mut app, &mut hw, &mut sink, control(SERVO_LEVEL, "2"), 0);
    handle(&mut app, &mut hw, &mut sink, control(CH0_BUTTON, "1"), 0);
    tick(&mut app, &mut hw, &mut sink, 3000);

    let out = handle(&mut app, &mut hw, &mut sink, Inbound::Connected(RemoteKind::Dashboard), 3050);
    assert!(out.iter().all(|m| m.kind() == RemoteKind::Dashboard));
    assert_eq!(last_dashboard(&out, SERVO_LEVEL), Some(WireValue::Int(2)));
    assert_eq!(last_dashboard(&out, CH0_BUTTON), Some(WireValue::Int(1)));
    assert_eq!(last_dashboard(&out, CH0_STATUS), Some(WireValue::Flag(true)));
    assert_eq!(last_dashboard(&out, CH1_STATUS), Some(WireValue::Flag(false)));
    assert_eq!(
        sink.events.last(),
        Some(&AppEvent::RemoteConnected(RemoteKind::Dashboard))
    );
}

#[test]
fn broker_connect_publishes_settings_and_state() {
    let (mut app, mut hw, mut sink) = make_app();
    handle(&mut app, &mut hw, &mut sink, control(SERVO_ENABLE, "1"), 0);

    let out = handle(&mut app, &mut hw, &mut sink, Inbound::Connected(RemoteKind::Broker), 10);
    assert!(out.iter().all(|m| m.kind() == RemoteKind::Broker));
    assert_eq!(published(&out, topics::SERVO_ENABLED), ["1"]);
    assert_eq!(published(&out, topics::MOTORS_ENABLED), ["0"]);
    assert_eq!(published(&out, topics::SERVO_LEVEL), ["1"]);
    assert_eq!(published(&out, topics::STATE).len(), 1);
}

#[test]
fn disconnect_only_logs() {
    let (mut app, mut hw, mut sink) = make_app();
    let calls = hw.calls.len();
    let out = handle(&mut app, &mut hw, &mut sink, Inbound::Disconnected(RemoteKind::Broker), 0);
    assert!(out.is_empty());
    assert_eq!(hw.calls.len(), calls);
    assert_eq!(
        sink.events.last(),
        Some(&AppEvent::RemoteDisconnected(RemoteKind::Broker))
    );
}
