//! Mock adapters for integration tests.
//!
//! Records every actuator call so tests can assert on the full command
//! history without touching real GPIO/PWM registers.  Links and the clock
//! share their state through `Rc` handles so a test can keep poking them
//! after the control loop has taken ownership.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use pongbot::app::events::AppEvent;
use pongbot::app::ports::{ActuatorPort, Clock, EventSink, MotorId, RemoteLink};
use pongbot::config::ServoPulse;
use pongbot::drivers::motor::{Direction, MotorState};
use pongbot::drivers::servo::{ServoState, pulse_for_speed};
use pongbot::error::CommsError;
use pongbot::remote::{Inbound, Outbound, RemoteKind, WireValue};

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum ActuatorCall {
    Drive { motor: MotorId, direction: Direction, speed: f32 },
    SetSpeed { motor: MotorId, speed: f32 },
    Stop(MotorId),
    Brake(MotorId),
    Servo(i8),
    Feeder(bool),
    AllOff,
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    pub calls: Vec<ActuatorCall>,
    motors: [MotorState; 2],
    servo: i8,
    /// Feeder line level, observable after the mock has been moved.
    feeder: Rc<Cell<bool>>,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        let stopped = MotorState {
            direction: Direction::Stopped,
            speed_percent: 0.0,
            is_running: false,
            is_braking: false,
        };
        Self {
            calls: Vec::new(),
            motors: [stopped; 2],
            servo: 0,
            feeder: Rc::default(),
        }
    }

    pub fn feeder_line(&self) -> Rc<Cell<bool>> {
        Rc::clone(&self.feeder)
    }

    pub fn feeder_switches(&self) -> Vec<bool> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                ActuatorCall::Feeder(on) => Some(*on),
                _ => None,
            })
            .collect()
    }

    fn slot(motor: MotorId) -> usize {
        match motor {
            MotorId::Top => 0,
            MotorId::Bottom => 1,
        }
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl ActuatorPort for MockHardware {
    fn drive_motor(&mut self, motor: MotorId, direction: Direction, speed_percent: f32) {
        self.calls.push(ActuatorCall::Drive { motor, direction, speed: speed_percent });
        let m = &mut self.motors[Self::slot(motor)];
        m.speed_percent = speed_percent.clamp(0.0, 100.0);
        m.direction = direction;
        m.is_running = direction != Direction::Stopped;
        m.is_braking = false;
    }

    fn set_motor_speed(&mut self, motor: MotorId, speed_percent: f32) {
        self.calls.push(ActuatorCall::SetSpeed { motor, speed: speed_percent });
        self.motors[Self::slot(motor)].speed_percent = speed_percent.clamp(0.0, 100.0);
    }

    fn stop_motor(&mut self, motor: MotorId) {
        self.calls.push(ActuatorCall::Stop(motor));
        let m = &mut self.motors[Self::slot(motor)];
        m.direction = Direction::Stopped;
        m.is_running = false;
        m.is_braking = false;
    }

    fn brake_motor(&mut self, motor: MotorId) {
        self.calls.push(ActuatorCall::Brake(motor));
        let m = &mut self.motors[Self::slot(motor)];
        m.direction = Direction::Stopped;
        m.is_running = false;
        m.is_braking = true;
    }

    fn motor_state(&self, motor: MotorId) -> MotorState {
        self.motors[Self::slot(motor)]
    }

    fn set_servo_speed(&mut self, speed_percent: i8) {
        self.calls.push(ActuatorCall::Servo(speed_percent));
        self.servo = speed_percent.clamp(-100, 100);
    }

    fn servo_state(&self) -> ServoState {
        ServoState {
            rotation_speed_percent: self.servo,
            pulse_width_us: pulse_for_speed(&ServoPulse::default(), self.servo),
        }
    }

    fn set_feeder(&mut self, on: bool) {
        self.calls.push(ActuatorCall::Feeder(on));
        self.feeder.set(on);
    }

    fn is_feeder_on(&self) -> bool {
        self.feeder.get()
    }

    fn all_off(&mut self) {
        self.calls.push(ActuatorCall::AllOff);
        self.feeder.set(false);
        self.servo = 0;
        for m in &mut self.motors {
            m.direction = Direction::Stopped;
            m.is_running = false;
            m.is_braking = false;
        }
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── MockLink ──────────────────────────────────────────────────

#[derive(Default)]
pub struct LinkState {
    pub inbound: VecDeque<Inbound>,
    pub sent: Vec<Outbound>,
    pub fail_sends: bool,
}

#[derive(Clone)]
pub struct MockLink {
    kind: RemoteKind,
    pub state: Rc<RefCell<LinkState>>,
}

#[allow(dead_code)]
impl MockLink {
    pub fn new(kind: RemoteKind) -> Self {
        Self { kind, state: Rc::default() }
    }

    pub fn push(&self, msg: Inbound) {
        self.state.borrow_mut().inbound.push_back(msg);
    }

    pub fn take_sent(&self) -> Vec<Outbound> {
        std::mem::take(&mut self.state.borrow_mut().sent)
    }

    pub fn pending(&self) -> usize {
        self.state.borrow().inbound.len()
    }
}

impl RemoteLink for MockLink {
    fn kind(&self) -> RemoteKind {
        self.kind
    }

    fn poll(&mut self) -> Option<Inbound> {
        self.state.borrow_mut().inbound.pop_front()
    }

    fn send(&mut self, msg: &Outbound) -> Result<(), CommsError> {
        let mut s = self.state.borrow_mut();
        if s.fail_sends {
            return Err(match self.kind {
                RemoteKind::Dashboard => CommsError::DashboardWriteFailed,
                RemoteKind::Broker => CommsError::BrokerPublishFailed,
            });
        }
        s.sent.push(msg.clone());
        Ok(())
    }
}

// ── ManualClock ───────────────────────────────────────────────

/// Test clock.  `sleep_ms` advances it, so `run` moves time forward.
#[derive(Clone, Default)]
pub struct ManualClock {
    pub now: Rc<Cell<u32>>,
}

#[allow(dead_code)]
impl ManualClock {
    pub fn at(ms: u32) -> Self {
        Self { now: Rc::new(Cell::new(ms)) }
    }

    pub fn set(&self, ms: u32) {
        self.now.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u32 {
        self.now.get()
    }

    fn sleep_ms(&self, ms: u32) {
        self.now.set(self.now.get().wrapping_add(ms));
    }
}

// ── Outbound helpers ──────────────────────────────────────────

/// Last value written to dashboard control `id`.
#[allow(dead_code)]
pub fn last_dashboard(out: &[Outbound], id: u8) -> Option<WireValue> {
    out.iter().rev().find_map(|m| match m {
        Outbound::Dashboard { id: i, value } if *i == id => Some(*value),
        _ => None,
    })
}

/// Every payload published on `topic`, in order.
#[allow(dead_code)]
pub fn published(out: &[Outbound], topic: &str) -> Vec<String> {
    out.iter()
        .filter_map(|m| match m {
            Outbound::Broker { topic: t, payload } if t.as_str() == topic => {
                Some(payload.as_str().to_owned())
            }
            _ => None,
        })
        .collect()
}

#[allow(dead_code)]
pub fn control(id: u8, value: &str) -> Inbound {
    Inbound::control(id, value).expect("test value fits")
}

#[allow(dead_code)]
pub fn broker(topic: &str, payload: &str) -> Inbound {
    Inbound::broker(topic, payload).expect("test payload fits")
}
