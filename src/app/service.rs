//! Application service: the hexagonal core.
//!
//! [`AppService`] owns the arming engine and the command router.  It has
//! exactly two entry points per loop pass: [`handle`](AppService::handle)
//! for each inbound remote message and [`tick`](AppService::tick) once with
//! the pass timestamp.  Both return an [`Outbox`] for the control loop to
//! fan out; neither touches a transport.
//!
//! ```text
//!  Inbound ──▶ ┌──────────────────────────┐ ──▶ Outbox
//!              │        AppService         │
//! ActuatorPort ◀│ Router · Arming · Sync   │──▶ EventSink
//!              └──────────────────────────┘
//! ```

use heapless::Vec;
use log::{info, warn};

use crate::arming::{ArmingEngine, ArmingSignal, MAX_CHANNELS};
use crate::config::{ControlMap, LauncherConfig};
use crate::remote::{Inbound, Outbox, RemoteKind, WireValue, post_dashboard};

use super::commands::AppCommand;
use super::events::AppEvent;
use super::ports::{ActuatorPort, EventSink};
use super::router::{Router, Settings};
use super::sync::{self, LauncherSnapshot};

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

pub struct AppService {
    engine: ArmingEngine,
    router: Router,
    shut_down: bool,
}

impl AppService {
    /// Construct the service from a validated configuration.
    pub fn new(config: LauncherConfig) -> Self {
        let engine = ArmingEngine::new(config.arming, config.controls.channels.len());
        let router = Router::new(config.controls, config.servo, config.motors);
        Self {
            engine,
            router,
            shut_down: false,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Drive every actuator to its safe state and announce startup.
    pub fn start(&mut self, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) {
        hw.all_off();
        self.shut_down = false;
        let channels = self.engine.channels().len() as u8;
        sink.emit(&AppEvent::Started { channels });
        info!("AppService started with {channels} arming channel(s)");
    }

    /// Stop everything.  Idempotent.
    pub fn shutdown(&mut self, now_ms: u32, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) {
        if self.shut_down {
            return;
        }
        hw.all_off();
        self.engine.abort_all(now_ms);
        self.shut_down = true;
        sink.emit(&AppEvent::Shutdown);
        info!("AppService shut down, all actuators off");
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    // ── Inbound dispatch ──────────────────────────────────────

    /// Process one inbound remote message.  Rejected input produces no
    /// outbound traffic and no state change.
    pub fn handle(
        &mut self,
        msg: &Inbound,
        now_ms: u32,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) -> Outbox {
        let mut outbox = Outbox::new();

        let cmd = match self.router.decode(msg) {
            Ok(cmd) => cmd,
            Err(e) => {
                warn!("rejected {msg:?}: {e}");
                sink.emit(&AppEvent::CommandRejected(e));
                return outbox;
            }
        };
        let from_broker = matches!(msg, Inbound::Broker { .. });

        match cmd {
            AppCommand::ArmPress { channel } => {
                let mut fired = Vec::new();
                let controls = self.router.controls();
                self.engine.press(channel, now_ms, |s| {
                    route_signal(s, controls, &mut *hw, &mut *sink, &mut outbox, &mut fired);
                });
                self.publish_fires(&fired, &*hw, &mut outbox);
            }
            AppCommand::ArmRelease { channel } => {
                let mut fired = Vec::new();
                let controls = self.router.controls();
                self.engine.release(channel, now_ms, |s| {
                    route_signal(s, controls, &mut *hw, &mut *sink, &mut outbox, &mut fired);
                });
                self.publish_fires(&fired, &*hw, &mut outbox);
            }
            AppCommand::Resync(kind) => {
                let snap = self.snapshot(&*hw);
                match kind {
                    RemoteKind::Dashboard => {
                        sync::resync_dashboard(&snap, self.router.controls(), &mut outbox);
                    }
                    RemoteKind::Broker => sync::resync_broker(&snap, &mut outbox),
                }
                info!("{kind} connected, resynced");
                sink.emit(&AppEvent::RemoteConnected(kind));
            }
            AppCommand::LinkDown(kind) => {
                warn!("{kind} disconnected");
                sink.emit(&AppEvent::RemoteDisconnected(kind));
            }
            AppCommand::ImportSettings(ref block) => {
                self.import(block, hw, sink, &mut outbox);
            }
            ref setting => {
                self.apply_setting(setting, hw, sink, &mut outbox);
                if from_broker {
                    let snap = self.snapshot(&*hw);
                    sync::mirror_settings(&snap, self.router.controls(), &mut outbox);
                }
            }
        }

        outbox
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Advance every arming channel to `now_ms`.
    pub fn tick(&mut self, now_ms: u32, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) -> Outbox {
        let mut outbox = Outbox::new();
        let mut fired = Vec::new();
        let controls = self.router.controls();
        self.engine.tick(now_ms, |s| {
            route_signal(s, controls, &mut *hw, &mut *sink, &mut outbox, &mut fired);
        });
        self.publish_fires(&fired, &*hw, &mut outbox);
        outbox
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn snapshot(&self, hw: &impl ActuatorPort) -> LauncherSnapshot {
        LauncherSnapshot::capture(&self.router, &self.engine, hw)
    }

    pub fn engine(&self) -> &ArmingEngine {
        &self.engine
    }

    pub fn settings(&self) -> &Settings {
        self.router.settings()
    }

    // ── Internal ──────────────────────────────────────────────

    fn apply_setting(
        &mut self,
        cmd: &AppCommand,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
        outbox: &mut Outbox,
    ) {
        self.apply_quiet(cmd, hw, sink);
        self.clear_status(hw, sink, outbox);
    }

    /// Apply a setting without touching the dashboard.
    fn apply_quiet(
        &mut self,
        cmd: &AppCommand,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
    ) {
        self.router.apply(cmd, hw);
        info!("setting applied: {cmd:?}");
        sink.emit(&AppEvent::SettingApplied(cmd.clone()));
    }

    fn clear_status(
        &mut self,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
        outbox: &mut Outbox,
    ) {
        let mut unused = Vec::new();
        let controls = self.router.controls();
        self.engine.clear_status_flags(|s| {
            route_signal(s, controls, &mut *hw, &mut *sink, &mut *outbox, &mut unused);
        });
    }

    /// Apply every valid entry of a settings block.  Status labels are
    /// cleared once for the whole block so the mirror always fits the outbox.
    fn import(
        &mut self,
        block: &str,
        hw: &mut impl ActuatorPort,
        sink: &mut impl EventSink,
        outbox: &mut Outbox,
    ) {
        let mut accepted = 0u8;
        let mut rejected = 0u8;

        for entry in sync::parse_import(block) {
            let cmd = entry.and_then(|e| self.router.decode_setting(e.key, e.value));
            match cmd {
                Ok(cmd) => {
                    self.apply_quiet(&cmd, hw, sink);
                    accepted = accepted.saturating_add(1);
                }
                Err(e) => {
                    warn!("import: skipped entry: {e}");
                    sink.emit(&AppEvent::CommandRejected(e));
                    rejected = rejected.saturating_add(1);
                }
            }
        }

        if accepted > 0 {
            self.clear_status(hw, sink, outbox);
            let snap = self.snapshot(&*hw);
            sync::mirror_settings(&snap, self.router.controls(), outbox);
        }
        info!("import: {accepted} accepted, {rejected} rejected");
        sink.emit(&AppEvent::ImportApplied { accepted, rejected });
    }

    fn publish_fires(&self, fired: &[u8], hw: &impl ActuatorPort, outbox: &mut Outbox) {
        if fired.is_empty() {
            return;
        }
        let snap = self.snapshot(&*hw);
        for _ in fired {
            sync::publish_fire(&snap, outbox);
        }
    }
}

/// Turn one arming signal into its actuator call, dashboard write or event.
fn route_signal(
    signal: ArmingSignal,
    controls: &ControlMap,
    hw: &mut impl ActuatorPort,
    sink: &mut impl EventSink,
    outbox: &mut Outbox,
    fired: &mut Vec<u8, MAX_CHANNELS>,
) {
    let ids = |channel: u8| controls.channels.get(usize::from(channel));

    match signal {
        ArmingSignal::Feeder { on } => hw.set_feeder(on),
        ArmingSignal::Progress { channel, percent } => {
            if let Some(ids) = ids(channel) {
                post_dashboard(outbox, ids.gauge, WireValue::Int(percent.into()));
            }
        }
        ArmingSignal::FiredIndicator { channel, on } => {
            if let Some(ids) = ids(channel) {
                post_dashboard(outbox, ids.button, WireValue::Int(on.into()));
            }
        }
        ArmingSignal::StatusFlag { channel, on } => {
            if let Some(ids) = ids(channel) {
                post_dashboard(outbox, ids.status, WireValue::Flag(on));
            }
        }
        ArmingSignal::Fired { channel } => {
            let _ = fired.push(channel);
            sink.emit(&AppEvent::Fired { channel });
        }
        ArmingSignal::Reset { channel } => {
            sink.emit(&AppEvent::HoldReleased { channel });
        }
    }
}
