//! Long-press "arm and confirm" state machine.
//!
//! ```text
//!            pressed                 elapsed >= long_press
//!   Idle ─────────────▶ Pressing ───────────────────────▶ Triggered
//!    ▲                     │                                  │
//!    │   released (early)  │        now - fired >= hold       │
//!    └─────────────────────┴──────────────────────────────────┘
//! ```
//!
//! Every channel is ticked with the same timestamp once per loop pass.
//! Outputs are reported through a caller-supplied `FnMut(ArmingSignal)`
//! rather than returned, so the engine never allocates and the caller
//! decides where each signal goes (feeder, dashboard, broker, log).
//!
//! Rules worth knowing:
//! - Exactly one fire per press cycle.
//! - A press or release while triggered never touches the feeder.  A
//!   release re-asserts the fired indicator; a press is absorbed.
//! - A press handled at or after hold expiry services the reset first and
//!   then counts as a fresh press.
//! - The feeder is shared: a reset only turns it off when no other channel
//!   is still triggered.

pub mod channel;

use heapless::Vec;
use log::{debug, info, warn};

pub use channel::{ArmingPhase, Channel};

use crate::config::ArmingConfig;

/// Upper bound on independently armable channels.
pub const MAX_CHANNELS: usize = 4;

/// Outputs of the arming engine.  `channel` is the index into the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArmingSignal {
    /// Gauge value 0–100.
    Progress { channel: u8, percent: u8 },
    /// Dashboard button value (fired = 1 / not fired = 0).
    FiredIndicator { channel: u8, on: bool },
    /// "True"/"False" status label.
    StatusFlag { channel: u8, on: bool },
    /// Drive the shared feeder.
    Feeder { on: bool },
    /// The channel crossed the long-press threshold.
    Fired { channel: u8 },
    /// The hold elapsed and the channel returned to idle.
    Reset { channel: u8 },
}

pub struct ArmingEngine {
    config: ArmingConfig,
    channels: Vec<Channel, MAX_CHANNELS>,
}

impl ArmingEngine {
    /// Create `count` idle channels (clamped to `MAX_CHANNELS`).
    pub fn new(config: ArmingConfig, count: usize) -> Self {
        let mut channels = Vec::new();
        for id in 0..count.min(MAX_CHANNELS) {
            let _ = channels.push(Channel::new(id as u8));
        }
        Self { config, channels }
    }

    pub fn config(&self) -> &ArmingConfig {
        &self.config
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn channel(&self, channel: u8) -> Option<&Channel> {
        self.channels.get(usize::from(channel))
    }

    pub fn any_triggered(&self) -> bool {
        self.channels.iter().any(Channel::is_triggered)
    }

    /// Raw "pressed" event from the remote.
    pub fn press(&mut self, channel: u8, now_ms: u32, mut emit: impl FnMut(ArmingSignal)) {
        let idx = usize::from(channel);
        if idx >= self.channels.len() {
            warn!("arming: press on unknown channel {channel}");
            return;
        }

        // Tie-break: finish an expired hold before looking at the press.
        self.service_hold(idx, now_ms, &mut emit);

        let ch = &mut self.channels[idx];
        match ch.phase() {
            ArmingPhase::Idle => {
                ch.is_pressed = true;
                ch.press_started_at = Some(now_ms);
                ch.record_progress(0, now_ms);
                debug!("arming: ch{channel} press started at {now_ms}");
                emit(ArmingSignal::Progress { channel, percent: 0 });
                emit(ArmingSignal::FiredIndicator { channel, on: false });
            }
            ArmingPhase::Pressing => {
                debug!("arming: ch{channel} duplicate press ignored");
            }
            ArmingPhase::Triggered => {
                ch.is_pressed = true;
                debug!("arming: ch{channel} press absorbed during hold");
            }
        }
    }

    /// Raw "released" event from the remote.
    pub fn release(&mut self, channel: u8, now_ms: u32, mut emit: impl FnMut(ArmingSignal)) {
        let idx = usize::from(channel);
        if idx >= self.channels.len() {
            warn!("arming: release on unknown channel {channel}");
            return;
        }

        self.service_hold(idx, now_ms, &mut emit);

        let ch = &mut self.channels[idx];
        match ch.phase() {
            ArmingPhase::Pressing => {
                ch.is_pressed = false;
                ch.press_started_at = None;
                ch.record_progress(0, now_ms);
                debug!("arming: ch{channel} released early");
                emit(ArmingSignal::Progress { channel, percent: 0 });
            }
            ArmingPhase::Triggered => {
                ch.is_pressed = false;
                emit(ArmingSignal::FiredIndicator { channel, on: true });
            }
            ArmingPhase::Idle => {
                debug!("arming: ch{channel} release while idle ignored");
            }
        }
    }

    /// Advance every channel to `now_ms`.
    pub fn tick(&mut self, now_ms: u32, mut emit: impl FnMut(ArmingSignal)) {
        let cfg = self.config;
        for idx in 0..self.channels.len() {
            let ch = &mut self.channels[idx];
            let channel = ch.channel_id;

            if let Some(percent) =
                ch.due_progress(now_ms, cfg.long_press_ms, cfg.progress_interval_ms)
            {
                ch.record_progress(percent, now_ms);
                emit(ArmingSignal::Progress { channel, percent });
            }

            if ch.phase() == ArmingPhase::Pressing {
                let started = ch.press_started_at.unwrap_or(now_ms);
                if now_ms.wrapping_sub(started) >= cfg.long_press_ms {
                    ch.trigger_started_at = Some(now_ms);
                    ch.status_flag = true;
                    info!("arming: ch{channel} fired");
                    emit(ArmingSignal::Feeder { on: true });
                    emit(ArmingSignal::FiredIndicator { channel, on: true });
                    emit(ArmingSignal::StatusFlag { channel, on: true });
                    emit(ArmingSignal::Fired { channel });
                    continue;
                }
            }

            self.service_hold(idx, now_ms, &mut emit);
        }
    }

    /// Clear every outward status flag; reports each channel's label.
    pub fn clear_status_flags(&mut self, mut emit: impl FnMut(ArmingSignal)) {
        for ch in &mut self.channels {
            ch.status_flag = false;
            emit(ArmingSignal::StatusFlag { channel: ch.channel_id, on: false });
        }
    }

    /// Return every channel to idle without emitting signals.  Used on
    /// shutdown; the caller switches the feeder off itself.
    pub fn abort_all(&mut self, now_ms: u32) {
        for ch in &mut self.channels {
            ch.reset(now_ms);
        }
    }

    fn service_hold(&mut self, idx: usize, now_ms: u32, emit: &mut impl FnMut(ArmingSignal)) {
        if !self.channels[idx].hold_expired(now_ms, self.config.hold_ms) {
            return;
        }

        let ch = &mut self.channels[idx];
        let channel = ch.channel_id;
        ch.reset(now_ms);
        info!("arming: ch{channel} hold elapsed, reset");

        if !self.any_triggered() {
            emit(ArmingSignal::Feeder { on: false });
        }
        emit(ArmingSignal::Progress { channel, percent: 0 });
        emit(ArmingSignal::FiredIndicator { channel, on: false });
        emit(ArmingSignal::Reset { channel });
    }
}
