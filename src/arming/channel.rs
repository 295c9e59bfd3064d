//! Per-channel long-press state.
//!
//! A channel is one independently armable control path: a dashboard button,
//! its progress gauge and its status label.  The engine in the parent module
//! owns a fixed table of these and drives every transition; this type only
//! holds the state and answers questions about it.

/// Derived phase of a channel.  Not stored: computed from the raw flags so
/// the two can never disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArmingPhase {
    Idle,
    Pressing,
    Triggered,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub(super) channel_id: u8,
    pub(super) is_pressed: bool,
    pub(super) press_started_at: Option<u32>,
    pub(super) trigger_started_at: Option<u32>,
    pub(super) status_flag: bool,
    pub(super) last_progress: u8,
    pub(super) last_progress_at: Option<u32>,
}

impl Channel {
    pub(super) fn new(channel_id: u8) -> Self {
        Self {
            channel_id,
            is_pressed: false,
            press_started_at: None,
            trigger_started_at: None,
            status_flag: false,
            last_progress: 0,
            last_progress_at: None,
        }
    }

    pub fn channel_id(&self) -> u8 {
        self.channel_id
    }

    pub fn phase(&self) -> ArmingPhase {
        if self.is_triggered() {
            ArmingPhase::Triggered
        } else if self.is_pressed {
            ArmingPhase::Pressing
        } else {
            ArmingPhase::Idle
        }
    }

    /// Raw pressed flag as last reported by the remote.
    pub fn is_pressed(&self) -> bool {
        self.is_pressed
    }

    /// `trigger_started_at` is the single source of truth for "triggered".
    pub fn is_triggered(&self) -> bool {
        self.trigger_started_at.is_some()
    }

    pub fn press_started_at(&self) -> Option<u32> {
        self.press_started_at
    }

    pub fn trigger_started_at(&self) -> Option<u32> {
        self.trigger_started_at
    }

    /// Outward "just fired" label.  Set on fire, cleared only by an
    /// actuator configuration change.
    pub fn status_flag(&self) -> bool {
        self.status_flag
    }

    /// Last progress value reported outward (0–100).
    pub fn progress(&self) -> u8 {
        self.last_progress
    }

    /// Outward fired indicator (the dashboard button value).
    pub fn fired_indicator(&self) -> bool {
        self.is_triggered()
    }

    pub(super) fn hold_expired(&self, now_ms: u32, hold_ms: u32) -> bool {
        self.trigger_started_at
            .is_some_and(|t| now_ms.wrapping_sub(t) >= hold_ms)
    }

    /// Progress due for reporting at `now_ms`, if the coalescing gate is open
    /// and the value changed.
    pub(super) fn due_progress(
        &self,
        now_ms: u32,
        long_press_ms: u32,
        interval_ms: u32,
    ) -> Option<u8> {
        let started = self.press_started_at?;
        if self.last_progress >= 100 {
            return None;
        }
        if let Some(last) = self.last_progress_at {
            if now_ms.wrapping_sub(last) < interval_ms {
                return None;
            }
        }
        let pct = progress_percent(now_ms.wrapping_sub(started), long_press_ms);
        (pct != self.last_progress).then_some(pct)
    }

    pub(super) fn record_progress(&mut self, percent: u8, now_ms: u32) {
        self.last_progress = percent;
        self.last_progress_at = Some(now_ms);
    }

    pub(super) fn reset(&mut self, now_ms: u32) {
        self.is_pressed = false;
        self.press_started_at = None;
        self.trigger_started_at = None;
        self.record_progress(0, now_ms);
    }
}

/// `min(100, 100 * elapsed / long_press_ms)`, integer.
pub fn progress_percent(elapsed_ms: u32, long_press_ms: u32) -> u8 {
    if long_press_ms == 0 {
        return 100;
    }
    let pct = u64::from(elapsed_ms) * 100 / u64::from(long_press_ms);
    pct.min(100) as u8
}
