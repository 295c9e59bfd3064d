//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the logger (UART / USB-CDC in production, stderr on host).

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { channels } => {
                info!("START | channels={}", channels);
            }
            AppEvent::Fired { channel } => {
                info!("FIRE  | ch={}", channel);
            }
            AppEvent::HoldReleased { channel } => {
                info!("HOLD  | ch={} released", channel);
            }
            AppEvent::SettingApplied(cmd) => {
                info!("SET   | {:?}", cmd);
            }
            AppEvent::CommandRejected(e) => {
                warn!("REJECT| {}", e);
            }
            AppEvent::RemoteConnected(kind) => {
                info!("LINK  | {} up", kind);
            }
            AppEvent::RemoteDisconnected(kind) => {
                warn!("LINK  | {} down", kind);
            }
            AppEvent::ImportApplied { accepted, rejected } => {
                info!("IMPORT| accepted={} rejected={}", accepted, rejected);
            }
            AppEvent::Shutdown => {
                info!("STOP  | all actuators off");
            }
        }
    }
}
