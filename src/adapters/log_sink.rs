//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the logger (which goes to UART / USB-CDC in production). A future
//! MQTT or BLE adapter would implement the same trait.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Status(r) => {
                info!(
                    "STAT | T={:.1}\u{00b0}C H={:.1}% | set={:.1}\u{00b0}C | mode={} | speed={}%",
                    r.temperature_c, r.humidity_pct, r.threshold_c, r.mode.tag(), r.speed_percent,
                );
            }
            AppEvent::ModeChanged(mode) => {
                info!("MODE | -> {}", mode.tag());
            }
            AppEvent::SpeedChanged { percent, mode } => {
                info!("SPD  | {}% ({})", percent, mode.tag());
            }
            AppEvent::RemoteLocked(id) => {
                info!(
                    "IR   | locked to {:?} addr=0x{:04X}",
                    id.protocol, id.address
                );
            }
            AppEvent::SensorReadFailed => {
                warn!("ENV  | climate read failed, automatic update skipped");
            }
            AppEvent::Started => {
                info!("START | control loop up");
            }
        }
    }
}
