//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through
//! the [`EventSink`](super::ports::EventSink) port. Adapters on the
//! other side decide what to do with them — log to serial, feed a test
//! assertion, etc.

use crate::control::speed::Mode;
use crate::remote::filter::LockIdentity;

/// Structured events emitted by the control core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The control loop has started.
    Started,

    /// Periodic status snapshot (also rendered onto the link).
    Status(StatusReport),

    /// The mode changed (IR toggle or link command).
    ModeChanged(Mode),

    /// The speed changed by explicit command (not by the curve).
    SpeedChanged { percent: u8, mode: Mode },

    /// The command filter locked onto a remote.
    RemoteLocked(LockIdentity),

    /// A climate sample failed (NaN); the automatic update was skipped.
    SensorReadFailed,
}

/// A point-in-time snapshot for the status line and log.
#[derive(Debug, Clone, Copy)]
pub struct StatusReport {
    pub temperature_c: f32,
    pub humidity_pct: f32,
    /// Curve activation threshold, reported as `Set:`.
    pub threshold_c: f32,
    pub mode: Mode,
    pub speed_percent: u8,
}
