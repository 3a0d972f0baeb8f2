//! Port traits — the boundary between the control core and the outside
//! world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (sensors, IR receiver, actuators, serial link, event
//! sinks) implement these traits. The [`AppService`](super::service::AppService)
//! consumes them via generics, so the control core never touches hardware
//! directly and the whole loop runs against mocks on the host.
//!
//! Everything here is polled from the single control-loop thread; no
//! trait method may block longer than a tick allows.

use heapless::String;

use crate::error::LinkError;
use crate::remote::IrCommand;
use crate::sensors::ClimateReading;

/// Longest inbound/outbound line the link handles, without terminator.
pub const MAX_LINE_LEN: usize = 160;

/// A single assembled text line.
pub type LinkLine = String<MAX_LINE_LEN>;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port for the climate sensor.
pub trait SensorPort {
    /// Sample humidity and temperature. NaN fields signal a failed
    /// read; the caller logs and carries on.
    fn read_climate(&mut self) -> ClimateReading;
}

// ───────────────────────────────────────────────────────────────
// IR receiver port
// ───────────────────────────────────────────────────────────────

/// Non-blocking poll of the IR decoder.
pub trait IrPort {
    /// The next decoded frame, if any arrived since the last poll.
    fn try_decode(&mut self) -> Option<IrCommand>;

    /// Re-arm the receiver after a decoded frame has been handled (or
    /// dropped). Must be called once per `try_decode` that yielded a
    /// frame.
    fn resume(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the motion driver commands the actuator through
/// this. Which method is meaningful depends on the deployed actuator.
pub trait ActuatorPort {
    /// Position a bounded-sweep servo (degrees).
    fn set_angle(&mut self, degrees: u8);

    /// Set a continuous motor's PWM duty (0–255).
    fn set_duty(&mut self, duty: u8);
}

// ───────────────────────────────────────────────────────────────
// Link port (telemetry out, command injection in)
// ───────────────────────────────────────────────────────────────

/// Line-delimited text channel. Outbound status lines are
/// fire-and-forget; inbound lines are polled one per tick.
pub trait LinkPort {
    /// The next complete inbound line, if one has been assembled.
    fn poll_line(&mut self) -> Option<LinkLine>;

    /// Queue one outbound line (terminator added by the adapter).
    fn send_line(&mut self, line: &str) -> Result<(), LinkError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go (serial log, a
/// future MQTT bridge, a test vector).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
