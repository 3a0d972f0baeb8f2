//! Motion strategies: how a requested duty becomes visible airflow.
//!
//! Two concrete strategies exist, chosen once at startup from
//! [`ActuatorKind`](crate::config::ActuatorKind):
//!
//! - [`SweepDriver`] — a bounded-sweep servo that cannot rotate
//!   continuously, so it simulates rotation by oscillating at a
//!   speed-dependent rate (cycle-latched).
//! - [`DirectDriver`] — a continuous motor; the duty passes straight
//!   through.

pub mod direct;
pub mod sweep;

pub use direct::DirectDriver;
pub use sweep::SweepDriver;

use crate::app::ports::ActuatorPort;
use crate::config::{ActuatorKind, SystemConfig};
use crate::control::speed::Mode;
use crate::units::Duty;

/// Converts a requested duty into actuator motion.
///
/// `update` is called every control tick regardless of any timers —
/// implementations must be non-blocking and cheap when there is nothing
/// to do.
pub trait MotionDriver {
    fn update(&mut self, request: Duty, mode: Mode, now_ms: u32, hw: &mut impl ActuatorPort);
}

/// Startup-selected strategy wrapper.
pub enum AnyMotion {
    Sweep(SweepDriver),
    Direct(DirectDriver),
}

impl AnyMotion {
    pub fn from_config(config: &SystemConfig) -> Self {
        match config.actuator {
            ActuatorKind::Sweep => Self::Sweep(SweepDriver::new(config)),
            ActuatorKind::Direct => Self::Direct(DirectDriver::new()),
        }
    }
}

impl MotionDriver for AnyMotion {
    fn update(&mut self, request: Duty, mode: Mode, now_ms: u32, hw: &mut impl ActuatorPort) {
        match self {
            Self::Sweep(d) => d.update(request, mode, now_ms, hw),
            Self::Direct(d) => d.update(request, mode, now_ms, hw),
        }
    }
}
