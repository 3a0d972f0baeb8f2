//! Sensor shims.
//!
//! A reading that fails carries NaN in the affected field rather than an
//! error — the control loop's policy for a bad sample is "skip this
//! period's automatic update and keep the last speed", so NaN is the
//! natural in-band signal (it is what the DHT library family returns).

pub mod climate;

/// One humidity/temperature sample. Either field may be NaN.
#[derive(Debug, Clone, Copy)]
pub struct ClimateReading {
    pub temperature_c: f32,
    pub humidity_pct: f32,
}

impl ClimateReading {
    /// A sample that failed outright.
    pub fn failed() -> Self {
        Self {
            temperature_c: f32::NAN,
            humidity_pct: f32::NAN,
        }
    }

    /// True when both fields decoded.
    pub fn is_complete(&self) -> bool {
        !self.temperature_c.is_nan() && !self.humidity_pct.is_nan()
    }
}
