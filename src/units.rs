//! Speed and duty value objects.
//!
//! The system speaks three units: user-facing speed percent (0–100),
//! driver-native PWM duty (0–255), and servo degrees. Percent and duty
//! get explicit newtypes with one conversion contract so a unit mismatch
//! cannot slip through an integer parameter.
//!
//! The percent↔duty map is a linear, saturating integer map. It is exact
//! at the endpoints (0↔0, 100↔255), monotone, and round-trips with an
//! error of at most the quantisation step (≤3 duty counts).

use serde::{Deserialize, Serialize};

/// User-facing fan speed, always within 0–100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct SpeedPercent(u8);

impl SpeedPercent {
    pub const MIN: SpeedPercent = SpeedPercent(0);
    pub const MAX: SpeedPercent = SpeedPercent(100);

    /// Build from any integer, clamping into 0–100.
    pub fn clamped(value: i32) -> Self {
        Self(value.clamp(0, 100) as u8)
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    /// Convert to PWM duty: `percent * 255 / 100`, integer arithmetic.
    pub fn to_duty(self) -> Duty {
        Duty((u32::from(self.0) * 255 / 100) as u8)
    }
}

/// Driver-native 8-bit PWM duty, 0–255.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Duty(u8);

impl Duty {
    pub const MIN: Duty = Duty(0);
    pub const MAX: Duty = Duty(255);

    /// Build from any integer, clamping into 0–255.
    pub fn clamped(value: i32) -> Self {
        Self(value.clamp(0, 255) as u8)
    }

    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Convert to speed percent: `duty * 100 / 255`, integer arithmetic.
    pub fn to_percent(self) -> SpeedPercent {
        SpeedPercent((u32::from(self.0) * 100 / 255) as u8)
    }
}
