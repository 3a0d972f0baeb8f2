//! Sweep servo driver (standard 50 Hz hobby servo on LEDC).
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the LEDC servo channel via hw_init helpers.
//! On host/test: tracks the commanded angle in-memory only.

use crate::drivers::hw_init;

pub struct ServoDriver {
    last_angle: u8,
}

impl ServoDriver {
    pub fn new() -> Self {
        Self { last_angle: 0 }
    }

    /// Command an angle in degrees (clamped to 0–180).
    pub fn write_angle(&mut self, degrees: u8) {
        let degrees = degrees.min(180);
        hw_init::ledc_set_servo_angle(degrees);
        self.last_angle = degrees;
    }

    pub fn last_angle(&self) -> u8 {
        self.last_angle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_angle_clamps() {
        let mut s = ServoDriver::new();
        s.write_angle(250);
        assert_eq!(s.last_angle(), 180);
        s.write_angle(90);
        assert_eq!(s.last_angle(), 90);
    }
}
