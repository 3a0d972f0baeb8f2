//! Fan motor driver (MOSFET low-side switch on LEDC PWM).
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the 25 kHz motor channel via hw_init helpers.
//! On host/test: tracks state in-memory only.

use crate::drivers::hw_init;

pub struct MotorDriver {
    duty: u8,
}

impl MotorDriver {
    pub fn new() -> Self {
        Self { duty: 0 }
    }

    pub fn set_duty(&mut self, duty: u8) {
        hw_init::ledc_set(hw_init::LEDC_CH_MOTOR, duty);
        self.duty = duty;
    }

    pub fn current_duty(&self) -> u8 {
        self.duty
    }

    pub fn is_running(&self) -> bool {
        self.duty > 0
    }
}
