//! Heartbeat LED driver.
//!
//! One GPIO, toggled on a fixed period so a glance at the board shows
//! the control loop is alive. A frozen LED means a wedged loop.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the LED pin via hw_init.
//! On host/test: tracks state in-memory only.

use crate::drivers::hw_init;
use crate::pins;

pub struct HeartbeatLed {
    interval_ms: u32,
    last_toggle_ms: u32,
    on: bool,
}

impl HeartbeatLed {
    pub fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms,
            last_toggle_ms: 0,
            on: false,
        }
    }

    /// Toggle when the period has elapsed. Wrapping compare, so a
    /// millisecond-counter rollover costs at most one late blink.
    pub fn tick(&mut self, now_ms: u32) {
        if now_ms.wrapping_sub(self.last_toggle_ms) < self.interval_ms {
            return;
        }
        self.last_toggle_ms = now_ms;
        self.on = !self.on;
        hw_init::gpio_write(pins::HEARTBEAT_LED_GPIO, self.on);
    }

    pub fn is_on(&self) -> bool {
        self.on
    }
}
