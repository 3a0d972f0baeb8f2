//! Actuator drivers, hardware initialisation, and peripheral helpers.

pub mod hw_init;
pub mod ir_recv;
pub mod motor;
pub mod servo;
pub mod status_led;
