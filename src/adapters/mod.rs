//! Adapters binding port traits to concrete peripherals and sinks.

pub mod hardware;
pub mod log_sink;
pub mod serial_link;
pub mod time;
