//! Application layer: port traits, commands, events, and the control
//! loop service that orchestrates one tick.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
