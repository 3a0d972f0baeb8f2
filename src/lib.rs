//! ThermoFan firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod control;
pub mod events;
pub mod link;
pub mod motion;
pub mod remote;
pub mod units;

pub mod error;
pub mod pins;

// ESP-IDF-backed modules; the implementations are guarded by cfg
// attributes inside, so these also compile (as simulations) on the host.
pub mod adapters;
pub mod drivers;
pub mod sensors;
