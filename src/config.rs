//! System configuration parameters
//!
//! All tunable parameters for the ThermoFan controller. The deployed
//! actuator kind is a build-time/startup decision carried here; nothing
//! is persisted across restarts.

use serde::{Deserialize, Serialize};

/// Which physical actuator this unit drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActuatorKind {
    /// Bounded-sweep servo simulating rotation by oscillating.
    Sweep,
    /// Continuous-rotation fan motor on a PWM driver.
    Direct,
}

/// Unit of the value carried by an inbound `SPEED:<int>` link line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpeedUnit {
    /// Raw 8-bit PWM duty, 0–255 (what the stock remote terminal sends).
    Duty,
    /// User-facing percent, 0–100.
    Percent,
}

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Actuator ---
    /// Deployed actuator kind (chosen once at startup, not at runtime).
    pub actuator: ActuatorKind,
    /// Servo sweep lower bound (degrees). Raise if the horn hits a stop.
    pub servo_min_angle: u8,
    /// Servo sweep upper bound (degrees).
    pub servo_max_angle: u8,
    /// Full one-way sweep duration at the slowest speed (duty = 1), ms.
    pub sweep_slowest_ms: u32,
    /// Full one-way sweep duration at the fastest speed (duty = 255), ms.
    pub sweep_fastest_ms: u32,
    /// Max duty change per sweep cycle under manual control.
    pub manual_cycle_step: u8,
    /// Max duty change per sweep cycle under automatic control.
    pub auto_cycle_step: u8,

    // --- Automatic mode ---
    /// Temperature at which the automatic curve starts ramping (°C).
    /// Reported as the `Set:` field in the status line.
    pub auto_threshold_c: f32,

    // --- Link ---
    /// Unit of inbound `SPEED:<int>` values.
    pub link_speed_unit: SpeedUnit,

    // --- Timing ---
    /// Sensor sample + status report period (milliseconds).
    pub report_interval_ms: u32,
    /// Heartbeat LED toggle period (milliseconds).
    pub heartbeat_interval_ms: u32,
    /// Cooperative loop pacing on simulation targets (milliseconds).
    pub loop_tick_ms: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Actuator
            actuator: ActuatorKind::Sweep,
            servo_min_angle: 10,
            servo_max_angle: 170,
            sweep_slowest_ms: 12_000,
            sweep_fastest_ms: 3_000,
            manual_cycle_step: 30,
            auto_cycle_step: 10,

            // Automatic mode
            auto_threshold_c: 28.0,

            // Link
            link_speed_unit: SpeedUnit::Duty,

            // Timing
            report_interval_ms: 2_000, // sensor + status cadence
            heartbeat_interval_ms: 500,
            loop_tick_ms: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_sane() {
        let c = SystemConfig::default();
        assert!(c.servo_min_angle < c.servo_max_angle);
        assert!(c.sweep_fastest_ms < c.sweep_slowest_ms);
        assert!(c.manual_cycle_step >= c.auto_cycle_step);
        assert!(c.auto_threshold_c > 0.0);
        assert!(c.report_interval_ms > 0);
        assert!(c.loop_tick_ms < c.report_interval_ms);
    }

    #[test]
    fn manual_steps_faster_than_auto() {
        let c = SystemConfig::default();
        assert!(
            c.manual_cycle_step > c.auto_cycle_step,
            "manual commands should converge faster than the automatic curve"
        );
    }

    #[test]
    fn serde_roundtrip() {
        let c = SystemConfig::default();
        let json = serde_json::to_string(&c).unwrap();
        let c2: SystemConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(c.actuator, c2.actuator);
        assert_eq!(c.servo_max_angle, c2.servo_max_angle);
        assert_eq!(c.report_interval_ms, c2.report_interval_ms);
        assert!((c.auto_threshold_c - c2.auto_threshold_c).abs() < 0.001);
    }
}
