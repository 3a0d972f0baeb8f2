//! Physical pin assignments for the ThermoFan board (ESP32-S3).
//!
//! One place for every GPIO, LEDC channel, and RMT channel so the wiring
//! is auditable at a glance. Numbers are GPIO numbers, not header pins.

/// DHT11 climate sensor data line (one-wire, external 10k pull-up).
pub const DHT_DATA_GPIO: i32 = 2;

/// IR receiver (TSOP38238) output, active-low demodulated signal.
pub const IR_RECV_GPIO: i32 = 3;

/// Servo signal line (50 Hz PWM, bounded-sweep actuator).
pub const SERVO_PWM_GPIO: i32 = 6;

/// Fan motor driver PWM input (continuous actuator variant).
pub const MOTOR_PWM_GPIO: i32 = 7;

/// Heartbeat LED (blinks to show the loop is alive).
pub const HEARTBEAT_LED_GPIO: i32 = 13;

// ── PWM frequencies ───────────────────────────────────────────

/// Servo: LEDC timer 0, 50 Hz, 14-bit resolution for µs pulse control.
pub const SERVO_PWM_FREQ_HZ: u32 = 50;

/// Motor: LEDC timer 1, 25 kHz (above audible range), 8-bit.
pub const MOTOR_PWM_FREQ_HZ: u32 = 25_000;
