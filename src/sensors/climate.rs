//! DHT11 climate sensor (humidity + temperature, one-wire).
//!
//! ## Dual-target design
//!
//! On ESP-IDF: bit-bangs the single-wire handshake via `hw_init`
//! helpers. On host/test: reads from atomic statics for injection.
//!
//! The DHT11 must not be polled faster than ~1 Hz; the control loop's
//! 2 s report cadence respects that naturally.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicU32, Ordering};

use super::ClimateReading;
#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;

// Host-side injection points, stored as f32 bit patterns.
#[cfg(not(target_os = "espidf"))]
static SIM_TEMP_BITS: AtomicU32 = AtomicU32::new(0x41C8_0000); // 25.0
#[cfg(not(target_os = "espidf"))]
static SIM_HUM_BITS: AtomicU32 = AtomicU32::new(0x4248_0000); // 50.0

/// Inject a simulated temperature (°C). Pass NaN to simulate a failure.
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_temperature(t_c: f32) {
    SIM_TEMP_BITS.store(t_c.to_bits(), Ordering::Relaxed);
}

/// Inject a simulated relative humidity (%).
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_humidity(h_pct: f32) {
    SIM_HUM_BITS.store(h_pct.to_bits(), Ordering::Relaxed);
}

pub struct ClimateSensor {
    _data_gpio: i32,
}

impl ClimateSensor {
    pub fn new(data_gpio: i32) -> Self {
        Self {
            _data_gpio: data_gpio,
        }
    }

    /// Sample the sensor. NaN fields signal a failed read.
    pub fn read(&mut self) -> ClimateReading {
        self.read_raw()
    }

    #[cfg(target_os = "espidf")]
    fn read_raw(&mut self) -> ClimateReading {
        match hw_init::dht_read(self._data_gpio) {
            Some((humidity_pct, temperature_c)) => ClimateReading {
                temperature_c,
                humidity_pct,
            },
            None => ClimateReading::failed(),
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_raw(&mut self) -> ClimateReading {
        ClimateReading {
            temperature_c: f32::from_bits(SIM_TEMP_BITS.load(Ordering::Relaxed)),
            humidity_pct: f32::from_bits(SIM_HUM_BITS.load(Ordering::Relaxed)),
        }
    }
}
