//! One-shot hardware peripheral initialization.
//!
//! Configures GPIO directions and LEDC timers/channels using raw
//! ESP-IDF sys calls, and carries the bit-banged DHT11 read. Called
//! once from `main()` before the control loop starts.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed(i32),
    LedcInitFailed,
    RmtInitFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::LedcInitFailed => write!(f, "LEDC timer/channel config failed"),
            Self::RmtInitFailed(rc) => write!(f, "RMT RX channel config failed (rc={})", rc),
        }
    }
}

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the control loop; single-threaded.
    unsafe {
        init_gpio_outputs()?;
        init_ledc();
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── GPIO Outputs ──────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_outputs() -> Result<(), HwInitError> {
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::HEARTBEAT_LED_GPIO,
        mode: gpio_mode_t_GPIO_MODE_OUTPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::GpioConfigFailed(ret));
    }
    unsafe { gpio_set_level(pins::HEARTBEAT_LED_GPIO, 0) };

    info!("hw_init: GPIO outputs configured");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) {
    // SAFETY: gpio_set_level writes to an already-configured output pin;
    // pin was validated during init_gpio_outputs(). Main-loop only.
    unsafe {
        gpio_set_level(pin, if high { 1 } else { 0 });
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(_pin: i32, _high: bool) {}

// ── LEDC PWM ─────────────────────────────────────────────────

pub const LEDC_CH_SERVO: u32 = 0;
pub const LEDC_CH_MOTOR: u32 = 1;

/// Servo timer resolution. 14 bits at 50 Hz gives ~1.2 µs per tick,
/// plenty for a hobby servo's 500–2500 µs pulse range.
#[cfg(target_os = "espidf")]
const SERVO_TIMER_BITS: u32 = 14;

#[cfg(target_os = "espidf")]
unsafe fn init_ledc() {
    // Timer 0: servo (50 Hz, 14-bit)
    // SAFETY: Called from single main-task context via init_peripherals().
    let timer0 = ledc_timer_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        timer_num: ledc_timer_t_LEDC_TIMER_0,
        duty_resolution: ledc_timer_bit_t_LEDC_TIMER_14_BIT,
        freq_hz: pins::SERVO_PWM_FREQ_HZ,
        clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
        ..Default::default()
    };
    unsafe {
        ledc_timer_config(&timer0);
    }

    // Timer 1: fan motor (25 kHz, 8-bit). Above audible range.
    let timer1 = ledc_timer_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        timer_num: ledc_timer_t_LEDC_TIMER_1,
        duty_resolution: ledc_timer_bit_t_LEDC_TIMER_8_BIT,
        freq_hz: pins::MOTOR_PWM_FREQ_HZ,
        clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
        ..Default::default()
    };
    unsafe {
        ledc_timer_config(&timer1);
    }

    // Channel 0: servo PWM
    unsafe {
        ledc_channel_config(&ledc_channel_config_t {
            speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
            channel: ledc_channel_t_LEDC_CHANNEL_0,
            timer_sel: ledc_timer_t_LEDC_TIMER_0,
            gpio_num: pins::SERVO_PWM_GPIO,
            duty: 0,
            hpoint: 0,
            ..Default::default()
        });
    }

    // Channel 1: motor PWM
    unsafe {
        ledc_channel_config(&ledc_channel_config_t {
            speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
            channel: ledc_channel_t_LEDC_CHANNEL_1,
            timer_sel: ledc_timer_t_LEDC_TIMER_1,
            gpio_num: pins::MOTOR_PWM_GPIO,
            duty: 0,
            hpoint: 0,
            ..Default::default()
        });
    }

    info!("hw_init: LEDC configured (CH0=servo, CH1=motor)");
}

/// Write a raw duty to an 8-bit LEDC channel.
#[cfg(target_os = "espidf")]
pub fn ledc_set(channel: u32, duty: u8) {
    // SAFETY: Channel was configured in init_ledc(); main-loop only.
    unsafe {
        ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel, duty as u32);
        ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn ledc_set(_channel: u32, _duty: u8) {}

/// Position the servo: 0–180° maps to a 500–2500 µs pulse at 50 Hz.
#[cfg(target_os = "espidf")]
pub fn ledc_set_servo_angle(degrees: u8) {
    let degrees = degrees.min(180) as u32;
    let pulse_us = 500 + degrees * 2000 / 180;
    // period 20 000 µs at 50 Hz
    let ticks = pulse_us * (1 << SERVO_TIMER_BITS) / 20_000;
    // SAFETY: CH0 was configured in init_ledc(); main-loop only.
    unsafe {
        ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, LEDC_CH_SERVO, ticks);
        ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, LEDC_CH_SERVO);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn ledc_set_servo_angle(_degrees: u8) {}

// ── DHT11 (bit-banged single-wire) ───────────────────────────

/// Read the DHT11 on `pin`. Returns `(humidity_pct, temperature_c)`,
/// or `None` on timeout or checksum failure.
///
/// The protocol is timing-critical (bit cells of 26–70 µs) so the whole
/// transaction runs with interrupts masked on this core. Total bus time
/// is under 6 ms; the sensor itself limits sampling to one read per 2 s.
#[cfg(target_os = "espidf")]
pub fn dht_read(pin: i32) -> Option<(f32, f32)> {
    #[inline]
    fn wait_level(pin: i32, level: i32, timeout_us: u32) -> bool {
        for _ in 0..timeout_us {
            // SAFETY: read-only register access on a configured pin.
            if unsafe { gpio_get_level(pin) } == level {
                return true;
            }
            unsafe { esp_rom_delay_us(1) };
        }
        false
    }

    let mut bytes = [0u8; 5];

    // SAFETY: Pin direction flips are the protocol; single-threaded
    // main-loop access, and the sensor is the only device on the wire.
    unsafe {
        // Host start signal: pull low >1 ms, then release.
        gpio_set_direction(pin, gpio_mode_t_GPIO_MODE_OUTPUT_OD);
        gpio_set_level(pin, 0);
        esp_rom_delay_us(1100);
        gpio_set_level(pin, 1);
        gpio_set_direction(pin, gpio_mode_t_GPIO_MODE_INPUT);
    }

    // Sensor response: ~80 µs low, ~80 µs high, then 40 data bits.
    if !wait_level(pin, 0, 100) || !wait_level(pin, 1, 100) || !wait_level(pin, 0, 100) {
        return None;
    }

    for bit in 0..40 {
        // 50 µs low preamble, then a high pulse: ~27 µs = 0, ~70 µs = 1.
        if !wait_level(pin, 1, 80) {
            return None;
        }
        let mut high_us = 0u32;
        // SAFETY: read-only level polling, as above.
        while unsafe { gpio_get_level(pin) } == 1 {
            high_us += 1;
            if high_us > 100 {
                return None;
            }
            unsafe { esp_rom_delay_us(1) };
        }
        if high_us > 40 {
            bytes[bit / 8] |= 1 << (7 - bit % 8);
        }
    }

    let sum = bytes[0]
        .wrapping_add(bytes[1])
        .wrapping_add(bytes[2])
        .wrapping_add(bytes[3]);
    if sum != bytes[4] {
        return None;
    }

    // DHT11 framing: integer byte + decimal byte per quantity.
    let humidity = bytes[0] as f32 + bytes[1] as f32 / 10.0;
    let temperature = bytes[2] as f32 + bytes[3] as f32 / 10.0;

    if !(0.0..=100.0).contains(&humidity) || !(0.0..=60.0).contains(&temperature) {
        return None;
    }

    Some((humidity, temperature))
}

#[cfg(not(target_os = "espidf"))]
pub fn dht_read(_pin: i32) -> Option<(f32, f32)> {
    None
}
