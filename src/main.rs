//! ThermoFan Firmware — Main Entry Point
//!
//! Hexagonal architecture with a single cooperative control loop.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                   Adapters (outer ring)                  │
//! │                                                          │
//! │  HardwareAdapter      SerialLink      LogEventSink       │
//! │  (Sensor+Actuator+IR) (LinkPort)      (EventSink)        │
//! │                                                          │
//! │  ─────────────── Port Trait Boundary ──────────────      │
//! │                                                          │
//! │  ┌────────────────────────────────────────────────┐      │
//! │  │            AppService (pure logic)             │      │
//! │  │  CommandFilter · SpeedController · Motion      │      │
//! │  └────────────────────────────────────────────────┘      │
//! └──────────────────────────────────────────────────────────┘
//! ```

#![deny(unused_must_use)]

use anyhow::Result;
use log::info;

use thermofan::adapters::hardware::HardwareAdapter;
use thermofan::adapters::log_sink::LogEventSink;
use thermofan::adapters::serial_link::SerialLink;
use thermofan::adapters::time::MonotonicClock;
use thermofan::app::service::AppService;
use thermofan::config::SystemConfig;
use thermofan::drivers;
use thermofan::drivers::ir_recv::IrReceiver;
use thermofan::drivers::motor::MotorDriver;
use thermofan::drivers::servo::ServoDriver;
use thermofan::drivers::status_led::HeartbeatLed;
use thermofan::motion::AnyMotion;
use thermofan::pins;
use thermofan::sensors::climate::ClimateSensor;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    #[cfg(target_os = "espidf")]
    {
        esp_idf_svc::sys::link_patches();
        esp_idf_logger::init()?;
    }

    info!("ThermoFan v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Initialise hardware peripherals ────────────────────
    if let Err(e) = drivers::hw_init::init_peripherals() {
        // Peripheral init failure is critical — log and halt.
        log::error!("HAL init failed: {} — halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }

    let config = SystemConfig::default();

    // ── 3. Construct adapters ─────────────────────────────────
    let ir = IrReceiver::new().map_err(|e| anyhow::anyhow!("IR receiver init: {e}"))?;
    let mut hw = HardwareAdapter::new(
        ClimateSensor::new(pins::DHT_DATA_GPIO),
        ServoDriver::new(),
        MotorDriver::new(),
        ir,
    );
    let mut link = SerialLink::new().map_err(|e| anyhow::anyhow!("serial link init: {e}"))?;
    let mut sink = LogEventSink::new();
    let mut heartbeat = HeartbeatLed::new(config.heartbeat_interval_ms);
    let clock = MonotonicClock::new();

    // ── 4. Construct app service ──────────────────────────────
    let motion = AnyMotion::from_config(&config);
    let loop_tick_ms = config.loop_tick_ms;
    let mut app = AppService::new(config, motion);
    app.start(&mut sink);

    info!("System ready. Entering control loop.");

    // ── 5. Control loop ───────────────────────────────────────
    loop {
        let now_ms = clock.uptime_ms();

        app.tick(now_ms, &mut hw, &mut link, &mut sink);
        heartbeat.tick(now_ms);

        // On real hardware the FreeRTOS tick yields; on the host a
        // plain sleep paces the loop.
        #[cfg(target_os = "espidf")]
        unsafe {
            esp_idf_svc::sys::vTaskDelay(1.max(
                loop_tick_ms / (1000 / esp_idf_svc::sys::configTICK_RATE_HZ),
            ));
        }
        #[cfg(not(target_os = "espidf"))]
        std::thread::sleep(std::time::Duration::from_millis(u64::from(loop_tick_ms)));
    }
}
