//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns the climate sensor, both actuator drivers, and the IR receiver,
//! exposing them through [`SensorPort`], [`ActuatorPort`], and
//! [`IrPort`]. This is the only module in the system that touches
//! actual hardware. On non-espidf targets, the underlying drivers use
//! cfg-gated simulation stubs.
//!
//! Both actuator drivers are always present even though a deployed unit
//! uses one of them; the motion driver decides which port method it
//! calls, and the idle driver just never gets a write.

use crate::app::ports::{ActuatorPort, IrPort, SensorPort};
use crate::drivers::ir_recv::IrReceiver;
use crate::drivers::motor::MotorDriver;
use crate::drivers::servo::ServoDriver;
use crate::remote::IrCommand;
use crate::sensors::climate::ClimateSensor;
use crate::sensors::ClimateReading;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter {
    climate: ClimateSensor,
    servo: ServoDriver,
    motor: MotorDriver,
    ir: IrReceiver,
}

impl HardwareAdapter {
    pub fn new(
        climate: ClimateSensor,
        servo: ServoDriver,
        motor: MotorDriver,
        ir: IrReceiver,
    ) -> Self {
        Self {
            climate,
            servo,
            motor,
            ir,
        }
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl SensorPort for HardwareAdapter {
    fn read_climate(&mut self) -> ClimateReading {
        self.climate.read()
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl ActuatorPort for HardwareAdapter {
    fn set_angle(&mut self, degrees: u8) {
        self.servo.write_angle(degrees);
    }

    fn set_duty(&mut self, duty: u8) {
        self.motor.set_duty(duty);
    }
}

// ── IrPort implementation ─────────────────────────────────────

impl IrPort for HardwareAdapter {
    fn try_decode(&mut self) -> Option<IrCommand> {
        self.ir.try_decode()
    }

    fn resume(&mut self) {
        self.ir.resume();
    }
}
