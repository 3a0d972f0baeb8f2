//! Direct duty passthrough for a continuous-rotation motor.
//!
//! Nothing to latch: the driver IC takes any duty at any time, so the
//! requested value is clamped and forwarded every tick.

use crate::app::ports::ActuatorPort;
use crate::control::speed::Mode;
use crate::units::Duty;

use super::MotionDriver;

pub struct DirectDriver {
    current: Duty,
}

impl DirectDriver {
    pub fn new() -> Self {
        Self { current: Duty::MIN }
    }

    /// Last duty committed to the motor.
    pub fn current(&self) -> Duty {
        self.current
    }
}

impl MotionDriver for DirectDriver {
    fn update(&mut self, request: Duty, _mode: Mode, _now_ms: u32, hw: &mut impl ActuatorPort) {
        self.current = request;
        hw.set_duty(request.get());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RecordingHw {
        duties: Vec<u8>,
    }

    impl ActuatorPort for RecordingHw {
        fn set_angle(&mut self, _degrees: u8) {
            unreachable!("direct driver never sets a servo angle");
        }
        fn set_duty(&mut self, duty: u8) {
            self.duties.push(duty);
        }
    }

    #[test]
    fn forwards_duty_every_tick() {
        let mut d = DirectDriver::new();
        let mut hw = RecordingHw { duties: Vec::new() };
        d.update(Duty::new(0), Mode::Auto, 0, &mut hw);
        d.update(Duty::new(128), Mode::Auto, 1, &mut hw);
        d.update(Duty::new(255), Mode::Manual, 2, &mut hw);
        assert_eq!(hw.duties, vec![0, 128, 255]);
        assert_eq!(d.current(), Duty::new(255));
    }
}
