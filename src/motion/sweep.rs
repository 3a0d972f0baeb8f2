//! Cycle-latched oscillation for a bounded-sweep servo.
//!
//! The servo sweeps between a minimum and maximum angle at a rate
//! derived from the current duty; a faster duty means a shorter full
//! sweep. To an observer the oscillation reads as rotation speed.
//!
//! Speed changes are latched to sweep-cycle boundaries: a new request
//! goes into `pending_duty` and only takes effect when the horn reaches
//! the minimum angle (start of the next cycle), and then moves by at
//! most a per-cycle cap. Within one cycle the step rate is constant —
//! that is the central invariant. Changing speed mid-stroke looks
//! jarring on real hardware.
//!
//! The one exception: adopting a target from a full stop happens
//! immediately, since there is no cycle in flight to disturb.

use crate::app::ports::ActuatorPort;
use crate::config::SystemConfig;
use crate::control::speed::Mode;
use crate::units::Duty;

use super::MotionDriver;

/// Sweep state machine. Exclusive owner of the servo's commanded angle.
pub struct SweepDriver {
    min_angle: i32,
    max_angle: i32,
    slowest_ms: u32,
    fastest_ms: u32,
    manual_cycle_step: i32,
    auto_cycle_step: i32,

    position: i32,
    direction: i32,
    /// Duty in force for the current sweep cycle. Zero means stopped.
    cycle_duty: i32,
    /// Most recently requested duty, adopted at the next cycle boundary.
    pending_duty: i32,
    last_step_ms: u32,
}

impl SweepDriver {
    pub fn new(config: &SystemConfig) -> Self {
        let min_angle = i32::from(config.servo_min_angle);
        let max_angle = i32::from(config.servo_max_angle);
        Self {
            min_angle,
            max_angle,
            slowest_ms: config.sweep_slowest_ms,
            fastest_ms: config.sweep_fastest_ms,
            manual_cycle_step: i32::from(config.manual_cycle_step),
            auto_cycle_step: i32::from(config.auto_cycle_step),

            // Park in the middle so the first sweep is symmetric.
            position: (min_angle + max_angle) / 2,
            direction: 1,
            cycle_duty: 0,
            pending_duty: 0,
            last_step_ms: 0,
        }
    }

    /// Duty in force for the current cycle (0 = stopped).
    pub fn cycle_duty(&self) -> u8 {
        self.cycle_duty as u8
    }

    /// Latest requested duty, waiting for the next cycle boundary.
    pub fn pending_duty(&self) -> u8 {
        self.pending_duty as u8
    }

    /// Current commanded angle in degrees.
    pub fn position(&self) -> i32 {
        self.position
    }

    /// +1 sweeping toward max, -1 toward min.
    pub fn direction(&self) -> i32 {
        self.direction
    }

    /// Linear integer map, Arduino `map()` semantics (truncating).
    fn map_range(x: i64, in_min: i64, in_max: i64, out_min: i64, out_max: i64) -> i64 {
        (x - in_min) * (out_max - out_min) / (in_max - in_min) + out_min
    }

    /// Milliseconds between single steps at the current cycle duty,
    /// and the step size in degrees.
    fn step_timing(&self) -> (u32, i32) {
        let sweep_range = (self.max_angle - self.min_angle).max(1) as i64;
        // Faster duty ⇒ shorter full one-way sweep.
        let sweep_ms = Self::map_range(
            i64::from(self.cycle_duty),
            1,
            255,
            i64::from(self.slowest_ms),
            i64::from(self.fastest_ms),
        );
        // 1° steps at low speed, 2° at high, keeping the interval an
        // integer millisecond count.
        let step_degrees = Self::map_range(i64::from(self.cycle_duty), 1, 255, 1, 2).clamp(1, 2);
        let interval_ms = (sweep_ms * step_degrees / sweep_range).max(1) as u32;
        (interval_ms, step_degrees as i32)
    }

    /// Converge `cycle_duty` toward `pending_duty` by at most `cap`.
    /// Called only at the minimum-angle cycle boundary.
    fn resolve_cycle_duty(&mut self, cap: i32) {
        if self.cycle_duty < self.pending_duty {
            self.cycle_duty = (self.cycle_duty + cap).min(self.pending_duty);
        } else if self.cycle_duty > self.pending_duty {
            self.cycle_duty = (self.cycle_duty - cap).max(self.pending_duty);
        }
    }
}

impl MotionDriver for SweepDriver {
    fn update(&mut self, request: Duty, mode: Mode, now_ms: u32, hw: &mut impl ActuatorPort) {
        self.pending_duty = i32::from(request.get());

        // Starting from rest: adopt the target now, no cycle to wait out.
        if self.cycle_duty == 0 {
            self.cycle_duty = self.pending_duty;
        }

        if self.cycle_duty == 0 {
            // Stopped and asked to stay stopped. Hold position — no
            // recentre, which would be a large abrupt swing from rest.
            return;
        }

        let (interval_ms, step_degrees) = self.step_timing();

        // Unsigned wrapping compare so a millisecond-counter rollover
        // costs at most one late step.
        if now_ms.wrapping_sub(self.last_step_ms) < interval_ms {
            return;
        }
        self.last_step_ms = now_ms;

        self.position += self.direction * step_degrees;

        if self.position >= self.max_angle {
            self.position = self.max_angle;
            self.direction = -1;
        } else if self.position <= self.min_angle {
            self.position = self.min_angle;
            self.direction = 1;

            // Cycle boundary: the only point where the effective speed
            // may change. Manual gets a bigger step budget so commands
            // feel responsive; the curve creeps.
            let cap = match mode {
                Mode::Manual => self.manual_cycle_step,
                Mode::Auto => self.auto_cycle_step,
            };
            self.resolve_cycle_duty(cap);
        }

        hw.set_angle(self.position as u8);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SystemConfig;

    struct RecordingHw {
        angles: Vec<u8>,
    }

    impl RecordingHw {
        fn new() -> Self {
            Self { angles: Vec::new() }
        }
    }

    impl ActuatorPort for RecordingHw {
        fn set_angle(&mut self, degrees: u8) {
            self.angles.push(degrees);
        }
        fn set_duty(&mut self, _duty: u8) {
            unreachable!("sweep driver never sets motor duty");
        }
    }

    fn driver() -> SweepDriver {
        SweepDriver::new(&SystemConfig::default())
    }

    /// Run the driver with a fixed request until `position` next reaches
    /// the minimum bound, advancing a simulated clock. Returns the time.
    fn run_to_min_bound(
        d: &mut SweepDriver,
        hw: &mut RecordingHw,
        request: u8,
        mode: Mode,
        mut now_ms: u32,
    ) -> u32 {
        // Leave the bound first if already on it.
        for _ in 0..400_000 {
            now_ms += 1;
            d.update(Duty::new(request), mode, now_ms, hw);
            if d.position() == i32::from(SystemConfig::default().servo_min_angle)
                && d.direction() == 1
            {
                return now_ms;
            }
        }
        panic!("never reached the minimum bound");
    }

    #[test]
    fn stopped_driver_adopts_target_immediately() {
        let mut d = driver();
        let mut hw = RecordingHw::new();
        d.update(Duty::new(200), Mode::Manual, 0, &mut hw);
        assert_eq!(d.cycle_duty(), 200, "no cycle wait when starting from rest");
    }

    #[test]
    fn zero_request_while_stopped_produces_no_motion() {
        let mut d = driver();
        let mut hw = RecordingHw::new();
        for t in 0..10_000u32 {
            d.update(Duty::new(0), Mode::Manual, t, &mut hw);
        }
        assert!(hw.angles.is_empty(), "stopped driver must not move or recentre");
    }

    #[test]
    fn running_driver_latches_changes_to_cycle_boundary() {
        let mut d = driver();
        let mut hw = RecordingHw::new();

        // Spin up at duty 50 and get away from the boundary.
        d.update(Duty::new(50), Mode::Manual, 0, &mut hw);
        assert_eq!(d.cycle_duty(), 50);
        let mut now = 1;
        for _ in 0..500 {
            now += 20;
            d.update(Duty::new(50), Mode::Manual, now, &mut hw);
        }

        // Request 200: pending only, until the min bound.
        d.update(Duty::new(200), Mode::Manual, now + 1, &mut hw);
        assert_eq!(d.pending_duty(), 200);
        assert_eq!(d.cycle_duty(), 50, "mid-cycle request must not take effect");

        run_to_min_bound(&mut d, &mut hw, 200, Mode::Manual, now + 1);
        // One boundary passed: at most the manual cap (30) applied.
        assert_eq!(d.cycle_duty(), 80, "one cycle moves duty by exactly the cap");
    }

    #[test]
    fn auto_mode_converges_slower_than_manual() {
        let cfg = SystemConfig::default();
        let mut d = SweepDriver::new(&cfg);
        let mut hw = RecordingHw::new();

        d.update(Duty::new(50), Mode::Auto, 0, &mut hw);
        let now = run_to_min_bound(&mut d, &mut hw, 200, Mode::Auto, 1);
        assert_eq!(
            d.cycle_duty(),
            50 + u8::from(cfg.auto_cycle_step),
            "auto cap is the smaller per-cycle budget"
        );
        let _ = now;
    }

    #[test]
    fn position_stays_within_bounds_and_reverses() {
        let cfg = SystemConfig::default();
        let mut d = SweepDriver::new(&cfg);
        let mut hw = RecordingHw::new();

        let mut now = 0u32;
        for _ in 0..300_000 {
            now += 1;
            d.update(Duty::new(255), Mode::Manual, now, &mut hw);
            assert!(d.position() >= i32::from(cfg.servo_min_angle));
            assert!(d.position() <= i32::from(cfg.servo_max_angle));
        }
        // A full run at top speed must have touched both bounds.
        assert!(hw.angles.contains(&cfg.servo_min_angle));
        assert!(hw.angles.contains(&cfg.servo_max_angle));
    }

    #[test]
    fn faster_duty_steps_more_often() {
        let cfg = SystemConfig::default();

        let mut slow = SweepDriver::new(&cfg);
        slow.cycle_duty = 1;
        let (slow_interval, _) = slow.step_timing();

        let mut fast = SweepDriver::new(&cfg);
        fast.cycle_duty = 255;
        let (fast_interval, _) = fast.step_timing();

        assert!(
            fast_interval < slow_interval,
            "duty 255 ({fast_interval} ms) must step faster than duty 1 ({slow_interval} ms)"
        );
    }

    #[test]
    fn converge_downward_respects_cap_and_target() {
        let mut d = driver();
        d.cycle_duty = 100;
        d.pending_duty = 85;
        d.resolve_cycle_duty(30);
        assert_eq!(d.cycle_duty, 85, "must not overshoot below the target");

        d.cycle_duty = 200;
        d.pending_duty = 50;
        d.resolve_cycle_duty(30);
        assert_eq!(d.cycle_duty, 170, "bounded by the cap");
    }
}
