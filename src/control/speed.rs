//! Mode and speed state shared between automatic and manual control.
//!
//! `SpeedController` is the single owner of the controller state; the
//! motion driver and the status reporter read it once per tick. Every
//! operation is total — out-of-range inputs clamp, they never fail.

use log::info;

use super::curve;
use crate::units::{Duty, SpeedPercent};

/// Who decides the fan speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// The temperature curve drives the speed.
    #[default]
    Auto,
    /// The last explicit command drives the speed.
    Manual,
}

impl Mode {
    /// Short tag used in the status line (`AUTO` / `MAN`).
    pub fn tag(self) -> &'static str {
        match self {
            Self::Auto => "AUTO",
            Self::Manual => "MAN",
        }
    }
}

/// Owner of `{ mode, speed }`.
#[derive(Debug, Default)]
pub struct SpeedController {
    mode: Mode,
    speed: SpeedPercent,
}

impl SpeedController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn percent(&self) -> SpeedPercent {
        self.speed
    }

    /// Current speed in driver-native duty units.
    pub fn duty(&self) -> Duty {
        self.speed.to_duty()
    }

    /// Set an absolute speed. Clamps into 0–100 and forces manual mode —
    /// an explicit speed command always wins over the curve.
    pub fn set_percent(&mut self, percent: i32) {
        self.mode = Mode::Manual;
        self.speed = SpeedPercent::clamped(percent);
        info!("[SPD] set {}% (manual)", self.speed.get());
    }

    /// Bump the speed by a signed delta; clamping absorbs over/underflow.
    pub fn adjust_percent(&mut self, delta: i32) {
        self.set_percent(i32::from(self.speed.get()) + delta);
    }

    /// Pure mode assignment; the speed is untouched.
    pub fn set_mode(&mut self, mode: Mode) {
        if self.mode != mode {
            self.mode = mode;
            info!("[SPD] mode -> {}", mode.tag());
        }
    }

    /// Flip AUTO ↔ MANUAL.
    pub fn toggle_mode(&mut self) {
        let next = match self.mode {
            Mode::Auto => Mode::Manual,
            Mode::Manual => Mode::Auto,
        };
        self.set_mode(next);
    }

    /// Feed a temperature sample into the automatic path.
    ///
    /// No-op when in manual mode or when the sample is NaN (failed
    /// sensor read) — the previous speed is retained either way. Never
    /// switches mode.
    pub fn apply_automatic(&mut self, temp_c: f32) {
        if self.mode == Mode::Manual || temp_c.is_nan() {
            return;
        }
        self.speed = SpeedPercent::clamped(i32::from(curve::speed_for(temp_c)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_percent_clamps_and_forces_manual() {
        let mut c = SpeedController::new();
        assert_eq!(c.mode(), Mode::Auto);
        c.set_percent(150);
        assert_eq!(c.percent().get(), 100);
        assert_eq!(c.mode(), Mode::Manual);
    }

    #[test]
    fn adjust_saturates_instead_of_wrapping() {
        let mut c = SpeedController::new();
        c.set_percent(95);
        c.adjust_percent(10);
        assert_eq!(c.percent().get(), 100);
        c.set_percent(5);
        c.adjust_percent(-10);
        assert_eq!(c.percent().get(), 0);
    }

    #[test]
    fn toggle_mode_leaves_speed_alone() {
        let mut c = SpeedController::new();
        c.set_percent(40);
        assert_eq!(c.mode(), Mode::Manual);
        c.toggle_mode();
        assert_eq!(c.mode(), Mode::Auto);
        assert_eq!(c.percent().get(), 40);
    }

    #[test]
    fn automatic_path_ignored_in_manual_mode() {
        let mut c = SpeedController::new();
        c.set_percent(40);
        c.apply_automatic(33.0);
        assert_eq!(c.percent().get(), 40, "manual speed must survive a hot sample");
    }

    #[test]
    fn automatic_path_follows_curve_in_auto() {
        let mut c = SpeedController::new();
        c.apply_automatic(30.5);
        assert_eq!(c.mode(), Mode::Auto);
        assert_eq!(c.percent().get(), 45);
    }

    #[test]
    fn nan_sample_retains_previous_speed() {
        let mut c = SpeedController::new();
        c.apply_automatic(31.5);
        assert_eq!(c.percent().get(), 70);
        c.apply_automatic(f32::NAN);
        assert_eq!(c.percent().get(), 70);
    }
}
