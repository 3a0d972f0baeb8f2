//! Piecewise-linear temperature → fan speed curve.
//!
//! Breakpoints (°C → percent):
//!
//! | range        | output        |
//! |--------------|---------------|
//! | t < 28       | 0             |
//! | 28 ≤ t < 29  | linear 0→10   |
//! | 29 ≤ t < 30  | linear 10→30  |
//! | 30 ≤ t < 31  | linear 30→60  |
//! | 31 ≤ t ≤ 32  | linear 60→80  |
//! | t > 32       | 100           |
//!
//! Exactly 32 °C yields 80; only above 32 jumps to 100. The step is kept
//! as tuned on the bench rather than smoothed.

const T_IDLE: f32 = 28.0;
const T_LOW: f32 = 29.0;
const T_MID: f32 = 30.0;
const T_HIGH: f32 = 31.0;
const T_FULL: f32 = 32.0;

/// Target speed percent for a temperature sample. Pure, total.
///
/// NaN maps to 0; callers are expected to gate NaN out before the value
/// reaches the automatic path (a failed sensor read skips the update
/// entirely), so the 0 is belt-and-braces.
pub fn speed_for(t_c: f32) -> u8 {
    if t_c.is_nan() {
        return 0;
    }
    if t_c < T_IDLE {
        return 0;
    }
    if t_c > T_FULL {
        return 100;
    }
    if t_c < T_LOW {
        return lerp_percent(t_c, T_IDLE, T_LOW, 0, 10);
    }
    if t_c < T_MID {
        return lerp_percent(t_c, T_LOW, T_MID, 10, 30);
    }
    if t_c < T_HIGH {
        return lerp_percent(t_c, T_MID, T_HIGH, 30, 60);
    }
    lerp_percent(t_c, T_HIGH, T_FULL, 60, 80)
}

/// Segment interpolation with round-half-up, clamped into 0–100.
fn lerp_percent(x: f32, a: f32, b: f32, pa: i32, pb: i32) -> u8 {
    let denom = b - a;
    let f = if denom == 0.0 {
        0.0
    } else {
        ((x - a) / denom).clamp(0.0, 1.0)
    };
    let pf = pa as f32 + f * (pb - pa) as f32;
    ((pf + 0.5) as i32).clamp(0, 100) as u8
}
