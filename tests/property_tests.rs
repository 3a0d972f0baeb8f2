//! Property tests for the control core.
//!
//! Runs on host (x86_64) only — proptest is not available for ESP32
//! targets. On ESP32, these tests are compiled out.

#![cfg(not(target_os = "espidf"))]

use proptest::prelude::*;

use thermofan::app::ports::ActuatorPort;
use thermofan::config::SystemConfig;
use thermofan::control::curve::speed_for;
use thermofan::control::speed::Mode;
use thermofan::link::parse_command;
use thermofan::motion::sweep::SweepDriver;
use thermofan::motion::MotionDriver;
use thermofan::remote::filter::CommandFilter;
use thermofan::remote::{IrCommand, IrProtocol};
use thermofan::units::{Duty, SpeedPercent};

// ── Curve invariants ──────────────────────────────────────────

proptest! {
    /// The curve never decreases as temperature rises.
    #[test]
    fn curve_is_monotone(a in -50.0f32..60.0, b in -50.0f32..60.0) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(speed_for(lo) <= speed_for(hi));
    }

    /// Output is always a legal percent, for any input including junk.
    #[test]
    fn curve_output_in_range(t in proptest::num::f32::ANY) {
        let s = speed_for(t);
        prop_assert!(s <= 100);
    }
}

// ── Unit conversion invariants ────────────────────────────────

proptest! {
    #[test]
    fn percent_duty_round_trip_is_tight(p in 0i32..=100) {
        let back = SpeedPercent::clamped(p).to_duty().to_percent().get() as i32;
        prop_assert!((back - p).abs() <= 1, "{p}% round-tripped to {back}%");
    }

    #[test]
    fn clamping_is_total(v in proptest::num::i32::ANY) {
        prop_assert!(SpeedPercent::clamped(v).get() <= 100);
        // Duty::clamped covers the full u8 range; nothing to assert
        // beyond it not panicking.
        let _ = Duty::clamped(v);
    }
}

// ── Command filter invariants ─────────────────────────────────

fn arb_frame() -> impl Strategy<Value = IrCommand> {
    (
        0u8..7,
        any::<u16>(),
        any::<u8>(),
        any::<bool>(),
        prop::bool::weighted(0.05),
    )
        .prop_map(|(proto, address, command, repeat, overflow)| IrCommand {
            protocol: IrProtocol::from_u8(proto),
            address,
            command,
            repeat,
            overflow,
        })
}

proptest! {
    /// Once locked, the identity never changes, no matter what arrives.
    #[test]
    fn lock_identity_is_permanent(frames in proptest::collection::vec(arb_frame(), 1..200)) {
        let mut filter = CommandFilter::new();
        let mut locked_at: Option<_> = None;

        for frame in &frames {
            filter.accept(frame);
            match (locked_at, filter.lock_identity()) {
                (None, now) => locked_at = now,
                (Some(first), Some(now)) => prop_assert_eq!(first, now),
                (Some(_), None) => prop_assert!(false, "filter unlocked itself"),
            }
        }
    }

    /// After locking, frames from any other identity are rejected.
    #[test]
    fn locked_filter_rejects_strangers(
        stranger in arb_frame(),
    ) {
        let mut filter = CommandFilter::new();
        let owner = IrCommand {
            protocol: IrProtocol::Nec,
            address: 0xEF00,
            command: 0x16, // digit 1
            repeat: false,
            overflow: false,
        };
        prop_assert!(filter.accept(&owner));

        let mismatched =
            stranger.address != owner.address || stranger.protocol != owner.protocol;
        if mismatched {
            prop_assert!(!filter.accept(&stranger));
        }
    }
}

// ── Sweep driver invariants ───────────────────────────────────

struct NullHw;

impl ActuatorPort for NullHw {
    fn set_angle(&mut self, _degrees: u8) {}
    fn set_duty(&mut self, _duty: u8) {}
}

proptest! {
    /// Position stays inside the configured bounds under any request
    /// sequence, and the in-cycle duty only ever changes when the horn
    /// is at the minimum bound (or when starting from rest).
    #[test]
    fn sweep_bounds_and_latch_hold(
        requests in proptest::collection::vec((any::<u8>(), any::<bool>()), 1..50),
    ) {
        let cfg = SystemConfig::default();
        let mut driver = SweepDriver::new(&cfg);
        let mut hw = NullHw;
        let mut now: u32 = 0;

        for (duty, manual) in requests {
            let mode = if manual { Mode::Manual } else { Mode::Auto };
            for _ in 0..2_000 {
                now += 7;
                let before = driver.cycle_duty();
                driver.update(Duty::new(duty), mode, now, &mut hw);

                let pos = driver.position();
                prop_assert!(pos >= i32::from(cfg.servo_min_angle));
                prop_assert!(pos <= i32::from(cfg.servo_max_angle));

                let after = driver.cycle_duty();
                if after != before {
                    let at_boundary = pos == i32::from(cfg.servo_min_angle);
                    let from_rest = before == 0;
                    prop_assert!(
                        at_boundary || from_rest,
                        "duty changed {before}->{after} away from the cycle boundary"
                    );
                }
                prop_assert_eq!(driver.pending_duty(), duty);
            }
        }
    }
}

// ── Line parser robustness ────────────────────────────────────

proptest! {
    /// Arbitrary input never panics and never yields an out-of-range
    /// command after dispatch clamping.
    #[test]
    fn parser_is_total(line in ".*") {
        let _ = parse_command(&line);
    }

    #[test]
    fn speed_lines_round_trip(v in -1_000_000i32..1_000_000) {
        let line = format!("SPEED:{v}");
        match parse_command(&line) {
            Some(thermofan::app::commands::LinkCommand::SetSpeed(parsed)) => {
                prop_assert_eq!(parsed, v);
            }
            other => prop_assert!(false, "SPEED line failed to parse: {:?}", other),
        }
    }
}
