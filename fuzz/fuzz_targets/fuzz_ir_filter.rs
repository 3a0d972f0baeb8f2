//! Fuzz target: `CommandFilter::accept`
//!
//! Unpacks arbitrary 8-byte chunks as IR frames and runs them through
//! the command filter, asserting the lock invariants: the identity is
//! pinned at most once and never changes afterwards.
//!
//! cargo fuzz run fuzz_ir_filter

#![no_main]

use libfuzzer_sys::fuzz_target;
use thermofan::remote::filter::CommandFilter;
use thermofan::remote::IrCommand;

fuzz_target!(|data: &[u8]| {
    let mut filter = CommandFilter::new();
    let mut first_lock = None;

    for chunk in data.chunks_exact(8) {
        let raw = u64::from_le_bytes(chunk.try_into().unwrap());
        let frame = IrCommand::unpack(raw);

        let accepted = filter.accept(&frame);
        if accepted {
            assert!(frame.is_valid(), "invalid frame must never be accepted");
        }

        match (first_lock, filter.lock_identity()) {
            (None, now) => first_lock = now,
            (Some(first), Some(now)) => {
                assert_eq!(first, now, "lock identity changed");
            }
            (Some(_), None) => panic!("filter unlocked itself"),
        }
    }
});
