//! Fuzz target: `decode_nec`
//!
//! Interprets arbitrary bytes as a captured pulse train and asserts the
//! decoder never panics and only yields frames with a consistent
//! protocol classification.
//!
//! cargo fuzz run fuzz_nec_decoder

#![no_main]

use libfuzzer_sys::fuzz_target;
use thermofan::drivers::ir_recv::{decode_nec, NecFrame};
use thermofan::remote::IrProtocol;

fuzz_target!(|data: &[u8]| {
    let pulses: Vec<(u16, u16)> = data
        .chunks_exact(4)
        .map(|c| {
            (
                u16::from_le_bytes([c[0], c[1]]),
                u16::from_le_bytes([c[2], c[3]]),
            )
        })
        .collect();

    if let Some(NecFrame::Data { protocol, .. }) = decode_nec(&pulses) {
        assert!(
            matches!(protocol, IrProtocol::Nec | IrProtocol::NecExt),
            "NEC decoder produced a non-NEC protocol"
        );
    }
});
