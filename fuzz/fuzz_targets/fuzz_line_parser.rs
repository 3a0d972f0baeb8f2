//! Fuzz target: `LineAssembler::feed` + `parse_command`
//!
//! Drives arbitrary byte sequences into the streaming line assembler
//! and asserts that it never panics, never yields a line longer than
//! the configured maximum, and that every yielded line parses without
//! panicking.
//!
//! cargo fuzz run fuzz_line_parser

#![no_main]

use libfuzzer_sys::fuzz_target;
use thermofan::app::ports::MAX_LINE_LEN;
use thermofan::link::{parse_command, LineAssembler};

fuzz_target!(|data: &[u8]| {
    let mut assembler = LineAssembler::new();

    for &byte in data {
        if let Some(line) = assembler.feed(byte) {
            assert!(line.len() <= MAX_LINE_LEN, "line exceeds MAX_LINE_LEN");
            assert!(!line.is_empty(), "assembler must not yield empty lines");
            let _ = parse_command(&line);
        }
    }
});
