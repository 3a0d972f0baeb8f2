//! Line-delimited text codec for the telemetry/command link.
//!
//! The transport hands over raw bytes in whatever chunks it likes; the
//! [`LineAssembler`] accumulates them and yields complete lines,
//! tolerating `\r\n`, bare `\n`, and partial reads. Oversized or
//! non-UTF-8 lines are dropped whole — a garbled command is noise, not
//! an error.
//!
//! Inbound grammar (case-insensitive): `AUTO`, `MANUAL`,
//! `SPEED:<int>`. Anything else is ignored. Outbound is the one status
//! line, rendered by [`format_status`].

use core::fmt::Write;

use heapless::Vec;

use crate::app::commands::LinkCommand;
use crate::app::events::StatusReport;
use crate::app::ports::{LinkLine, MAX_LINE_LEN};
use crate::control::speed::Mode;

/// Streaming line assembler.
pub struct LineAssembler {
    buf: Vec<u8, MAX_LINE_LEN>,
    /// Currently discarding an oversized line until its terminator.
    overflowed: bool,
    dropped: u32,
}

impl LineAssembler {
    pub fn new() -> Self {
        Self {
            buf: Vec::new(),
            overflowed: false,
            dropped: 0,
        }
    }

    /// Feed one byte; returns a complete line when a terminator lands.
    ///
    /// Empty lines (and the `\n` of a `\r\n` pair) yield nothing.
    pub fn feed(&mut self, byte: u8) -> Option<LinkLine> {
        if byte == b'\n' || byte == b'\r' {
            let was_overflowed = core::mem::replace(&mut self.overflowed, false);
            let line = self.take_line(was_overflowed);
            self.buf.clear();
            return line;
        }

        if self.overflowed {
            return None;
        }
        if self.buf.push(byte).is_err() {
            // Line exceeds the buffer: drop the whole thing.
            self.overflowed = true;
            self.dropped = self.dropped.wrapping_add(1);
            self.buf.clear();
        }
        None
    }

    /// Lines dropped for being oversized or non-UTF-8.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    fn take_line(&mut self, was_overflowed: bool) -> Option<LinkLine> {
        if was_overflowed || self.buf.is_empty() {
            return None;
        }
        match core::str::from_utf8(&self.buf) {
            Ok(s) => {
                let mut line = LinkLine::new();
                // Cannot fail: buf capacity equals line capacity.
                let _ = line.push_str(s);
                Some(line)
            }
            Err(_) => {
                self.dropped = self.dropped.wrapping_add(1);
                None
            }
        }
    }
}

/// Parse one inbound line. `None` means "ignore" — the link never nacks.
pub fn parse_command(line: &str) -> Option<LinkCommand> {
    let line = line.trim();

    if line.eq_ignore_ascii_case("AUTO") {
        return Some(LinkCommand::SetMode(Mode::Auto));
    }
    if line.eq_ignore_ascii_case("MANUAL") {
        return Some(LinkCommand::SetMode(Mode::Manual));
    }

    // Compare the prefix as bytes: slicing the &str at a fixed index
    // would panic mid-character if a multi-byte sequence straddles it.
    const SPEED_PREFIX: &[u8] = b"SPEED:";
    if line.len() > SPEED_PREFIX.len()
        && line.as_bytes()[..SPEED_PREFIX.len()].eq_ignore_ascii_case(SPEED_PREFIX)
    {
        // The matched prefix is pure ASCII, so this slice is on a
        // character boundary.
        let value = line[SPEED_PREFIX.len()..].trim();
        if let Ok(v) = value.parse::<i32>() {
            return Some(LinkCommand::SetSpeed(v));
        }
    }

    None
}

/// Render the periodic status line.
///
/// Format (literal): `Temp: <T>C | Hum: <H>% | Set: <threshold>C |
/// Mode: <AUTO|MAN> | Speed: <percent>%`
pub fn format_status(report: &StatusReport) -> LinkLine {
    let mut line = LinkLine::new();
    // The fields cannot overflow a 160-byte line; a formatting error
    // would only truncate telemetry, which is fire-and-forget anyway.
    let _ = write!(
        line,
        "Temp: {:.1}C | Hum: {:.1}% | Set: {:.1}C | Mode: {} | Speed: {}%",
        report.temperature_c,
        report.humidity_pct,
        report.threshold_c,
        report.mode.tag(),
        report.speed_percent,
    );
    line
}
