//! Inbound commands from the serial/radio link.
//!
//! IR key presses arrive separately as
//! [`KeyAction`](crate::remote::keys::KeyAction)s through the command
//! filter; these are the line-protocol equivalents a remote terminal
//! sends.

use crate::control::speed::Mode;

/// Parsed inbound link line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkCommand {
    /// `AUTO` / `MANUAL` — set the mode without touching the speed.
    SetMode(Mode),
    /// `SPEED:<int>` — set an absolute speed. The raw value's unit
    /// (duty or percent) is a configuration decision; it is clamped at
    /// dispatch, never rejected.
    SetSpeed(i32),
}
