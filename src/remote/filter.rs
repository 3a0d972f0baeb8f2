//! Command acceptance filter with address/protocol locking.
//!
//! The servo and motor drivers inject electrical noise into the IR
//! receiver's supply and ground, and a corrupted bitstream occasionally
//! decodes as a plausible frame. Two software layers suppress the ghosts:
//!
//! 1. only whitelisted command bytes pass at all;
//! 2. after the first legitimately-decoded non-repeat key press, the
//!    filter locks to that remote's (address, protocol) identity and
//!    rejects everything else for the life of the process.
//!
//! Rejection rules run in order; the first match wins. Rejected frames
//! cause no state change.

use log::{debug, info};

use super::keys;
use super::{IrCommand, IrProtocol};

/// The remote identity captured at lock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockIdentity {
    pub address: u16,
    pub protocol: IrProtocol,
}

/// Stateful gate in front of the decoded IR stream.
///
/// The lock transitions `None → Some` exactly once; there is no unlock
/// short of a restart.
pub struct CommandFilter {
    lock: Option<LockIdentity>,
}

impl CommandFilter {
    pub fn new() -> Self {
        Self { lock: None }
    }

    /// Whether the filter has pinned a remote identity yet.
    pub fn is_locked(&self) -> bool {
        self.lock.is_some()
    }

    /// The locked identity, once set.
    pub fn lock_identity(&self) -> Option<LockIdentity> {
        self.lock
    }

    /// Decide whether `event` is a trustworthy key press.
    ///
    /// Side effect: the first accepted non-repeat frame locks the filter
    /// to the frame's (address, protocol). Locking is idempotent — once
    /// `Some`, the identity never changes.
    pub fn accept(&mut self, event: &IrCommand) -> bool {
        // 1. Decode failure, unknown protocol, or receiver overflow.
        if !event.is_valid() {
            debug!("[IR] drop: invalid frame ({:?})", event.protocol);
            return false;
        }

        // 2. Not a key we know.
        if !keys::is_whitelisted(event.command) {
            debug!("[IR] drop: non-whitelisted cmd 0x{:02X}", event.command);
            return false;
        }

        // 3. Held-key repeats only pass for the speed step keys.
        if event.repeat && !keys::is_repeat_capable(event.command) {
            return false;
        }

        match self.lock {
            // 4. Locked: identity must match.
            Some(lock) => {
                if event.address != lock.address || event.protocol != lock.protocol {
                    debug!(
                        "[IR] drop: identity mismatch (addr=0x{:04X} proto={:?})",
                        event.address, event.protocol
                    );
                    return false;
                }
                true
            }
            // Unlocked: whitelisted keys pass; the first non-repeat
            // press pins the identity.
            None => {
                if !event.repeat {
                    self.lock = Some(LockIdentity {
                        address: event.address,
                        protocol: event.protocol,
                    });
                    info!(
                        "[IR] locked to protocol={:?} address=0x{:04X}",
                        event.protocol, event.address
                    );
                }
                true
            }
        }
    }
}
