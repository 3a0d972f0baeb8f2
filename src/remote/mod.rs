//! Infrared remote input: decoded command model, key map, and the
//! accept/lock filter that stands between the noisy receiver and the
//! speed controller.

pub mod filter;
pub mod keys;

/// Decoded IR protocol family.
///
/// `Unknown` means the decoder could not classify the frame — always
/// treated as noise and rejected by the [`filter::CommandFilter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum IrProtocol {
    Unknown = 0,
    Nec = 1,
    NecExt = 2,
    Sony = 3,
    Rc5 = 4,
    Rc6 = 5,
    Samsung = 6,
}

impl IrProtocol {
    pub fn from_u8(raw: u8) -> Self {
        match raw {
            1 => Self::Nec,
            2 => Self::NecExt,
            3 => Self::Sony,
            4 => Self::Rc5,
            5 => Self::Rc6,
            6 => Self::Samsung,
            _ => Self::Unknown,
        }
    }
}

/// One decoded IR frame, produced by the receiver ISR and consumed
/// exactly once by the command filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IrCommand {
    pub protocol: IrProtocol,
    /// Remote address word (16-bit in NEC extended).
    pub address: u16,
    /// Command byte identifying the pressed key.
    pub command: u8,
    /// True for the held-key repeat frames a remote emits every ~110 ms.
    pub repeat: bool,
    /// True if the receiver ring buffer overflowed while decoding.
    pub overflow: bool,
}

impl IrCommand {
    /// Decode succeeded and the frame is trustworthy enough to inspect.
    pub fn is_valid(&self) -> bool {
        self.protocol != IrProtocol::Unknown && !self.overflow
    }

    /// Pack into a `u64` for the lock-free ISR→loop queue.
    ///
    /// Layout: `[0..16 address][16..24 protocol][24..32 command]
    /// [32 repeat][33 overflow]`.
    pub fn pack(&self) -> u64 {
        u64::from(self.address)
            | (u64::from(self.protocol as u8) << 16)
            | (u64::from(self.command) << 24)
            | (u64::from(self.repeat) << 32)
            | (u64::from(self.overflow) << 33)
    }

    /// Inverse of [`pack`](Self::pack).
    pub fn unpack(raw: u64) -> Self {
        Self {
            address: (raw & 0xFFFF) as u16,
            protocol: IrProtocol::from_u8(((raw >> 16) & 0xFF) as u8),
            command: ((raw >> 24) & 0xFF) as u8,
            repeat: (raw >> 32) & 1 == 1,
            overflow: (raw >> 33) & 1 == 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_unpack_is_lossless() {
        let cmd = IrCommand {
            protocol: IrProtocol::Nec,
            address: 0xEF00,
            command: 0x45,
            repeat: true,
            overflow: false,
        };
        assert_eq!(IrCommand::unpack(cmd.pack()), cmd);
    }

    #[test]
    fn unknown_protocol_survives_packing() {
        let cmd = IrCommand {
            protocol: IrProtocol::Unknown,
            address: 0,
            command: 0x16,
            repeat: false,
            overflow: true,
        };
        let back = IrCommand::unpack(cmd.pack());
        assert_eq!(back.protocol, IrProtocol::Unknown);
        assert!(back.overflow);
        assert!(!back.is_valid());
    }
}
