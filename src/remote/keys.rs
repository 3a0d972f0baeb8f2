//! Remote key map: whitelisted NEC command bytes and their meanings.
//!
//! These are the command bytes of the common 21-key NEC remote shipped
//! with the unit. A different remote needs this table updated — watch
//! the `[IR]` log lines for the codes it actually sends.

use crate::units::SpeedPercent;

// ── Command bytes ─────────────────────────────────────────────

pub const CMD_DIGIT_0: u8 = 0x42;
pub const CMD_DIGIT_1: u8 = 0x16;
pub const CMD_DIGIT_2: u8 = 0x19;
pub const CMD_DIGIT_3: u8 = 0x0D;
pub const CMD_DIGIT_4: u8 = 0x0C;
pub const CMD_DIGIT_5: u8 = 0x18;
pub const CMD_DIGIT_6: u8 = 0x5E;
pub const CMD_DIGIT_7: u8 = 0x08;
pub const CMD_DIGIT_8: u8 = 0x1C;
pub const CMD_DIGIT_9: u8 = 0x5A;

/// VOL- — step speed down.
pub const CMD_SPEED_DOWN: u8 = 0x07;
/// VOL+ — step speed up.
pub const CMD_SPEED_UP: u8 = 0x09;
/// "100+" — jump straight to full speed.
pub const CMD_FULL_SPEED: u8 = 0x4A;
/// "200+" — toggle AUTO/MANUAL.
pub const CMD_MODE_TOGGLE: u8 = 0x45;

/// Step size for the speed up/down keys, in percent.
pub const SPEED_STEP_PERCENT: i32 = 10;

/// What an accepted key press asks the speed controller to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Set an absolute speed (digits and the 100+ key). Forces manual.
    SetPercent(SpeedPercent),
    /// Bump speed by a signed percent delta (volume keys). Forces manual.
    Adjust(i32),
    /// Flip AUTO ↔ MANUAL without touching the speed.
    ToggleMode,
}

/// Whitelist membership check — anything else is receiver noise.
pub fn is_whitelisted(command: u8) -> bool {
    matches!(
        command,
        CMD_DIGIT_0
            | CMD_DIGIT_1
            | CMD_DIGIT_2
            | CMD_DIGIT_3
            | CMD_DIGIT_4
            | CMD_DIGIT_5
            | CMD_DIGIT_6
            | CMD_DIGIT_7
            | CMD_DIGIT_8
            | CMD_DIGIT_9
            | CMD_SPEED_DOWN
            | CMD_SPEED_UP
            | CMD_FULL_SPEED
            | CMD_MODE_TOGGLE
    )
}

/// The only keys allowed to act on held-key repeat frames.
pub fn is_repeat_capable(command: u8) -> bool {
    command == CMD_SPEED_UP || command == CMD_SPEED_DOWN
}

/// Map an accepted command byte to its action.
///
/// Digit and full-speed keys only act on the initial press (`!repeat`);
/// the filter already drops their repeats, but the guard is kept here so
/// the table is correct on its own. Volume keys act on every frame so a
/// held key ramps continuously.
pub fn action_for(command: u8, repeat: bool) -> Option<KeyAction> {
    let digit_percent = |p: i32| Some(KeyAction::SetPercent(SpeedPercent::clamped(p)));

    match command {
        CMD_SPEED_UP => Some(KeyAction::Adjust(SPEED_STEP_PERCENT)),
        CMD_SPEED_DOWN => Some(KeyAction::Adjust(-SPEED_STEP_PERCENT)),
        CMD_MODE_TOGGLE => Some(KeyAction::ToggleMode),
        _ if repeat => None,
        CMD_DIGIT_0 => digit_percent(0),
        CMD_DIGIT_1 => digit_percent(10),
        CMD_DIGIT_2 => digit_percent(20),
        CMD_DIGIT_3 => digit_percent(30),
        CMD_DIGIT_4 => digit_percent(40),
        CMD_DIGIT_5 => digit_percent(50),
        CMD_DIGIT_6 => digit_percent(60),
        CMD_DIGIT_7 => digit_percent(70),
        CMD_DIGIT_8 => digit_percent(80),
        CMD_DIGIT_9 => digit_percent(90),
        CMD_FULL_SPEED => digit_percent(100),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_map_to_tens() {
        for (cmd, pct) in [
            (CMD_DIGIT_0, 0),
            (CMD_DIGIT_3, 30),
            (CMD_DIGIT_9, 90),
            (CMD_FULL_SPEED, 100),
        ] {
            assert_eq!(
                action_for(cmd, false),
                Some(KeyAction::SetPercent(SpeedPercent::clamped(pct)))
            );
        }
    }

    #[test]
    fn digits_ignore_repeat_frames() {
        assert_eq!(action_for(CMD_DIGIT_5, true), None);
        assert_eq!(action_for(CMD_FULL_SPEED, true), None);
    }

    #[test]
    fn volume_keys_act_on_repeat() {
        assert_eq!(action_for(CMD_SPEED_UP, true), Some(KeyAction::Adjust(10)));
        assert_eq!(action_for(CMD_SPEED_DOWN, true), Some(KeyAction::Adjust(-10)));
    }

    #[test]
    fn only_volume_keys_are_repeat_capable() {
        assert!(is_repeat_capable(CMD_SPEED_UP));
        assert!(is_repeat_capable(CMD_SPEED_DOWN));
        assert!(!is_repeat_capable(CMD_MODE_TOGGLE));
        assert!(!is_repeat_capable(CMD_DIGIT_1));
    }

    #[test]
    fn unknown_code_is_not_whitelisted() {
        assert!(!is_whitelisted(0x69));
        assert_eq!(action_for(0x69, false), None);
    }
}
