//! IR receiver: RMT capture plus NEC pulse-train decoding.
//!
//! The RMT peripheral timestamps mark/space edges at 1 µs resolution;
//! the receive-done callback runs in ISR context, decodes the pulse
//! train, and pushes a packed [`IrCommand`] onto the lock-free event
//! queue. The control loop pops it at its leisure and calls
//! [`IrReceiver::resume`] to re-arm the capture.
//!
//! The decoder itself ([`decode_nec`]) is pure arithmetic over
//! durations, so it runs (and is tested) on the host.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: real RMT capture feeding the event queue from the ISR.
//! On host/test: [`sim_inject_command`] feeds the same queue.

use crate::drivers::hw_init::HwInitError;
use crate::events;
use crate::remote::{IrCommand, IrProtocol};

// ── NEC pulse-train decoding (target-independent) ─────────────

/// One decoded NEC frame, before repeat-history resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NecFrame {
    /// Full 32-bit frame.
    Data {
        protocol: IrProtocol,
        address: u16,
        command: u8,
    },
    /// Held-key repeat burst; carries no payload of its own.
    Repeat,
}

const NEC_LEADER_MARK_US: u16 = 9000;
const NEC_LEADER_SPACE_US: u16 = 4500;
const NEC_REPEAT_SPACE_US: u16 = 2250;
const NEC_BIT_MARK_US: u16 = 560;
const NEC_ZERO_SPACE_US: u16 = 560;
const NEC_ONE_SPACE_US: u16 = 1690;

/// ±25% tolerance, same margin consumer decoder chips use.
fn near(duration: u16, target: u16) -> bool {
    let slack = target / 4;
    duration >= target - slack && duration <= target + slack
}

/// Decode a captured pulse train of `(mark_us, space_us)` pairs.
///
/// A data frame is the leader plus 32 bits, LSB first: address,
/// address-inverse (or the high address byte for extended NEC), then
/// command and command-inverse. A failed command checksum rejects the
/// frame outright.
pub fn decode_nec(pulses: &[(u16, u16)]) -> Option<NecFrame> {
    let (leader_mark, leader_space) = *pulses.first()?;
    if !near(leader_mark, NEC_LEADER_MARK_US) {
        return None;
    }

    if near(leader_space, NEC_REPEAT_SPACE_US) {
        return Some(NecFrame::Repeat);
    }
    if !near(leader_space, NEC_LEADER_SPACE_US) {
        return None;
    }

    let bits = pulses.get(1..33)?;
    let mut raw: u32 = 0;
    for (i, &(mark, space)) in bits.iter().enumerate() {
        if !near(mark, NEC_BIT_MARK_US) {
            return None;
        }
        if near(space, NEC_ONE_SPACE_US) {
            raw |= 1 << i;
        } else if !near(space, NEC_ZERO_SPACE_US) {
            // Final bit's trailing space is just the stop gap; only its
            // mark matters.
            if i != 31 {
                return None;
            }
        }
    }

    let addr_lo = (raw & 0xFF) as u8;
    let addr_hi = ((raw >> 8) & 0xFF) as u8;
    let command = ((raw >> 16) & 0xFF) as u8;
    let command_inv = ((raw >> 24) & 0xFF) as u8;

    if command != !command_inv {
        return None;
    }

    // Standard NEC sends the address byte twice, inverted; anything
    // else is the extended variant with a full 16-bit address.
    let (protocol, address) = if addr_hi == !addr_lo {
        (IrProtocol::Nec, u16::from(addr_lo))
    } else {
        (IrProtocol::NecExt, u16::from_le_bytes([addr_lo, addr_hi]))
    };

    Some(NecFrame::Data {
        protocol,
        address,
        command,
    })
}

// ── Receiver front-end ────────────────────────────────────────

/// Owner of the RMT RX channel. Decoded commands surface through the
/// shared event queue ([`events::pop_ir`]).
pub struct IrReceiver {
    /// Last full frame, echoed (with the repeat flag) for repeat bursts.
    last: Option<IrCommand>,
}

impl IrReceiver {
    pub fn new() -> Result<Self, HwInitError> {
        #[cfg(target_os = "espidf")]
        espidf::init()?;
        Ok(Self { last: None })
    }

    /// Pop the next decoded command, resolving repeat bursts against
    /// the previous full frame. A repeat with no history is dropped.
    pub fn try_decode(&mut self) -> Option<IrCommand> {
        loop {
            let event = events::pop_ir()?;
            if event.repeat {
                match self.last {
                    Some(prev) => {
                        return Some(IrCommand {
                            repeat: true,
                            ..prev
                        });
                    }
                    None => continue,
                }
            }
            self.last = Some(event);
            return Some(event);
        }
    }

    /// Re-arm the capture after a frame has been handled.
    pub fn resume(&mut self) {
        #[cfg(target_os = "espidf")]
        espidf::rearm();
    }
}

/// Host/test hook: inject a decoded command as if the ISR pushed it.
#[cfg(not(target_os = "espidf"))]
pub fn sim_inject_command(command: IrCommand) -> bool {
    events::push_ir(command)
}

// ── ESP-IDF RMT capture ───────────────────────────────────────

#[cfg(target_os = "espidf")]
mod espidf {
    use esp_idf_svc::sys::*;

    use super::{decode_nec, NecFrame};
    use crate::drivers::hw_init::HwInitError;
    use crate::events;
    use crate::pins;
    use crate::remote::{IrCommand, IrProtocol};

    const SYMBOL_BUF_LEN: usize = 64;

    // SAFETY invariant for all three statics: written once during
    // init() before the ISR is registered, then only read (handle) or
    // exclusively owned by the in-flight receive (buffer).
    static mut RX_CHANNEL: rmt_channel_handle_t = core::ptr::null_mut();
    static mut SYMBOLS: [rmt_symbol_word_t; SYMBOL_BUF_LEN] =
        [rmt_symbol_word_t { val: 0 }; SYMBOL_BUF_LEN];
    static mut RECEIVE_CFG: rmt_receive_config_t = rmt_receive_config_t {
        signal_range_min_ns: 2_000,       // reject glitches < 2 µs
        signal_range_max_ns: 12_000_000,  // idle after 12 ms of silence
        extra_flags: rmt_receive_config_t__bindgen_ty_1 { flags: 0 },
    };

    pub fn init() -> Result<(), HwInitError> {
        let chan_cfg = rmt_rx_channel_config_t {
            gpio_num: pins::IR_RECV_GPIO,
            clk_src: rmt_clock_source_t_RMT_CLK_SRC_DEFAULT,
            resolution_hz: 1_000_000, // 1 µs ticks, NEC timings direct
            mem_block_symbols: SYMBOL_BUF_LEN,
            ..Default::default()
        };

        // SAFETY: init() runs once from main before the control loop;
        // the statics are unobserved until the callback is registered.
        unsafe {
            let ret = rmt_new_rx_channel(&chan_cfg, &raw mut RX_CHANNEL);
            if ret != ESP_OK as i32 {
                return Err(HwInitError::RmtInitFailed(ret));
            }

            let callbacks = rmt_rx_event_callbacks_t {
                on_recv_done: Some(on_recv_done),
            };
            let ret = rmt_rx_register_event_callbacks(
                RX_CHANNEL,
                &callbacks,
                core::ptr::null_mut(),
            );
            if ret != ESP_OK as i32 {
                return Err(HwInitError::RmtInitFailed(ret));
            }

            let ret = rmt_enable(RX_CHANNEL);
            if ret != ESP_OK as i32 {
                return Err(HwInitError::RmtInitFailed(ret));
            }
        }

        rearm();
        log::info!("ir_recv: RMT RX armed on GPIO{}", pins::IR_RECV_GPIO);
        Ok(())
    }

    /// Start (or restart) a capture into the symbol buffer.
    pub fn rearm() {
        // SAFETY: channel handle is init-once; the buffer is owned by
        // the hardware until the next on_recv_done fires.
        unsafe {
            rmt_receive(
                RX_CHANNEL,
                SYMBOLS.as_mut_ptr() as *mut core::ffi::c_void,
                core::mem::size_of::<[rmt_symbol_word_t; SYMBOL_BUF_LEN]>(),
                &raw const RECEIVE_CFG,
            );
        }
    }

    /// ISR context. No allocation, no locking, no logging.
    unsafe extern "C" fn on_recv_done(
        _channel: rmt_channel_handle_t,
        edata: *const rmt_rx_done_event_data_t,
        _user: *mut core::ffi::c_void,
    ) -> bool {
        // SAFETY: edata points at ISR-owned event data valid for the
        // duration of the callback.
        let data = unsafe { &*edata };
        let n = (data.num_symbols as usize).min(SYMBOL_BUF_LEN);

        let mut pulses = [(0u16, 0u16); SYMBOL_BUF_LEN];
        for i in 0..n {
            // SAFETY: received_symbols covers num_symbols entries.
            let sym = unsafe { *data.received_symbols.add(i) };
            // SAFETY: union read; the bitfield view is always valid.
            let (d0, d1) = unsafe {
                (
                    sym.__bindgen_anon_1.duration0() as u16,
                    sym.__bindgen_anon_1.duration1() as u16,
                )
            };
            pulses[i] = (d0, d1);
        }

        let command = match decode_nec(&pulses[..n]) {
            Some(NecFrame::Data {
                protocol,
                address,
                command,
            }) => IrCommand {
                protocol,
                address,
                command,
                repeat: false,
                overflow: false,
            },
            Some(NecFrame::Repeat) => IrCommand {
                protocol: IrProtocol::Nec,
                address: 0,
                command: 0,
                repeat: true,
                overflow: false,
            },
            // Undecodable noise: surface nothing, just re-arm later.
            None => return false,
        };

        // Queue full is fine; the frame is simply lost.
        events::push_ir(command);
        false
    }
}
