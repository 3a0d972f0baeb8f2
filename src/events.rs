//! ISR→loop handoff queue for decoded IR events.
//!
//! The RMT receive ISR decodes a frame, packs it to a `u64`
//! ([`IrCommand::pack`]), and pushes it here; the main control loop is
//! the only consumer. This keeps the single-writer property of the
//! controller state intact — interrupt context never touches the speed
//! controller or the lock filter directly.
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ RMT RX ISR  │────▶│  IR Queue    │────▶│  Main Loop   │
//! │ (producer)  │     │  (lock-free) │     │  (consumer)  │
//! └─────────────┘     └──────────────┘     └──────────────┘
//! ```

use core::sync::atomic::{AtomicU8, AtomicU64, Ordering};

use crate::remote::IrCommand;

/// Maximum number of pending decoded frames.
/// Power of 2 for cheap ring-buffer modulo.
const IR_QUEUE_CAP: usize = 8;

// ── Lock-free SPSC ring buffer ────────────────────────────────
//
// ISR writes (produces), main loop reads (consumes). Each slot is an
// AtomicU64 holding a packed IrCommand; head/tail indices enforce the
// SPSC discipline.

static IR_HEAD: AtomicU8 = AtomicU8::new(0);
static IR_TAIL: AtomicU8 = AtomicU8::new(0);
static IR_SLOTS: [AtomicU64; IR_QUEUE_CAP] = [const { AtomicU64::new(0) }; IR_QUEUE_CAP];

/// Push a decoded frame into the queue.
/// Safe to call from ISR context (lock-free).
/// Returns `false` if the queue is full (frame dropped — a dropped
/// key press is recoverable, the user presses again).
pub fn push_ir(cmd: IrCommand) -> bool {
    let head = IR_HEAD.load(Ordering::Relaxed);
    let tail = IR_TAIL.load(Ordering::Acquire);
    let next_head = (head + 1) % IR_QUEUE_CAP as u8;

    if next_head == tail {
        return false; // Queue full — drop event.
    }

    IR_SLOTS[head as usize].store(cmd.pack(), Ordering::Relaxed);
    IR_HEAD.store(next_head, Ordering::Release);
    true
}

/// Pop the next decoded frame.
/// Called from the main loop (single consumer).
pub fn pop_ir() -> Option<IrCommand> {
    let tail = IR_TAIL.load(Ordering::Relaxed);
    let head = IR_HEAD.load(Ordering::Acquire);

    if tail == head {
        return None; // Empty.
    }

    let raw = IR_SLOTS[tail as usize].load(Ordering::Relaxed);
    IR_TAIL.store((tail + 1) % IR_QUEUE_CAP as u8, Ordering::Release);

    Some(IrCommand::unpack(raw))
}

/// Number of pending frames.
pub fn queue_len() -> usize {
    let head = IR_HEAD.load(Ordering::Relaxed) as usize;
    let tail = IR_TAIL.load(Ordering::Relaxed) as usize;
    (head + IR_QUEUE_CAP - tail) % IR_QUEUE_CAP
}

/// The queue statics are process-wide; tests touching them serialise
/// through this guard, which also drains leftovers from earlier tests.
#[cfg(test)]
pub fn tests_lock() -> std::sync::MutexGuard<'static, ()> {
    static TEST_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
    let guard = TEST_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    while pop_ir().is_some() {}
    guard
}
