use core::marker::PhantomData;
use core::time::Duration;
use embedded_hal::digital::InputPin;

use crate::error::Error;
use crate::frame::{RawFrame, FRAME_BITS};

/// Upper bound on sampled transitions: the acknowledgment plus two per bit, with slack.
pub const MAX_TRANSITIONS: u8 = 85;

/// Transitions before the first data bit: host release, ACK low, ACK high and
/// the low half of bit 0.
const PREAMBLE_TRANSITIONS: u8 = 4;

/// High half-cycles longer than this decode to a 1.
///
/// The datasheet gives 26-28us for a 0 and 70us for a 1.
pub const ONE_BIT_THRESHOLD: Duration = Duration::from_micros(40);

/// The longest the line may hold one level before the capture is abandoned.
pub const MAX_HALF_CYCLE: Duration = Duration::from_micros(255);

/// Interrupts stay disabled for as long as this guard lives.
///
/// Any preemption while sampling stretches the measured half-cycles and
/// corrupts the decoded bits. The guard is `!Send` and only ever created by
/// [`without_interrupts`], so it cannot outlive the closure it protects.
struct InterruptGuard {
    restore_state: critical_section::RestoreState,
    _not_send: PhantomData<*const ()>,
}

impl InterruptGuard {
    fn acquire() -> InterruptGuard {
        // SAFETY: the state is restored exactly once, in `drop`, and the guard
        // never leaves the stack frame of `without_interrupts`.
        let restore_state = unsafe { critical_section::acquire() };
        InterruptGuard {
            restore_state,
            _not_send: PhantomData,
        }
    }
}

impl Drop for InterruptGuard {
    fn drop(&mut self) {
        // SAFETY: paired with the `acquire` in `InterruptGuard::acquire`.
        unsafe { critical_section::release(self.restore_state) }
    }
}

/// Runs `f` with interrupts disabled and restores them on every exit path,
/// including panics and early returns inside `f`.
///
/// Keep `f` to the timing-critical work: anything that may block, such as
/// logging, belongs after this returns.
pub(crate) fn without_interrupts<R>(f: impl FnOnce() -> R) -> R {
    let _interrupts = InterruptGuard::acquire();
    f()
}

/// Samples the sensor's answer on a released line and packs it into a frame.
///
/// Every half-cycle is timed with the injected clock. Even transitions from
/// the 4th on are the high halves of data bits; their length decides the bit
/// value. The checksum is not checked here.
///
/// Returns [`Error::Timeout`] if the line sticks before any data bit was seen,
/// and [`Error::IncompleteFrame`] if it sticks part way through the frame.
///
/// Nothing is logged from here, so the caller may hold interrupts off for the
/// whole call.
pub fn sample_frame<TInput, TError, TimeFn, ElapsedFn, TTime>(
    input_pin: &mut TInput,
    time_fn: &TimeFn,
    elapsed_since_fn: &ElapsedFn,
) -> Result<RawFrame, Error<TError>>
where
    TInput: InputPin<Error = TError>,
    TimeFn: Fn() -> TTime,
    ElapsedFn: Fn(TTime) -> Duration,
    TTime: Copy,
{
    let mut frame = RawFrame::default();
    let mut bits = 0u8;
    // The released line is pulled up.
    let mut last_level = true;

    for transition in 0..MAX_TRANSITIONS {
        if bits == FRAME_BITS {
            break;
        }

        let start = time_fn();
        let (level, half_cycle) = loop {
            let level = input_pin.is_high()?;
            let half_cycle = elapsed_since_fn(start);
            if half_cycle > MAX_HALF_CYCLE {
                return Err(stalled(transition, bits));
            }
            if level != last_level {
                break (level, half_cycle);
            }
        };
        last_level = level;

        if transition >= PREAMBLE_TRANSITIONS && transition % 2 == 0 {
            frame.push_bit(bits, half_cycle > ONE_BIT_THRESHOLD);
            bits += 1;
        }
    }

    if bits < FRAME_BITS {
        return Err(Error::IncompleteFrame { bits });
    }
    Ok(frame)
}

fn stalled<TError>(transition: u8, bits: u8) -> Error<TError> {
    if bits == 0 {
        Error::Timeout { transition }
    } else {
        Error::IncompleteFrame { bits }
    }
}
