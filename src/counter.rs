//! Torn-read-safe access to the 47-bit secure real-time counter.
//!
//! The counter lives in two 32-bit registers that the hardware updates
//! asynchronously: the pair can change between the two reads, and a single
//! register can be observed in a partially modified state. Every read here
//! re-samples until two consecutive samples are bit-identical, bounded by
//! [`PollConfig::stable_read_attempts`].

use crate::backend::RegisterBackend;
use crate::config::PollConfig;
use crate::registers::{CNTR_TO_SECS_SHIFT, LPSRTCLR, LPSRTCMR};
use crate::RtcError;

#[inline]
fn read_once<B: RegisterBackend>(backend: &B) -> u64 {
    let msb = backend.read(LPSRTCMR);
    let lsb = backend.read(LPSRTCLR);
    (msb as u64) << 32 | lsb as u64
}

/// Read the raw 47-bit counter value.
pub fn read_raw<B: RegisterBackend>(backend: &B, cfg: &PollConfig) -> Result<u64, RtcError> {
    let mut read1 = read_once(backend);
    for _ in 0..cfg.stable_read_attempts {
        let read2 = read1;
        read1 = read_once(backend);
        if read1 == read2 {
            return Ok(read1);
        }
        cfg.relax();
    }

    log::error!(
        "snvs-rtc: no stable counter read within {} attempts",
        cfg.stable_read_attempts
    );
    Err(RtcError::TimedOut)
}

/// Current counter value as epoch seconds.
pub fn read_seconds<B: RegisterBackend>(backend: &B, cfg: &PollConfig) -> Result<u32, RtcError> {
    Ok((read_raw(backend, cfg)? >> CNTR_TO_SECS_SHIFT) as u32)
}

/// Read only the low counter register, with the same stabilization scheme.
///
/// Cheaper than [`read_raw`]; only suitable for observing tick progression,
/// never for the authoritative time.
pub fn read_lsb<B: RegisterBackend>(backend: &B, cfg: &PollConfig) -> Result<u32, RtcError> {
    let mut count1 = backend.read(LPSRTCLR);
    for _ in 0..cfg.stable_read_attempts {
        let count2 = count1;
        count1 = backend.read(LPSRTCLR);
        if count1 == count2 {
            return Ok(count1);
        }
        cfg.relax();
    }

    log::error!(
        "snvs-rtc: no stable LSB read within {} attempts",
        cfg.stable_read_attempts
    );
    Err(RtcError::TimedOut)
}

/// Block until the counter has visibly advanced by [`PollConfig::min_ticks`].
///
/// The LP registers take a few 32.768 kHz cycles to latch a write; a write
/// is not guaranteed visible to a subsequent read before then, so any
/// operation that writes and then depends on the new value must pass
/// through here first. The elapsed delta is computed with wrapping
/// subtraction, so a rollover of the low register between samples still
/// yields the correct count.
pub fn wait_write_sync<B: RegisterBackend>(backend: &B, cfg: &PollConfig) -> Result<(), RtcError> {
    let baseline = read_lsb(backend, cfg)?;
    for _ in 0..cfg.tick_wait_attempts {
        let current = read_lsb(backend, cfg)?;
        if current.wrapping_sub(baseline) >= cfg.min_ticks {
            return Ok(());
        }
        cfg.relax();
    }

    log::error!(
        "snvs-rtc: counter did not advance {} ticks within {} attempts",
        cfg.min_ticks,
        cfg.tick_wait_attempts
    );
    Err(RtcError::TimedOut)
}
