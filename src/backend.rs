//! Register access backends.
//!
//! The SNVS LP window is reached either through a direct memory mapping or
//! through the secure monitor, which relays register operations as 32-bit
//! fast calls into the trusted execution environment. The backend is chosen
//! once at construction and fixed for the device's lifetime.

use core::ptr::{read_volatile, write_volatile};

use crate::registers::{LPCR, LP_WINDOW_OFFSET};
use crate::RtcError;

/// Register read/write capability over the SNVS LP window.
///
/// Offsets are the logical LP offsets from [`crate::registers`]; each
/// implementation applies the window rebase itself.
pub trait RegisterBackend {
    fn read(&self, offset: u32) -> u32;

    fn write(&self, offset: u32, value: u32);

    /// Set or clear `mask` in the control register, leaving the other bits
    /// untouched.
    ///
    /// The default is a read-modify-write through `read`/`write`; the
    /// secure proxy overrides it with a dedicated opcode so the
    /// modification happens in the secure world.
    fn update_control(&self, mask: u32, set: bool) {
        let old = self.read(LPCR);
        let new = if set { old | mask } else { old & !mask };
        self.write(LPCR, new);
    }
}

/// Direct memory-mapped access.
pub struct MmioBackend {
    base: usize,
}

impl MmioBackend {
    /// # Safety
    ///
    /// `base` must point at the start of the SNVS block, mapped for
    /// volatile 32-bit device access and valid for the backend's lifetime.
    pub const unsafe fn new(base: usize) -> Self {
        MmioBackend { base }
    }

    #[inline]
    fn addr(&self, offset: u32) -> *mut u32 {
        (self.base + (LP_WINDOW_OFFSET + offset) as usize) as *mut u32
    }
}

impl RegisterBackend for MmioBackend {
    #[inline]
    fn read(&self, offset: u32) -> u32 {
        unsafe { read_volatile(self.addr(offset)) }
    }

    #[inline]
    fn write(&self, offset: u32, value: u32) {
        unsafe { write_volatile(self.addr(offset), value) }
    }
}

const SMC_ENTITY_SNVS_RTC: u32 = 53;

/// Fast-call function identifier: fastcall bit, entity, function number.
const fn smc_fastcall_nr(entity: u32, func: u32) -> u32 {
    (1 << 31) | ((entity & 0x3f) << 24) | (func & 0xffff)
}

const SMC_SNVS_PROBE: u32 = smc_fastcall_nr(SMC_ENTITY_SNVS_RTC, 0);
const SMC_SNVS_REGS_OP: u32 = smc_fastcall_nr(SMC_ENTITY_SNVS_RTC, 1);
const SMC_SNVS_LPCR_OP: u32 = smc_fastcall_nr(SMC_ENTITY_SNVS_RTC, 2);

const OP_READ: u32 = 0x1;
const OP_WRITE: u32 = 0x2;

/// A 32-bit fast call into the secure monitor.
///
/// Implemented by the platform (an `smc #0` shim on hardware).
pub trait SecureMonitor {
    fn fast_call(&self, function: u32, arg0: u32, arg1: u32, arg2: u32) -> i32;
}

/// Secure-monitor proxy access.
pub struct SmcBackend<M> {
    monitor: M,
}

impl<M: SecureMonitor> SmcBackend<M> {
    /// Probe the SNVS RTC entity in the secure world.
    ///
    /// A negative probe result means no peer is serving the entity; the
    /// backend is unusable and construction fails. There is no fallback to
    /// direct access.
    pub fn new(monitor: M) -> Result<Self, RtcError> {
        let ret = monitor.fast_call(SMC_SNVS_PROBE, 0, 0, 0);
        if ret < 0 {
            log::error!("snvs-rtc: secure monitor probe failed: {ret}");
            return Err(RtcError::BackendUnavailable);
        }
        Ok(SmcBackend { monitor })
    }
}

impl<M: SecureMonitor> RegisterBackend for SmcBackend<M> {
    fn read(&self, offset: u32) -> u32 {
        self.monitor
            .fast_call(SMC_SNVS_REGS_OP, LP_WINDOW_OFFSET + offset, OP_READ, 0) as u32
    }

    fn write(&self, offset: u32, value: u32) {
        self.monitor
            .fast_call(SMC_SNVS_REGS_OP, LP_WINDOW_OFFSET + offset, OP_WRITE, value);
    }

    fn update_control(&self, mask: u32, set: bool) {
        self.monitor
            .fast_call(SMC_SNVS_LPCR_OP, mask, set as u32, 0);
    }
}
