//! Driver logic for the i.MX SNVS low-power secure real-time clock.
//!
//! The device keeps a monotonic 47-bit counter in the battery-backed LP
//! domain and supports a single wake-capable alarm. Its registers are
//! reached through exactly one backend, chosen at construction: direct
//! memory-mapped access ([`MmioBackend`]) or a secure-monitor proxy
//! ([`SmcBackend`]) when the LP domain is owned by a trusted execution
//! environment.
//!
//! The counter is updated by hardware asynchronously while software reads
//! and writes it in 32-bit halves, so [`counter`] provides the
//! double-read-until-stable primitives that every time operation is built
//! on, and [`counter::wait_write_sync`] is the bounded barrier that makes a
//! prior register write visible before a dependent operation proceeds.

#![cfg_attr(not(test), no_std)]

pub mod backend;
pub mod config;
pub mod counter;
pub mod device;
pub mod registers;

mod sync;

#[cfg(test)]
pub(crate) mod sim;

pub use backend::{MmioBackend, RegisterBackend, SecureMonitor, SmcBackend};
pub use config::PollConfig;
pub use device::{Alarm, ClockGate, SnvsRtc};

/// Errors surfaced by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RtcError {
    /// A bounded poll exhausted its attempts. Recoverable; the caller may
    /// retry the operation.
    TimedOut,
    /// The secure-monitor peer did not answer the probe. Fatal to backend
    /// construction; no operation may be attempted afterwards.
    BackendUnavailable,
    /// A time or alarm target does not fit the 32-bit compare range.
    InvalidArgument,
}
