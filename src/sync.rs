//! Mutual exclusion for the shared register window.
//!
//! Foreground calls and the interrupt path touch the same backend, so every
//! register sequence runs under this lock: a spinlock under `no_std`,
//! `parking_lot` when the `std` feature (or a test build) is active.

#[cfg(not(any(test, feature = "std")))]
pub(crate) type Mutex<T> = spin::Mutex<T>;

#[cfg(any(test, feature = "std"))]
pub(crate) type Mutex<T> = parking_lot::Mutex<T>;
