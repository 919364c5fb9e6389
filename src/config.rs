//! Polling bounds.

/// Retry bounds for the busy-wait loops.
///
/// Every wait in the driver is a bounded poll; exhausting a bound is
/// [`crate::RtcError::TimedOut`]. The defaults match the hardware timing
/// (three 32.768 kHz ticks are 61.0–91.5 µs). Tests drive a simulated
/// backend deterministically with `spin_per_attempt` set to zero.
#[derive(Debug, Clone, Copy)]
pub struct PollConfig {
    /// Attempts to observe two identical consecutive counter reads.
    pub stable_read_attempts: u32,
    /// Attempts to observe the counter enable bit in the requested state.
    pub enable_poll_attempts: u32,
    /// Attempts while waiting for the counter to visibly advance.
    pub tick_wait_attempts: u32,
    /// Ticks that must elapse before a prior write is considered visible.
    pub min_ticks: u32,
    /// Spin-loop iterations between poll attempts.
    pub spin_per_attempt: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        PollConfig {
            stable_read_attempts: 100,
            enable_poll_attempts: 1000,
            tick_wait_attempts: 1000,
            min_ticks: 3,
            spin_per_attempt: 100,
        }
    }
}

impl PollConfig {
    /// Pause between poll attempts.
    #[inline]
    pub(crate) fn relax(&self) {
        for _ in 0..self.spin_per_attempt {
            core::hint::spin_loop();
        }
    }
}
