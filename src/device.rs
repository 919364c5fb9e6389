//! The SNVS low-power secure real-time clock.
//!
//! A single mutex guards the register window: the foreground calls and the
//! interrupt path would otherwise interleave the multi-step alarm and
//! counter sequences.

use crate::backend::RegisterBackend;
use crate::config::PollConfig;
use crate::counter;
use crate::registers::{self, Lpcr, Lpsr, CNTR_TO_SECS_SHIFT};
use crate::sync::Mutex;
use crate::RtcError;

/// Clock-gating handle for the register interface.
///
/// Platforms that gate the SNVS clock implement this; the device holds the
/// gate active around every register sequence. Ungated platforms use `()`.
pub trait ClockGate {
    fn enable(&self);
    fn disable(&self);
}

impl ClockGate for () {
    fn enable(&self) {}
    fn disable(&self) {}
}

struct GateGuard<'a, G: ClockGate>(&'a G);

impl<G: ClockGate> Drop for GateGuard<'_, G> {
    fn drop(&mut self) {
        self.0.disable();
    }
}

/// Alarm target and latched match state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alarm {
    pub target_secs: u32,
    pub pending: bool,
}

pub struct SnvsRtc<B: RegisterBackend, G: ClockGate = ()> {
    backend: Mutex<B>,
    gate: G,
    cfg: PollConfig,
}

impl<B: RegisterBackend, G: ClockGate> SnvsRtc<B, G> {
    /// Bring up the device: initialize the power-glitch detector, drop any
    /// status bits latched across the power cycle, and start the counter.
    pub fn new(backend: B, gate: G, cfg: PollConfig) -> Result<Self, RtcError> {
        let rtc = SnvsRtc {
            backend: Mutex::new(backend),
            gate,
            cfg,
        };

        {
            let _gate = rtc.gated();
            let b = rtc.backend.lock();
            b.write(registers::LPPGDR, registers::LPPGDR_INIT);
            b.write(registers::LPSR, 0xffff_ffff);
            rtc.enable_counter(&*b, true)?;
        }

        log::debug!("snvs-rtc: counter running");
        Ok(rtc)
    }

    fn gated(&self) -> GateGuard<'_, G> {
        self.gate.enable();
        GateGuard(&self.gate)
    }

    /// Start or stop the secure counter and wait for the bit to latch.
    ///
    /// Both directions are idempotent: requesting the current state
    /// confirms on the first poll.
    pub fn set_counter_enabled(&self, enable: bool) -> Result<(), RtcError> {
        let _gate = self.gated();
        let b = self.backend.lock();
        self.enable_counter(&*b, enable)
    }

    fn enable_counter(&self, b: &B, enable: bool) -> Result<(), RtcError> {
        b.update_control(Lpcr::SRTC_ENV.bits(), enable);

        for _ in 0..self.cfg.enable_poll_attempts {
            let lpcr = Lpcr::from_bits_retain(b.read(registers::LPCR));
            if lpcr.contains(Lpcr::SRTC_ENV) == enable {
                return Ok(());
            }
            self.cfg.relax();
        }

        log::error!("snvs-rtc: enable bit did not read back as {enable}");
        Err(RtcError::TimedOut)
    }

    /// Current time in epoch seconds.
    pub fn get_time(&self) -> Result<u32, RtcError> {
        let _gate = self.gated();
        let b = self.backend.lock();
        counter::read_seconds(&*b, &self.cfg)
    }

    /// Set the counter to `secs` epoch seconds.
    ///
    /// The counter must be stopped while its halves are rewritten; it is
    /// restarted afterwards. The 15 sub-second bits are zero-filled, so a
    /// subsequent read returns `secs` exactly.
    pub fn set_time(&self, secs: u64) -> Result<(), RtcError> {
        if secs > u32::MAX as u64 {
            return Err(RtcError::InvalidArgument);
        }

        let _gate = self.gated();
        let b = self.backend.lock();

        self.enable_counter(&*b, false)?;
        b.write(registers::LPSRTCLR, (secs << CNTR_TO_SECS_SHIFT) as u32);
        b.write(registers::LPSRTCMR, (secs >> (32 - CNTR_TO_SECS_SHIFT)) as u32);
        self.enable_counter(&*b, true)
    }

    /// Read the alarm target and whether a match has been latched.
    pub fn get_alarm(&self) -> Result<Alarm, RtcError> {
        let _gate = self.gated();
        let b = self.backend.lock();

        let target_secs = b.read(registers::LPTAR);
        let lpsr = Lpsr::from_bits_retain(b.read(registers::LPSR));

        Ok(Alarm {
            target_secs,
            pending: lpsr.contains(Lpsr::LPTA),
        })
    }

    /// Program the alarm compare value and arm or disarm delivery.
    ///
    /// The compare value must not change while a match could fire, so match
    /// delivery is stopped first and the stop is allowed to latch before
    /// the target is rewritten.
    pub fn set_alarm(&self, target_secs: u64, enable: bool) -> Result<(), RtcError> {
        if target_secs > u32::MAX as u64 {
            return Err(RtcError::InvalidArgument);
        }

        let _gate = self.gated();
        let b = self.backend.lock();

        b.update_control(Lpcr::LPTA_EN.bits(), false);
        counter::wait_write_sync(&*b, &self.cfg)?;

        b.write(registers::LPTAR, target_secs as u32);

        // Clear a previously latched match.
        b.write(registers::LPSR, Lpsr::LPTA.bits());

        self.alarm_irq_enable(&*b, enable)
    }

    /// Gate whether an alarm match wakes the system and raises an
    /// interrupt.
    ///
    /// The wake-up enable and the alarm-match enable are switched together;
    /// the hardware contract couples them.
    pub fn set_alarm_irq_enabled(&self, enable: bool) -> Result<(), RtcError> {
        let _gate = self.gated();
        let b = self.backend.lock();
        self.alarm_irq_enable(&*b, enable)
    }

    fn alarm_irq_enable(&self, b: &B, enable: bool) -> Result<(), RtcError> {
        b.update_control((Lpcr::LPTA_EN | Lpcr::LPWUI_EN).bits(), enable);
        counter::wait_write_sync(b, &self.cfg)
    }

    /// Interrupt-context entry point.
    ///
    /// Returns `true` if an alarm match was observed. The alarm is
    /// one-shot: a match disarms further delivery before `on_alarm` runs,
    /// and the observed status bits are cleared on the way out. Every wait
    /// on this path is bounded; a failed disarm is logged, not propagated.
    pub fn handle_interrupt<F: FnOnce()>(&self, on_alarm: F) -> bool {
        let _gate = self.gated();
        let b = self.backend.lock();

        let lpsr = b.read(registers::LPSR);
        let matched = Lpsr::from_bits_retain(lpsr).contains(Lpsr::LPTA);

        if matched {
            if let Err(err) = self.alarm_irq_enable(&*b, false) {
                log::warn!("snvs-rtc: alarm disarm did not settle: {err:?}");
            }
            on_alarm();
        }

        // Write-1-to-clear exactly the bits that were observed set.
        b.write(registers::LPSR, lpsr);

        matched
    }
}
