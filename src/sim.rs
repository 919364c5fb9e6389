//! Simulated SNVS register file.
//!
//! The simulation advances the counter as a side effect of register reads,
//! which is enough to script torn reads, tick progression, wraparound and
//! stuck bits without any real delay.

use core::cell::RefCell;

use crate::backend::RegisterBackend;
use crate::registers::{Lpcr, LPCR, LPPGDR, LPSR, LPSRTCLR, LPSRTCMR, LPTAR};

const COUNTER_MASK: u64 = (1 << 47) - 1;

pub(crate) struct SimState {
    pub lpcr: u32,
    pub lpsr: u32,
    pub lptar: u32,
    pub lppgdr: u32,
    pub counter: u64,
    /// The counter gains one tick every `advance_every` register reads
    /// (0 = frozen), up to `advance_budget` ticks in total.
    pub advance_every: u32,
    pub advance_budget: u32,
    /// When set, writes to LPCR never latch the enable bit.
    pub enable_stuck: bool,
    reads: u32,
}

pub(crate) struct SimSnvs {
    state: RefCell<SimState>,
}

impl SimSnvs {
    /// A register file whose counter never moves.
    pub fn frozen() -> Self {
        SimSnvs {
            state: RefCell::new(SimState {
                lpcr: 0,
                lpsr: 0,
                lptar: 0,
                lppgdr: 0,
                counter: 0,
                advance_every: 0,
                advance_budget: 0,
                enable_stuck: false,
                reads: 0,
            }),
        }
    }

    /// A register file whose counter gains one tick every `every` reads.
    pub fn ticking(every: u32) -> Self {
        let sim = Self::frozen();
        sim.with(|s| {
            s.advance_every = every;
            s.advance_budget = u32::MAX;
        });
        sim
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut SimState) -> R) -> R {
        f(&mut self.state.borrow_mut())
    }

    /// Latch an alarm match, as the hardware comparator would.
    pub fn fire_alarm(&self) {
        self.with(|s| s.lpsr |= crate::registers::Lpsr::LPTA.bits());
    }

    pub fn lpcr(&self) -> u32 {
        self.state.borrow().lpcr
    }

    pub fn lpsr(&self) -> u32 {
        self.state.borrow().lpsr
    }

    pub fn lptar(&self) -> u32 {
        self.state.borrow().lptar
    }

    pub fn lppgdr(&self) -> u32 {
        self.state.borrow().lppgdr
    }

    pub fn counter(&self) -> u64 {
        self.state.borrow().counter
    }
}

impl RegisterBackend for SimSnvs {
    fn read(&self, offset: u32) -> u32 {
        let mut s = self.state.borrow_mut();
        let value = match offset {
            LPCR => s.lpcr,
            LPSR => s.lpsr,
            LPSRTCMR => (s.counter >> 32) as u32,
            LPSRTCLR => s.counter as u32,
            LPTAR => s.lptar,
            LPPGDR => s.lppgdr,
            _ => 0,
        };
        s.reads += 1;
        if s.advance_every != 0 && s.advance_budget != 0 && s.reads % s.advance_every == 0 {
            s.counter = (s.counter + 1) & COUNTER_MASK;
            s.advance_budget -= 1;
        }
        value
    }

    fn write(&self, offset: u32, value: u32) {
        let mut s = self.state.borrow_mut();
        match offset {
            LPCR => {
                s.lpcr = if s.enable_stuck {
                    (value & !Lpcr::SRTC_ENV.bits()) | (s.lpcr & Lpcr::SRTC_ENV.bits())
                } else {
                    value
                };
            }
            LPSR => s.lpsr &= !value,
            LPSRTCMR => s.counter = (s.counter & 0xffff_ffff) | (((value as u64) & 0x7fff) << 32),
            LPSRTCLR => s.counter = (s.counter & !0xffff_ffff) | value as u64,
            LPTAR => s.lptar = value,
            LPPGDR => s.lppgdr = value,
            _ => {}
        }
    }
}
