//! SNVS low-power domain register map.
//!
//! Offsets are logical LP offsets; both backends rebase them by
//! [`LP_WINDOW_OFFSET`] before touching the bus.

use bitflags::bitflags;

/// Offset of the LP register window within the SNVS block.
pub const LP_WINDOW_OFFSET: u32 = 0x34;

pub const LPCR: u32 = 0x04; // LP Control
pub const LPSR: u32 = 0x18; // LP Status, write-1-to-clear
pub const LPSRTCMR: u32 = 0x1c; // Secure RTC counter, bits 46:32
pub const LPSRTCLR: u32 = 0x20; // Secure RTC counter, bits 31:0
pub const LPTAR: u32 = 0x24; // LP Time Alarm, 32-bit compare value
pub const LPPGDR: u32 = 0x30; // LP Power Glitch Detector

/// Written once to LPPGDR at startup to initialize the glitch filter.
pub const LPPGDR_INIT: u32 = 0x4173_6166;

/// The counter ticks at 32.768 kHz; bits 14:0 are sub-second resolution
/// and are discarded when converting to seconds.
pub const CNTR_TO_SECS_SHIFT: u32 = 15;

bitflags! {
    /// LPCR bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Lpcr: u32 {
        const SRTC_ENV = 1 << 0; // Secure RTC enabled and valid
        const LPTA_EN = 1 << 1; // LP time alarm interrupt enable
        const LPWUI_EN = 1 << 3; // LP wake-up interrupt enable
    }

    /// LPSR bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Lpsr: u32 {
        const LPTA = 1 << 0; // LP time alarm matched
    }
}
