use core::time::Duration;
use serde::{Deserialize, Serialize};

use crate::consts::{
    CYCLES_PER_LINE, NTSC_CPU_FREQ, NTSC_OVERSCAN_LINES, NTSC_PICTURE_LINES, NTSC_VBLANK_LINES,
    NTSC_VSYNC_LINES, PAL_CPU_FREQ, PAL_OVERSCAN_LINES, PAL_PICTURE_LINES, PAL_VBLANK_LINES,
    PAL_VSYNC_LINES,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum TvStandard {
    #[default]
    Ntsc = 0,
    Pal = 1,
    Secam = 2,
}

impl TvStandard {
    #[must_use]
    pub fn cpu_freq(self) -> u32 {
        match self {
            TvStandard::Ntsc => NTSC_CPU_FREQ,
            TvStandard::Pal | TvStandard::Secam => PAL_CPU_FREQ,
        }
    }

    /// Scanlines the host spends in vertical sync + vertical blank.
    #[must_use]
    pub fn blank_lines(self) -> u32 {
        match self {
            TvStandard::Ntsc => NTSC_VSYNC_LINES + NTSC_VBLANK_LINES,
            TvStandard::Pal | TvStandard::Secam => PAL_VSYNC_LINES + PAL_VBLANK_LINES,
        }
    }

    /// Scanlines of picture plus overscan.
    #[must_use]
    pub fn visible_lines(self) -> u32 {
        match self {
            TvStandard::Ntsc => NTSC_PICTURE_LINES + NTSC_OVERSCAN_LINES,
            TvStandard::Pal | TvStandard::Secam => PAL_PICTURE_LINES + PAL_OVERSCAN_LINES,
        }
    }

    #[must_use]
    pub fn frame_lines(self) -> u32 {
        self.blank_lines() + self.visible_lines()
    }

    #[must_use]
    pub fn frames_per_second(self) -> u8 {
        match self {
            TvStandard::Ntsc => 60,
            TvStandard::Pal | TvStandard::Secam => 50,
        }
    }

    #[must_use]
    pub fn next(self) -> Self {
        match self {
            TvStandard::Ntsc => TvStandard::Pal,
            TvStandard::Pal => TvStandard::Secam,
            TvStandard::Secam => TvStandard::Ntsc,
        }
    }

    #[must_use]
    pub fn previous(self) -> Self {
        match self {
            TvStandard::Ntsc => TvStandard::Secam,
            TvStandard::Pal => TvStandard::Ntsc,
            TvStandard::Secam => TvStandard::Pal,
        }
    }
}

/// Wall time the host may spend in each phase before it has to move on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseBudget {
    pub blank: Duration,
    pub visible: Duration,
}

impl PhaseBudget {
    /// `scale` stretches the budget, 1 is real time.
    #[must_use]
    pub fn new(standard: TvStandard, scale: u32) -> Self {
        Self {
            blank: lines_to_duration(standard, standard.blank_lines()) * scale,
            visible: lines_to_duration(standard, standard.visible_lines()) * scale,
        }
    }

    #[must_use]
    pub fn frame(&self) -> Duration {
        self.blank + self.visible
    }
}

fn lines_to_duration(standard: TvStandard, lines: u32) -> Duration {
    let cycles = u64::from(lines) * u64::from(CYCLES_PER_LINE);
    Duration::from_nanos(cycles * 1_000_000_000 / u64::from(standard.cpu_freq()))
}

/// Phases elapsed between two samples of a wrapping 8-bit counter.
/// Only meaningful for spans shorter than 256 phases.
#[inline]
#[must_use]
pub fn elapsed(now: u8, since: u8) -> u8 {
    now.wrapping_sub(since)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_counts() {
        assert_eq!(TvStandard::Ntsc.frame_lines(), 262);
        assert_eq!(TvStandard::Pal.frame_lines(), 312);
        assert_eq!(TvStandard::Secam.frame_lines(), 312);
    }

    #[test]
    fn budget_matches_frame_rate() {
        let ntsc = PhaseBudget::new(TvStandard::Ntsc, 1);
        // 262 * 76 / 1193182 = 16.688ms
        assert!(ntsc.frame() > Duration::from_micros(16_600));
        assert!(ntsc.frame() < Duration::from_micros(16_800));
        assert!(ntsc.blank < ntsc.visible);

        let pal = PhaseBudget::new(TvStandard::Pal, 1);
        assert!(pal.frame() > Duration::from_micros(19_900));
        assert!(pal.frame() < Duration::from_micros(20_100));

        let slow = PhaseBudget::new(TvStandard::Ntsc, 4);
        assert_eq!(slow.blank, ntsc.blank * 4);
    }

    #[test]
    fn elapsed_wraps() {
        assert_eq!(elapsed(10, 5), 5);
        assert_eq!(elapsed(3, 250), 9);
        assert_eq!(elapsed(7, 7), 0);
    }
}
