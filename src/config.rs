use serde::{Deserialize, Serialize};

use crate::timing::{PhaseBudget, TvStandard};

/// Longest game the 4 digit mm:ss timer can show.
pub const MAX_GAME_SECONDS: u16 = 99 * 60 + 59;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ConfigFile")]
pub struct Config {
    tv_standard: TvStandard,
    budget_scale: u32,
    /// Blank phases the splash screen stays up without input.
    splash_frames: u8,
    game_seconds: u16,
}

impl Config {
    #[must_use]
    pub fn new() -> Self {
        Self {
            tv_standard: TvStandard::Ntsc,
            budget_scale: 1,
            splash_frames: 180,
            game_seconds: 120,
        }
    }

    #[must_use]
    pub fn tv_standard(&self) -> TvStandard {
        self.tv_standard
    }

    pub fn set_tv_standard(&mut self, standard: TvStandard) {
        self.tv_standard = standard;
    }

    #[must_use]
    pub fn budget_scale(&self) -> u32 {
        self.budget_scale
    }

    /// Values below 1 are raised to 1.
    pub fn set_budget_scale(&mut self, scale: u32) {
        self.budget_scale = scale.max(1);
    }

    #[must_use]
    pub fn splash_frames(&self) -> u8 {
        self.splash_frames
    }

    pub fn set_splash_frames(&mut self, frames: u8) {
        self.splash_frames = frames;
    }

    #[must_use]
    pub fn game_seconds(&self) -> u16 {
        self.game_seconds
    }

    /// Clamped to what the 4 digit timer can show.
    pub fn set_game_seconds(&mut self, seconds: u16) {
        self.game_seconds = seconds.min(MAX_GAME_SECONDS);
    }

    #[must_use]
    pub fn phase_budget(&self) -> PhaseBudget {
        PhaseBudget::new(self.tv_standard, self.budget_scale)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new()
    }
}

/// Config as read from a file, missing fields take the defaults and every
/// value goes through the setters.
#[derive(Deserialize)]
#[serde(default)]
struct ConfigFile {
    tv_standard: TvStandard,
    budget_scale: u32,
    splash_frames: u8,
    game_seconds: u16,
}

impl Default for ConfigFile {
    fn default() -> Self {
        let c = Config::new();
        Self {
            tv_standard: c.tv_standard,
            budget_scale: c.budget_scale,
            splash_frames: c.splash_frames,
            game_seconds: c.game_seconds,
        }
    }
}

impl From<ConfigFile> for Config {
    fn from(file: ConfigFile) -> Self {
        let mut c = Config::new();
        c.set_tv_standard(file.tv_standard);
        c.set_budget_scale(file.budget_scale);
        c.set_splash_frames(file.splash_frames);
        c.set_game_seconds(file.game_seconds);
        c
    }
}
