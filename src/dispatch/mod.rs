//! Mode dispatch.
//!
//! The MODE cell holds a top-level [`Mode`]. Together with the phase it selects
//! exactly one [`Routine`], whose code is published in RUN_FUNC. Routines may
//! write MODE at any time; the dispatcher only latches it at the start of a
//! blank-phase pass, so both halves of a frame always run under one mode.

pub mod game;
pub mod init;
pub mod menu;
pub mod splash;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::buffers::Frame;
use crate::config::Config;
use crate::consts::{
    FN_GAME_OS, FN_GAME_VB, FN_INIT, FN_MENU_OS, FN_MENU_VB, FN_SPLASH_OS, FN_SPLASH_VB,
};
use crate::handshake::{CoprocPort, Phase};
use crate::input::InputState;
use crate::timing::TvStandard;

use game::GameLogic;
use init::InitLogic;
use menu::MenuLogic;
use splash::SplashLogic;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Mode {
    #[default]
    Init = 0,
    Splash = 1,
    Menu = 2,
    Game = 3,
}

impl Mode {
    #[must_use]
    pub fn routine(self, phase: Phase) -> Routine {
        match (self, phase) {
            (Mode::Init, _) => Routine::Init,
            (Mode::Splash, Phase::Visible) => Routine::SplashVisible,
            (Mode::Splash, Phase::Blank) => Routine::SplashBlank,
            (Mode::Menu, Phase::Visible) => Routine::MenuVisible,
            (Mode::Menu, Phase::Blank) => Routine::MenuBlank,
            (Mode::Game, Phase::Visible) => Routine::GameVisible,
            (Mode::Game, Phase::Blank) => Routine::GameBlank,
        }
    }
}

impl TryFrom<u8> for Mode {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Mode::Init),
            1 => Ok(Mode::Splash),
            2 => Ok(Mode::Menu),
            3 => Ok(Mode::Game),
            v => Err(v),
        }
    }
}

impl From<Mode> for u8 {
    fn from(val: Mode) -> Self {
        val as u8
    }
}

/// The entries of the dispatch table, codes as stored in RUN_FUNC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Routine {
    Init = FN_INIT,
    GameVisible = FN_GAME_OS,
    GameBlank = FN_GAME_VB,
    MenuVisible = FN_MENU_OS,
    MenuBlank = FN_MENU_VB,
    SplashVisible = FN_SPLASH_OS,
    SplashBlank = FN_SPLASH_VB,
}

impl Routine {
    /// Any out of range code selects `Init`.
    #[must_use]
    pub fn from_code(code: u8) -> Self {
        match code {
            FN_GAME_OS => Routine::GameVisible,
            FN_GAME_VB => Routine::GameBlank,
            FN_MENU_OS => Routine::MenuVisible,
            FN_MENU_VB => Routine::MenuBlank,
            FN_SPLASH_OS => Routine::SplashVisible,
            FN_SPLASH_VB => Routine::SplashBlank,
            _ => Routine::Init,
        }
    }

    #[must_use]
    pub fn code(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub fn mode(self) -> Mode {
        match self {
            Routine::Init => Mode::Init,
            Routine::GameVisible | Routine::GameBlank => Mode::Game,
            Routine::MenuVisible | Routine::MenuBlank => Mode::Menu,
            Routine::SplashVisible | Routine::SplashBlank => Mode::Splash,
        }
    }
}

/// Game options edited in the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// 1 or 2, with one player the right paddle follows the ball.
    pub players: u8,
    /// 0..=3, higher values narrow the playfield.
    pub arena: u8,
    /// Missiles enabled.
    pub option1: bool,
    /// Fast ball.
    pub option2: bool,
    pub tv_type: TvStandard,
}

impl Settings {
    pub const MAX_PLAYERS: u8 = 2;
    pub const MAX_ARENA: u8 = 3;

    #[must_use]
    pub fn new(tv_type: TvStandard) -> Self {
        Self {
            players: 2,
            arena: 0,
            option1: true,
            option2: false,
            tv_type,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings::new(TvStandard::default())
    }
}

/// What one logic pass sees and may do.
pub struct PassContext<'a> {
    port: &'a CoprocPort,
    config: &'a Config,
    pub settings: &'a mut Settings,
    mode: Mode,
    phase: Phase,
    input: InputState,
    visible_time: u8,
    blank_time: u8,
    published: bool,
}

impl<'a> PassContext<'a> {
    fn new(
        port: &'a CoprocPort,
        config: &'a Config,
        settings: &'a mut Settings,
        mode: Mode,
        phase: Phase,
    ) -> Self {
        Self {
            input: port.input(),
            visible_time: port.counter(Phase::Visible),
            blank_time: port.counter(Phase::Blank),
            port,
            config,
            settings,
            mode,
            phase,
            published: false,
        }
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn input(&self) -> &InputState {
        &self.input
    }

    #[must_use]
    pub fn visible_time(&self) -> u8 {
        self.visible_time
    }

    #[must_use]
    pub fn blank_time(&self) -> u8 {
        self.blank_time
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        self.config
    }

    /// Writes the back frame and marks the pass as having new data.
    pub fn render(&mut self, f: impl FnOnce(&mut Frame)) {
        let mode = self.mode;
        self.port.write_back(|frame| {
            f(frame);
            frame.mode = mode;
        });
        self.published = true;
    }

    /// Writes both frames identically. Nothing is published, the front
    /// already holds the same content.
    ///
    /// Only allowed in a blank-phase pass, the host draws the front during
    /// the visible phase. Returns whether the frames were written.
    pub fn initialize_buffers(&mut self, f: impl Fn(&mut Frame)) -> bool {
        if self.phase != Phase::Blank {
            warn!("{:?}: refusing to write both frames in the visible phase", self.mode);
            return false;
        }
        self.port.write_both(f);
        true
    }

    /// Takes effect at the next blank-phase pass.
    pub fn request_mode(&mut self, mode: Mode) {
        if self.port.mode_byte() != u8::from(mode) {
            debug!("{:?} requests {:?}", self.mode, mode);
        }
        self.port.set_mode_byte(mode.into());
    }
}

/// One mode's logic, split over the two phases of a frame.
pub trait PhaseLogic {
    /// Runs before the first pass after the mode was latched.
    fn enter(&mut self, _ctx: &mut PassContext) {}
    fn visible(&mut self, ctx: &mut PassContext);
    fn blank(&mut self, ctx: &mut PassContext);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassReport {
    pub routine: Routine,
    pub published: bool,
}

pub struct Dispatcher {
    active: Mode,
    entered: bool,
    settings: Settings,
    init: InitLogic,
    splash: SplashLogic,
    menu: MenuLogic,
    game: GameLogic,
}

impl Dispatcher {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            active: Mode::Init,
            entered: false,
            settings: Settings::new(config.tv_standard()),
            init: InitLogic::default(),
            splash: SplashLogic::default(),
            menu: MenuLogic::default(),
            game: GameLogic::default(),
        }
    }

    #[must_use]
    pub fn active(&self) -> Mode {
        self.active
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn latch(&mut self, port: &CoprocPort) {
        let v = port.mode_byte();
        match Mode::try_from(v) {
            Ok(m) if m != self.active => {
                debug!("mode {:?} -> {:?}", self.active, m);
                self.active = m;
                self.entered = false;
            }
            Ok(_) => (),
            Err(v) => {
                warn!("invalid mode 0x{v:02x}, keeping {:?}", self.active);
                port.set_mode_byte(self.active.into());
            }
        }
    }

    /// Runs the routine selected by the active mode for `phase`.
    pub fn run_pass(&mut self, port: &CoprocPort, config: &Config, phase: Phase) -> PassReport {
        if phase == Phase::Blank {
            self.latch(port);
        }
        let routine = self.active.routine(phase);
        port.set_run_func(routine.code());

        let Self {
            active,
            entered,
            settings,
            init,
            splash,
            menu,
            game,
        } = self;
        let logic: &mut dyn PhaseLogic = match active {
            Mode::Init => init,
            Mode::Splash => splash,
            Mode::Menu => menu,
            Mode::Game => game,
        };

        let mut ctx = PassContext::new(port, config, settings, *active, phase);
        if !*entered {
            logic.enter(&mut ctx);
            *entered = true;
        }
        match phase {
            Phase::Visible => logic.visible(&mut ctx),
            Phase::Blank => logic.blank(&mut ctx),
        }

        PassReport {
            routine,
            published: ctx.published,
        }
    }
}
