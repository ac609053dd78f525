use log::debug;

use super::{Mode, PassContext, PhaseLogic};
use crate::assets::{ARENA_BACKGROUND, P0_COLOR, P1_COLOR};
use crate::buffers::ScalarState;
use crate::handshake::Phase;

/// Horizontal positions the kernel starts from.
pub const DEFAULT_SCALARS: ScalarState = ScalarState {
    p0_x: 40,
    p1_x: 112,
    m0_x: 0,
    m1_x: 0,
    ball_x: 80,
    temp_color: ARENA_BACKGROUND,
    score0_color: P0_COLOR,
    score1_color: P1_COLOR,
};

/// Power-on setup, then hands over to the splash screen.
///
/// Setup writes the front instance as well, so it waits for a blank-phase
/// pass. Splash is only requested once setup ran.
#[derive(Debug, Default)]
pub struct InitLogic {
    done: bool,
}

impl InitLogic {
    fn run(&mut self, ctx: &mut PassContext) {
        if !self.done && ctx.phase() == Phase::Blank {
            debug!("init: clearing both frames");
            self.done = ctx.initialize_buffers(|frame| {
                frame.clear_scores();
                frame.scalars = DEFAULT_SCALARS;
                frame.mode = Mode::Init;
            });
        }
        if self.done {
            ctx.request_mode(Mode::Splash);
        }
    }
}

impl PhaseLogic for InitLogic {
    fn visible(&mut self, ctx: &mut PassContext) {
        self.run(ctx);
    }

    fn blank(&mut self, ctx: &mut PassContext) {
        self.run(ctx);
    }
}
