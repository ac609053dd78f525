use super::{Mode, PassContext, PhaseLogic};
use crate::assets::render_text;
use crate::consts::{COLUMN_LEN, FONT_HEIGHT};
use crate::input::Player;
use crate::timing::elapsed;

const LINES: [&[u8]; 2] = [b"PADDLE  ", b"  BALL  "];
/// Each text line is drawn this many times to stretch it vertically.
const LINE_REPEAT: usize = 3;
const FIRST_ROW: usize = 64;

#[derive(Debug, Default)]
pub struct SplashLogic {
    entered_at: u8,
}

impl SplashLogic {
    fn leave_requested(ctx: &PassContext) -> bool {
        let input = ctx.input();
        input.stick(Player::P0).fire || input.stick(Player::P1).fire || input.game_reset()
    }
}

/// The four splash columns, text centred vertically.
#[must_use]
pub fn splash_columns() -> [[u8; COLUMN_LEN]; 4] {
    let mut cols = [[0; COLUMN_LEN]; 4];
    let mut row = FIRST_ROW;
    for line in LINES {
        let mut text = [[0u8; FONT_HEIGHT]; 4];
        render_text(line, &mut text, 0);
        for glyph_row in 0..FONT_HEIGHT {
            for _ in 0..LINE_REPEAT {
                for (col, t) in cols.iter_mut().zip(text.iter()) {
                    col[row] = t[glyph_row];
                }
                row += 1;
            }
        }
        row += FONT_HEIGHT;
    }
    cols
}

impl PhaseLogic for SplashLogic {
    fn enter(&mut self, ctx: &mut PassContext) {
        self.entered_at = ctx.blank_time();
    }

    fn visible(&mut self, ctx: &mut PassContext) {
        if Self::leave_requested(ctx) {
            ctx.request_mode(Mode::Menu);
        }
    }

    fn blank(&mut self, ctx: &mut PassContext) {
        if elapsed(ctx.blank_time(), self.entered_at) >= ctx.config().splash_frames() {
            ctx.request_mode(Mode::Menu);
        }
        // redrawn every pass, a render the host timed out on is lost
        ctx.render(|frame| frame.splash = splash_columns());
    }
}
