use log::debug;

use super::init::DEFAULT_SCALARS;
use super::{Mode, PassContext, PhaseLogic, Settings};
use crate::assets::{
    decimal_pairs, tv_color, ARENA_BACKGROUND, BALL_COLOR, P0_COLOR, P1_COLOR,
};
use crate::buffers::Frame;
use crate::config::MAX_GAME_SECONDS;
use crate::consts::{ARENA_HEIGHT, COLUMN_LEN};
use crate::input::{InputState, Player};
use crate::timing::elapsed;

const ARENA_MIN_X: u8 = 8;
const ARENA_MAX_X: u8 = 152;
/// Each arena setting moves both walls in by this much.
const ARENA_STEP: u8 = 8;
const ARENA_CENTER_X: u8 = 80;
const PADDLE_HALF: u8 = 8;
const PADDLE_ROWS: usize = 4;
const P0_ROW: usize = ARENA_HEIGHT - 12;
const P1_ROW: usize = 8;
const MISSILE_PHASES: u8 = 30;
const MISSILE_HIT: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Missile {
    x: u8,
    ttl: u8,
}

#[derive(Debug, Default)]
pub struct GameLogic {
    p_x: [u8; 2],
    missiles: [Option<Missile>; 2],
    ball_x: u8,
    ball_right: bool,
    scores: [u16; 2],
    remaining: u16,
    last_tick: u8,
    last_fire: [bool; 2],
    last_reset: bool,
    last_select: bool,
}

fn walls(settings: &Settings) -> (u8, u8) {
    let inset = settings.arena.min(Settings::MAX_ARENA) * ARENA_STEP;
    (ARENA_MIN_X + inset, ARENA_MAX_X - inset)
}

fn covers(paddle: u8, x: u8) -> bool {
    paddle.abs_diff(x) <= PADDLE_HALF
}

impl GameLogic {
    #[must_use]
    pub fn scores(&self) -> [u16; 2] {
        self.scores
    }

    /// Seconds left on the game clock.
    #[must_use]
    pub fn remaining(&self) -> u16 {
        self.remaining
    }

    #[must_use]
    pub fn ball_x(&self) -> u8 {
        self.ball_x
    }

    fn restart(&mut self, ctx: &PassContext) {
        let input = ctx.input();
        *self = Self {
            p_x: [DEFAULT_SCALARS.p0_x, DEFAULT_SCALARS.p1_x],
            missiles: [None; 2],
            ball_x: DEFAULT_SCALARS.ball_x,
            ball_right: true,
            scores: [0; 2],
            remaining: ctx.config().game_seconds(),
            last_tick: ctx.blank_time(),
            last_fire: [input.stick(Player::P0).fire, input.stick(Player::P1).fire],
            last_reset: input.game_reset(),
            last_select: input.game_select(),
        };
        debug!("game start, {}s", self.remaining);
    }

    fn move_paddles(&mut self, input: &InputState, settings: &Settings, left: u8, right: u8) {
        for (i, player) in [Player::P0, Player::P1].into_iter().enumerate() {
            let pro = match player {
                Player::P0 => input.left_difficulty_a(),
                Player::P1 => input.right_difficulty_a(),
            };
            let speed = if pro { 1 } else { 2 };
            let x = &mut self.p_x[i];
            if player == Player::P1 && settings.players < 2 {
                if *x < self.ball_x {
                    *x = x.saturating_add(1);
                } else if *x > self.ball_x {
                    *x -= 1;
                }
            } else {
                let stick = input.stick(player);
                if stick.left {
                    *x = x.saturating_sub(speed);
                }
                if stick.right {
                    *x = x.saturating_add(speed);
                }
            }
            *x = (*x).clamp(left, right);
        }
    }

    fn move_missiles(&mut self, input: &InputState, settings: &Settings) {
        for (i, player) in [Player::P0, Player::P1].into_iter().enumerate() {
            let fire = input.stick(player).fire;
            let pressed = fire && !self.last_fire[i];
            self.last_fire[i] = fire;

            self.missiles[i] = match self.missiles[i] {
                Some(m) if m.ttl > 1 => Some(Missile { ttl: m.ttl - 1, ..m }),
                Some(_) => None,
                None if pressed && settings.option1 => Some(Missile {
                    x: self.p_x[i],
                    ttl: MISSILE_PHASES,
                }),
                None => None,
            };
            if let Some(m) = self.missiles[i] {
                if m.x.abs_diff(self.ball_x) <= MISSILE_HIT {
                    self.ball_right = !self.ball_right;
                    self.missiles[i] = None;
                }
            }
        }
    }

    fn move_ball(&mut self, settings: &Settings, left: u8, right: u8) {
        let step = if settings.option2 { 2 } else { 1 };
        self.ball_x = if self.ball_right {
            self.ball_x.saturating_add(step)
        } else {
            self.ball_x.saturating_sub(step)
        };

        if self.ball_x <= left {
            if covers(self.p_x[0], self.ball_x) {
                self.ball_x = left;
                self.ball_right = true;
            } else {
                self.point(1);
            }
        } else if self.ball_x >= right {
            if covers(self.p_x[1], self.ball_x) {
                self.ball_x = right;
                self.ball_right = false;
            } else {
                self.point(0);
            }
        }
    }

    fn point(&mut self, player: usize) {
        self.scores[player] = (self.scores[player] + 1).min(9999);
        debug!("point for P{player}, {:?}", self.scores);
        self.ball_x = ARENA_CENTER_X;
        // serve towards the player who lost the point
        self.ball_right = player == 0;
    }

    fn tick_clock(&mut self, ctx: &PassContext) {
        let fps = ctx.settings.tv_type.frames_per_second();
        while self.remaining > 0 && elapsed(ctx.blank_time(), self.last_tick) >= fps {
            self.last_tick = self.last_tick.wrapping_add(fps);
            self.remaining -= 1;
            if self.remaining == 0 {
                debug!("time up, {:?}", self.scores);
            }
        }
    }

    fn draw(&self, frame: &mut Frame, color_tv: bool) {
        let s = &mut frame.scalars;
        s.p0_x = self.p_x[0];
        s.p1_x = self.p_x[1];
        s.m0_x = self.missiles[0].map_or(0, |m| m.x);
        s.m1_x = self.missiles[1].map_or(0, |m| m.x);
        s.ball_x = self.ball_x;
        s.temp_color = tv_color(ARENA_BACKGROUND, color_tv);
        s.score0_color = tv_color(P0_COLOR, color_tv);
        s.score1_color = tv_color(P1_COLOR, color_tv);

        frame.player0 = [0; COLUMN_LEN];
        frame.player1 = [0; COLUMN_LEN];
        frame.color0 = [tv_color(BALL_COLOR, color_tv); COLUMN_LEN];
        frame.color1 = [tv_color(BALL_COLOR, color_tv); COLUMN_LEN];
        frame.player0[P0_ROW..P0_ROW + PADDLE_ROWS].fill(0xff);
        frame.player1[P1_ROW..P1_ROW + PADDLE_ROWS].fill(0xff);
        frame.color0[P0_ROW..P0_ROW + PADDLE_ROWS].fill(tv_color(P0_COLOR, color_tv));
        frame.color1[P1_ROW..P1_ROW + PADDLE_ROWS].fill(tv_color(P1_COLOR, color_tv));

        (frame.score0_a, frame.score0_b) = decimal_pairs(self.scores[0], true);
        (frame.score1_a, frame.score1_b) = decimal_pairs(self.scores[1], true);
        let remaining = self.remaining.min(MAX_GAME_SECONDS);
        let clock = (remaining / 60) * 100 + remaining % 60;
        (frame.timer_a, frame.timer_b) = decimal_pairs(clock, false);
    }
}

impl PhaseLogic for GameLogic {
    fn enter(&mut self, ctx: &mut PassContext) {
        self.restart(ctx);
    }

    fn visible(&mut self, ctx: &mut PassContext) {
        let input = *ctx.input();
        let reset = input.game_reset() && !self.last_reset;
        self.last_reset = input.game_reset();
        let select = input.game_select() && !self.last_select;
        self.last_select = input.game_select();

        if reset {
            self.restart(ctx);
            return;
        }
        if select {
            ctx.request_mode(Mode::Menu);
        }
        if self.remaining == 0 {
            return;
        }

        let settings = *ctx.settings;
        let (left, right) = walls(&settings);
        self.move_paddles(&input, &settings, left, right);
        self.move_missiles(&input, &settings);
        self.move_ball(&settings, left, right);
    }

    fn blank(&mut self, ctx: &mut PassContext) {
        self.tick_clock(ctx);
        let color_tv = ctx.input().color_tv();
        ctx.render(|frame| self.draw(frame, color_tv));
    }
}
