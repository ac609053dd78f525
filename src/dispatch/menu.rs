use log::trace;

use super::{Mode, PassContext, PhaseLogic, Settings};
use crate::assets::{
    render_text, tv_color, LOGO_HUES, MENU_BACKGROUND, MENU_CURSOR_COLOR, MENU_TEXT_COLOR, TITLE,
};
use crate::buffers::Frame;
use crate::consts::{
    FONT_HEIGHT, MENU_ARENA_ID, MENU_CONTROL_LEN, MENU_GRAPHICS_LEN,
    MENU_LOGO_HEIGHT, MENU_OPTION1_ID, MENU_OPTION2_ID, MENU_OPTION_HEIGHT, MENU_PLAYERS_ID,
    MENU_START_ID, MENU_TV_TYPE_ID,
};
use crate::input::{Player, Stick};
use crate::timing::TvStandard;

pub const MENU_COLUMNS: usize = 6;
pub const MENU_COLUMN_ROWS: usize = MENU_GRAPHICS_LEN / MENU_COLUMNS;
const LINE_CHARS: usize = MENU_COLUMNS * 2;
const LOGO_FIRST_ROW: usize = 2;
const LOGO_REPEAT: usize = 3;
/// Cursor is drawn while this bit of the visible counter is set.
const BLINK_MASK: u8 = 0x10;
/// Flag in a menu control byte marking the highlighted line.
pub const CONTROL_CURSOR: u8 = 0x80;

#[derive(Debug)]
pub struct MenuLogic {
    cursor: u8,
    last_stick: Stick,
    last_reset: bool,
    last_select: bool,
}

impl Default for MenuLogic {
    fn default() -> Self {
        Self {
            cursor: MENU_PLAYERS_ID,
            last_stick: Stick::default(),
            last_reset: false,
            last_select: false,
        }
    }
}

impl MenuLogic {
    #[must_use]
    pub fn cursor(&self) -> u8 {
        self.cursor
    }

    fn change(&self, settings: &mut Settings, up: bool) {
        match self.cursor {
            MENU_PLAYERS_ID => {
                settings.players = if up {
                    (settings.players + 1).min(Settings::MAX_PLAYERS)
                } else {
                    settings.players.saturating_sub(1).max(1)
                };
            }
            MENU_ARENA_ID => {
                settings.arena = if up {
                    (settings.arena + 1).min(Settings::MAX_ARENA)
                } else {
                    settings.arena.saturating_sub(1)
                };
            }
            MENU_OPTION1_ID => settings.option1 = !settings.option1,
            MENU_OPTION2_ID => settings.option2 = !settings.option2,
            MENU_TV_TYPE_ID => {
                settings.tv_type = if up {
                    settings.tv_type.next()
                } else {
                    settings.tv_type.previous()
                };
            }
            _ => (),
        }
    }

    fn draw(&self, frame: &mut Frame, settings: &Settings, cursor_on: bool, color_tv: bool) {
        let mut columns = [[0u8; MENU_COLUMN_ROWS]; MENU_COLUMNS];
        let mut logo = [[0u8; FONT_HEIGHT]; MENU_COLUMNS];
        render_text(TITLE, &mut logo, 0);
        for (column, glyphs) in columns.iter_mut().zip(logo.iter()) {
            for (i, b) in glyphs.iter().enumerate() {
                let row = LOGO_FIRST_ROW + i * LOGO_REPEAT;
                column[row..row + LOGO_REPEAT].fill(*b);
            }
        }
        for id in MENU_PLAYERS_ID..=MENU_START_ID {
            let line = option_line(id, settings);
            render_text(&line, &mut columns, option_row(id));
        }
        for (c, column) in columns.iter().enumerate() {
            frame.menu_graphics[c * MENU_COLUMN_ROWS..(c + 1) * MENU_COLUMN_ROWS]
                .copy_from_slice(column);
        }

        frame.menu_control = [0; MENU_CONTROL_LEN];
        if cursor_on {
            let first = usize::from(self.cursor - 1) * MENU_OPTION_HEIGHT;
            frame.menu_control[first..first + MENU_OPTION_HEIGHT].fill(CONTROL_CURSOR);
        }

        let cursor_first = option_row(self.cursor);
        for (line, pair) in frame.menu_colors.chunks_exact_mut(2).enumerate() {
            let fg = if line < MENU_LOGO_HEIGHT {
                LOGO_HUES[line / 4 % LOGO_HUES.len()] | 0x0a
            } else if cursor_on && (cursor_first..cursor_first + MENU_OPTION_HEIGHT).contains(&line) {
                MENU_CURSOR_COLOR
            } else {
                MENU_TEXT_COLOR
            };
            pair[0] = tv_color(fg, color_tv);
            pair[1] = tv_color(MENU_BACKGROUND, color_tv);
        }
    }
}

fn option_row(id: u8) -> usize {
    MENU_LOGO_HEIGHT + usize::from(id - 1) * MENU_OPTION_HEIGHT
}

fn option_line(id: u8, settings: &Settings) -> [u8; LINE_CHARS] {
    let players = [b'0' + settings.players];
    let arena = [b'1' + settings.arena];
    let (label, value): (&[u8], &[u8]) = match id {
        MENU_PLAYERS_ID => (b"PLAYERS", &players),
        MENU_ARENA_ID => (b"ARENA", &arena),
        MENU_OPTION1_ID => (b"OPTION 1", on_off(settings.option1)),
        MENU_OPTION2_ID => (b"OPTION 2", on_off(settings.option2)),
        MENU_TV_TYPE_ID => (
            b"TV",
            match settings.tv_type {
                TvStandard::Ntsc => &b"NTSC"[..],
                TvStandard::Pal => &b"PAL"[..],
                TvStandard::Secam => &b"SECAM"[..],
            },
        ),
        _ => (b"START", b""),
    };
    let mut line = [b' '; LINE_CHARS];
    let l = label.len().min(LINE_CHARS);
    line[..l].copy_from_slice(&label[..l]);
    let v = value.len().min(LINE_CHARS);
    line[LINE_CHARS - v..].copy_from_slice(&value[..v]);
    line
}

fn on_off(v: bool) -> &'static [u8] {
    if v {
        b"ON"
    } else {
        b"OFF"
    }
}

impl PhaseLogic for MenuLogic {
    fn enter(&mut self, ctx: &mut PassContext) {
        let input = ctx.input();
        self.last_stick = input.stick(Player::P0);
        self.last_reset = input.game_reset();
        self.last_select = input.game_select();
    }

    fn visible(&mut self, ctx: &mut PassContext) {
        let input = *ctx.input();
        let now = input.stick(Player::P0);
        let prev = self.last_stick;
        self.last_stick = now;
        let reset = input.game_reset() && !self.last_reset;
        self.last_reset = input.game_reset();
        let select = input.game_select() && !self.last_select;
        self.last_select = input.game_select();

        if now.up && !prev.up && self.cursor > MENU_PLAYERS_ID {
            self.cursor -= 1;
        }
        if now.down && !prev.down && self.cursor < MENU_START_ID {
            self.cursor += 1;
        }
        if select {
            self.cursor = if self.cursor == MENU_START_ID {
                MENU_PLAYERS_ID
            } else {
                self.cursor + 1
            };
        }
        if now.left && !prev.left {
            self.change(ctx.settings, false);
        }
        if now.right && !prev.right {
            self.change(ctx.settings, true);
        }
        if now.fire && !prev.fire {
            if self.cursor == MENU_START_ID {
                ctx.request_mode(Mode::Game);
            } else {
                self.change(ctx.settings, true);
            }
        }
        if reset {
            ctx.request_mode(Mode::Game);
        }
        trace!("menu cursor {} {:?}", self.cursor, ctx.settings);
    }

    fn blank(&mut self, ctx: &mut PassContext) {
        let cursor_on = ctx.visible_time() & BLINK_MASK != 0;
        let color_tv = ctx.input().color_tv();
        let settings = *ctx.settings;
        ctx.render(|frame| self.draw(frame, &settings, cursor_on, color_tv));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::glyph;
    use crate::consts::MENU_COLORS_LEN;

    #[test]
    fn option_lines_are_right_aligned() {
        let mut s = Settings::default();
        s.tv_type = TvStandard::Secam;
        assert_eq!(&option_line(MENU_PLAYERS_ID, &s), b"PLAYERS    2");
        assert_eq!(&option_line(MENU_ARENA_ID, &s), b"ARENA      1");
        assert_eq!(&option_line(MENU_OPTION2_ID, &s), b"OPTION 2 OFF");
        assert_eq!(&option_line(MENU_TV_TYPE_ID, &s), b"TV     SECAM");
        assert_eq!(&option_line(MENU_START_ID, &s), b"START       ");
    }

    #[test]
    fn values_stay_in_range() {
        let mut m = MenuLogic::default();
        let mut s = Settings::default();
        for _ in 0..5 {
            m.change(&mut s, true);
        }
        assert_eq!(s.players, Settings::MAX_PLAYERS);
        for _ in 0..5 {
            m.change(&mut s, false);
        }
        assert_eq!(s.players, 1);

        m.cursor = MENU_ARENA_ID;
        for _ in 0..5 {
            m.change(&mut s, true);
        }
        assert_eq!(s.arena, Settings::MAX_ARENA);

        m.cursor = MENU_TV_TYPE_ID;
        m.change(&mut s, false);
        assert_eq!(s.tv_type, TvStandard::Secam);
    }

    #[test]
    fn draw_layout() {
        let mut m = MenuLogic::default();
        m.cursor = MENU_ARENA_ID;
        let mut f = Frame::new();
        m.draw(&mut f, &Settings::default(), true, true);

        // "ST" of START in the first column, first glyph row
        let start_row = option_row(MENU_START_ID);
        assert_eq!(
            f.menu_graphics[start_row],
            (glyph(b'S')[0] << 4) | glyph(b'T')[0]
        );
        // "2" of PLAYERS 2 at the bottom right
        let last = (MENU_COLUMNS - 1) * MENU_COLUMN_ROWS + option_row(MENU_PLAYERS_ID);
        assert_eq!(f.menu_graphics[last], glyph(b'2')[0]);

        assert_eq!(f.menu_control[..MENU_OPTION_HEIGHT], [0; MENU_OPTION_HEIGHT]);
        assert_eq!(
            f.menu_control[MENU_OPTION_HEIGHT..2 * MENU_OPTION_HEIGHT],
            [CONTROL_CURSOR; MENU_OPTION_HEIGHT]
        );
        let arena_line = option_row(MENU_ARENA_ID);
        assert_eq!(f.menu_colors[arena_line * 2], MENU_CURSOR_COLOR);
        assert_eq!(f.menu_colors[(arena_line - 1) * 2], MENU_TEXT_COLOR);
        assert_eq!(f.menu_colors.len(), MENU_COLORS_LEN);

        m.draw(&mut f, &Settings::default(), false, false);
        assert_eq!(f.menu_control, [0; MENU_CONTROL_LEN]);
        assert_eq!(f.menu_colors[arena_line * 2], MENU_TEXT_COLOR & 0x0e);
    }
}
