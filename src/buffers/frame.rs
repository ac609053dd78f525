use crate::consts::{
    BALL_X_ADDR, BUF_COLOR0_ADDR, BUF_COLOR1_ADDR, BUF_MENU_COLORS_ADDR, BUF_MENU_CONTROL_ADDR,
    BUF_MENU_GRAPHICS_ADDR, BUF_PLAYER0_ADDR, BUF_PLAYER1_ADDR, BUF_SCORE0_A_ADDR,
    BUF_SCORE0_B_ADDR, BUF_SCORE0_COLOR_ADDR, BUF_SCORE1_A_ADDR, BUF_SCORE1_B_ADDR,
    BUF_SCORE1_COLOR_ADDR, BUF_SPLASH0_ADDR, BUF_SPLASH1_ADDR, BUF_SPLASH2_ADDR, BUF_SPLASH3_ADDR,
    BUF_TIMERA_ADDR, BUF_TIMERB_ADDR, COLUMN_LEN, FONT_HEIGHT, GAME_ZERO_OUT_BYTES,
    GAME_ZERO_OUT_START, M0_X_ADDR, M1_X_ADDR, MENU_COLORS_LEN, MENU_CONTROL_LEN,
    MENU_GRAPHICS_LEN, P0_X_ADDR, P1_X_ADDR, TEMP_COLOR_ADDR,
};
use crate::dispatch::Mode;
use crate::shared_memory::SharedMemory;

const SPLASH_ADDRS: [u16; 4] = [
    BUF_SPLASH0_ADDR,
    BUF_SPLASH1_ADDR,
    BUF_SPLASH2_ADDR,
    BUF_SPLASH3_ADDR,
];

/// Object positions and colours the kernel copies to the TIA.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScalarState {
    pub p0_x: u8,
    pub p1_x: u8,
    pub m0_x: u8,
    pub m1_x: u8,
    pub ball_x: u8,
    pub temp_color: u8,
    pub score0_color: u8,
    pub score1_color: u8,
}

/// Everything the coprocessor produces for one frame. One instance of each
/// payload; `DoubleBuffer<Frame>` holds the pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Mode that rendered this frame, selects the kernel on the host side.
    pub mode: Mode,
    pub scalars: ScalarState,
    pub player0: [u8; COLUMN_LEN],
    pub player1: [u8; COLUMN_LEN],
    pub color0: [u8; COLUMN_LEN],
    pub color1: [u8; COLUMN_LEN],
    pub score0_a: [u8; FONT_HEIGHT],
    pub score0_b: [u8; FONT_HEIGHT],
    pub score1_a: [u8; FONT_HEIGHT],
    pub score1_b: [u8; FONT_HEIGHT],
    pub timer_a: [u8; FONT_HEIGHT],
    pub timer_b: [u8; FONT_HEIGHT],
    pub menu_graphics: [u8; MENU_GRAPHICS_LEN],
    pub menu_control: [u8; MENU_CONTROL_LEN],
    pub menu_colors: [u8; MENU_COLORS_LEN],
    pub splash: [[u8; COLUMN_LEN]; 4],
}

impl Frame {
    #[must_use]
    pub fn new() -> Self {
        Self {
            mode: Mode::Init,
            scalars: ScalarState::default(),
            player0: [0; COLUMN_LEN],
            player1: [0; COLUMN_LEN],
            color0: [0; COLUMN_LEN],
            color1: [0; COLUMN_LEN],
            score0_a: [0; FONT_HEIGHT],
            score0_b: [0; FONT_HEIGHT],
            score1_a: [0; FONT_HEIGHT],
            score1_b: [0; FONT_HEIGHT],
            timer_a: [0; FONT_HEIGHT],
            timer_b: [0; FONT_HEIGHT],
            menu_graphics: [0; MENU_GRAPHICS_LEN],
            menu_control: [0; MENU_CONTROL_LEN],
            menu_colors: [0; MENU_COLORS_LEN],
            splash: [[0; COLUMN_LEN]; 4],
        }
    }

    pub fn clear_scores(&mut self) {
        self.score0_a.fill(0);
        self.score0_b.fill(0);
        self.score1_a.fill(0);
        self.score1_b.fill(0);
        self.timer_a.fill(0);
        self.timer_b.fill(0);
    }

    /// Lays the frame out at the display data addresses. Game, menu and
    /// splash buffers share the same region, `mode` picks which is mapped.
    pub fn write_image(&self, image: &mut SharedMemory) {
        image.set(P0_X_ADDR, self.scalars.p0_x);
        image.set(P1_X_ADDR, self.scalars.p1_x);
        image.set(M0_X_ADDR, self.scalars.m0_x);
        image.set(M1_X_ADDR, self.scalars.m1_x);
        image.set(BALL_X_ADDR, self.scalars.ball_x);
        image.set(TEMP_COLOR_ADDR, self.scalars.temp_color);

        image.fill_range(GAME_ZERO_OUT_START, GAME_ZERO_OUT_BYTES, 0);
        match self.mode {
            Mode::Game => {
                image.copy(BUF_PLAYER0_ADDR, &self.player0);
                image.copy(BUF_PLAYER1_ADDR, &self.player1);
                image.copy(BUF_COLOR0_ADDR, &self.color0);
                image.copy(BUF_COLOR1_ADDR, &self.color1);
            }
            Mode::Menu => {
                image.copy(BUF_MENU_GRAPHICS_ADDR, &self.menu_graphics);
                image.copy(BUF_MENU_CONTROL_ADDR, &self.menu_control);
                image.copy(BUF_MENU_COLORS_ADDR, &self.menu_colors);
            }
            Mode::Init | Mode::Splash => {
                for (addr, column) in SPLASH_ADDRS.iter().zip(self.splash.iter()) {
                    image.copy(*addr, column);
                }
            }
        }

        image.copy(BUF_SCORE0_A_ADDR, &self.score0_a);
        image.copy(BUF_SCORE0_B_ADDR, &self.score0_b);
        image.copy(BUF_TIMERA_ADDR, &self.timer_a);
        image.copy(BUF_TIMERB_ADDR, &self.timer_b);
        image.copy(BUF_SCORE1_A_ADDR, &self.score1_a);
        image.copy(BUF_SCORE1_B_ADDR, &self.score1_b);
        image.set(BUF_SCORE0_COLOR_ADDR, self.scalars.score0_color);
        image.set(BUF_SCORE1_COLOR_ADDR, self.scalars.score1_color);
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{IMAGE_LEN, MENU_COLORS_LEN};

    #[test]
    fn game_image_layout() {
        let mut f = Frame::new();
        f.mode = Mode::Game;
        f.scalars.p0_x = 0x11;
        f.scalars.ball_x = 0x22;
        f.scalars.score1_color = 0x44;
        f.player0[0] = 0xa0;
        f.player1[COLUMN_LEN - 1] = 0xa1;
        f.color1[3] = 0xa2;
        f.timer_b[6] = 0xa3;
        f.score1_b[0] = 0xa4;

        let mut image = SharedMemory::default();
        f.write_image(&mut image);
        assert_eq!(image.len(), IMAGE_LEN);
        assert_eq!(image.get(0x000c), 0x11);
        assert_eq!(image.get(0x0008), 0x22);
        assert_eq!(image.get(0x033b), 0x44);
        assert_eq!(image.get(0x0010), 0xa0);
        assert_eq!(image.get(0x018f), 0xa1);
        assert_eq!(image.get(0x0253), 0xa2);
        assert_eq!(image.get(0x032b), 0xa3);
        assert_eq!(image.get(0x0333), 0xa4);
    }

    #[test]
    fn menu_buffers_alias_game_region() {
        let mut f = Frame::new();
        f.player0.fill(0x55);
        f.menu_graphics[0] = 0x01;
        f.menu_colors[MENU_COLORS_LEN - 1] = 0x02;
        f.mode = Mode::Menu;

        let mut image = SharedMemory::default();
        image.fill(0xee);
        f.write_image(&mut image);
        assert_eq!(image.get(0x0010), 0x01);
        assert_eq!(image.get(0x0202 + MENU_COLORS_LEN as u16 - 1), 0x02);
        // player0 must not leak into the menu layout
        assert_eq!(image.get(0x0011), 0x00);
    }

    #[test]
    fn splash_columns_are_mapped() {
        let mut f = Frame::new();
        f.mode = Mode::Splash;
        for (i, column) in f.splash.iter_mut().enumerate() {
            column.fill(i as u8 + 1);
        }
        let mut image = SharedMemory::default();
        f.write_image(&mut image);
        assert_eq!(image.get(0x0010), 1);
        assert_eq!(image.get(0x00d0), 2);
        assert_eq!(image.get(0x0190), 3);
        assert_eq!(image.get(0x0250), 4);
        assert_eq!(image.get(0x030f), 4);
    }
}
