// Display data addresses shared by the 6507 kernel and the ARM code.
// Offsets are relative to the start of the display data RAM.

pub const RUN_FUNC_ADDR: u16 = 0x0000;
pub const SWCHA_ADDR: u16 = 0x0001;
pub const SWCHB_ADDR: u16 = 0x0002;
pub const INPT4_ADDR: u16 = 0x0003;
pub const INPT5_ADDR: u16 = 0x0004;
pub const VB_TIME_ADDR: u16 = 0x0005;
pub const OS_TIME_ADDR: u16 = 0x0006;
pub const MODE_ADDR: u16 = 0x0007;
pub const BALL_X_ADDR: u16 = 0x0008;
pub const M1_X_ADDR: u16 = 0x0009;
pub const M0_X_ADDR: u16 = 0x000a;
pub const P1_X_ADDR: u16 = 0x000b;
pub const P0_X_ADDR: u16 = 0x000c;
pub const TEMP_COLOR_ADDR: u16 = 0x000d;
pub const HOST_REQUEST_ADDR: u16 = 0x000e;
pub const COPROC_READY_ADDR: u16 = 0x000f;

pub const CONTROL_BLOCK_LEN: usize = 0x10;

pub const BUF_PLAYER0_ADDR: u16 = 0x0010;
pub const BUF_PLAYER1_ADDR: u16 = 0x00d0;
pub const BUF_COLOR0_ADDR: u16 = 0x0190;
pub const BUF_COLOR1_ADDR: u16 = 0x0250;

pub const BUF_MENU_GRAPHICS_ADDR: u16 = 0x0010;
pub const BUF_MENU_CONTROL_ADDR: u16 = 0x01d8;
pub const BUF_MENU_COLORS_ADDR: u16 = 0x0202;

pub const BUF_SPLASH0_ADDR: u16 = 0x0010;
pub const BUF_SPLASH1_ADDR: u16 = 0x00d0;
pub const BUF_SPLASH2_ADDR: u16 = 0x0190;
pub const BUF_SPLASH3_ADDR: u16 = 0x0250;

pub const BUF_SCORE0_A_ADDR: u16 = 0x0310;
pub const BUF_SCORE0_B_ADDR: u16 = 0x0317;
pub const BUF_TIMERA_ADDR: u16 = 0x031e;
pub const BUF_TIMERB_ADDR: u16 = 0x0325;
pub const BUF_SCORE1_A_ADDR: u16 = 0x032c;
pub const BUF_SCORE1_B_ADDR: u16 = 0x0333;
pub const BUF_SCORE0_COLOR_ADDR: u16 = 0x033a;
pub const BUF_SCORE1_COLOR_ADDR: u16 = 0x033b;

pub const IMAGE_LEN: usize = 0x033c;

// Region the game clears on reset, [GAME_ZERO_OUT_START, GAME_ZERO_OUT_START + GAME_ZERO_OUT_BYTES)
pub const GAME_ZERO_OUT_START: u16 = 0x0010;
pub const GAME_ZERO_OUT_BYTES: u16 = 0x032c;

pub const ARENA_HEIGHT: usize = 0xb6;
pub const COLUMN_LEN: usize = 0xc0;
pub const FONT_HEIGHT: usize = 7;
pub const MENU_GRAPHICS_LEN: usize = 0x1c8;
pub const MENU_CONTROL_LEN: usize = 0x2a;
pub const MENU_COLORS_LEN: usize = 0x86;
pub const MENU_LOGO_HEIGHT: usize = 0x19;
pub const MENU_OPTION_HEIGHT: usize = 7;

pub const MENU_PLAYERS_ID: u8 = 1;
pub const MENU_ARENA_ID: u8 = 2;
pub const MENU_OPTION1_ID: u8 = 3;
pub const MENU_OPTION2_ID: u8 = 4;
pub const MENU_TV_TYPE_ID: u8 = 5;
pub const MENU_START_ID: u8 = 6;

// Routine codes written to RUN_FUNC.
pub const FN_INIT: u8 = 0;
pub const FN_GAME_OS: u8 = 1;
pub const FN_GAME_VB: u8 = 2;
pub const FN_MENU_OS: u8 = 3;
pub const FN_MENU_VB: u8 = 4;
pub const FN_SPLASH_OS: u8 = 5;
pub const FN_SPLASH_VB: u8 = 6;

// NTSC hues, OR with a luminance 0x0..0xE
pub const BLACK: u8 = 0x00;
pub const GREY: u8 = 0x00;
pub const YELLOW: u8 = 0x10;
pub const ORANGE: u8 = 0x20;
pub const BROWN: u8 = 0x30;
pub const RED: u8 = 0x40;
pub const PURPLE: u8 = 0x50;
pub const VIOLET: u8 = 0x60;
pub const INDIGO: u8 = 0x70;
pub const BLUE: u8 = 0x80;
pub const BLUE2: u8 = 0x90;
pub const TURQUOISE: u8 = 0xa0;
pub const CYAN: u8 = 0xb0;
pub const GREEN: u8 = 0xc0;
pub const YELLOW_GREEN: u8 = 0xd0;
pub const OCHRE_GREEN: u8 = 0xe0;
pub const OCHRE: u8 = 0xf0;
pub const WHITE: u8 = 0x0e;

/* "
The 6507 runs at the colour clock divided by 3: 3.579545 MHz / 3 on NTSC
consoles, 3.546894 MHz / 3 on PAL. One scanline is 228 colour clocks, 76 CPU cycles.
" */
pub const NTSC_CPU_FREQ: u32 = 1_193_182;
pub const PAL_CPU_FREQ: u32 = 1_182_298;
pub const CYCLES_PER_LINE: u32 = 76;

pub const NTSC_VSYNC_LINES: u32 = 3;
pub const NTSC_VBLANK_LINES: u32 = 37;
pub const NTSC_PICTURE_LINES: u32 = 192;
pub const NTSC_OVERSCAN_LINES: u32 = 30;

pub const PAL_VSYNC_LINES: u32 = 3;
pub const PAL_VBLANK_LINES: u32 = 45;
pub const PAL_PICTURE_LINES: u32 = 228;
pub const PAL_OVERSCAN_LINES: u32 = 36;
