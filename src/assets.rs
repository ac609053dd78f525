//! Read-only graphics and colour tables used by the mode logic.
//!
//! Glyphs are 4 pixels wide (low nibble) and `FONT_HEIGHT` rows tall, so two
//! of them fit side by side in one playfield byte.

use crate::consts::{
    BLACK, BLUE, FONT_HEIGHT, GREEN, ORANGE, RED, TURQUOISE, VIOLET, WHITE, YELLOW,
};

pub type Glyph = [u8; FONT_HEIGHT];

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

pub const TITLE: &[u8; 12] = b"PADDLE  BALL";

/// Hue per menu logo line pair, luminance added at render time.
pub const LOGO_HUES: [u8; 8] = [RED, ORANGE, YELLOW, GREEN, TURQUOISE, BLUE, VIOLET, RED];

pub const MENU_TEXT_COLOR: u8 = WHITE;
pub const MENU_CURSOR_COLOR: u8 = YELLOW | 0x0e;
pub const MENU_BACKGROUND: u8 = BLUE | 0x02;
pub const ARENA_BACKGROUND: u8 = BLACK;
pub const P0_COLOR: u8 = BLUE | 0x08;
pub const P1_COLOR: u8 = RED | 0x08;
pub const BALL_COLOR: u8 = WHITE;

/// Glyph for an ASCII character, blank for anything without one.
#[must_use]
pub const fn glyph(c: u8) -> Glyph {
    match c {
        b'0' | b'O' => [0x6, 0x9, 0x9, 0x9, 0x9, 0x9, 0x6],
        b'1' => [0x2, 0x6, 0x2, 0x2, 0x2, 0x2, 0x7],
        b'2' => [0x6, 0x9, 0x1, 0x2, 0x4, 0x8, 0xf],
        b'3' => [0xe, 0x1, 0x1, 0x6, 0x1, 0x1, 0xe],
        b'4' => [0x9, 0x9, 0x9, 0xf, 0x1, 0x1, 0x1],
        b'5' => [0xf, 0x8, 0xe, 0x1, 0x1, 0x9, 0x6],
        b'6' => [0x6, 0x8, 0x8, 0xe, 0x9, 0x9, 0x6],
        b'7' => [0xf, 0x1, 0x1, 0x2, 0x4, 0x4, 0x4],
        b'8' => [0x6, 0x9, 0x9, 0x6, 0x9, 0x9, 0x6],
        b'9' => [0x6, 0x9, 0x9, 0x7, 0x1, 0x1, 0x6],
        b'A' => [0x6, 0x9, 0x9, 0xf, 0x9, 0x9, 0x9],
        b'B' => [0xe, 0x9, 0x9, 0xe, 0x9, 0x9, 0xe],
        b'C' => [0x6, 0x9, 0x8, 0x8, 0x8, 0x9, 0x6],
        b'D' => [0xe, 0x9, 0x9, 0x9, 0x9, 0x9, 0xe],
        b'E' => [0xf, 0x8, 0x8, 0xe, 0x8, 0x8, 0xf],
        b'F' => [0xf, 0x8, 0x8, 0xe, 0x8, 0x8, 0x8],
        b'G' => [0x6, 0x9, 0x8, 0xb, 0x9, 0x9, 0x6],
        b'I' => [0x7, 0x2, 0x2, 0x2, 0x2, 0x2, 0x7],
        b'L' => [0x8, 0x8, 0x8, 0x8, 0x8, 0x8, 0xf],
        b'M' => [0x9, 0xf, 0xf, 0x9, 0x9, 0x9, 0x9],
        b'N' => [0x9, 0xd, 0xd, 0xb, 0xb, 0x9, 0x9],
        b'P' => [0xe, 0x9, 0x9, 0xe, 0x8, 0x8, 0x8],
        b'R' => [0xe, 0x9, 0x9, 0xe, 0xa, 0x9, 0x9],
        b'S' => [0x7, 0x8, 0x8, 0x6, 0x1, 0x1, 0xe],
        b'T' => [0x7, 0x2, 0x2, 0x2, 0x2, 0x2, 0x2],
        b'V' => [0x9, 0x9, 0x9, 0x9, 0x9, 0x6, 0x6],
        b'Y' => [0x9, 0x9, 0x9, 0x6, 0x4, 0x4, 0x4],
        _ => [0; FONT_HEIGHT],
    }
}

/// Glyph of a hex digit, only the low nibble of `n` is used.
#[must_use]
pub fn digit(n: u8) -> Glyph {
    glyph(HEX_DIGITS[usize::from(n & 0x0f)])
}

/// Row `row` of two glyphs packed into one byte, `left` in the high nibble.
#[must_use]
pub fn glyph_pair(left: &Glyph, right: &Glyph, row: usize) -> u8 {
    (left[row] << 4) | (right[row] & 0x0f)
}

/// Renders `text` as packed glyph pairs, one output column per two
/// characters. `columns[c][row]` receives row `row` of characters 2c and 2c+1.
pub fn render_text<const N: usize>(text: &[u8], columns: &mut [[u8; N]], first_row: usize) {
    for (c, column) in columns.iter_mut().enumerate() {
        let left = glyph(text.get(2 * c).copied().unwrap_or(b' '));
        let right = glyph(text.get(2 * c + 1).copied().unwrap_or(b' '));
        for row in 0..FONT_HEIGHT {
            if let Some(b) = column.get_mut(first_row + row) {
                *b = glyph_pair(&left, &right, row);
            }
        }
    }
}

/// Four decimal digits of `value` packed as (thousands, hundreds) and
/// (tens, units). Leading zeros are blanked when `blank_zeros` is set.
#[must_use]
pub fn decimal_pairs(value: u16, blank_zeros: bool) -> (Glyph, Glyph) {
    let value = value.min(9999);
    let digits = [
        (value / 1000) as u8,
        ((value / 100) % 10) as u8,
        ((value / 10) % 10) as u8,
        (value % 10) as u8,
    ];
    let mut glyphs = digits.map(digit);
    if blank_zeros {
        for (i, d) in digits.iter().enumerate().take(3) {
            if *d != 0 {
                break;
            }
            glyphs[i] = glyph(b' ');
        }
    }
    let mut a = [0; FONT_HEIGHT];
    let mut b = [0; FONT_HEIGHT];
    for row in 0..FONT_HEIGHT {
        a[row] = glyph_pair(&glyphs[0], &glyphs[1], row);
        b[row] = glyph_pair(&glyphs[2], &glyphs[3], row);
    }
    (a, b)
}

/// Black and white sets keep only the luminance.
#[must_use]
pub fn tv_color(color: u8, color_tv: bool) -> u8 {
    if color_tv {
        color
    } else {
        color & 0x0e
    }
}
