//! Digit overlay
//!
//! A 5x8 font covering `'0'..='9'`, enough to print the generation counter
//! on top of the grid. Glyphs are stored column-major in the same bit order
//! as the framebuffer pages: bit `n` of a column byte is row `n`.

use crate::traits::PixelSink;

/// Glyph width in pixels
pub const GLYPH_WIDTH: usize = 5;

/// Glyph height in pixels
pub const GLYPH_HEIGHT: usize = 8;

/// Horizontal distance between consecutive characters
pub const GLYPH_ADVANCE: usize = GLYPH_WIDTH + 1;

/// Digit glyphs, `'0'` first
const DIGITS: [[u8; GLYPH_WIDTH]; 10] = [
    [0x3E, 0x51, 0x49, 0x45, 0x3E], // 0
    [0x00, 0x42, 0x7F, 0x40, 0x00], // 1
    [0x42, 0x61, 0x51, 0x49, 0x46], // 2
    [0x21, 0x41, 0x45, 0x4B, 0x31], // 3
    [0x18, 0x14, 0x12, 0x7F, 0x10], // 4
    [0x27, 0x45, 0x45, 0x45, 0x39], // 5
    [0x3E, 0x49, 0x49, 0x49, 0x30], // 6
    [0x01, 0x71, 0x09, 0x05, 0x03], // 7
    [0x36, 0x49, 0x49, 0x49, 0x36], // 8
    [0x06, 0x49, 0x49, 0x29, 0x1E], // 9
];

/// Glyph for `ch`; anything that is not a decimal digit renders as `'0'`
pub fn glyph(ch: char) -> &'static [u8; GLYPH_WIDTH] {
    let index = ch.to_digit(10).unwrap_or(0) as usize;
    &DIGITS[index]
}

/// Draw one character with its top-left corner at `(x, y)`
///
/// The glyph cell is opaque: unset glyph bits clear their pixel. Parts of
/// the glyph whose coordinates would overflow `usize` are skipped.
pub fn draw_char<S: PixelSink + ?Sized>(sink: &mut S, ch: char, x: usize, y: usize) {
    for (col, &bits) in glyph(ch).iter().enumerate() {
        let Some(px) = x.checked_add(col) else {
            break;
        };
        for row in 0..GLYPH_HEIGHT {
            let Some(py) = y.checked_add(row) else {
                break;
            };
            sink.set_pixel(px, py, bits & (1 << row) != 0);
        }
    }
}

/// Draw `number` in decimal, left to right from `(x, y)`
pub fn draw_number<S: PixelSink + ?Sized>(sink: &mut S, number: u32, x: usize, y: usize) {
    // u32::MAX has 10 digits
    let mut digits = [0u8; 10];
    let mut len = 0;
    let mut rest = number;

    loop {
        digits[len] = (rest % 10) as u8;
        len += 1;
        rest /= 10;
        if rest == 0 {
            break;
        }
    }

    for (i, &digit) in digits[..len].iter().rev().enumerate() {
        let ch = char::from(b'0' + digit);
        let Some(cx) = x.checked_add(i * GLYPH_ADVANCE) else {
            break;
        };
        draw_char(sink, ch, cx, y);
    }
}
