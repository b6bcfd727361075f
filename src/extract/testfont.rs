//! Fixture glyphs for unit tests: a 3x5 cell font scaled to printed-digit
//! size, shared between synthetic regions and the template set under test.

use image::{GrayImage, Luma};

use crate::templates::TemplateSet;

const CELL: u32 = 10;
pub const GLYPH_W: u32 = 3 * CELL;
pub const GLYPH_H: u32 = 5 * CELL;
// The marker prints as underlined "PB": the underline joins the letters into
// one component too wide for the digit filters, and the wide layout keeps the
// marker from correlating with ordinary digit pairs.
pub const PB_W: u32 = 10 * CELL;
pub const PB_H: u32 = 6 * CELL;

#[rustfmt::skip]
const DIGITS: [[[u8; 3]; 5]; 10] = [
    [[1,1,1],[1,0,1],[1,0,1],[1,0,1],[1,1,1]], // 0
    [[0,1,0],[1,1,0],[0,1,0],[0,1,0],[1,1,1]], // 1
    [[1,1,1],[0,0,1],[1,1,1],[1,0,0],[1,1,1]], // 2
    [[1,1,1],[0,0,1],[0,1,1],[0,0,1],[1,1,1]], // 3
    [[1,0,1],[1,0,1],[1,1,1],[0,0,1],[0,0,1]], // 4
    [[1,1,1],[1,0,0],[1,1,1],[0,0,1],[1,1,1]], // 5
    [[1,1,1],[1,0,0],[1,1,1],[1,0,1],[1,1,1]], // 6
    [[1,1,1],[0,0,1],[0,1,0],[0,1,0],[0,1,0]], // 7
    [[1,1,1],[1,0,1],[1,1,1],[1,0,1],[1,1,1]], // 8
    [[1,1,1],[1,0,1],[1,1,1],[0,0,1],[0,0,1]], // 9
];

#[rustfmt::skip]
const LETTER_P: [[u8; 3]; 5] = [[1,1,1],[1,0,1],[1,1,1],[1,0,0],[1,0,0]];
#[rustfmt::skip]
const LETTER_B: [[u8; 3]; 5] = [[1,1,0],[1,0,1],[1,1,0],[1,0,1],[1,1,0]];

fn draw_cells(img: &mut GrayImage, cells: &[[u8; 3]; 5], x0: u32, y0: u32) {
    for (row, line) in cells.iter().enumerate() {
        for (col, &cell) in line.iter().enumerate() {
            if cell == 0 {
                continue;
            }
            for dy in 0..CELL {
                for dx in 0..CELL {
                    img.put_pixel(x0 + col as u32 * CELL + dx, y0 + row as u32 * CELL + dy, Luma([255u8]));
                }
            }
        }
    }
}

/// A single digit glyph at printed size, ink = 255 on background = 0.
pub fn glyph_image(digit: u8) -> GrayImage {
    let mut img = GrayImage::new(GLYPH_W, GLYPH_H);
    draw_cells(&mut img, &DIGITS[digit as usize], 0, 0);
    img
}

/// The "PB" marker glyph: underlined P and B.
pub fn pb_image() -> GrayImage {
    let mut img = GrayImage::new(PB_W, PB_H);
    draw_cells(&mut img, &LETTER_P, CELL, 0);
    draw_cells(&mut img, &LETTER_B, 6 * CELL, 0);
    for x in 0..PB_W {
        for dy in 0..CELL {
            img.put_pixel(x, 5 * CELL + dy, Luma([255u8]));
        }
    }
    img
}

/// Copies `src` into `dst` at (x0, y0), foreground pixels only.
pub fn blit(dst: &mut GrayImage, src: &GrayImage, x0: u32, y0: u32) {
    for (x, y, p) in src.enumerate_pixels() {
        if p[0] > 0 {
            dst.put_pixel(x0 + x, y0 + y, *p);
        }
    }
}

/// Complete template set built from the fixture font.
pub fn test_templates() -> TemplateSet {
    let mut set = digit_templates();
    set.set_pb(pb_image());
    set
}

/// Digits only; the PB slot stays empty.
pub fn digit_templates() -> TemplateSet {
    let mut set = TemplateSet::new();
    for digit in 0..=9u8 {
        set.set_digit(digit, glyph_image(digit));
    }
    set
}
