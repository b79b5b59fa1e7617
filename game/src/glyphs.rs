//! Cube-glyph bitmaps for the HUD: digits plus the letters of the title.

pub const GLYPH_HEIGHT: i32 = 5;

/// Horizontal distance between consecutive digits.
pub const DIGIT_ADVANCE: i32 = 4;

/// Rows top to bottom; bit `width-1` is the leftmost column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub width: i32,
    pub rows: [u8; GLYPH_HEIGHT as usize],
}

impl Glyph {
    const fn narrow(rows: [u8; GLYPH_HEIGHT as usize]) -> Self {
        Self { width: 3, rows }
    }

    /// Filled cells as `(column, row)` with row 0 at the bottom.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.rows.iter().enumerate().flat_map(move |(i, bits)| {
            let row = GLYPH_HEIGHT - 1 - i as i32;
            (0..self.width).filter_map(move |col| {
                let mask = 1u8 << (self.width - 1 - col);
                (bits & mask != 0).then_some((col, row))
            })
        })
    }

    pub fn advance(&self) -> i32 {
        self.width + 1
    }
}

const DIGITS: [Glyph; 10] = [
    Glyph::narrow([0b111, 0b101, 0b101, 0b101, 0b111]),
    Glyph::narrow([0b011, 0b101, 0b001, 0b001, 0b001]),
    Glyph::narrow([0b111, 0b001, 0b111, 0b100, 0b111]),
    Glyph::narrow([0b111, 0b001, 0b011, 0b001, 0b111]),
    Glyph::narrow([0b100, 0b101, 0b111, 0b001, 0b001]),
    Glyph::narrow([0b111, 0b100, 0b111, 0b001, 0b111]),
    Glyph::narrow([0b111, 0b100, 0b111, 0b101, 0b111]),
    Glyph::narrow([0b111, 0b001, 0b011, 0b001, 0b001]),
    Glyph::narrow([0b111, 0b101, 0b111, 0b101, 0b111]),
    Glyph::narrow([0b111, 0b101, 0b111, 0b001, 0b111]),
];

pub fn digit(d: u8) -> Option<Glyph> {
    DIGITS.get(d as usize).copied()
}

pub fn glyph(ch: char) -> Option<Glyph> {
    match ch.to_ascii_uppercase() {
        c @ '0'..='9' => digit(c as u8 - b'0'),
        'S' => digit(5),
        'N' => Some(Glyph {
            width: 4,
            rows: [0b1001, 0b1101, 0b1111, 0b1011, 0b1001],
        }),
        'A' => Some(Glyph::narrow([0b010, 0b101, 0b111, 0b101, 0b101])),
        'K' => Some(Glyph::narrow([0b101, 0b101, 0b110, 0b101, 0b101])),
        'E' => Some(Glyph::narrow([0b111, 0b100, 0b111, 0b100, 0b111])),
        'D' => Some(Glyph::narrow([0b110, 0b101, 0b101, 0b101, 0b110])),
        _ => None,
    }
}

/// Lays `text` out left to right from x = 0; unknown characters are skipped.
pub fn layout_text(text: &str) -> Vec<(i32, Glyph)> {
    let mut x = 0;
    let mut out = Vec::with_capacity(text.len());
    for ch in text.chars() {
        if let Some(g) = glyph(ch) {
            out.push((x, g));
            x += g.advance();
        }
    }
    out
}

/// Decimal digits of `n`, most significant first. Zero yields no digits.
pub fn decimal_digits(mut n: usize) -> Vec<u8> {
    let mut digits = Vec::new();
    while n != 0 {
        digits.push((n % 10) as u8);
        n /= 10;
    }
    digits.reverse();
    digits
}
