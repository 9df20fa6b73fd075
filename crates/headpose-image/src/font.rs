//! Compact 3x5 bitmap glyphs used by the text drawing routine.

/// Glyph width in font pixels.
pub(crate) const GLYPH_WIDTH: usize = 3;
/// Glyph height in font pixels.
pub(crate) const GLYPH_HEIGHT: usize = 5;
/// Horizontal gap between glyphs in font pixels.
pub(crate) const GLYPH_SPACING: usize = 1;

/// Returns the rows of a glyph, 3 bits each, most significant bit on the left.
///
/// Unknown characters render as a filled block.
pub(crate) fn glyph(c: char) -> [u8; GLYPH_HEIGHT] {
    match c {
        '0' => [0x7, 0x5, 0x5, 0x5, 0x7],
        '1' => [0x2, 0x6, 0x2, 0x2, 0x7],
        '2' => [0x7, 0x1, 0x7, 0x4, 0x7],
        '3' => [0x7, 0x1, 0x7, 0x1, 0x7],
        '4' => [0x5, 0x5, 0x7, 0x1, 0x1],
        '5' => [0x7, 0x4, 0x7, 0x1, 0x7],
        '6' => [0x7, 0x4, 0x7, 0x5, 0x7],
        '7' => [0x7, 0x1, 0x2, 0x4, 0x4],
        '8' => [0x7, 0x5, 0x7, 0x5, 0x7],
        '9' => [0x7, 0x5, 0x7, 0x1, 0x7],
        ' ' => [0x0, 0x0, 0x0, 0x0, 0x0],
        '-' => [0x0, 0x0, 0x7, 0x0, 0x0],
        '.' => [0x0, 0x0, 0x0, 0x0, 0x2],
        ',' => [0x0, 0x0, 0x0, 0x2, 0x4],
        ':' => [0x0, 0x2, 0x0, 0x2, 0x0],
        '(' => [0x2, 0x4, 0x4, 0x4, 0x2],
        ')' => [0x2, 0x1, 0x1, 0x1, 0x2],
        'c' => [0x0, 0x7, 0x4, 0x4, 0x7],
        'm' => [0x0, 0x6, 0x7, 0x5, 0x5],
        'x' => [0x0, 0x5, 0x2, 0x2, 0x5],
        'y' => [0x0, 0x5, 0x7, 0x1, 0x6],
        'z' => [0x0, 0x7, 0x1, 0x4, 0x7],
        _ => [0x7, 0x7, 0x7, 0x7, 0x7],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_glyph_is_block() {
        assert_eq!(glyph('#'), [0x7; GLYPH_HEIGHT]);
        assert_eq!(glyph(' '), [0x0; GLYPH_HEIGHT]);
    }
}
