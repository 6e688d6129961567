//! Centered text composer
//!
//! Lays out lines of monospace text, each centered on its own, stacked
//! downwards at a fixed pitch. Only the glyph advance width is known here;
//! the font itself belongs to the surface.

use crate::color::Color;
use crate::geometry::DisplayGeometry;
use crate::primitive::PrimitiveCall;

/// Monospace text block placement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TextLayout {
    /// Horizontal advance per glyph, in pixels
    pub glyph_width: i32,
    /// Vertical distance between consecutive lines, in pixels
    pub line_height: i32,
    /// Top row of the first line
    pub start_y: i32,
}

impl Default for TextLayout {
    fn default() -> Self {
        Self {
            glyph_width: 6,
            line_height: 8,
            start_y: 90,
        }
    }
}

/// Left column that centers `len` glyphs on a panel `width` pixels wide
///
/// Lines wider than the panel get a negative start column.
pub fn centered_x(len: usize, glyph_width: i32, width: u16) -> i32 {
    (width as i32 - len as i32 * glyph_width) / 2
}

/// Compose centered lines as one glyph call per character
///
/// Calls are emitted line by line, left to right. An empty line emits
/// nothing but still takes up its row.
pub fn render_centered_lines<'a>(
    lines: &'a [&'a str],
    fg: Color,
    bg: Color,
    geometry: DisplayGeometry,
    layout: TextLayout,
) -> impl Iterator<Item = PrimitiveCall> + 'a {
    lines.iter().enumerate().flat_map(move |(row, line)| {
        let x0 = centered_x(line.chars().count(), layout.glyph_width, geometry.width);
        let y = layout.start_y + row as i32 * layout.line_height;

        line.chars()
            .enumerate()
            .map(move |(col, ch)| PrimitiveCall::DrawChar {
                x: x0 + col as i32 * layout.glyph_width,
                y,
                ch,
                fg,
                bg,
                scale: 1,
            })
    })
}
