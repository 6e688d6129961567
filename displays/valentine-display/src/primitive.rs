//! Primitive drawing calls
//!
//! Each variant maps one-to-one onto a `Surface` method. Composers return
//! these instead of drawing so their output can be inspected.

use crate::color::Color;

/// One indivisible drawing operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PrimitiveCall {
    /// Fill the whole panel
    FillScreen { color: Color },
    /// Filled circle centered at (x, y)
    FillCircle { x: i32, y: i32, r: i32, color: Color },
    /// Filled triangle through three vertices
    FillTriangle {
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        color: Color,
    },
    /// One glyph cell with its top-left corner at (x, y)
    DrawChar {
        x: i32,
        y: i32,
        ch: char,
        fg: Color,
        bg: Color,
        scale: u8,
    },
}

impl PrimitiveCall {
    /// Leftmost x coordinate touched by this call's anchor point
    ///
    /// For glyphs this is the cell's left edge; for shapes it is the
    /// smallest anchor x (circle center minus radius, leftmost vertex).
    pub fn min_x(&self) -> Option<i32> {
        match *self {
            PrimitiveCall::FillScreen { .. } => None,
            PrimitiveCall::FillCircle { x, r, .. } => Some(x - r),
            PrimitiveCall::FillTriangle { x0, x1, x2, .. } => Some(x0.min(x1).min(x2)),
            PrimitiveCall::DrawChar { x, .. } => Some(x),
        }
    }
}
