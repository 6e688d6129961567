//! Display surface trait
//!
//! Defines the primitive operations a display driver must provide.

use crate::color::Color;
use crate::geometry::DisplayGeometry;
use crate::primitive::PrimitiveCall;

/// Display surface errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Communication error with display
    Communication,
    /// Invalid coordinates or dimensions
    InvalidCoordinates,
}

/// Display surface trait
///
/// Provides a hardware-agnostic pixel canvas. Implementations own the
/// rasterization; callers only ever write, never read back.
pub trait Surface {
    /// Get the panel dimensions in pixels
    fn geometry(&self) -> DisplayGeometry;

    /// Fill the entire panel with one color
    fn fill_screen(&mut self, color: Color) -> Result<(), DisplayError>;

    /// Fill a circle of radius `r` centered at (`x`, `y`)
    fn fill_circle(&mut self, x: i32, y: i32, r: i32, color: Color) -> Result<(), DisplayError>;

    /// Fill the triangle (`x0`, `y0`), (`x1`, `y1`), (`x2`, `y2`)
    #[allow(clippy::too_many_arguments)]
    fn fill_triangle(
        &mut self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        color: Color,
    ) -> Result<(), DisplayError>;

    /// Draw one glyph cell at (`x`, `y`)
    ///
    /// - `fg`: glyph color
    /// - `bg`: cell background color
    /// - `scale`: integer magnification (1 = native glyph size)
    fn draw_char(
        &mut self,
        x: i32,
        y: i32,
        ch: char,
        fg: Color,
        bg: Color,
        scale: u8,
    ) -> Result<(), DisplayError>;

    /// Set the text colors used by subsequent text output
    fn set_text_color(&mut self, fg: Color, bg: Color);

    /// Move the text cursor
    fn set_cursor(&mut self, x: i32, y: i32);

    /// Execute a single primitive call
    fn apply(&mut self, call: &PrimitiveCall) -> Result<(), DisplayError> {
        match *call {
            PrimitiveCall::FillScreen { color } => self.fill_screen(color),
            PrimitiveCall::FillCircle { x, y, r, color } => self.fill_circle(x, y, r, color),
            PrimitiveCall::FillTriangle {
                x0,
                y0,
                x1,
                y1,
                x2,
                y2,
                color,
            } => self.fill_triangle(x0, y0, x1, y1, x2, y2, color),
            PrimitiveCall::DrawChar {
                x,
                y,
                ch,
                fg,
                bg,
                scale,
            } => self.draw_char(x, y, ch, fg, bg, scale),
        }
    }

    /// Execute primitive calls in order, stopping at the first failure
    fn apply_all<I>(&mut self, calls: I) -> Result<(), DisplayError>
    where
        I: IntoIterator<Item = PrimitiveCall>,
        Self: Sized,
    {
        for call in calls {
            self.apply(&call)?;
        }
        Ok(())
    }
}
