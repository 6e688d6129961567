//! `Surface` implementation on top of `embedded-graphics`
//!
//! Any `DrawTarget<Color = Rgb565>` with a fixed size becomes a surface.
//! Circles, triangles and glyphs are rasterized by `embedded-graphics`;
//! the target only has to accept pixels.

use embedded_graphics::mono_font::iso_8859_1::FONT_5X8;
use embedded_graphics::mono_font::MonoTextStyleBuilder;
use embedded_graphics::pixelcolor::raw::RawU16;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, PrimitiveStyle, Rectangle, Triangle};
use embedded_graphics::text::{Baseline, Text};

use crate::backend::{DisplayError, Surface};
use crate::color::Color;
use crate::geometry::DisplayGeometry;

/// Character cell: a 5x8 glyph followed by one column of background
const CELL: Size = Size::new(6, 8);

impl From<Color> for Rgb565 {
    fn from(color: Color) -> Self {
        Rgb565::from(RawU16::new(color.raw()))
    }
}

/// Surface backed by an `embedded-graphics` draw target
pub struct GraphicsSurface<D> {
    target: D,
    geometry: DisplayGeometry,
    text_fg: Color,
    text_bg: Color,
    cursor: Point,
}

impl<D> GraphicsSurface<D>
where
    D: DrawTarget<Color = Rgb565> + OriginDimensions,
{
    /// Wrap a draw target, taking the panel size from the target
    ///
    /// Fails for targets too large to address with `DisplayGeometry`.
    pub fn new(target: D) -> Result<Self, DisplayError> {
        let size = target.size();
        let width = u16::try_from(size.width).map_err(|_| DisplayError::InvalidCoordinates)?;
        let height = u16::try_from(size.height).map_err(|_| DisplayError::InvalidCoordinates)?;
        Ok(Self {
            target,
            geometry: DisplayGeometry::new(width, height),
            text_fg: Color::WHITE,
            text_bg: Color::BLACK,
            cursor: Point::zero(),
        })
    }

    /// Borrow the underlying draw target
    pub fn target(&self) -> &D {
        &self.target
    }

    /// Unwrap the underlying draw target
    pub fn into_inner(self) -> D {
        self.target
    }

    /// Current text colors (foreground, background)
    pub fn text_color(&self) -> (Color, Color) {
        (self.text_fg, self.text_bg)
    }

    /// Current text cursor
    pub fn cursor(&self) -> (i32, i32) {
        (self.cursor.x, self.cursor.y)
    }
}

impl<D> Surface for GraphicsSurface<D>
where
    D: DrawTarget<Color = Rgb565> + OriginDimensions,
{
    fn geometry(&self) -> DisplayGeometry {
        self.geometry
    }

    fn fill_screen(&mut self, color: Color) -> Result<(), DisplayError> {
        self.target
            .clear(Rgb565::from(color))
            .map_err(|_| DisplayError::Communication)
    }

    fn fill_circle(&mut self, x: i32, y: i32, r: i32, color: Color) -> Result<(), DisplayError> {
        if r < 0 {
            return Err(DisplayError::InvalidCoordinates);
        }
        Circle::with_center(Point::new(x, y), 2 * r as u32 + 1)
            .into_styled(PrimitiveStyle::with_fill(Rgb565::from(color)))
            .draw(&mut self.target)
            .map_err(|_| DisplayError::Communication)
    }

    fn fill_triangle(
        &mut self,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        x2: i32,
        y2: i32,
        color: Color,
    ) -> Result<(), DisplayError> {
        Triangle::new(Point::new(x0, y0), Point::new(x1, y1), Point::new(x2, y2))
            .into_styled(PrimitiveStyle::with_fill(Rgb565::from(color)))
            .draw(&mut self.target)
            .map_err(|_| DisplayError::Communication)
    }

    fn draw_char(
        &mut self,
        x: i32,
        y: i32,
        ch: char,
        fg: Color,
        bg: Color,
        scale: u8,
    ) -> Result<(), DisplayError> {
        if scale == 0 {
            return Err(DisplayError::InvalidCoordinates);
        }

        let mut buf = [0u8; 4];
        let glyph = ch.encode_utf8(&mut buf);
        let (fg, bg) = (Rgb565::from(fg), Rgb565::from(bg));

        if scale == 1 {
            draw_cell(&mut self.target, Point::new(x, y), glyph, fg, bg)
                .map_err(|_| DisplayError::Communication)
        } else {
            let mut scaled = Scaled {
                target: &mut self.target,
                origin: Point::new(x, y),
                scale: scale as u32,
            };
            draw_cell(&mut scaled, Point::zero(), glyph, fg, bg)
                .map_err(|_| DisplayError::Communication)
        }
    }

    fn set_text_color(&mut self, fg: Color, bg: Color) {
        self.text_fg = fg;
        self.text_bg = bg;
    }

    fn set_cursor(&mut self, x: i32, y: i32) {
        self.cursor = Point::new(x, y);
    }
}

/// Paint one opaque character cell with its top-left corner at `origin`
fn draw_cell<T>(
    target: &mut T,
    origin: Point,
    glyph: &str,
    fg: Rgb565,
    bg: Rgb565,
) -> Result<(), T::Error>
where
    T: DrawTarget<Color = Rgb565>,
{
    let style = MonoTextStyleBuilder::new()
        .font(&FONT_5X8)
        .text_color(fg)
        .background_color(bg)
        .build();
    Text::with_baseline(glyph, origin, style, Baseline::Top).draw(target)?;

    let glyph_width = FONT_5X8.character_size.width;
    let spacing = Rectangle::new(
        origin + Point::new(glyph_width as i32, 0),
        Size::new(CELL.width - glyph_width, CELL.height),
    );
    target.fill_solid(&spacing, bg)
}

/// Draw target that blows every pixel up into a `scale` x `scale` block
struct Scaled<'a, D> {
    target: &'a mut D,
    origin: Point,
    scale: u32,
}

impl<D> Dimensions for Scaled<'_, D>
where
    D: DrawTarget<Color = Rgb565>,
{
    fn bounding_box(&self) -> Rectangle {
        let size = self.target.bounding_box().size;
        Rectangle::new(
            Point::zero(),
            Size::new(size.width / self.scale, size.height / self.scale),
        )
    }
}

impl<D> DrawTarget for Scaled<'_, D>
where
    D: DrawTarget<Color = Rgb565>,
{
    type Color = Rgb565;
    type Error = D::Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            let top_left = self.origin + point * self.scale as i32;
            self.target
                .fill_solid(&Rectangle::new(top_left, Size::new_equal(self.scale)), color)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heart::{draw_heart, HeartStyle};
    use crate::text::{render_centered_lines, TextLayout};
    use embedded_graphics::mock_display::MockDisplay;

    fn surface() -> GraphicsSurface<MockDisplay<Rgb565>> {
        let mut display = MockDisplay::new();
        display.set_allow_overdraw(true);
        GraphicsSurface::new(display).unwrap()
    }

    #[test]
    fn test_geometry_from_target() {
        let s = surface();
        assert_eq!(s.geometry(), DisplayGeometry::new(64, 64));
    }

    #[test]
    fn test_color_conversion_is_bit_exact() {
        let rgb: Rgb565 = Color::RED.into();
        assert_eq!(rgb, Rgb565::RED);
        let rgb: Rgb565 = Color(0x1234).into();
        assert_eq!(rgb.into_storage(), 0x1234);
    }

    #[test]
    fn test_fill_screen() {
        let mut s = surface();
        s.fill_screen(Color::BLUE).unwrap();
        assert_eq!(s.target().get_pixel(Point::new(0, 0)), Some(Rgb565::BLUE));
        assert_eq!(s.target().get_pixel(Point::new(63, 63)), Some(Rgb565::BLUE));
    }

    #[test]
    fn test_fill_circle() {
        let mut s = surface();
        s.fill_circle(20, 20, 5, Color::RED).unwrap();
        assert_eq!(s.target().get_pixel(Point::new(20, 20)), Some(Rgb565::RED));
        assert_eq!(s.target().get_pixel(Point::new(20, 24)), Some(Rgb565::RED));
        assert_eq!(s.target().get_pixel(Point::new(20, 27)), None);
        assert_eq!(s.target().get_pixel(Point::new(0, 0)), None);
    }

    #[test]
    fn test_negative_radius_rejected() {
        let mut s = surface();
        assert_eq!(
            s.fill_circle(10, 10, -1, Color::RED),
            Err(DisplayError::InvalidCoordinates)
        );
    }

    #[test]
    fn test_fill_triangle() {
        let mut s = surface();
        s.fill_triangle(0, 0, 20, 0, 10, 10, Color::GREEN).unwrap();
        assert_eq!(s.target().get_pixel(Point::new(10, 5)), Some(Rgb565::GREEN));
        assert_eq!(s.target().get_pixel(Point::new(0, 10)), None);
    }

    #[test]
    fn test_draw_char_fills_its_cell() {
        let mut s = surface();
        s.draw_char(4, 4, 'A', Color::WHITE, Color::BLACK, 1).unwrap();

        let mut lit = 0;
        for y in 4..12 {
            for x in 4..10 {
                match s.target().get_pixel(Point::new(x, y)) {
                    Some(c) if c == Rgb565::WHITE => lit += 1,
                    Some(c) if c == Rgb565::BLACK => {}
                    other => panic!("({}, {}) was {:?}", x, y, other),
                }
            }
        }
        assert!(lit > 0);
        assert_eq!(s.target().get_pixel(Point::new(10, 4)), None);
        assert_eq!(s.target().get_pixel(Point::new(4, 12)), None);
    }

    #[test]
    fn test_draw_char_scaled() {
        let mut s = surface();
        s.draw_char(0, 0, '#', Color::YELLOW, Color::BLUE, 2).unwrap();

        for y in 0..16 {
            for x in 0..12 {
                assert!(s.target().get_pixel(Point::new(x, y)).is_some());
            }
        }
        assert_eq!(s.target().get_pixel(Point::new(12, 0)), None);
        assert_eq!(s.target().get_pixel(Point::new(0, 16)), None);
    }

    #[test]
    fn test_next_line_keeps_descenders() {
        let mut s = surface();
        let layout = TextLayout {
            glyph_width: 6,
            line_height: 8,
            start_y: 0,
        };
        let geometry = s.geometry();
        let lines = ["you", "Val"];
        let mut calls =
            render_centered_lines(&lines, Color::WHITE, Color::BLACK, geometry, layout);

        // First line only
        for call in calls.by_ref().take(3) {
            s.apply(&call).unwrap();
        }
        let first_line: Vec<_> = (0..8)
            .flat_map(|y| (0..64).map(move |x| Point::new(x, y)))
            .map(|p| s.target().get_pixel(p))
            .collect();
        let descender = (6..8)
            .flat_map(|y| (0..64).map(move |x| Point::new(x, y)))
            .filter(|p| s.target().get_pixel(*p) == Some(Rgb565::WHITE))
            .count();
        assert!(descender > 0);

        for call in calls {
            s.apply(&call).unwrap();
        }
        let after: Vec<_> = (0..8)
            .flat_map(|y| (0..64).map(move |x| Point::new(x, y)))
            .map(|p| s.target().get_pixel(p))
            .collect();
        assert_eq!(first_line, after);
        // Second line starts exactly one cell below
        assert!(s.target().get_pixel(Point::new(23, 8)).is_some());
    }

    #[test]
    fn test_oversized_target_rejected() {
        struct Huge;

        impl OriginDimensions for Huge {
            fn size(&self) -> Size {
                Size::new(70_000, 16)
            }
        }

        impl DrawTarget for Huge {
            type Color = Rgb565;
            type Error = core::convert::Infallible;

            fn draw_iter<I>(&mut self, _pixels: I) -> Result<(), Self::Error>
            where
                I: IntoIterator<Item = Pixel<Self::Color>>,
            {
                Ok(())
            }
        }

        assert_eq!(
            GraphicsSurface::new(Huge).err(),
            Some(DisplayError::InvalidCoordinates)
        );
    }

    #[test]
    fn test_zero_scale_rejected() {
        let mut s = surface();
        assert_eq!(
            s.draw_char(0, 0, 'x', Color::WHITE, Color::BLACK, 0),
            Err(DisplayError::InvalidCoordinates)
        );
    }

    #[test]
    fn test_text_state() {
        let mut s = surface();
        s.set_text_color(Color::YELLOW, Color::BLUE);
        s.set_cursor(10, 20);
        assert_eq!(s.text_color(), (Color::YELLOW, Color::BLUE));
        assert_eq!(s.cursor(), (10, 20));
    }

    #[test]
    fn test_apply_heart() {
        let mut s = surface();
        let style = HeartStyle {
            center_y: 16,
            radius: 6,
        };
        s.apply_all(draw_heart(Color::RED, s.geometry(), style)).unwrap();

        // Lobe centers and the body's interior
        assert_eq!(s.target().get_pixel(Point::new(26, 16)), Some(Rgb565::RED));
        assert_eq!(s.target().get_pixel(Point::new(38, 16)), Some(Rgb565::RED));
        assert_eq!(s.target().get_pixel(Point::new(32, 24)), Some(Rgb565::RED));
        // Outside the heart
        assert_eq!(s.target().get_pixel(Point::new(32, 40)), None);
    }
}
