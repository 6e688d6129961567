//! SSD1351 OLED Display Driver
//!
//! Driver for 128x128 SSD1351-based RGB565 OLED panels over 4-wire SPI.
//! Chip select is a plain GPIO (active low on the panel), D/C selects
//! command or data bytes, RESET is pulsed once during init.
//!
//! There is no frame buffer: every draw writes straight into panel RAM
//! through an address window, so drawing is unbuffered and ordered.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{ContainsPoint, Rectangle};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

/// Display dimensions
pub const WIDTH: u32 = 128;
pub const HEIGHT: u32 = 128;

/// Pixels per SPI burst when streaming a solid fill
const FILL_CHUNK: usize = 32;

/// SSD1351 commands
#[allow(dead_code)]
mod cmd {
    pub const SET_COLUMN: u8 = 0x15;
    pub const SET_ROW: u8 = 0x75;
    pub const WRITE_RAM: u8 = 0x5C;
    pub const SET_REMAP: u8 = 0xA0;
    pub const START_LINE: u8 = 0xA1;
    pub const DISPLAY_OFFSET: u8 = 0xA2;
    pub const NORMAL_DISPLAY: u8 = 0xA6;
    pub const INVERT_DISPLAY: u8 = 0xA7;
    pub const FUNCTION_SELECT: u8 = 0xAB;
    pub const DISPLAY_OFF: u8 = 0xAE;
    pub const DISPLAY_ON: u8 = 0xAF;
    pub const PRECHARGE: u8 = 0xB1;
    pub const CLOCK_DIV: u8 = 0xB3;
    pub const SET_VSL: u8 = 0xB4;
    pub const SET_GPIO: u8 = 0xB5;
    pub const PRECHARGE2: u8 = 0xB6;
    pub const VCOMH: u8 = 0xBE;
    pub const CONTRAST_ABC: u8 = 0xC1;
    pub const CONTRAST_MASTER: u8 = 0xC7;
    pub const MUX_RATIO: u8 = 0xCA;
    pub const COMMAND_LOCK: u8 = 0xFD;
}

/// Init sequence: command followed by its argument bytes
const INIT_SEQUENCE: &[(u8, &[u8])] = &[
    (cmd::COMMAND_LOCK, &[0x12]), // Unlock IC
    (cmd::COMMAND_LOCK, &[0xB1]), // Unlock restricted commands
    (cmd::DISPLAY_OFF, &[]),
    (cmd::CLOCK_DIV, &[0xF1]),
    (cmd::MUX_RATIO, &[127]),
    (cmd::SET_REMAP, &[0x74]), // 65k colors, COM split, scan reversed
    (cmd::SET_COLUMN, &[0x00, 0x7F]),
    (cmd::SET_ROW, &[0x00, 0x7F]),
    (cmd::START_LINE, &[0x00]),
    (cmd::DISPLAY_OFFSET, &[0x00]),
    (cmd::SET_GPIO, &[0x00]),
    (cmd::FUNCTION_SELECT, &[0x01]), // Internal VDD regulator
    (cmd::PRECHARGE, &[0x32]),
    (cmd::VCOMH, &[0x05]),
    (cmd::NORMAL_DISPLAY, &[]),
    (cmd::CONTRAST_ABC, &[0xC8, 0x80, 0xC8]),
    (cmd::CONTRAST_MASTER, &[0x0F]),
    (cmd::SET_VSL, &[0xA0, 0xB5, 0x55]),
    (cmd::PRECHARGE2, &[0x01]),
    (cmd::DISPLAY_ON, &[]),
];

/// Driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Ssd1351Error {
    /// SPI transfer failed
    Bus,
    /// A control line could not be driven
    Pin,
}

/// SSD1351 OLED driver
pub struct Ssd1351<SPI, CS, DC, RST> {
    spi: SPI,
    cs: CS,
    dc: DC,
    rst: RST,
}

impl<SPI, CS, DC, RST> Ssd1351<SPI, CS, DC, RST>
where
    SPI: SpiBus<u8>,
    CS: OutputPin,
    DC: OutputPin,
    RST: OutputPin,
{
    /// Create a new SSD1351 driver
    pub fn new(spi: SPI, cs: CS, dc: DC, rst: RST) -> Self {
        Self { spi, cs, dc, rst }
    }

    /// Reset and initialize the panel
    pub fn init<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), Ssd1351Error> {
        self.cs.set_high().map_err(|_| Ssd1351Error::Pin)?;

        self.rst.set_high().map_err(|_| Ssd1351Error::Pin)?;
        delay.delay_ms(10);
        self.rst.set_low().map_err(|_| Ssd1351Error::Pin)?;
        delay.delay_ms(10);
        self.rst.set_high().map_err(|_| Ssd1351Error::Pin)?;
        delay.delay_ms(10);

        for &(command, args) in INIT_SEQUENCE {
            self.command(command, args)?;
        }

        Ok(())
    }

    /// Send a command and its arguments in one chip-select frame
    fn command(&mut self, command: u8, args: &[u8]) -> Result<(), Ssd1351Error> {
        self.cs.set_low().map_err(|_| Ssd1351Error::Pin)?;
        let result = self.command_frame(command, args);
        self.cs.set_high().map_err(|_| Ssd1351Error::Pin)?;
        result
    }

    fn command_frame(&mut self, command: u8, args: &[u8]) -> Result<(), Ssd1351Error> {
        self.dc.set_low().map_err(|_| Ssd1351Error::Pin)?;
        self.write(&[command])?;
        if !args.is_empty() {
            self.dc.set_high().map_err(|_| Ssd1351Error::Pin)?;
            self.write(args)?;
        }
        Ok(())
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), Ssd1351Error> {
        self.spi.write(bytes).map_err(|_| Ssd1351Error::Bus)?;
        self.spi.flush().map_err(|_| Ssd1351Error::Bus)
    }

    /// Open an inclusive address window and start a RAM write
    fn set_window(&mut self, x0: u8, y0: u8, x1: u8, y1: u8) -> Result<(), Ssd1351Error> {
        self.command(cmd::SET_COLUMN, &[x0, x1])?;
        self.command(cmd::SET_ROW, &[y0, y1])?;
        self.command(cmd::WRITE_RAM, &[])
    }

    /// Stream `count` pixels of one color into the open window
    fn write_repeated(&mut self, color: Rgb565, count: u32) -> Result<(), Ssd1351Error> {
        self.cs.set_low().map_err(|_| Ssd1351Error::Pin)?;
        let result = self.data_frame(color, count);
        self.cs.set_high().map_err(|_| Ssd1351Error::Pin)?;
        result
    }

    fn data_frame(&mut self, color: Rgb565, count: u32) -> Result<(), Ssd1351Error> {
        let [hi, lo] = color.into_storage().to_be_bytes();
        let mut chunk = [0u8; FILL_CHUNK * 2];
        for px in chunk.chunks_exact_mut(2) {
            px[0] = hi;
            px[1] = lo;
        }

        self.dc.set_high().map_err(|_| Ssd1351Error::Pin)?;
        let mut left = count as usize;
        while left > 0 {
            let n = left.min(FILL_CHUNK);
            self.write(&chunk[..n * 2])?;
            left -= n;
        }
        Ok(())
    }
}

impl<SPI, CS, DC, RST> OriginDimensions for Ssd1351<SPI, CS, DC, RST> {
    fn size(&self) -> Size {
        Size::new(WIDTH, HEIGHT)
    }
}

impl<SPI, CS, DC, RST> DrawTarget for Ssd1351<SPI, CS, DC, RST>
where
    SPI: SpiBus<u8>,
    CS: OutputPin,
    DC: OutputPin,
    RST: OutputPin,
{
    type Color = Rgb565;
    type Error = Ssd1351Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let bounds = self.bounding_box();
        for Pixel(point, color) in pixels {
            if !bounds.contains(point) {
                continue;
            }
            let (x, y) = (point.x as u8, point.y as u8);
            self.set_window(x, y, x, y)?;
            self.write_repeated(color, 1)?;
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let area = area.intersection(&self.bounding_box());
        let Some(bottom_right) = area.bottom_right() else {
            return Ok(());
        };

        self.set_window(
            area.top_left.x as u8,
            area.top_left.y as u8,
            bottom_right.x as u8,
            bottom_right.y as u8,
        )?;
        self.write_repeated(color, area.size.width * area.size.height)
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        let area = self.bounding_box();
        self.fill_solid(&area, color)
    }
}
