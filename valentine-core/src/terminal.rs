//! UART terminal helper
//!
//! Thin text layer over a [`UartTx`]: clearing the screen, plain writes
//! and the framed startup banner.

use core::fmt;

use valentine_hal::UartTx;

/// ANSI erase-display followed by cursor-home
const CLEAR: &str = "\x1b[2J\x1b[H";

/// Frame line drawn above and below the banner title
const RULE: &str = "\t\t   ********************************************\n\r";

/// Text terminal on a UART transmitter
pub struct Terminal<T> {
    uart: T,
}

impl<T: UartTx> Terminal<T> {
    pub fn new(uart: T) -> Self {
        Self { uart }
    }

    /// Clear the screen and home the cursor
    pub fn clear(&mut self) -> Result<(), T::Error> {
        self.write(CLEAR)
    }

    /// Write a string as-is
    pub fn write(&mut self, s: &str) -> Result<(), T::Error> {
        self.uart.write_blocking(s.as_bytes())
    }

    /// Print `title` framed by rules with blank lines around it
    pub fn banner(&mut self, title: &str) -> Result<(), T::Error> {
        self.write("\n\n\n\r")?;
        self.write(RULE)?;
        self.write("\t\t        ")?;
        self.write(title)?;
        self.write("  \n\r")?;
        self.write(RULE)?;
        self.write("\n\n\n\r")?;
        self.uart.flush()
    }

    pub fn inner(&mut self) -> &mut T {
        &mut self.uart
    }

    pub fn into_inner(self) -> T {
        self.uart
    }
}

impl<T: UartTx> fmt::Write for Terminal<T> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.write(s).map_err(|_| fmt::Error)
    }
}
