//! Board bring-up abstraction
//!
//! One trait covers every hardware step the boot sequence performs. The
//! methods are listed in the order they are called; callers are expected
//! to enforce that order (see `valentine_core::platform::PlatformContext`).

use crate::spi::{BusConfig, ClockDivisor};
use crate::uart::UartTx;

/// A concrete board: processor, display bus and attached collaborators
///
/// Every fallible step returns the board's own error type. The core crate
/// only cares *which* step failed, so the error carries no contract
/// beyond being reportable by the board itself.
pub trait Board {
    /// Error type for hardware operations
    type Error;

    /// Enabled display bus, ready for transactions
    type Bus;

    /// Terminal used for the startup banner
    type Terminal: UartTx;

    /// Initialized display, bound to the bus
    type Display;

    // -- Bring-up ---------------------------------------------------------

    /// Install or validate the interrupt vector table location
    fn install_vector_table(&mut self) -> Result<(), Self::Error>;

    /// Enable global interrupt dispatch and the system tick source
    fn enable_interrupts(&mut self) -> Result<(), Self::Error>;

    /// Run clock tree and power domain initialization
    fn init_clocks(&mut self) -> Result<(), Self::Error>;

    // -- Pin multiplexing -------------------------------------------------

    /// Route the bus and UART signals to their pins
    fn configure_pins(&mut self) -> Result<(), Self::Error>;

    // -- Display bus ------------------------------------------------------

    /// Gate the clock into the display bus peripheral
    fn enable_bus_clock(&mut self) -> Result<(), Self::Error>;

    /// Source clock feeding the bus clock generator, in Hz
    fn bus_source_clock_hz(&self) -> u32;

    /// Put the bus peripheral block through a reset cycle
    fn reset_bus_block(&mut self) -> Result<(), Self::Error>;

    /// Reset the bus controller's internal state machine
    fn reset_bus_controller(&mut self) -> Result<(), Self::Error>;

    /// Program the bus controller
    fn apply_bus_config(
        &mut self,
        config: &BusConfig,
        divisor: ClockDivisor,
    ) -> Result<(), Self::Error>;

    /// Enable the bus for transactions and hand it out
    fn enable_bus(&mut self) -> Result<Self::Bus, Self::Error>;

    // -- Collaborators ----------------------------------------------------

    /// Open the UART terminal
    fn open_terminal(&mut self) -> Result<Self::Terminal, Self::Error>;

    /// Initialize the display controller over the enabled bus
    fn attach_display(&mut self, bus: Self::Bus) -> Result<Self::Display, Self::Error>;
}
