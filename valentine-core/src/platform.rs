//! Peripheral bring-up and display bus configuration
//!
//! `PlatformContext` is the only owner of the board while it is being
//! brought up. It tracks how far the hardware has progressed and refuses
//! any step whose precondition does not hold, so the board never sees an
//! out-of-order call.

use valentine_hal::{Board, BusConfig, ClockDivisor};

use crate::error::{BusFault, ExternalFault, HardwareFault};

/// How far the platform has been brought up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Nothing has run yet
    Reset,
    /// A bring-up step failed; nothing further is allowed
    Faulted,
    /// Vector table, interrupts and clocks are up
    BroughtUp,
    /// Display bus peripheral is clocked
    ClockEnabled,
    /// Bus block and controller have been reset
    BusReset,
    /// Configuration has been applied
    BusConfigured,
    /// Bus is enabled and handed out
    BusEnabled,
}

/// Proof that bring-up completed
///
/// Only `PlatformContext::bring_up` can create one.
#[derive(Debug)]
pub struct Ready {
    _private: (),
}

/// Enabled display bus together with its effective clock
#[derive(Debug)]
pub struct BusHandle<T> {
    bus: T,
    divisor: ClockDivisor,
    rate_hz: u32,
}

impl<T> BusHandle<T> {
    /// Effective bus clock in Hz
    pub fn rate_hz(&self) -> u32 {
        self.rate_hz
    }

    /// Divider programmed into the bus clock generator
    pub fn divisor(&self) -> ClockDivisor {
        self.divisor
    }

    /// Release the bus for a device driver
    pub fn into_inner(self) -> T {
        self.bus
    }
}

/// Board plus bring-up progress
pub struct PlatformContext<B> {
    board: B,
    phase: Phase,
    pins_muxed: bool,
    applied: Option<(ClockDivisor, u32)>,
}

impl<B: Board> PlatformContext<B> {
    /// Take ownership of a board fresh out of reset
    pub fn new(board: B) -> Self {
        Self {
            board,
            phase: Phase::Reset,
            pins_muxed: false,
            applied: None,
        }
    }

    /// Current bring-up phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn board(&self) -> &B {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut B {
        &mut self.board
    }

    pub fn into_board(self) -> B {
        self.board
    }

    /// One-time processor bring-up
    ///
    /// Installs the vector table, enables interrupts and the system tick,
    /// then initializes clocks. A failed bring-up cannot be retried.
    pub fn bring_up(&mut self) -> Result<Ready, HardwareFault> {
        if self.phase != Phase::Reset {
            return Err(HardwareFault::AlreadyBroughtUp);
        }
        self.phase = Phase::Faulted;

        self.board
            .install_vector_table()
            .map_err(|_| HardwareFault::VectorTable)?;
        self.board
            .enable_interrupts()
            .map_err(|_| HardwareFault::Interrupts)?;
        self.board.init_clocks().map_err(|_| HardwareFault::Clocks)?;

        self.phase = Phase::BroughtUp;
        Ok(Ready { _private: () })
    }

    /// Route bus and UART signals to their pins
    ///
    /// Refused until this context has been brought up, whoever issued `_ready`.
    pub fn configure_pins(&mut self, _ready: &Ready) -> Result<(), ExternalFault> {
        if matches!(self.phase, Phase::Reset | Phase::Faulted) {
            return Err(ExternalFault::PinMux);
        }
        self.board
            .configure_pins()
            .map_err(|_| ExternalFault::PinMux)?;
        self.pins_muxed = true;
        Ok(())
    }

    /// Start the display bus peripheral clock
    ///
    /// Calling it again once the clock runs is a no-op.
    pub fn enable_bus_clock(&mut self, _ready: &Ready) -> Result<(), HardwareFault> {
        match self.phase {
            Phase::BroughtUp => {
                self.board
                    .enable_bus_clock()
                    .map_err(|_| HardwareFault::PeripheralClock)?;
                self.phase = Phase::ClockEnabled;
                Ok(())
            }
            Phase::Reset | Phase::Faulted => Err(HardwareFault::PeripheralClock),
            _ => Ok(()),
        }
    }

    /// Reset the bus peripheral block, then the controller state machine
    pub fn reset_bus(&mut self) -> Result<(), BusFault> {
        match self.phase {
            Phase::ClockEnabled | Phase::BusReset | Phase::BusConfigured => {}
            Phase::BusEnabled => return Err(BusFault::AlreadyConfigured),
            _ => return Err(BusFault::ClockNotEnabled),
        }
        if !self.pins_muxed {
            return Err(BusFault::PinsNotMuxed);
        }

        // Whatever was applied before is gone once the reset starts
        self.applied = None;
        self.phase = Phase::ClockEnabled;

        self.board.reset_bus_block().map_err(|_| BusFault::Reset)?;
        self.board
            .reset_bus_controller()
            .map_err(|_| BusFault::Reset)?;

        self.phase = Phase::BusReset;
        Ok(())
    }

    /// Apply `config` to a freshly reset controller
    ///
    /// Returns the divider derived from the board's source clock.
    pub fn apply_bus_config(&mut self, config: &BusConfig) -> Result<ClockDivisor, BusFault> {
        match self.phase {
            Phase::BusReset => {}
            Phase::BusConfigured | Phase::BusEnabled => return Err(BusFault::AlreadyConfigured),
            Phase::ClockEnabled => return Err(BusFault::NotReset),
            _ => return Err(BusFault::ClockNotEnabled),
        }

        let source_hz = self.board.bus_source_clock_hz();
        let divisor = ClockDivisor::for_rate(source_hz, config.clock_hz).ok_or(
            BusFault::UnattainableRate {
                source_hz,
                target_hz: config.clock_hz,
            },
        )?;

        self.board
            .apply_bus_config(config, divisor)
            .map_err(|_| BusFault::Configure)?;

        self.applied = Some((divisor, divisor.rate_hz(source_hz)));
        self.phase = Phase::BusConfigured;
        Ok(divisor)
    }

    /// Enable the configured bus for transactions
    pub fn enable_bus(&mut self) -> Result<BusHandle<B::Bus>, BusFault> {
        let (divisor, rate_hz) = match (self.phase, self.applied) {
            (Phase::BusConfigured, Some(applied)) => applied,
            (Phase::BusEnabled, _) => return Err(BusFault::AlreadyConfigured),
            (Phase::BusReset, _) => return Err(BusFault::NotConfigured),
            (Phase::ClockEnabled, _) => return Err(BusFault::NotReset),
            _ => return Err(BusFault::ClockNotEnabled),
        };

        let bus = self.board.enable_bus().map_err(|_| BusFault::Enable)?;

        self.phase = Phase::BusEnabled;
        Ok(BusHandle {
            bus,
            divisor,
            rate_hz,
        })
    }

    /// Reset, configure and enable the display bus in one go
    pub fn configure_bus(&mut self, config: &BusConfig) -> Result<BusHandle<B::Bus>, BusFault> {
        self.reset_bus()?;
        self.apply_bus_config(config)?;
        self.enable_bus()
    }
}
