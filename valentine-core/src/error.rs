//! Boot fault taxonomy
//!
//! Every fault is fatal for the render pipeline except terminal output,
//! which is reported but never stops the boot.

use valentine_display::DisplayError;

use crate::sequencer::Stage;

/// Processor bring-up failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HardwareFault {
    /// Vector table could not be installed or is misplaced
    VectorTable,
    /// Interrupt controller or system tick could not be enabled
    Interrupts,
    /// Clock tree / power domain initialization failed
    Clocks,
    /// Display bus peripheral clock could not be enabled
    PeripheralClock,
    /// Bring-up was already attempted on this platform
    AlreadyBroughtUp,
}

/// Display bus reset, configuration or enable failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusFault {
    /// The bus peripheral clock is not running yet
    ClockNotEnabled,
    /// Bus pins have not been routed
    PinsNotMuxed,
    /// The bus was configured already without an intervening reset
    AlreadyConfigured,
    /// Configuration attempted before a reset
    NotReset,
    /// Enable attempted before a configuration
    NotConfigured,
    /// The requested bit rate cannot be derived from the source clock
    UnattainableRate { source_hz: u32, target_hz: u32 },
    /// Peripheral or controller reset failed
    Reset,
    /// Controller rejected the configuration
    Configure,
    /// Controller could not be enabled
    Enable,
}

/// A collaborator outside the core failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ExternalFault {
    /// Pin multiplexing failed
    PinMux,
    /// Terminal could not be opened or written
    Terminal,
    /// Display controller initialization failed
    DisplayInit,
    /// A primitive drawing call failed
    Display(DisplayError),
}

/// Any fault raised during boot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Fault {
    Hardware(HardwareFault),
    Bus(BusFault),
    External(ExternalFault),
}

impl From<HardwareFault> for Fault {
    fn from(fault: HardwareFault) -> Self {
        Fault::Hardware(fault)
    }
}

impl From<BusFault> for Fault {
    fn from(fault: BusFault) -> Self {
        Fault::Bus(fault)
    }
}

impl From<ExternalFault> for Fault {
    fn from(fault: ExternalFault) -> Self {
        Fault::External(fault)
    }
}

impl From<DisplayError> for Fault {
    fn from(err: DisplayError) -> Self {
        Fault::External(ExternalFault::Display(err))
    }
}

/// A fatal boot fault and the stage it stopped at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BootError {
    /// Stage that was running when the fault was raised
    pub stage: Stage,
    /// What went wrong
    pub fault: Fault,
}

impl BootError {
    pub fn new(stage: Stage, fault: impl Into<Fault>) -> Self {
        Self {
            stage,
            fault: fault.into(),
        }
    }

    /// Number of short status LED pulses identifying the fault class
    pub fn blink_code(&self) -> u8 {
        match self.fault {
            Fault::Hardware(_) => 2,
            Fault::Bus(_) => 3,
            Fault::External(_) => 4,
        }
    }
}

impl core::fmt::Display for BootError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "boot halted in {:?}: {:?}", self.stage, self.fault)
    }
}
