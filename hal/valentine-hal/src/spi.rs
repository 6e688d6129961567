//! SPI bus configuration types
//!
//! Value types describing how the display bus is set up. They are built
//! once at startup, handed to the board's bus controller and never
//! changed afterwards.

/// Largest divider the bus clock generator accepts
pub const MAX_DIVISOR: u32 = 4096;

/// Serial bus configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusConfig {
    /// Target bit rate in Hz
    pub clock_hz: u32,
    /// Controller role
    pub role: Role,
    /// Clock polarity/phase combination
    pub mode: Mode,
    /// Bits per transfer word
    pub word_length: WordLength,
    /// Who drives the chip-select line
    pub chip_select: ChipSelect,
    /// Number of signal wires
    pub pins: PinMode,
    /// Chip-select assertion level
    pub cs_polarity: CsPolarity,
    /// Back-to-back transfers without inter-word gaps
    pub turbo: bool,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            clock_hz: 100_000,
            role: Role::Master,
            mode: Mode::Mode0,
            word_length: WordLength::Eight,
            chip_select: ChipSelect::Software,
            pins: PinMode::FourWire,
            cs_polarity: CsPolarity::ActiveHigh,
            turbo: false,
        }
    }
}

/// Controller role on the bus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Role {
    /// This chip generates the clock
    Master,
}

/// SPI clock polarity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// Clock idles low (CPOL=0)
    IdleLow,
    /// Clock idles high (CPOL=1)
    IdleHigh,
}

/// SPI clock phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Data captured on first clock transition (CPHA=0)
    CaptureOnFirstTransition,
    /// Data captured on second clock transition (CPHA=1)
    CaptureOnSecondTransition,
}

/// SPI mode (combined polarity and phase)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Mode 0: CPOL=0, CPHA=0
    Mode0,
    /// Mode 1: CPOL=0, CPHA=1
    Mode1,
    /// Mode 2: CPOL=1, CPHA=0
    Mode2,
    /// Mode 3: CPOL=1, CPHA=1
    Mode3,
}

impl From<Mode> for (Polarity, Phase) {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Mode0 => (Polarity::IdleLow, Phase::CaptureOnFirstTransition),
            Mode::Mode1 => (Polarity::IdleLow, Phase::CaptureOnSecondTransition),
            Mode::Mode2 => (Polarity::IdleHigh, Phase::CaptureOnFirstTransition),
            Mode::Mode3 => (Polarity::IdleHigh, Phase::CaptureOnSecondTransition),
        }
    }
}

/// Bits per transfer word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WordLength {
    Eight,
    Sixteen,
    ThirtyTwo,
}

impl WordLength {
    /// Word length in bits
    pub const fn bits(self) -> u8 {
        match self {
            WordLength::Eight => 8,
            WordLength::Sixteen => 16,
            WordLength::ThirtyTwo => 32,
        }
    }
}

/// Chip-select ownership
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChipSelect {
    /// The controller toggles CS around every word
    Hardware,
    /// CS is a plain GPIO driven by the device driver
    Software,
}

/// Number of bus wires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinMode {
    /// Clock, bidirectional data, chip select
    ThreeWire,
    /// Clock, MOSI, MISO, chip select
    FourWire,
}

/// Chip-select assertion level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CsPolarity {
    ActiveHigh,
    ActiveLow,
}

/// Integer divider between the peripheral source clock and the bus clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockDivisor(u32);

impl ClockDivisor {
    /// Pick the smallest divider whose output does not exceed `target_hz`
    ///
    /// Returns `None` when the target is zero, above the source clock, or
    /// would need a divider larger than [`MAX_DIVISOR`].
    pub fn for_rate(source_hz: u32, target_hz: u32) -> Option<Self> {
        if target_hz == 0 || target_hz > source_hz {
            return None;
        }
        let divisor = source_hz.div_ceil(target_hz);
        if divisor > MAX_DIVISOR {
            return None;
        }
        Some(Self(divisor))
    }

    /// Raw divider value (1..=4096)
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Resulting bus clock for a given source clock
    pub const fn rate_hz(self, source_hz: u32) -> u32 {
        source_hz / self.0
    }
}
