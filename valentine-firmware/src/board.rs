//! RP2040 board: Raspberry Pi Pico wired to an SSD1351 breakout
//!
//! | Signal        | GPIO |
//! |---------------|------|
//! | UART0 TX      | 0    |
//! | OLED CS       | 17   |
//! | SPI0 SCK      | 18   |
//! | SPI0 MOSI     | 19   |
//! | OLED D/C      | 20   |
//! | OLED RESET    | 21   |
//! | Status LED    | 25   |

use cortex_m::peripheral::syst::SystClkSource;
use cortex_m_rt::exception;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::{PIN_0, PIN_17, PIN_18, PIN_19, PIN_20, PIN_21, SPI0, UART0};
use embassy_rp::spi::{self, Spi};
use embassy_rp::uart;
use embassy_rp::{pac, Peri};
use embassy_time::Delay;
use portable_atomic::{AtomicU32, Ordering};

use valentine_display::{DisplayError, GraphicsSurface, Ssd1351, Ssd1351Error};
use valentine_hal::spi::{ChipSelect, Phase, PinMode, Polarity, WordLength};
use valentine_hal::uart::{DataBits, Parity, StopBits, UartConfig};
use valentine_hal::{Board, BusConfig, ClockDivisor, UartTx};

/// SysTick reload; clocks are not set up yet when the tick starts
const SYST_RELOAD: u32 = 0x00FF_FFFF;

/// Polls of RESET_DONE before giving up on a peripheral reset
const RESET_SPINS: u32 = 10_000;

/// SysTick wrap count
static SYSTICK_WRAPS: AtomicU32 = AtomicU32::new(0);

#[exception]
fn SysTick() {
    SYSTICK_WRAPS.fetch_add(1, Ordering::Relaxed);
}

/// Number of SysTick wraps since interrupts were enabled
pub fn systick_wraps() -> u32 {
    SYSTICK_WRAPS.load(Ordering::Relaxed)
}

extern "C" {
    /// Start of the vector table, placed by cortex-m-rt's link.x
    static __vector_table: u32;
}

/// Board bring-up errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BoardError {
    /// Core peripherals were already taken
    CorePeripherals,
    /// Vector table misaligned or VTOR did not accept it
    VectorTable,
    /// SysTick did not start
    SysTick,
    /// `embassy_rp::init` already ran
    AlreadyInitialized,
    /// A previous step has not handed over the resource yet
    NotReady,
    /// Peripheral did not leave reset
    ResetTimeout,
    /// Bus setting the RP2040 SPI block cannot do
    Unsupported,
    /// Panel initialization failed
    Display(Ssd1351Error),
    /// Panel cannot back a drawing surface
    Surface(DisplayError),
}

/// Enabled display bus
pub type Bus = Spi<'static, SPI0, spi::Blocking>;

/// SSD1351 panel on the display bus
pub type Panel = Ssd1351<Bus, Output<'static>, Output<'static>, Output<'static>>;

struct BusPins {
    spi: Peri<'static, SPI0>,
    sck: Peri<'static, PIN_18>,
    mosi: Peri<'static, PIN_19>,
}

struct UartPins {
    uart: Peri<'static, UART0>,
    tx: Peri<'static, PIN_0>,
}

struct ControlPins {
    cs: Peri<'static, PIN_17>,
    dc: Peri<'static, PIN_20>,
    rst: Peri<'static, PIN_21>,
}

struct ControlLines {
    cs: Output<'static>,
    dc: Output<'static>,
    rst: Output<'static>,
}

/// Pico + SSD1351
///
/// Every resource sits in an `Option` and moves out exactly once, in the
/// order the boot sequence asks for it.
pub struct Rp2040Board {
    core: Option<cortex_m::Peripherals>,
    initialized: bool,
    bus_pins: Option<BusPins>,
    uart_pins: Option<UartPins>,
    control_pins: Option<ControlPins>,
    lines: Option<ControlLines>,
    spi_config: Option<spi::Config>,
    terminal: UartConfig,
    led: Option<Output<'static>>,
}

impl Rp2040Board {
    pub fn new(terminal: UartConfig) -> Self {
        Self {
            core: cortex_m::Peripherals::take(),
            initialized: false,
            bus_pins: None,
            uart_pins: None,
            control_pins: None,
            lines: None,
            spi_config: None,
            terminal,
            led: None,
        }
    }

    /// On-board LED, available once clocks are up
    pub fn status_led(&mut self) -> Option<&mut Output<'static>> {
        self.led.as_mut()
    }
}

fn set_spi0_reset(asserted: bool) {
    pac::RESETS.reset().modify(|w| w.set_spi0(asserted));
}

fn wait_spi0_reset_done() -> Result<(), BoardError> {
    for _ in 0..RESET_SPINS {
        if pac::RESETS.reset_done().read().spi0() {
            return Ok(());
        }
    }
    Err(BoardError::ResetTimeout)
}

fn uart_config(config: &UartConfig) -> uart::Config {
    let mut out = uart::Config::default();
    out.baudrate = config.baudrate;
    out.data_bits = match config.data_bits {
        DataBits::Seven => uart::DataBits::DataBits7,
        DataBits::Eight => uart::DataBits::DataBits8,
    };
    out.parity = match config.parity {
        Parity::None => uart::Parity::ParityNone,
        Parity::Even => uart::Parity::ParityEven,
        Parity::Odd => uart::Parity::ParityOdd,
    };
    out.stop_bits = match config.stop_bits {
        StopBits::One => uart::StopBits::STOP1,
        StopBits::Two => uart::StopBits::STOP2,
    };
    out
}

impl Board for Rp2040Board {
    type Error = BoardError;
    type Bus = Bus;
    type Terminal = Terminal;
    type Display = GraphicsSurface<Panel>;

    fn install_vector_table(&mut self) -> Result<(), BoardError> {
        let cp = self.core.as_mut().ok_or(BoardError::CorePeripherals)?;

        #[allow(unused_unsafe)]
        let table = unsafe { core::ptr::addr_of!(__vector_table) } as u32;
        // VTOR ignores the low 8 bits on Cortex-M0+
        if table & 0xFF != 0 {
            return Err(BoardError::VectorTable);
        }

        unsafe { cp.SCB.vtor.write(table) };
        if cp.SCB.vtor.read() != table {
            return Err(BoardError::VectorTable);
        }
        Ok(())
    }

    fn enable_interrupts(&mut self) -> Result<(), BoardError> {
        let cp = self.core.as_mut().ok_or(BoardError::CorePeripherals)?;

        let syst = &mut cp.SYST;
        syst.set_clock_source(SystClkSource::Core);
        syst.set_reload(SYST_RELOAD);
        syst.clear_current();
        syst.enable_interrupt();
        syst.enable_counter();
        if !syst.is_counter_enabled() {
            return Err(BoardError::SysTick);
        }

        // SAFETY: no critical section is active this early in boot
        unsafe { cortex_m::interrupt::enable() };
        Ok(())
    }

    fn init_clocks(&mut self) -> Result<(), BoardError> {
        if self.initialized {
            return Err(BoardError::AlreadyInitialized);
        }
        let p = embassy_rp::init(Default::default());
        self.initialized = true;

        self.led = Some(Output::new(p.PIN_25, Level::Low));
        self.bus_pins = Some(BusPins {
            spi: p.SPI0,
            sck: p.PIN_18,
            mosi: p.PIN_19,
        });
        self.uart_pins = Some(UartPins {
            uart: p.UART0,
            tx: p.PIN_0,
        });
        self.control_pins = Some(ControlPins {
            cs: p.PIN_17,
            dc: p.PIN_20,
            rst: p.PIN_21,
        });
        Ok(())
    }

    fn configure_pins(&mut self) -> Result<(), BoardError> {
        // SPI and UART pins switch to their peripheral function when the
        // driver takes them; the panel control lines are plain GPIO.
        let pins = self.control_pins.take().ok_or(BoardError::NotReady)?;
        self.lines = Some(ControlLines {
            cs: Output::new(pins.cs, Level::High),
            dc: Output::new(pins.dc, Level::Low),
            rst: Output::new(pins.rst, Level::High),
        });
        Ok(())
    }

    fn enable_bus_clock(&mut self) -> Result<(), BoardError> {
        set_spi0_reset(false);
        wait_spi0_reset_done()
    }

    fn bus_source_clock_hz(&self) -> u32 {
        embassy_rp::clocks::clk_peri_freq()
    }

    fn reset_bus_block(&mut self) -> Result<(), BoardError> {
        set_spi0_reset(true);
        set_spi0_reset(false);
        wait_spi0_reset_done()
    }

    fn reset_bus_controller(&mut self) -> Result<(), BoardError> {
        pac::SPI0.cr1().modify(|w| w.set_sse(false));
        Ok(())
    }

    fn apply_bus_config(
        &mut self,
        config: &BusConfig,
        divisor: ClockDivisor,
    ) -> Result<(), BoardError> {
        // The PL022 has no CS-per-word mode and embassy drives 8-bit frames only
        if config.word_length != WordLength::Eight
            || config.chip_select != ChipSelect::Software
            || config.pins != PinMode::FourWire
            || config.turbo
        {
            return Err(BoardError::Unsupported);
        }

        let (polarity, phase): (Polarity, Phase) = config.mode.into();
        let mut spi_config = spi::Config::default();
        spi_config.frequency = divisor.rate_hz(self.bus_source_clock_hz());
        spi_config.polarity = match polarity {
            Polarity::IdleLow => spi::Polarity::IdleLow,
            Polarity::IdleHigh => spi::Polarity::IdleHigh,
        };
        spi_config.phase = match phase {
            Phase::CaptureOnFirstTransition => spi::Phase::CaptureOnFirstTransition,
            Phase::CaptureOnSecondTransition => spi::Phase::CaptureOnSecondTransition,
        };
        self.spi_config = Some(spi_config);
        Ok(())
    }

    fn enable_bus(&mut self) -> Result<Bus, BoardError> {
        let config = self.spi_config.take().ok_or(BoardError::NotReady)?;
        let pins = self.bus_pins.take().ok_or(BoardError::NotReady)?;
        Ok(Spi::new_blocking_txonly(pins.spi, pins.sck, pins.mosi, config))
    }

    fn open_terminal(&mut self) -> Result<Terminal, BoardError> {
        let pins = self.uart_pins.take().ok_or(BoardError::NotReady)?;
        let config = uart_config(&self.terminal);
        Ok(Terminal(uart::UartTx::new_blocking(pins.uart, pins.tx, config)))
    }

    fn attach_display(&mut self, bus: Bus) -> Result<GraphicsSurface<Panel>, BoardError> {
        let lines = self.lines.take().ok_or(BoardError::NotReady)?;
        let mut panel = Ssd1351::new(bus, lines.cs, lines.dc, lines.rst);
        panel.init(&mut Delay).map_err(BoardError::Display)?;
        GraphicsSurface::new(panel).map_err(BoardError::Surface)
    }
}

/// Blocking UART0 transmitter
pub struct Terminal(uart::UartTx<'static, UART0, uart::Blocking>);

impl UartTx for Terminal {
    type Error = uart::Error;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), uart::Error> {
        self.0.blocking_write(data)
    }

    fn flush(&mut self) -> Result<(), uart::Error> {
        self.0.blocking_flush()
    }
}
