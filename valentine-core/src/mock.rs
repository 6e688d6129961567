//! Hand-written test doubles for the board traits

use valentine_display::{Color, DisplayError, DisplayGeometry, PrimitiveCall, Surface};
use valentine_hal::{Board, BusConfig, ClockDivisor, UartTx};

/// One hardware call made on the mock board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    InstallVectorTable,
    EnableInterrupts,
    InitClocks,
    ConfigurePins,
    EnableBusClock,
    ResetBusBlock,
    ResetBusController,
    ApplyBusConfig,
    EnableBus,
    OpenTerminal,
    AttachDisplay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockError;

/// Board that records every call and can fail one chosen step
pub struct MockBoard {
    pub steps: Vec<Step>,
    pub fail_on: Option<Step>,
    pub source_hz: u32,
    pub applied: Option<BusConfig>,
    divisor: Option<ClockDivisor>,
    broken_uart: bool,
    display_fail_at: Option<usize>,
}

impl MockBoard {
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            fail_on: None,
            source_hz: 80_000_000,
            applied: None,
            divisor: None,
            broken_uart: false,
            display_fail_at: None,
        }
    }

    pub fn failing_at(step: Step) -> Self {
        Self {
            fail_on: Some(step),
            ..Self::new()
        }
    }

    /// Terminal opens but every write fails
    pub fn with_broken_uart(mut self) -> Self {
        self.broken_uart = true;
        self
    }

    /// Display fails its `index`-th primitive call (0-based)
    pub fn with_display_failure(mut self, index: usize) -> Self {
        self.display_fail_at = Some(index);
        self
    }

    fn record(&mut self, step: Step) -> Result<(), MockError> {
        self.steps.push(step);
        if self.fail_on == Some(step) {
            Err(MockError)
        } else {
            Ok(())
        }
    }
}

/// Enabled bus as handed out by the mock board
#[derive(Debug)]
pub struct MockBus {
    pub divisor: u32,
}

impl Board for MockBoard {
    type Error = MockError;
    type Bus = MockBus;
    type Terminal = MockUart;
    type Display = RecordingSurface;

    fn install_vector_table(&mut self) -> Result<(), MockError> {
        self.record(Step::InstallVectorTable)
    }

    fn enable_interrupts(&mut self) -> Result<(), MockError> {
        self.record(Step::EnableInterrupts)
    }

    fn init_clocks(&mut self) -> Result<(), MockError> {
        self.record(Step::InitClocks)
    }

    fn configure_pins(&mut self) -> Result<(), MockError> {
        self.record(Step::ConfigurePins)
    }

    fn enable_bus_clock(&mut self) -> Result<(), MockError> {
        self.record(Step::EnableBusClock)
    }

    fn bus_source_clock_hz(&self) -> u32 {
        self.source_hz
    }

    fn reset_bus_block(&mut self) -> Result<(), MockError> {
        self.record(Step::ResetBusBlock)
    }

    fn reset_bus_controller(&mut self) -> Result<(), MockError> {
        self.record(Step::ResetBusController)
    }

    fn apply_bus_config(
        &mut self,
        config: &BusConfig,
        divisor: ClockDivisor,
    ) -> Result<(), MockError> {
        self.record(Step::ApplyBusConfig)?;
        self.applied = Some(*config);
        self.divisor = Some(divisor);
        Ok(())
    }

    fn enable_bus(&mut self) -> Result<MockBus, MockError> {
        self.record(Step::EnableBus)?;
        Ok(MockBus {
            divisor: self.divisor.map(ClockDivisor::value).unwrap_or(0),
        })
    }

    fn open_terminal(&mut self) -> Result<MockUart, MockError> {
        self.record(Step::OpenTerminal)?;
        Ok(if self.broken_uart {
            MockUart::failing()
        } else {
            MockUart::new()
        })
    }

    fn attach_display(&mut self, _bus: MockBus) -> Result<RecordingSurface, MockError> {
        self.record(Step::AttachDisplay)?;
        Ok(RecordingSurface {
            fail_at: self.display_fail_at,
            ..RecordingSurface::new()
        })
    }
}

/// UART that collects everything written to it
pub struct MockUart {
    pub output: String,
    pub flushes: usize,
    fail: bool,
}

impl MockUart {
    pub fn new() -> Self {
        Self {
            output: String::new(),
            flushes: 0,
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }
}

impl UartTx for MockUart {
    type Error = MockError;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), MockError> {
        if self.fail {
            return Err(MockError);
        }
        self.output.push_str(core::str::from_utf8(data).map_err(|_| MockError)?);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), MockError> {
        if self.fail {
            return Err(MockError);
        }
        self.flushes += 1;
        Ok(())
    }
}

/// Surface that records primitive calls instead of drawing
pub struct RecordingSurface {
    pub calls: Vec<PrimitiveCall>,
    pub text_color: Option<(Color, Color)>,
    pub cursor: Option<(i32, i32)>,
    geometry: DisplayGeometry,
    fail_at: Option<usize>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            text_color: None,
            cursor: None,
            geometry: DisplayGeometry::SSD1351,
            fail_at: None,
        }
    }

    fn push(&mut self, call: PrimitiveCall) -> Result<(), DisplayError> {
        if self.fail_at == Some(self.calls.len()) {
            return Err(DisplayError::Communication);
        }
        self.calls.push(call);
        Ok(())
    }
}

impl Surface for RecordingSurface {
    fn geometry(&self) -> DisplayGeometry {
        self.geometry
    }

    fn fill_screen(&mut self, color: Color) -> Result<(), DisplayError> {
        self.push(PrimitiveCall::FillScreen { color })
    }

    fn fill_circle(&mut self, x: i32, y: i32, r: i32, color: Color) -> Result<(), DisplayError> {
        self.push(PrimitiveCall::FillCircle { x, y, r, color })
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
        self.push(PrimitiveCall::FillTriangle {
            x0,
            y0,
            x1,
            y1,
            x2,
            y2,
            color,
        })
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
        self.push(PrimitiveCall::DrawChar {
            x,
            y,
            ch,
            fg,
            bg,
            scale,
        })
    }

    fn set_text_color(&mut self, fg: Color, bg: Color) {
        self.text_color = Some((fg, bg));
    }

    fn set_cursor(&mut self, x: i32, y: i32) {
        self.cursor = Some((x, y));
    }
}
