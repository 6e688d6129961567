//! Boot-to-render state machine
//!
//! The sequencer walks a fixed list of stages exactly once:
//!
//! ```text
//! Boot → BringUp → PinMux → ClockEnable → TerminalInit → BusReset →
//! BusConfigure → BusEnable → DisplayInit → ClearScreen → DrawHeart →
//! SetTextStyle → RenderText → Idle
//! ```
//!
//! Any fault stops the run at the stage that raised it, except terminal
//! output, which is only logged. On success the display and terminal are
//! handed back in [`Idle`]; on failure the board comes back in [`Halted`]
//! so the caller can still signal the fault.

use core::fmt::Write as _;

use valentine_display::{draw_heart, render_centered_lines, Surface};
use valentine_hal::Board;

use crate::config::BootConfig;
use crate::error::{BootError, ExternalFault};
use crate::platform::PlatformContext;
use crate::terminal::Terminal;

/// One step of the boot sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Stage {
    /// Out of reset, nothing done yet
    Boot,
    BringUp,
    PinMux,
    ClockEnable,
    /// Open the terminal and print the banner (non-fatal)
    TerminalInit,
    BusReset,
    BusConfigure,
    BusEnable,
    DisplayInit,
    ClearScreen,
    DrawHeart,
    SetTextStyle,
    RenderText,
    /// Frame is complete
    Idle,
}

impl Stage {
    /// Stage that follows this one, `None` once idle
    pub fn next(self) -> Option<Stage> {
        use Stage::*;
        match self {
            Boot => Some(BringUp),
            BringUp => Some(PinMux),
            PinMux => Some(ClockEnable),
            ClockEnable => Some(TerminalInit),
            TerminalInit => Some(BusReset),
            BusReset => Some(BusConfigure),
            BusConfigure => Some(BusEnable),
            BusEnable => Some(DisplayInit),
            DisplayInit => Some(ClearScreen),
            ClearScreen => Some(DrawHeart),
            DrawHeart => Some(SetTextStyle),
            SetTextStyle => Some(RenderText),
            RenderText => Some(Idle),
            Idle => None,
        }
    }
}

/// Successful boot: the frame is on the panel
pub struct Idle<B: Board> {
    board: B,
    display: B::Display,
    terminal: Option<Terminal<B::Terminal>>,
    bus_rate_hz: u32,
}

impl<B: Board> Idle<B> {
    pub fn display_mut(&mut self) -> &mut B::Display {
        &mut self.display
    }

    /// Terminal, if it could be opened
    pub fn terminal_mut(&mut self) -> Option<&mut Terminal<B::Terminal>> {
        self.terminal.as_mut()
    }

    /// Effective display bus clock in Hz
    pub fn bus_rate_hz(&self) -> u32 {
        self.bus_rate_hz
    }

    pub fn board_mut(&mut self) -> &mut B {
        &mut self.board
    }
}

/// Failed boot: the fault and the board it happened on
pub struct Halted<B> {
    error: BootError,
    board: B,
}

impl<B> Halted<B> {
    pub fn error(&self) -> BootError {
        self.error
    }

    pub fn board_mut(&mut self) -> &mut B {
        &mut self.board
    }

    pub fn into_board(self) -> B {
        self.board
    }
}

/// Boot sequence over a board
pub struct Sequencer<'c, B> {
    ctx: PlatformContext<B>,
    config: &'c BootConfig<'c>,
    stage: Stage,
}

impl<'c, B> Sequencer<'c, B>
where
    B: Board,
    B::Display: Surface,
{
    pub fn new(board: B, config: &'c BootConfig<'c>) -> Self {
        Self {
            ctx: PlatformContext::new(board),
            config,
            stage: Stage::Boot,
        }
    }

    /// Stage most recently entered
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Run every stage to completion
    pub fn run(self) -> Result<Idle<B>, Halted<B>> {
        self.run_with(|_| {})
    }

    /// Run every stage, reporting each one to `observe` as it is entered
    pub fn run_with<F>(mut self, mut observe: F) -> Result<Idle<B>, Halted<B>>
    where
        F: FnMut(Stage),
    {
        match self.boot(&mut observe) {
            Ok((display, terminal, bus_rate_hz)) => {
                self.enter(Stage::Idle, &mut observe);
                Ok(Idle {
                    board: self.ctx.into_board(),
                    display,
                    terminal,
                    bus_rate_hz,
                })
            }
            Err(error) => {
                #[cfg(feature = "defmt")]
                defmt::error!("boot halted: {}", error);
                Err(Halted {
                    error,
                    board: self.ctx.into_board(),
                })
            }
        }
    }

    fn enter<F: FnMut(Stage)>(&mut self, stage: Stage, observe: &mut F) -> Stage {
        #[cfg(feature = "defmt")]
        defmt::debug!("stage {}", stage);
        self.stage = stage;
        observe(stage);
        stage
    }

    #[allow(clippy::type_complexity)]
    fn boot<F: FnMut(Stage)>(
        &mut self,
        observe: &mut F,
    ) -> Result<(B::Display, Option<Terminal<B::Terminal>>, u32), BootError> {
        let config = self.config;
        let scene = &config.scene;

        let stage = self.enter(Stage::BringUp, observe);
        let ready = self
            .ctx
            .bring_up()
            .map_err(|f| BootError::new(stage, f))?;

        let stage = self.enter(Stage::PinMux, observe);
        self.ctx
            .configure_pins(&ready)
            .map_err(|f| BootError::new(stage, f))?;

        let stage = self.enter(Stage::ClockEnable, observe);
        self.ctx
            .enable_bus_clock(&ready)
            .map_err(|f| BootError::new(stage, f))?;

        self.enter(Stage::TerminalInit, observe);
        let mut terminal = self.open_terminal();

        let stage = self.enter(Stage::BusReset, observe);
        self.ctx
            .reset_bus()
            .map_err(|f| BootError::new(stage, f))?;

        let stage = self.enter(Stage::BusConfigure, observe);
        self.ctx
            .apply_bus_config(&config.bus)
            .map_err(|f| BootError::new(stage, f))?;

        let stage = self.enter(Stage::BusEnable, observe);
        let bus = self
            .ctx
            .enable_bus()
            .map_err(|f| BootError::new(stage, f))?;
        let bus_rate_hz = bus.rate_hz();
        if let Some(term) = terminal.as_mut() {
            if write!(term, "display bus at {} Hz\n\r", bus_rate_hz).is_err() {
                #[cfg(feature = "defmt")]
                defmt::warn!("terminal write failed");
            }
        }

        let stage = self.enter(Stage::DisplayInit, observe);
        let mut display = self
            .ctx
            .board_mut()
            .attach_display(bus.into_inner())
            .map_err(|_| BootError::new(stage, ExternalFault::DisplayInit))?;

        let stage = self.enter(Stage::ClearScreen, observe);
        display
            .fill_screen(scene.background)
            .map_err(|e| BootError::new(stage, e))?;

        let stage = self.enter(Stage::DrawHeart, observe);
        let geometry = display.geometry();
        display
            .apply_all(draw_heart(scene.heart_color, geometry, scene.heart))
            .map_err(|e| BootError::new(stage, e))?;

        self.enter(Stage::SetTextStyle, observe);
        display.set_text_color(scene.text_fg, scene.text_bg);
        display.set_cursor(scene.cursor.0, scene.cursor.1);

        let stage = self.enter(Stage::RenderText, observe);
        display
            .apply_all(render_centered_lines(
                scene.lines,
                scene.text_fg,
                scene.text_bg,
                geometry,
                scene.layout,
            ))
            .map_err(|e| BootError::new(stage, e))?;

        Ok((display, terminal, bus_rate_hz))
    }

    /// Open, clear and greet on the terminal; any failure is only logged
    fn open_terminal(&mut self) -> Option<Terminal<B::Terminal>> {
        let uart = match self.ctx.board_mut().open_terminal() {
            Ok(uart) => uart,
            Err(_) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("terminal unavailable: {}", ExternalFault::Terminal);
                return None;
            }
        };

        let mut term = Terminal::new(uart);
        if term.clear().and_then(|_| term.banner(self.config.banner)).is_err() {
            #[cfg(feature = "defmt")]
            defmt::warn!("terminal write failed: {}", ExternalFault::Terminal);
        }
        Some(term)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Scene;
    use crate::error::{BusFault, Fault, HardwareFault};
    use crate::mock::{MockBoard, Step};
    use valentine_display::{Color, DisplayError, PrimitiveCall};
    use valentine_hal::BusConfig;

    fn stages(board: MockBoard, config: &BootConfig<'_>) -> (Vec<Stage>, Result<Idle<MockBoard>, Halted<MockBoard>>) {
        let mut seen = Vec::new();
        let result = Sequencer::new(board, config).run_with(|s| seen.push(s));
        (seen, result)
    }

    #[test]
    fn test_stage_chain() {
        let mut stage = Stage::Boot;
        let mut count = 1;
        while let Some(next) = stage.next() {
            assert!(next > stage);
            stage = next;
            count += 1;
        }
        assert_eq!(stage, Stage::Idle);
        assert_eq!(count, 14);
    }

    #[test]
    fn test_new_sequencer_is_at_boot() {
        let config = BootConfig::default();
        let seq = Sequencer::new(MockBoard::new(), &config);
        assert_eq!(seq.stage(), Stage::Boot);
    }

    #[test]
    fn test_every_stage_entered_once_in_order() {
        let config = BootConfig::default();
        let (seen, result) = stages(MockBoard::new(), &config);
        assert!(result.is_ok());

        let mut expected = Vec::new();
        let mut stage = Stage::Boot;
        while let Some(next) = stage.next() {
            expected.push(next);
            stage = next;
        }
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_hardware_calls_in_order() {
        let config = BootConfig::default();
        let mut idle = Sequencer::new(MockBoard::new(), &config).run().ok().unwrap();
        assert_eq!(
            idle.board_mut().steps,
            vec![
                Step::InstallVectorTable,
                Step::EnableInterrupts,
                Step::InitClocks,
                Step::ConfigurePins,
                Step::EnableBusClock,
                Step::OpenTerminal,
                Step::ResetBusBlock,
                Step::ResetBusController,
                Step::ApplyBusConfig,
                Step::EnableBus,
                Step::AttachDisplay,
            ]
        );
        assert_eq!(idle.bus_rate_hz(), 100_000);
    }

    #[test]
    fn test_rendered_frame() {
        let config = BootConfig::default();
        let mut idle = Sequencer::new(MockBoard::new(), &config).run().ok().unwrap();
        let display = idle.display_mut();

        assert_eq!(display.calls.len(), 1 + 3 + 24);
        assert_eq!(display.calls[0], PrimitiveCall::FillScreen { color: Color::BLACK });
        assert_eq!(
            display.calls[1],
            PrimitiveCall::FillCircle { x: 52, y: 40, r: 12, color: Color::RED }
        );
        assert_eq!(
            display.calls[2],
            PrimitiveCall::FillCircle { x: 76, y: 40, r: 12, color: Color::RED }
        );
        assert_eq!(
            display.calls[3],
            PrimitiveCall::FillTriangle {
                x0: 40,
                y0: 40,
                x1: 88,
                y1: 40,
                x2: 64,
                y2: 64,
                color: Color::RED
            }
        );
        assert_eq!(
            display.calls[4],
            PrimitiveCall::DrawChar {
                x: 22,
                y: 90,
                ch: 'W',
                fg: Color::WHITE,
                bg: Color::BLACK,
                scale: 1
            }
        );
        assert!(matches!(
            display.calls[18],
            PrimitiveCall::DrawChar { x: 34, y: 98, ch: 'V', .. }
        ));
        assert_eq!(display.text_color, Some((Color::WHITE, Color::BLACK)));
        assert_eq!(display.cursor, Some((10, 90)));
    }

    #[test]
    fn test_banner_and_rate_on_terminal() {
        let config = BootConfig::default();
        let mut idle = Sequencer::new(MockBoard::new(), &config).run().ok().unwrap();
        let out = &idle.terminal_mut().unwrap().inner().output;
        assert!(out.starts_with("\x1b[2J\x1b[H"));
        assert!(out.contains("To my triny trin trin"));
        assert!(out.ends_with("display bus at 100000 Hz\n\r"));
    }

    #[test]
    fn test_fatal_stages_halt() {
        let cases = [
            (Step::InstallVectorTable, Stage::BringUp, Fault::Hardware(HardwareFault::VectorTable)),
            (Step::EnableInterrupts, Stage::BringUp, Fault::Hardware(HardwareFault::Interrupts)),
            (Step::InitClocks, Stage::BringUp, Fault::Hardware(HardwareFault::Clocks)),
            (Step::ConfigurePins, Stage::PinMux, Fault::External(ExternalFault::PinMux)),
            (Step::EnableBusClock, Stage::ClockEnable, Fault::Hardware(HardwareFault::PeripheralClock)),
            (Step::ResetBusBlock, Stage::BusReset, Fault::Bus(BusFault::Reset)),
            (Step::ResetBusController, Stage::BusReset, Fault::Bus(BusFault::Reset)),
            (Step::ApplyBusConfig, Stage::BusConfigure, Fault::Bus(BusFault::Configure)),
            (Step::EnableBus, Stage::BusEnable, Fault::Bus(BusFault::Enable)),
            (Step::AttachDisplay, Stage::DisplayInit, Fault::External(ExternalFault::DisplayInit)),
        ];

        let config = BootConfig::default();
        for (step, stage, fault) in cases {
            let (seen, result) = stages(MockBoard::failing_at(step), &config);
            let halted = result.err().unwrap();
            assert_eq!(halted.error(), BootError { stage, fault }, "failing at {:?}", step);
            assert_eq!(seen.last(), Some(&stage));

            // Nothing after the failing step reached the hardware
            let board = halted.into_board();
            assert_eq!(board.steps.last(), Some(&step));
        }
    }

    #[test]
    fn test_draw_failure_halts() {
        let config = BootConfig::default();
        let cases = [
            (0, Stage::ClearScreen),
            (2, Stage::DrawHeart),
            (10, Stage::RenderText),
        ];
        for (call, stage) in cases {
            let board = MockBoard::new().with_display_failure(call);
            let (seen, result) = stages(board, &config);
            let halted = result.err().unwrap();
            assert_eq!(
                halted.error(),
                BootError::new(stage, DisplayError::Communication)
            );
            assert_eq!(seen.last(), Some(&stage));
        }
    }

    #[test]
    fn test_terminal_open_failure_is_not_fatal() {
        let config = BootConfig::default();
        let mut idle = Sequencer::new(MockBoard::failing_at(Step::OpenTerminal), &config)
            .run()
            .ok()
            .unwrap();
        assert!(idle.terminal_mut().is_none());
        assert_eq!(idle.display_mut().calls.len(), 28);
    }

    #[test]
    fn test_terminal_write_failure_is_not_fatal() {
        let config = BootConfig::default();
        let mut idle = Sequencer::new(MockBoard::new().with_broken_uart(), &config)
            .run()
            .ok()
            .unwrap();
        assert!(idle.terminal_mut().is_some());
        assert_eq!(idle.display_mut().calls.len(), 28);
    }

    #[test]
    fn test_unattainable_bus_rate_halts() {
        let config = BootConfig {
            bus: BusConfig {
                clock_hz: 100_000_000,
                ..BusConfig::default()
            },
            ..BootConfig::default()
        };
        let (_, result) = stages(MockBoard::new(), &config);
        let halted = result.err().unwrap();
        assert_eq!(
            halted.error(),
            BootError::new(
                Stage::BusConfigure,
                BusFault::UnattainableRate {
                    source_hz: 80_000_000,
                    target_hz: 100_000_000
                }
            )
        );
        assert_eq!(halted.error().blink_code(), 3);
    }

    #[test]
    fn test_custom_scene() {
        let lines = ["hi"];
        let config = BootConfig {
            scene: Scene {
                lines: &lines,
                heart_color: Color::MAGENTA,
                ..Scene::default()
            },
            ..BootConfig::default()
        };

        let mut idle = Sequencer::new(MockBoard::new(), &config).run().ok().unwrap();
        let calls = &idle.display_mut().calls;
        assert_eq!(calls.len(), 1 + 3 + 2);
        assert!(matches!(calls[1], PrimitiveCall::FillCircle { color: Color::MAGENTA, .. }));
        assert!(matches!(calls[4], PrimitiveCall::DrawChar { x: 58, ch: 'h', .. }));
    }
}
