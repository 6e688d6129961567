//! Valentine Firmware
//!
//! Boots a Raspberry Pi Pico, greets on UART0 and draws a heart with a
//! centered message on an SSD1351 OLED. If any step fails the on-board LED
//! blinks the fault class forever.

#![no_std]
#![no_main]

mod board;

use defmt::*;
use embassy_executor::Spawner;
use embassy_time::{Delay, Timer};
use {defmt_rtt as _, panic_probe as _};

use valentine_core::diagnostic::blink_code;
use valentine_core::{BootConfig, Scene, Sequencer};
use valentine_hal::uart::UartConfig;
use valentine_hal::BusConfig;

use crate::board::Rp2040Board;

/// Values baked in from board.toml
mod board_config {
    include!(concat!(env!("OUT_DIR"), "/board_config.rs"));
}

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Valentine firmware starting...");

    let config = BootConfig {
        bus: BusConfig {
            clock_hz: board_config::BUS_CLOCK_HZ,
            ..BusConfig::default()
        },
        scene: Scene {
            lines: board_config::MESSAGE,
            ..Scene::default()
        },
        banner: board_config::BANNER,
    };
    let terminal = UartConfig {
        baudrate: board_config::TERMINAL_BAUDRATE,
        ..UartConfig::default()
    };

    match Sequencer::new(Rp2040Board::new(terminal), &config).run() {
        Ok(idle) => {
            info!("Frame drawn, display bus at {} Hz", idle.bus_rate_hz());
            // The frame stays up as long as `idle` owns the panel
            loop {
                Timer::after_secs(60).await;
                debug!("Idle, {} SysTick wraps", board::systick_wraps());
            }
        }
        Err(halted) => {
            let error = halted.error();
            error!("Boot failed: {}", Display2Format(&error));
            signal_fault(halted.into_board(), error.blink_code()).await
        }
    }
}

/// Blink `code` on the status LED forever
async fn signal_fault(mut board: Rp2040Board, code: u8) -> ! {
    let mut delay = Delay;
    loop {
        match board.status_led() {
            Some(led) => {
                blink_code(led, &mut delay, code).ok();
            }
            // Clocks never came up: no LED and no time driver
            None => cortex_m::asm::wfi(),
        }
    }
}
