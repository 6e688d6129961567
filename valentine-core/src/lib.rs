//! Board-agnostic boot logic for the Valentine firmware
//!
//! This crate contains everything between reset and a finished frame
//! that does not depend on a specific chip:
//!
//! - Peripheral bring-up and display bus configuration (`platform`)
//! - Fault taxonomy (`error`)
//! - Startup banner on the UART terminal (`terminal`)
//! - Default scene and bus settings (`config`)
//! - Status LED fault codes (`diagnostic`)
//! - The boot-to-render state machine (`sequencer`)

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod diagnostic;
pub mod error;
pub mod platform;
pub mod sequencer;
pub mod terminal;

#[cfg(test)]
mod mock;

pub use config::{BootConfig, Scene};
pub use error::{BootError, BusFault, ExternalFault, Fault, HardwareFault};
pub use platform::{BusHandle, PlatformContext, Ready};
pub use sequencer::{Halted, Idle, Sequencer, Stage};
pub use terminal::Terminal;
