//! Valentine Hardware Abstraction Layer
//!
//! This crate defines the hardware traits the boot sequence is written
//! against. A board crate implements them once for its chip; the core
//! crate drives them in a fixed order and never touches registers itself.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (valentine-firmware)       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  valentine-core (sequencer, bring-up)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  valentine-hal (this crate - traits)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  board implementation (Rp2040Board)     │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`board::Board`] - Bring-up, pin muxing, display bus and collaborators
//! - [`uart::UartTx`] - Terminal output
//!
//! # Types
//!
//! - [`spi::BusConfig`] - Serial bus settings applied once at startup
//! - [`spi::ClockDivisor`] - Bus clock divider derived from the source clock

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod board;
pub mod spi;
pub mod uart;

// Re-export key items at crate root for convenience
pub use board::Board;
pub use spi::{BusConfig, ClockDivisor};
pub use uart::UartTx;
