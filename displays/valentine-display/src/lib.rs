//! Display abstraction and drawing composers for Valentine
//!
//! This crate provides:
//! - `Surface` trait: the primitive drawing operations a display exposes
//! - `PrimitiveCall`: one primitive operation as a value
//! - `heart` and `text` composers that turn drawing intent into primitives
//! - `GraphicsSurface`: a `Surface` over any `embedded-graphics` draw target
//! - `Ssd1351`: SPI driver for the 128x128 RGB565 OLED panel
//!
//! # Architecture
//!
//! Composers are pure. They take colors, a `DisplayGeometry` and a small
//! style struct and return primitive calls; nothing is drawn until a
//! caller feeds those calls to a `Surface`. This keeps the layout math
//! testable on the host without a panel attached.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod backend;
pub mod color;
pub mod geometry;
pub mod graphics;
pub mod heart;
pub mod primitive;
pub mod ssd1351;
pub mod text;

// Re-export key types
pub use backend::{DisplayError, Surface};
pub use color::Color;
pub use geometry::DisplayGeometry;
pub use graphics::GraphicsSurface;
pub use heart::{draw_heart, HeartStyle};
pub use primitive::PrimitiveCall;
pub use ssd1351::{Ssd1351, Ssd1351Error};
pub use text::{centered_x, render_centered_lines, TextLayout};
