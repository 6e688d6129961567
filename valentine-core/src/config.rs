//! Boot configuration
//!
//! Everything the sequencer needs to know about the render pass and the
//! display bus. The defaults reproduce the stock Valentine card; a board
//! crate may override any field (the firmware does so from `board.toml`).

use valentine_display::{Color, HeartStyle, TextLayout};
use valentine_hal::BusConfig;

/// Centered message shown below the heart
pub const MESSAGE: [&str; 2] = ["Will you be my", "Valentine?"];

/// Title printed inside the terminal banner
pub const BANNER: &str = "To my triny trin trin";

/// The single frame drawn at boot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Scene<'a> {
    /// Full-screen fill drawn first
    pub background: Color,
    pub heart_color: Color,
    pub heart: HeartStyle,
    /// Glyph color
    pub text_fg: Color,
    /// Glyph cell background
    pub text_bg: Color,
    pub layout: TextLayout,
    /// Message lines, top to bottom
    pub lines: &'a [&'a str],
    /// Text cursor set before the message is drawn
    pub cursor: (i32, i32),
}

impl Default for Scene<'static> {
    fn default() -> Self {
        Self {
            background: Color::BLACK,
            heart_color: Color::RED,
            heart: HeartStyle::default(),
            text_fg: Color::WHITE,
            text_bg: Color::BLACK,
            layout: TextLayout::default(),
            lines: &MESSAGE,
            cursor: (10, 90),
        }
    }
}

/// Complete boot configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BootConfig<'a> {
    /// Display bus settings
    pub bus: BusConfig,
    pub scene: Scene<'a>,
    /// Terminal banner title
    pub banner: &'a str,
}

impl Default for BootConfig<'static> {
    fn default() -> Self {
        Self {
            bus: BusConfig::default(),
            scene: Scene::default(),
            banner: BANNER,
        }
    }
}
