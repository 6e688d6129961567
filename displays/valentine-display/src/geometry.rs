//! Panel geometry

/// Pixel dimensions of the attached panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayGeometry {
    /// Width in pixels
    pub width: u16,
    /// Height in pixels
    pub height: u16,
}

impl DisplayGeometry {
    /// 128x128 SSD1351 panel
    pub const SSD1351: DisplayGeometry = DisplayGeometry::new(128, 128);

    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Horizontal center column
    pub const fn center_x(&self) -> i32 {
        self.width as i32 / 2
    }
}

impl Default for DisplayGeometry {
    fn default() -> Self {
        Self::SSD1351
    }
}
