//! Heart shape composer
//!
//! A heart is two filled circles for the lobes and one filled triangle
//! pointing down for the body:
//!
//! ```text
//!        (cx-r,cy)   (cx+r,cy)
//!          .-"-.       .-"-.
//!         /     \     /     \
//! (cx-2r,cy)-----------------(cx+2r,cy)
//!            \             /
//!              \         /
//!                \     /
//!                  \ /
//!             (cx, cy+2r)
//! ```

use crate::color::Color;
use crate::geometry::DisplayGeometry;
use crate::primitive::PrimitiveCall;

/// Vertical placement and size of the heart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HeartStyle {
    /// Row of the lobe centers and the triangle's top edge
    pub center_y: i32,
    /// Lobe radius
    pub radius: i32,
}

impl Default for HeartStyle {
    fn default() -> Self {
        Self {
            center_y: 40,
            radius: 12,
        }
    }
}

/// Compose a heart horizontally centered on the panel
///
/// Returns, in order: left lobe, right lobe, body.
pub fn draw_heart(color: Color, geometry: DisplayGeometry, style: HeartStyle) -> [PrimitiveCall; 3] {
    let cx = geometry.center_x();
    let cy = style.center_y;
    let r = style.radius;

    [
        PrimitiveCall::FillCircle {
            x: cx - r,
            y: cy,
            r,
            color,
        },
        PrimitiveCall::FillCircle {
            x: cx + r,
            y: cy,
            r,
            color,
        },
        PrimitiveCall::FillTriangle {
            x0: cx - 2 * r,
            y0: cy,
            x1: cx + 2 * r,
            y1: cy,
            x2: cx,
            y2: cy + 2 * r,
            color,
        },
    ]
}
