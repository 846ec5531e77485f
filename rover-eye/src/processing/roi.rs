//! Region of interest: the forward travel corridor in the near field.

use opencv::core::Rect;

/// Half-open pixel rectangle `[x0, x1) x [y0, y1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Roi {
    pub x0: u32,
    pub x1: u32,
    pub y0: u32,
    pub y1: u32,
}

impl Roi {
    /// Rows from `top * height` to the bottom, columns between the two
    /// width fractions. Fractional edges are truncated.
    pub fn corridor(width: u32, height: u32, top: f64, band_start: f64, band_end: f64) -> Self {
        let edge = |extent: u32, fraction: f64| ((extent as f64 * fraction) as u32).min(extent);
        Self {
            x0: edge(width, band_start),
            x1: edge(width, band_end),
            y0: edge(height, top),
            y1: height,
        }
    }

    pub fn width(&self) -> u32 {
        self.x1.saturating_sub(self.x0)
    }

    pub fn height(&self) -> u32 {
        self.y1.saturating_sub(self.y0)
    }

    pub fn area(&self) -> u64 {
        self.width() as u64 * self.height() as u64
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x0 as i32, self.y0 as i32, self.width() as i32, self.height() as i32)
    }
}
