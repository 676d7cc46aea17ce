// charts/src/scale.rs

use crate::{ChartError, ChartResult};
use serde::{Deserialize, Serialize};

/// Inner margins of a chart, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Padding {
    pub const fn uniform(value: f64) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }
}

impl Default for Padding {
    fn default() -> Self {
        Self {
            top: 16.0,
            right: 16.0,
            bottom: 28.0,
            left: 56.0,
        }
    }
}

/// Pixel area a chart is projected into
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Total width in pixels
    pub width: f64,
    /// Total height in pixels
    pub height: f64,
    /// Inner margins
    #[serde(default)]
    pub padding: Padding,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 720.0,
            height: 360.0,
            padding: Padding::default(),
        }
    }
}

impl Viewport {
    pub fn new(width: f64, height: f64, padding: Padding) -> ChartResult<Self> {
        let viewport = Self {
            width,
            height,
            padding,
        };
        viewport.validate()?;
        Ok(viewport)
    }

    /// Reject non-finite sizes and padding that leaves no plot area
    pub fn validate(&self) -> ChartResult<()> {
        let p = &self.padding;
        let all = [self.width, self.height, p.top, p.right, p.bottom, p.left];

        if all.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(ChartError::InvalidViewport(format!(
                "dimensions must be finite and non-negative: {:?}",
                self
            )));
        }
        if self.plot_width() <= 0.0 || self.plot_height() <= 0.0 {
            return Err(ChartError::InvalidViewport(format!(
                "padding leaves no plot area in {}x{}",
                self.width, self.height
            )));
        }

        Ok(())
    }

    pub fn plot_width(&self) -> f64 {
        self.width - self.padding.left - self.padding.right
    }

    pub fn plot_height(&self) -> f64 {
        self.height - self.padding.top - self.padding.bottom
    }

    /// Maps normalized progress onto the horizontal plot range
    pub fn x_scale(&self) -> LinearScale {
        LinearScale::new(
            (0.0, 1.0),
            (self.padding.left, self.width - self.padding.right),
        )
    }

    /// Maps `[0, max]` onto the vertical plot range, zero at the baseline
    pub fn y_scale(&self, max: f64) -> LinearScale {
        LinearScale::new(
            (0.0, max),
            (self.height - self.padding.bottom, self.padding.top),
        )
    }

    /// Inverse of the x scale, clamped to `[0, 1]`
    pub fn x_to_progress(&self, x: f64) -> f64 {
        self.x_scale().invert(x).clamp(0.0, 1.0)
    }
}

/// Linear mapping from a data domain onto a pixel range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn apply(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if d1 == d0 {
            return r0;
        }
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }

    pub fn invert(&self, pixel: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if r1 == r0 {
            return d0;
        }
        d0 + (pixel - r0) / (r1 - r0) * (d1 - d0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_viewport_is_valid() {
        let viewport = Viewport::default();
        assert!(viewport.validate().is_ok());
        assert_eq!(viewport.plot_width(), 648.0);
        assert_eq!(viewport.plot_height(), 316.0);
    }

    #[test]
    fn test_rejects_degenerate_viewports() {
        assert!(Viewport::new(100.0, 100.0, Padding::uniform(50.0)).is_err());
        assert!(Viewport::new(f64::NAN, 100.0, Padding::uniform(0.0)).is_err());
        assert!(Viewport::new(-10.0, 100.0, Padding::uniform(0.0)).is_err());
        assert!(Viewport::new(100.0, 100.0, Padding::uniform(10.0)).is_ok());
    }

    #[test]
    fn test_x_scale_spans_plot_area() {
        let viewport = Viewport::new(200.0, 100.0, Padding::uniform(10.0)).unwrap();
        let x = viewport.x_scale();

        assert_eq!(x.apply(0.0), 10.0);
        assert_eq!(x.apply(1.0), 190.0);
        assert_eq!(x.apply(0.5), 100.0);
    }

    #[test]
    fn test_y_scale_is_inverted() {
        let viewport = Viewport::new(200.0, 100.0, Padding::uniform(10.0)).unwrap();
        let y = viewport.y_scale(1_000.0);

        assert_eq!(y.apply(0.0), 90.0);
        assert_eq!(y.apply(1_000.0), 10.0);
    }

    #[test]
    fn test_x_to_progress_round_trips_and_clamps() {
        let viewport = Viewport::new(200.0, 100.0, Padding::uniform(10.0)).unwrap();

        assert_eq!(viewport.x_to_progress(100.0), 0.5);
        assert_eq!(viewport.x_to_progress(0.0), 0.0);
        assert_eq!(viewport.x_to_progress(500.0), 1.0);
    }

    #[test]
    fn test_degenerate_domain_maps_to_range_start() {
        let scale = LinearScale::new((5.0, 5.0), (0.0, 10.0));
        assert_eq!(scale.apply(7.0), 0.0);
    }
}
