//! Pan/zoom applied to the whole scene, outside model space.

use crate::model::{Point, fmt_coord};
use crate::render::RenderError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub zoom: f64,
    pub pan: Point,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: Point::default(),
        }
    }
}

impl Viewport {
    pub fn new(zoom: f64, pan: Point) -> Result<Self, RenderError> {
        if !zoom.is_finite() || zoom <= 0.0 {
            return Err(RenderError::InvalidZoom(zoom));
        }
        if !pan.x.is_finite() || !pan.y.is_finite() {
            return Err(RenderError::InvalidPan);
        }
        Ok(Self { zoom, pan })
    }

    /// SVG transform attribute for the scene group.
    pub fn transform(&self) -> String {
        format!(
            "translate({}, {}) scale({})",
            fmt_coord(self.pan.x),
            fmt_coord(self.pan.y),
            self.zoom
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_string() {
        let viewport = Viewport::new(1.5, Point::new(40.0, -12.5)).unwrap();
        assert_eq!(viewport.transform(), "translate(40, -12.5) scale(1.5)");
        assert_eq!(Viewport::default().transform(), "translate(0, 0) scale(1)");
    }

    #[test]
    fn test_rejects_non_positive_zoom() {
        assert!(matches!(
            Viewport::new(0.0, Point::default()),
            Err(RenderError::InvalidZoom(_))
        ));
        assert!(Viewport::new(f64::NAN, Point::default()).is_err());
        assert!(matches!(
            Viewport::new(1.0, Point::new(f64::INFINITY, 0.0)),
            Err(RenderError::InvalidPan)
        ));
    }
}
