//! Rectangular and circular apertures and obstacles.
//!
//! An aperture passes the field inside its shape and blocks the rest;
//! an obstacle does the opposite. The parameter block uses single-byte
//! selectors: `shape` is `'r'` (rectangular) or `'c'` (circular) and
//! `kind` is `'a'`/`'A'` (aperture) or `'o'`/`'O'` (obstacle).

use beamline_core::{
    BuildError, ElementKind, OpticalElement, PrecisionParams, PropagationError, ResizeList,
    Wavefront,
};

use crate::thin::check_size;

/// Parameter block for an aperture or obstacle.
#[derive(Clone, Debug, PartialEq)]
pub struct ApertureParams {
    /// Shape selector: `'r'` or `'c'`.
    pub shape: char,
    /// Kind selector: `'a'`/`'A'` or `'o'`/`'O'`.
    pub kind: char,
    /// Horizontal size (diameter for circles), metres.
    pub dx: f64,
    /// Vertical size, metres. Ignored for circles.
    pub dy: f64,
    /// Horizontal centre, metres.
    pub x: f64,
    /// Vertical centre, metres.
    pub y: f64,
}

/// Geometric shape of an aperture or obstacle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ApertureShape {
    /// Axis-aligned rectangle.
    Rectangular {
        /// Full width.
        dx: f64,
        /// Full height.
        dy: f64,
    },
    /// Circle.
    Circular {
        /// Diameter.
        diameter: f64,
    },
}

/// A rectangular or circular aperture or obstacle.
#[derive(Debug)]
pub struct Aperture {
    shape: ApertureShape,
    obstacle: bool,
    x: f64,
    y: f64,
}

impl Aperture {
    /// Create from a parameter block, decoding the selectors.
    pub fn new(params: &ApertureParams) -> Result<Self, BuildError> {
        let obstacle = match params.kind {
            'a' | 'A' => false,
            'o' | 'O' => true,
            other => {
                return Err(BuildError::unknown(format!(
                    "aperture kind selector must be 'a' or 'o', got {other:?}"
                )))
            }
        };
        let shape = match params.shape {
            'r' => ApertureShape::Rectangular {
                dx: params.dx,
                dy: params.dy,
            },
            'c' => ApertureShape::Circular {
                diameter: params.dx,
            },
            other => {
                return Err(BuildError::unknown(format!(
                    "aperture shape selector must be 'r' or 'c', got {other:?}"
                )))
            }
        };
        Ok(Self::with_shape(shape, obstacle, params.x, params.y))
    }

    /// Create directly from a shape.
    pub fn with_shape(shape: ApertureShape, obstacle: bool, x: f64, y: f64) -> Self {
        Self {
            shape,
            obstacle,
            x,
            y,
        }
    }

    /// The aperture shape.
    pub fn shape(&self) -> ApertureShape {
        self.shape
    }

    /// Whether this blocks its interior instead of passing it.
    pub fn is_obstacle(&self) -> bool {
        self.obstacle
    }

    /// Whether the point `(x, y)` is transmitted.
    pub fn transmits(&self, x: f64, y: f64) -> bool {
        let (dx, dy) = (x - self.x, y - self.y);
        let inside = match self.shape {
            ApertureShape::Rectangular { dx: w, dy: h } => {
                dx.abs() <= 0.5 * w && dy.abs() <= 0.5 * h
            }
            ApertureShape::Circular { diameter } => {
                let r = 0.5 * diameter;
                dx * dx + dy * dy <= r * r
            }
        };
        inside != self.obstacle
    }

    fn check(&self) -> Result<(), PropagationError> {
        match self.shape {
            ApertureShape::Rectangular { dx, dy } => {
                check_size(self.name(), "width", dx)?;
                check_size(self.name(), "height", dy)
            }
            ApertureShape::Circular { diameter } => check_size(self.name(), "diameter", diameter),
        }
    }
}

impl OpticalElement for Aperture {
    fn name(&self) -> &str {
        match (self.shape, self.obstacle) {
            (ApertureShape::Rectangular { .. }, false) => "RectAperture",
            (ApertureShape::Circular { .. }, false) => "CircAperture",
            (ApertureShape::Rectangular { .. }, true) => "RectObstacle",
            (ApertureShape::Circular { .. }, true) => "CircObstacle",
        }
    }

    fn kind(&self) -> ElementKind {
        if self.obstacle {
            ElementKind::Obstacle
        } else {
            ElementKind::Aperture
        }
    }

    fn propagate(
        &self,
        wfr: &mut Wavefront,
        _params: &PrecisionParams,
        _resize: &mut ResizeList,
    ) -> Result<(), PropagationError> {
        self.check()?;
        wfr.apply_transmission(|x, y| {
            if self.transmits(x, y) {
                (1.0, 0.0)
            } else {
                (0.0, 0.0)
            }
        });
        Ok(())
    }

    fn propagate_test(
        &self,
        input: &Wavefront,
        output: &mut Wavefront,
    ) -> Result<(), PropagationError> {
        self.check()?;
        output.copy_header_from(input);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beamline_test_utils::fixtures::uniform_wavefront;

    fn params(shape: char, kind: char) -> ApertureParams {
        ApertureParams {
            shape,
            kind,
            dx: 1e-3,
            dy: 0.5e-3,
            x: 0.0,
            y: 0.0,
        }
    }

    #[test]
    fn selectors_decode() {
        for k in ['a', 'A'] {
            assert_eq!(Aperture::new(&params('r', k)).unwrap().kind(), ElementKind::Aperture);
        }
        for k in ['o', 'O'] {
            assert_eq!(Aperture::new(&params('c', k)).unwrap().kind(), ElementKind::Obstacle);
        }
    }

    #[test]
    fn bad_selectors_are_unknown_elements() {
        assert!(matches!(
            Aperture::new(&params('x', 'a')),
            Err(BuildError::UnknownOpticalElement { .. })
        ));
        assert!(matches!(
            Aperture::new(&params('r', 'q')),
            Err(BuildError::UnknownOpticalElement { .. })
        ));
    }

    #[test]
    fn rectangular_aperture_clips() {
        let ap = Aperture::new(&params('r', 'a')).unwrap();
        assert!(ap.transmits(0.4e-3, 0.2e-3));
        assert!(!ap.transmits(0.6e-3, 0.0));
        assert!(!ap.transmits(0.0, 0.3e-3));
    }

    #[test]
    fn circular_obstacle_blocks_centre() {
        let ob = Aperture::new(&params('c', 'o')).unwrap();
        assert!(!ob.transmits(0.0, 0.0));
        assert!(ob.transmits(0.6e-3, 0.0));
        assert_eq!(ob.name(), "CircObstacle");
    }

    #[test]
    fn propagate_zeroes_outside() {
        // 5x5 over 2 mm: samples at -1, -0.5, 0, 0.5, 1 mm
        let mut w = uniform_wavefront(5, 2e-3);
        let ap = Aperture::new(&params('r', 'a')).unwrap();
        ap.propagate(&mut w, &PrecisionParams::plain(0.5), &mut ResizeList::new())
            .unwrap();
        assert_eq!(w.intensity_at(2, 2), Some(1.0));
        assert_eq!(w.intensity_at(0, 2), Some(0.0));
        // y = 0.5 mm lies outside the 0.5 mm tall opening
        assert_eq!(w.intensity_at(2, 3), Some(0.0));
    }

    #[test]
    fn negative_size_fails_test() {
        let mut p = params('r', 'a');
        p.dx = -1.0;
        let ap = Aperture::new(&p).unwrap();
        let w = uniform_wavefront(2, 1e-3);
        let mut out = w.clone();
        assert!(matches!(
            ap.propagate_test(&w, &mut out),
            Err(PropagationError::InvalidParameters { .. })
        ));
    }
}
