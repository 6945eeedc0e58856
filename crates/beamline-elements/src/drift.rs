//! Free-space drift.
//!
//! The drift tracks a spherical wavefront analytically: over a length
//! `L` a wave with radius `R` grows to `R + L`, so the mesh is stretched
//! by `(R + L)/R` and the amplitude scaled by `1/√(mx·my)` to conserve
//! power. Plane-wave axes (`R = ∞`) are left unstretched.
//!
//! # Construction
//!
//! ```
//! use beamline_elements::{Drift, DriftParams};
//!
//! let drift = Drift::new(&DriftParams { length: 2.5 }).unwrap();
//! assert_eq!(drift.length(), 2.5);
//! ```

use beamline_core::{
    BuildError, ElementKind, OpticalElement, PrecisionParams, PropagationError, ResizeList,
    Wavefront,
};

/// Parameter block for a drift.
#[derive(Clone, Debug, PartialEq)]
pub struct DriftParams {
    /// Length in metres.
    pub length: f64,
}

/// A free-space drift of fixed length.
#[derive(Debug)]
pub struct Drift {
    length: f64,
}

impl Drift {
    /// Create a drift. Non-finite lengths are rejected.
    pub fn new(params: &DriftParams) -> Result<Self, BuildError> {
        if !params.length.is_finite() {
            return Err(BuildError::unknown(format!(
                "drift length must be finite, got {}",
                params.length
            )));
        }
        Ok(Self {
            length: params.length,
        })
    }

    /// Drift length in metres.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Mesh magnification on one axis.
    fn magnification(&self, radius: f64) -> Result<f64, PropagationError> {
        if radius.is_infinite() {
            return Ok(1.0);
        }
        let m = (radius + self.length) / radius;
        if !m.is_finite() || m <= 0.0 {
            return Err(PropagationError::InvalidParameters {
                element: self.name().to_string(),
                reason: format!(
                    "drift of {} m through focus of a wave with radius {radius} m",
                    self.length
                ),
            });
        }
        Ok(m)
    }

    fn advance_header(&self, wfr: &mut Wavefront) -> Result<(f64, f64), PropagationError> {
        let mx = self.magnification(wfr.radius_x)?;
        let my = self.magnification(wfr.radius_y)?;
        wfr.stretch_mesh(mx, my);
        if wfr.radius_x.is_finite() {
            wfr.radius_x += self.length;
        }
        if wfr.radius_y.is_finite() {
            wfr.radius_y += self.length;
        }
        wfr.position += self.length;
        Ok((mx, my))
    }
}

impl OpticalElement for Drift {
    fn name(&self) -> &str {
        "Drift"
    }

    fn kind(&self) -> ElementKind {
        ElementKind::Drift
    }

    fn propagate(
        &self,
        wfr: &mut Wavefront,
        _params: &PrecisionParams,
        _resize: &mut ResizeList,
    ) -> Result<(), PropagationError> {
        let (mx, my) = self.advance_header(wfr)?;
        wfr.scale_amplitude(1.0 / (mx * my).sqrt());
        Ok(())
    }

    fn propagate_test(
        &self,
        input: &Wavefront,
        output: &mut Wavefront,
    ) -> Result<(), PropagationError> {
        output.copy_header_from(input);
        self.advance_header(output).map(|_| ())
    }
}
