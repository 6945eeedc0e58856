//! Planar reflection grating.
//!
//! Applies the linear phase ramp `2π·m·n·u` of diffraction order `m`
//! (groove density `n`) along the dispersion axis `u`, and scales the
//! amplitude by `√reflectivity`. The grating equation is checked in the
//! grazing-incidence form `cos θ_out = cos θ_in − m·λ·n`.

use std::f64::consts::PI;

use beamline_core::{
    BuildError, ElementKind, OpticalElement, PrecisionParams, PropagationError, ResizeList,
    Wavefront,
};

use crate::thin::check_energy;

/// Parameter block for a grating.
#[derive(Clone, Debug, PartialEq)]
pub struct GratingParams {
    /// Groove density, lines/mm.
    pub groove_density: f64,
    /// Dispersion plane: `'h'` (horizontal) or `'v'` (vertical).
    pub dispersion_plane: char,
    /// Grazing angle of incidence, radians.
    pub angle: f64,
    /// Diffraction order.
    pub order: i32,
    /// Intensity reflectivity in `[0, 1]`.
    pub reflectivity: f64,
}

/// A planar grating diffracting into a single order.
#[derive(Debug)]
pub struct Grating {
    params: GratingParams,
    vertical: bool,
}

impl Grating {
    /// Create a grating. The dispersion plane selector must be `'h'` or `'v'`.
    pub fn new(params: &GratingParams) -> Result<Self, BuildError> {
        let vertical = match params.dispersion_plane {
            'h' | 'H' | 'x' | 'X' => false,
            'v' | 'V' | 'y' | 'Y' => true,
            other => {
                return Err(BuildError::unknown(format!(
                    "grating dispersion plane must be 'h' or 'v', got {other:?}"
                )))
            }
        };
        Ok(Self {
            params: params.clone(),
            vertical,
        })
    }

    /// Grazing exit angle for the configured order at `wavelength`, or
    /// `None` if the order is evanescent.
    pub fn exit_angle(&self, wavelength: f64) -> Option<f64> {
        let n = self.params.groove_density * 1e3;
        let c = self.params.angle.cos() - self.params.order as f64 * wavelength * n;
        (-1.0..=1.0).contains(&c).then(|| c.acos())
    }

    fn check(&self, wfr: &Wavefront) -> Result<(), PropagationError> {
        check_energy(self.name(), wfr)?;
        let refl = self.params.reflectivity;
        if !(0.0..=1.0).contains(&refl) {
            return Err(PropagationError::InvalidParameters {
                element: self.name().to_string(),
                reason: format!("reflectivity must lie in [0, 1], got {refl}"),
            });
        }
        if self.exit_angle(wfr.wavelength()).is_none() {
            return Err(PropagationError::InvalidParameters {
                element: self.name().to_string(),
                reason: format!(
                    "order {} is evanescent at {} eV",
                    self.params.order, wfr.photon_energy
                ),
            });
        }
        Ok(())
    }
}

impl OpticalElement for Grating {
    fn name(&self) -> &str {
        "Grating"
    }

    fn kind(&self) -> ElementKind {
        ElementKind::Grating
    }

    fn propagate(
        &self,
        wfr: &mut Wavefront,
        _params: &PrecisionParams,
        _resize: &mut ResizeList,
    ) -> Result<(), PropagationError> {
        self.check(wfr)?;
        let slope = 2.0 * PI * self.params.order as f64 * self.params.groove_density * 1e3;
        let amp = self.params.reflectivity.sqrt();
        let vertical = self.vertical;
        wfr.apply_transmission(|x, y| {
            let phi = slope * if vertical { y } else { x };
            (amp * phi.cos(), amp * phi.sin())
        });
        Ok(())
    }

    fn propagate_test(
        &self,
        input: &Wavefront,
        output: &mut Wavefront,
    ) -> Result<(), PropagationError> {
        self.check(input)?;
        output.copy_header_from(input);
        Ok(())
    }
}
