//! Grazing-incidence focusing mirrors: ellipsoid and toroid.
//!
//! Both share a [`MirrorGeometry`]: the mirror surface projected onto
//! the beam acts as an aperture (`size_tangential·sinθ × size_sagittal`),
//! the reflectivity scales the amplitude by `√R`, and focusing is applied
//! as a thin lens with separate tangential and sagittal focal lengths.
//! The deflection plane selects which transverse axis is tangential.

use beamline_core::{
    BuildError, ElementKind, OpticalElement, PrecisionParams, PropagationError, ResizeList,
    Wavefront,
};

use crate::thin::{check_energy, check_focal, check_size, lens_phase, radius_after_lens};

/// Geometry and surface data shared by all mirror variants.
#[derive(Clone, Debug, PartialEq)]
pub struct MirrorGeometry {
    /// Aperture shape: `'r'` rectangular or `'e'` elliptical.
    pub ap_shape: char,
    /// Deflection plane: `'h'` or `'v'`.
    pub deflection: char,
    /// Grazing angle, radians.
    pub grazing_angle: f64,
    /// Mirror length along the tangential direction, metres.
    pub size_tangential: f64,
    /// Mirror width along the sagittal direction, metres.
    pub size_sagittal: f64,
    /// Intensity reflectivity in `[0, 1]`.
    pub reflectivity: f64,
    /// Horizontal centre, metres.
    pub x: f64,
    /// Vertical centre, metres.
    pub y: f64,
}

/// Parameter block for an ellipsoidal mirror.
#[derive(Clone, Debug, PartialEq)]
pub struct MirrorEllipsoidParams {
    /// Source-to-mirror distance, metres.
    pub p: f64,
    /// Mirror-to-image distance, metres.
    pub q: f64,
    /// Shared geometry.
    pub geometry: MirrorGeometry,
}

/// Parameter block for a toroidal mirror.
#[derive(Clone, Debug, PartialEq)]
pub struct MirrorToroidParams {
    /// Tangential radius of curvature, metres.
    pub tangential_radius: f64,
    /// Sagittal radius of curvature, metres.
    pub sagittal_radius: f64,
    /// Shared geometry.
    pub geometry: MirrorGeometry,
}

/// Validated mirror surface: decoded selectors plus focal lengths.
#[derive(Debug)]
struct Surface {
    geometry: MirrorGeometry,
    elliptical: bool,
    vertical: bool,
    f_tangential: f64,
    f_sagittal: f64,
}

impl Surface {
    fn new(
        geometry: &MirrorGeometry,
        f_tangential: f64,
        f_sagittal: f64,
    ) -> Result<Self, BuildError> {
        let elliptical = match geometry.ap_shape {
            'r' | 'R' => false,
            'e' | 'E' => true,
            other => {
                return Err(BuildError::unknown(format!(
                    "mirror aperture shape must be 'r' or 'e', got {other:?}"
                )))
            }
        };
        let vertical = match geometry.deflection {
            'h' | 'H' | 'x' | 'X' => false,
            'v' | 'V' | 'y' | 'Y' => true,
            other => {
                return Err(BuildError::unknown(format!(
                    "mirror deflection plane must be 'h' or 'v', got {other:?}"
                )))
            }
        };
        Ok(Self {
            geometry: geometry.clone(),
            elliptical,
            vertical,
            f_tangential,
            f_sagittal,
        })
    }

    /// Focal lengths mapped onto `(x, y)`.
    fn focal_xy(&self) -> (f64, f64) {
        if self.vertical {
            (self.f_sagittal, self.f_tangential)
        } else {
            (self.f_tangential, self.f_sagittal)
        }
    }

    /// Projected aperture half-sizes on `(x, y)`.
    fn half_aperture_xy(&self) -> (f64, f64) {
        let g = &self.geometry;
        let t = 0.5 * g.size_tangential * g.grazing_angle.sin();
        let s = 0.5 * g.size_sagittal;
        if self.vertical {
            (s, t)
        } else {
            (t, s)
        }
    }

    fn check(&self, name: &str, wfr: &Wavefront) -> Result<(), PropagationError> {
        let g = &self.geometry;
        check_energy(name, wfr)?;
        check_size(name, "tangential size", g.size_tangential)?;
        check_size(name, "sagittal size", g.size_sagittal)?;
        if !(g.grazing_angle > 0.0 && g.grazing_angle < std::f64::consts::FRAC_PI_2) {
            return Err(PropagationError::InvalidParameters {
                element: name.to_string(),
                reason: format!("grazing angle must lie in (0, π/2), got {}", g.grazing_angle),
            });
        }
        if !(0.0..=1.0).contains(&g.reflectivity) {
            return Err(PropagationError::InvalidParameters {
                element: name.to_string(),
                reason: format!("reflectivity must lie in [0, 1], got {}", g.reflectivity),
            });
        }
        check_focal(name, "tangential", self.f_tangential)?;
        check_focal(name, "sagittal", self.f_sagittal)
    }

    fn propagate(&self, name: &str, wfr: &mut Wavefront) -> Result<(), PropagationError> {
        self.check(name, wfr)?;
        let (fx, fy) = self.focal_xy();
        let (hx, hy) = self.half_aperture_xy();
        let (x0, y0) = (self.geometry.x, self.geometry.y);
        let amp = self.geometry.reflectivity.sqrt();
        let elliptical = self.elliptical;
        let phase = lens_phase(wfr.wave_number(), fx, fy, x0, y0);
        wfr.apply_transmission(|x, y| {
            let (u, v) = (x - x0, y - y0);
            let inside = if elliptical {
                hx > 0.0 && hy > 0.0 && (u / hx).powi(2) + (v / hy).powi(2) <= 1.0
            } else {
                u.abs() <= hx && v.abs() <= hy
            };
            if !inside {
                return (0.0, 0.0);
            }
            let (re, im) = phase(x, y);
            (amp * re, amp * im)
        });
        wfr.radius_x = radius_after_lens(wfr.radius_x, fx);
        wfr.radius_y = radius_after_lens(wfr.radius_y, fy);
        Ok(())
    }

    fn propagate_test(
        &self,
        name: &str,
        input: &Wavefront,
        output: &mut Wavefront,
    ) -> Result<(), PropagationError> {
        self.check(name, input)?;
        let (fx, fy) = self.focal_xy();
        output.copy_header_from(input);
        output.radius_x = radius_after_lens(input.radius_x, fx);
        output.radius_y = radius_after_lens(input.radius_y, fy);
        Ok(())
    }
}

/// An ellipsoidal mirror imaging a point at distance `p` to `q`.
#[derive(Debug)]
pub struct MirrorEllipsoid {
    surface: Surface,
}

impl MirrorEllipsoid {
    /// Create an ellipsoidal mirror; both planes focus at `pq/(p+q)`.
    pub fn new(params: &MirrorEllipsoidParams) -> Result<Self, BuildError> {
        let f = params.p * params.q / (params.p + params.q);
        Ok(Self {
            surface: Surface::new(&params.geometry, f, f)?,
        })
    }

    /// Tangential and sagittal focal lengths.
    pub fn focal_lengths(&self) -> (f64, f64) {
        (self.surface.f_tangential, self.surface.f_sagittal)
    }
}

impl OpticalElement for MirrorEllipsoid {
    fn name(&self) -> &str {
        "MirrorEllipsoid"
    }

    fn kind(&self) -> ElementKind {
        ElementKind::MirrorEllipsoid
    }

    fn propagate(
        &self,
        wfr: &mut Wavefront,
        _params: &PrecisionParams,
        _resize: &mut ResizeList,
    ) -> Result<(), PropagationError> {
        self.surface.propagate(self.name(), wfr)
    }

    fn propagate_test(
        &self,
        input: &Wavefront,
        output: &mut Wavefront,
    ) -> Result<(), PropagationError> {
        self.surface.propagate_test(self.name(), input, output)
    }
}

/// A toroidal mirror with independent tangential and sagittal radii.
#[derive(Debug)]
pub struct MirrorToroid {
    surface: Surface,
}

impl MirrorToroid {
    /// Create a toroidal mirror: `f_t = R_t·sinθ/2`, `f_s = R_s/(2·sinθ)`.
    pub fn new(params: &MirrorToroidParams) -> Result<Self, BuildError> {
        let s = params.geometry.grazing_angle.sin();
        let f_t = 0.5 * params.tangential_radius * s;
        let f_s = params.sagittal_radius / (2.0 * s);
        Ok(Self {
            surface: Surface::new(&params.geometry, f_t, f_s)?,
        })
    }

    /// Tangential and sagittal focal lengths.
    pub fn focal_lengths(&self) -> (f64, f64) {
        (self.surface.f_tangential, self.surface.f_sagittal)
    }
}

impl OpticalElement for MirrorToroid {
    fn name(&self) -> &str {
        "MirrorToroid"
    }

    fn kind(&self) -> ElementKind {
        ElementKind::MirrorToroid
    }

    fn propagate(
        &self,
        wfr: &mut Wavefront,
        _params: &PrecisionParams,
        _resize: &mut ResizeList,
    ) -> Result<(), PropagationError> {
        self.surface.propagate(self.name(), wfr)
    }

    fn propagate_test(
        &self,
        input: &Wavefront,
        output: &mut Wavefront,
    ) -> Result<(), PropagationError> {
        self.surface.propagate_test(self.name(), input, output)
    }
}
