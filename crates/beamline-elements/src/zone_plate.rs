//! Fresnel zone plate, first diffraction order.
//!
//! Modelled as a circular pupil of the outermost zone radius combined
//! with a thin lens of focal length `rn² / (N·λ)` and the amplitude
//! attenuation of the zone material.

use beamline_core::{
    BuildError, ElementKind, OpticalElement, PrecisionParams, PropagationError, ResizeList,
    Wavefront,
};

use crate::thin::{check_energy, check_size, lens_phase, radius_after_lens};

/// Parameter block for a zone plate.
#[derive(Clone, Debug, PartialEq)]
pub struct ZonePlateParams {
    /// Total number of zones.
    pub zones: u32,
    /// Outermost zone radius, metres.
    pub outer_radius: f64,
    /// Zone thickness, metres.
    pub thickness: f64,
    /// Attenuation length of the zone material, metres (`<= 0`: none).
    pub atten_len_1: f64,
    /// Attenuation length of the spacer material, metres.
    pub atten_len_2: f64,
    /// Refractive index decrement of the zone material.
    pub delta_1: f64,
    /// Refractive index decrement of the spacer material.
    pub delta_2: f64,
    /// Horizontal centre, metres.
    pub x: f64,
    /// Vertical centre, metres.
    pub y: f64,
}

/// A Fresnel zone plate focusing into its first order.
#[derive(Debug)]
pub struct ZonePlate {
    params: ZonePlateParams,
}

impl ZonePlate {
    /// Create a zone plate.
    pub fn new(params: &ZonePlateParams) -> Result<Self, BuildError> {
        Ok(Self {
            params: params.clone(),
        })
    }

    /// First-order focal length at `wavelength`.
    pub fn focal_length(&self, wavelength: f64) -> f64 {
        let rn = self.params.outer_radius;
        rn * rn / (self.params.zones as f64 * wavelength)
    }

    /// Amplitude transmission of the zone material.
    pub fn amplitude_transmission(&self) -> f64 {
        if self.params.atten_len_1 > 0.0 {
            (-self.params.thickness / (2.0 * self.params.atten_len_1)).exp()
        } else {
            1.0
        }
    }

    fn check(&self, wfr: &Wavefront) -> Result<(), PropagationError> {
        if self.params.zones == 0 {
            return Err(PropagationError::InvalidParameters {
                element: self.name().to_string(),
                reason: "zone count must be positive".to_string(),
            });
        }
        check_size(self.name(), "outer radius", self.params.outer_radius)?;
        check_size(self.name(), "thickness", self.params.thickness)?;
        if self.params.outer_radius == 0.0 {
            return Err(PropagationError::InvalidParameters {
                element: self.name().to_string(),
                reason: "outer radius must be positive".to_string(),
            });
        }
        check_energy(self.name(), wfr)
    }
}

impl OpticalElement for ZonePlate {
    fn name(&self) -> &str {
        "ZonePlate"
    }

    fn kind(&self) -> ElementKind {
        ElementKind::ZonePlate
    }

    fn propagate(
        &self,
        wfr: &mut Wavefront,
        _params: &PrecisionParams,
        _resize: &mut ResizeList,
    ) -> Result<(), PropagationError> {
        self.check(wfr)?;
        let f = self.focal_length(wfr.wavelength());
        let amp = self.amplitude_transmission();
        let (x0, y0, rn) = (self.params.x, self.params.y, self.params.outer_radius);
        let phase = lens_phase(wfr.wave_number(), f, f, x0, y0);
        wfr.apply_transmission(|x, y| {
            let (dx, dy) = (x - x0, y - y0);
            if dx * dx + dy * dy > rn * rn {
                return (0.0, 0.0);
            }
            let (re, im) = phase(x, y);
            (amp * re, amp * im)
        });
        wfr.radius_x = radius_after_lens(wfr.radius_x, f);
        wfr.radius_y = radius_after_lens(wfr.radius_y, f);
        Ok(())
    }

    fn propagate_test(
        &self,
        input: &Wavefront,
        output: &mut Wavefront,
    ) -> Result<(), PropagationError> {
        self.check(input)?;
        let f = self.focal_length(input.wavelength());
        output.copy_header_from(input);
        output.radius_x = radius_after_lens(input.radius_x, f);
        output.radius_y = radius_after_lens(input.radius_y, f);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beamline_test_utils::fixtures::uniform_wavefront;

    fn zp() -> ZonePlate {
        ZonePlate::new(&ZonePlateParams {
            zones: 100,
            outer_radius: 0.4e-3,
            thickness: 1e-6,
            atten_len_1: 0.5e-6,
            atten_len_2: 0.0,
            delta_1: 1e-5,
            delta_2: 0.0,
            x: 0.0,
            y: 0.0,
        })
        .unwrap()
    }

    #[test]
    fn focal_length_formula() {
        let f = zp().focal_length(1e-9);
        assert!((f - 1.6).abs() < 1e-12);
    }

    #[test]
    fn attenuates_and_clips() {
        let mut w = uniform_wavefront(5, 1e-3);
        zp().propagate(&mut w, &PrecisionParams::plain(0.5), &mut ResizeList::new())
            .unwrap();
        let expected = (-2.0f64).exp(); // amplitude e^-1
        assert!((w.intensity_at(2, 2).unwrap() - expected).abs() < 1e-6);
        // corner at (0.5 mm, 0.5 mm) lies beyond rn
        assert_eq!(w.intensity_at(0, 0), Some(0.0));
        assert!(w.radius_x < 0.0);
    }

    #[test]
    fn zero_zones_fail_test() {
        let mut p = zp().params.clone();
        p.zones = 0;
        let z = ZonePlate::new(&p).unwrap();
        let w = uniform_wavefront(2, 1e-3);
        let mut out = w.clone();
        assert!(z.propagate_test(&w, &mut out).is_err());
    }
}
