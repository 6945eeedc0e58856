//! Ideal thin lens.

use beamline_core::{
    BuildError, ElementKind, OpticalElement, PrecisionParams, PropagationError, ResizeList,
    Wavefront,
};

use crate::thin::{check_energy, check_focal, lens_phase, radius_after_lens};

/// Parameter block for a thin lens.
#[derive(Clone, Debug, PartialEq)]
pub struct ThinLensParams {
    /// Horizontal focal length, metres.
    pub fx: f64,
    /// Vertical focal length, metres.
    pub fy: f64,
    /// Horizontal centre, metres.
    pub x: f64,
    /// Vertical centre, metres.
    pub y: f64,
}

/// An ideal thin lens with independent horizontal and vertical focusing.
///
/// An infinite focal length leaves that axis untouched, so cylindrical
/// lenses are expressed with one infinite focal length.
#[derive(Debug)]
pub struct ThinLens {
    params: ThinLensParams,
}

impl ThinLens {
    /// Create a thin lens.
    pub fn new(params: &ThinLensParams) -> Result<Self, BuildError> {
        Ok(Self {
            params: params.clone(),
        })
    }

    /// Focal lengths `(fx, fy)`.
    pub fn focal_lengths(&self) -> (f64, f64) {
        (self.params.fx, self.params.fy)
    }

    fn check(&self, wfr: &Wavefront) -> Result<(), PropagationError> {
        check_focal(self.name(), "horizontal", self.params.fx)?;
        check_focal(self.name(), "vertical", self.params.fy)?;
        check_energy(self.name(), wfr)
    }
}

impl OpticalElement for ThinLens {
    fn name(&self) -> &str {
        "ThinLens"
    }

    fn kind(&self) -> ElementKind {
        ElementKind::ThinLens
    }

    fn propagate(
        &self,
        wfr: &mut Wavefront,
        _params: &PrecisionParams,
        _resize: &mut ResizeList,
    ) -> Result<(), PropagationError> {
        self.check(wfr)?;
        let p = &self.params;
        wfr.apply_transmission(lens_phase(wfr.wave_number(), p.fx, p.fy, p.x, p.y));
        wfr.radius_x = radius_after_lens(wfr.radius_x, p.fx);
        wfr.radius_y = radius_after_lens(wfr.radius_y, p.fy);
        Ok(())
    }

    fn propagate_test(
        &self,
        input: &Wavefront,
        output: &mut Wavefront,
    ) -> Result<(), PropagationError> {
        self.check(input)?;
        output.copy_header_from(input);
        output.radius_x = radius_after_lens(input.radius_x, self.params.fx);
        output.radius_y = radius_after_lens(input.radius_y, self.params.fy);
        Ok(())
    }
}
