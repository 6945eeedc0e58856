//! Rectangular waveguide.
//!
//! The entrance acts as a rectangular aperture; transport through the
//! guide is treated as a drift of the guide length. Wall reflections
//! are not modelled.

use beamline_core::{
    BuildError, ElementKind, OpticalElement, PrecisionParams, PropagationError, ResizeList,
    Wavefront,
};

use crate::aperture::{Aperture, ApertureShape};
use crate::drift::{Drift, DriftParams};

/// Parameter block for a rectangular waveguide.
#[derive(Clone, Debug, PartialEq)]
pub struct WaveguideParams {
    /// Length, metres.
    pub length: f64,
    /// Horizontal opening, metres.
    pub dx: f64,
    /// Vertical opening, metres.
    pub dy: f64,
    /// Horizontal centre, metres.
    pub x: f64,
    /// Vertical centre, metres.
    pub y: f64,
}

/// A rectangular waveguide.
#[derive(Debug)]
pub struct Waveguide {
    entrance: Aperture,
    transport: Drift,
}

impl Waveguide {
    /// Create a waveguide.
    pub fn new(params: &WaveguideParams) -> Result<Self, BuildError> {
        let entrance = Aperture::with_shape(
            ApertureShape::Rectangular {
                dx: params.dx,
                dy: params.dy,
            },
            false,
            params.x,
            params.y,
        );
        let transport = Drift::new(&DriftParams {
            length: params.length,
        })?;
        Ok(Self {
            entrance,
            transport,
        })
    }

    /// Guide length, metres.
    pub fn length(&self) -> f64 {
        self.transport.length()
    }
}

impl OpticalElement for Waveguide {
    fn name(&self) -> &str {
        "Waveguide"
    }

    fn kind(&self) -> ElementKind {
        ElementKind::Waveguide
    }

    fn propagate(
        &self,
        wfr: &mut Wavefront,
        params: &PrecisionParams,
        resize: &mut ResizeList,
    ) -> Result<(), PropagationError> {
        self.entrance.propagate(wfr, params, resize)?;
        self.transport.propagate(wfr, params, resize)
    }

    fn propagate_test(
        &self,
        input: &Wavefront,
        output: &mut Wavefront,
    ) -> Result<(), PropagationError> {
        let mut mid = input.header_only();
        self.entrance.propagate_test(input, &mut mid)?;
        self.transport.propagate_test(&mid, output)
    }
}
