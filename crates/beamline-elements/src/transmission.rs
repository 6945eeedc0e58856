//! Generic thin transmission element.
//!
//! The element carries its own `nx × ny` table of interleaved
//! `(amplitude transmission, optical path difference)` pairs covering a
//! rectangle centred at `(x, y)`. Each wavefront sample takes the nearest
//! table entry; outside the table `ext_transmission` decides between
//! opaque (0) and transparent (1).

use beamline_core::{
    BuildError, ElementKind, OpticalElement, PrecisionParams, PropagationError, ResizeList,
    Wavefront,
};

use crate::thin::check_energy;

/// Parameter block for a thin transmission.
#[derive(Clone, Debug, PartialEq)]
pub struct TransmissionParams {
    /// Horizontal table size.
    pub nx: usize,
    /// Vertical table size.
    pub ny: usize,
    /// Horizontal extent, metres.
    pub x_range: f64,
    /// Vertical extent, metres.
    pub y_range: f64,
    /// Horizontal centre, metres.
    pub x: f64,
    /// Vertical centre, metres.
    pub y: f64,
    /// Interleaved `(amplitude, opd)` pairs, row-major, `2·nx·ny` values.
    pub data: Vec<f64>,
    /// Treatment outside the table: 0 opaque, 1 transparent.
    pub ext_transmission: u8,
    /// Estimated horizontal focal length, metres (informational).
    pub fx: f64,
    /// Estimated vertical focal length, metres (informational).
    pub fy: f64,
}

/// A tabulated thin transmission.
#[derive(Debug)]
pub struct Transmission {
    params: TransmissionParams,
}

impl Transmission {
    /// Create a transmission element, checking the table shape.
    pub fn new(params: &TransmissionParams) -> Result<Self, BuildError> {
        if params.nx == 0 || params.ny == 0 {
            return Err(BuildError::unknown(format!(
                "transmission table must be non-empty, got {}x{}",
                params.nx, params.ny
            )));
        }
        let expected = params
            .nx
            .checked_mul(params.ny)
            .and_then(|n| n.checked_mul(2))
            .ok_or_else(|| {
                BuildError::unknown(format!(
                    "transmission table of {}x{} is too large",
                    params.nx, params.ny
                ))
            })?;
        if params.data.len() != expected {
            return Err(BuildError::unknown(format!(
                "transmission table needs {expected} values, got {}",
                params.data.len()
            )));
        }
        if params.ext_transmission > 1 {
            return Err(BuildError::unknown(format!(
                "ext_transmission must be 0 or 1, got {}",
                params.ext_transmission
            )));
        }
        Ok(Self {
            params: params.clone(),
        })
    }

    /// Table entry `(amplitude, opd)` covering `(x, y)`, or `None` outside.
    pub fn lookup(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let p = &self.params;
        let index = |v: f64, centre: f64, range: f64, n: usize| -> Option<usize> {
            let start = centre - 0.5 * range;
            if n == 1 {
                return ((v - centre).abs() <= 0.5 * range).then_some(0);
            }
            let step = range / (n - 1) as f64;
            let f = ((v - start) / step).round();
            (f >= 0.0 && f <= (n - 1) as f64).then_some(f as usize)
        };
        let ix = index(x, p.x, p.x_range, p.nx)?;
        let iy = index(y, p.y, p.y_range, p.ny)?;
        let k = 2 * (iy * p.nx + ix);
        Some((p.data[k], p.data[k + 1]))
    }
}

impl OpticalElement for Transmission {
    fn name(&self) -> &str {
        "Transmission"
    }

    fn kind(&self) -> ElementKind {
        ElementKind::Transmission
    }

    fn propagate(
        &self,
        wfr: &mut Wavefront,
        _params: &PrecisionParams,
        _resize: &mut ResizeList,
    ) -> Result<(), PropagationError> {
        check_energy(self.name(), wfr)?;
        let k = wfr.wave_number();
        let outside = if self.params.ext_transmission == 1 {
            (1.0, 0.0)
        } else {
            (0.0, 0.0)
        };
        wfr.apply_transmission(|x, y| match self.lookup(x, y) {
            Some((amp, opd)) => {
                let phi = k * opd;
                (amp * phi.cos(), amp * phi.sin())
            }
            None => outside,
        });
        Ok(())
    }

    fn propagate_test(
        &self,
        input: &Wavefront,
        output: &mut Wavefront,
    ) -> Result<(), PropagationError> {
        check_energy(self.name(), input)?;
        output.copy_header_from(input);
        Ok(())
    }
}
