//! Shared thin-element helpers: quadratic lens phase, radius updates
//! and parameter checks.

use beamline_core::{PropagationError, Wavefront};

/// Complex transmission of a thin lens centred at `(x0, y0)`.
///
/// Phase `-k/2 · ((x-x0)²/fx + (y-y0)²/fy)`; an infinite focal length
/// contributes no phase on that axis.
pub fn lens_phase(k: f64, fx: f64, fy: f64, x0: f64, y0: f64) -> impl Fn(f64, f64) -> (f64, f64) {
    let (cx, cy) = (inverse(fx), inverse(fy));
    move |x, y| {
        let (dx, dy) = (x - x0, y - y0);
        let phi = -0.5 * k * (dx * dx * cx + dy * dy * cy);
        (phi.cos(), phi.sin())
    }
}

/// Radius of curvature after a thin focusing element: `1/R' = 1/R - 1/f`.
pub fn radius_after_lens(radius: f64, focal: f64) -> f64 {
    let curvature = inverse(radius) - inverse(focal);
    if curvature == 0.0 {
        f64::INFINITY
    } else {
        1.0 / curvature
    }
}

fn inverse(v: f64) -> f64 {
    if v.is_infinite() {
        0.0
    } else {
        1.0 / v
    }
}

/// Reject NaN and zero focal lengths. Infinite means "no focusing".
pub fn check_focal(element: &str, axis: &str, focal: f64) -> Result<(), PropagationError> {
    if focal.is_nan() || focal == 0.0 {
        return Err(PropagationError::InvalidParameters {
            element: element.to_string(),
            reason: format!("{axis} focal length must be non-zero, got {focal}"),
        });
    }
    Ok(())
}

/// Reject non-finite or negative sizes.
pub fn check_size(element: &str, what: &str, v: f64) -> Result<(), PropagationError> {
    if !v.is_finite() || v < 0.0 {
        return Err(PropagationError::InvalidParameters {
            element: element.to_string(),
            reason: format!("{what} must be finite and non-negative, got {v}"),
        });
    }
    Ok(())
}

/// Reject a wavefront whose photon energy does not define a wavelength.
pub fn check_energy(element: &str, wfr: &Wavefront) -> Result<(), PropagationError> {
    if !wfr.photon_energy.is_finite() || wfr.photon_energy <= 0.0 {
        return Err(PropagationError::InvalidParameters {
            element: element.to_string(),
            reason: format!(
                "photon energy must be finite and positive, got {}",
                wfr.photon_energy
            ),
        });
    }
    Ok(())
}
