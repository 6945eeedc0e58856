//! Reference grid resizer.
//!
//! [`LinearResizer`] rescales the range and resolution of each axis
//! about the mesh centre and resamples both field components by
//! bilinear interpolation. Points outside the old mesh are zero.
//! Range factors come from `scale_*_before`, resolution factors from
//! `scale_*_after`. Grids beyond [`LinearResizer::MAX_SAMPLES`] points
//! are refused with a status instead of being allocated.

use beamline_core::{
    GridResizer, Mesh, OpticsStatus, PropagationInstruction, ResizeError, Wavefront,
};

/// Slack, in old-grid steps, for points landing just outside the mesh.
const EDGE_SLACK: f64 = 1e-9;

/// Bilinear-interpolation [`GridResizer`].
#[derive(Clone, Copy, Debug, Default)]
pub struct LinearResizer;

impl LinearResizer {
    /// Largest resampled grid, in points, on one axis or in total.
    pub const MAX_SAMPLES: usize = 1 << 26;
}

/// One axis of the old mesh.
struct Axis {
    start: f64,
    step: f64,
    n: usize,
}

impl Axis {
    /// Bracketing indices and the weight of the upper one.
    fn locate(&self, v: f64) -> Option<(usize, usize, f64)> {
        if self.n == 1 || self.step == 0.0 {
            return Some((0, 0, 0.0));
        }
        let last = (self.n - 1) as f64;
        let f = (v - self.start) / self.step;
        if !(-EDGE_SLACK..=last + EDGE_SLACK).contains(&f) {
            return None;
        }
        let f = f.clamp(0.0, last);
        let i0 = (f.floor() as usize).min(self.n - 2);
        Some((i0, i0 + 1, f - i0 as f64))
    }
}

fn failure(reason: String) -> ResizeError {
    ResizeError::new(OpticsStatus::ResizeFailed as i32, reason)
}

fn new_count(
    axis: &str,
    n: usize,
    range_factor: f64,
    resolution_factor: f64,
) -> Result<usize, ResizeError> {
    let count = (n as f64 * range_factor * resolution_factor).round().max(1.0);
    if count > LinearResizer::MAX_SAMPLES as f64 {
        return Err(failure(format!(
            "{axis} would need {count} points, limit is {}",
            LinearResizer::MAX_SAMPLES
        )));
    }
    Ok(count as usize)
}

impl GridResizer for LinearResizer {
    fn resize(
        &self,
        wfr: &mut Wavefront,
        instruction: &PropagationInstruction,
    ) -> Result<(), ResizeError> {
        for (name, v) in [
            ("scale_x_before", instruction.scale_x_before),
            ("scale_x_after", instruction.scale_x_after),
            ("scale_z_before", instruction.scale_z_before),
            ("scale_z_after", instruction.scale_z_after),
        ] {
            if !v.is_finite() || v <= 0.0 {
                return Err(failure(format!("{name} must be finite and positive, got {v}")));
            }
        }
        if wfr.is_header_only() {
            return Err(failure("cannot resample a header-only wavefront".to_string()));
        }

        let old = wfr.mesh().clone();
        let nx = new_count("x", old.nx, instruction.scale_x_before, instruction.scale_x_after)?;
        let ny = new_count("z", old.ny, instruction.scale_z_before, instruction.scale_z_after)?;
        if nx.checked_mul(ny).map_or(true, |total| total > Self::MAX_SAMPLES) {
            return Err(failure(format!(
                "{nx}x{ny} grid exceeds {} points",
                Self::MAX_SAMPLES
            )));
        }
        let x_range = old.x_range() * instruction.scale_x_before;
        let y_range = old.y_range() * instruction.scale_z_before;
        let (xc, yc) = (old.x_center(), old.y_center());
        let mesh = Mesh::new(
            nx,
            xc - 0.5 * x_range,
            xc + 0.5 * x_range,
            ny,
            yc - 0.5 * y_range,
            yc + 0.5 * y_range,
        )
        .map_err(|e| failure(e.to_string()))?;

        let ax = Axis {
            start: old.x_start,
            step: old.x_step(),
            n: old.nx,
        };
        let ay = Axis {
            start: old.y_start,
            step: old.y_step(),
            n: old.ny,
        };
        let resample = |src: &[f32]| -> Vec<f32> {
            let mut out = vec![0.0f32; 2 * nx * ny];
            for iy in 0..ny {
                let Some((y0, y1, wy)) = ay.locate(mesh.y_at(iy)) else {
                    continue;
                };
                for ix in 0..nx {
                    let Some((x0, x1, wx)) = ax.locate(mesh.x_at(ix)) else {
                        continue;
                    };
                    let at = |i: usize, j: usize, c: usize| src[2 * (j * old.nx + i) + c] as f64;
                    for c in 0..2 {
                        let v = (1.0 - wx) * (1.0 - wy) * at(x0, y0, c)
                            + wx * (1.0 - wy) * at(x1, y0, c)
                            + (1.0 - wx) * wy * at(x0, y1, c)
                            + wx * wy * at(x1, y1, c);
                        out[2 * (iy * nx + ix) + c] = v as f32;
                    }
                }
            }
            out
        };
        let ex = resample(wfr.ex());
        let ey = resample(wfr.ey());
        wfr.replace_grid(mesh, ex, ey)
            .map_err(|e| failure(e.to_string()))
    }
}
