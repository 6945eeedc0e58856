//! Grid-sampled radiation wavefront.
//!
//! A [`Wavefront`] holds two transverse electric-field components on a
//! rectangular [`Mesh`], stored as interleaved `(re, im)` `f32` pairs in
//! row-major order: sample `(ix, iy)` lives at `2 * (iy * nx + ix)`.
//!
//! The header (photon energy, longitudinal position, radii of curvature
//! and mesh) can be carried without field samples; such header-only
//! wavefronts are what the structural pre-flight check passes around.

use std::fmt;

/// `hc` in eV·m: wavelength in metres is `WAVELENGTH_EV_M / energy_ev`.
pub const WAVELENGTH_EV_M: f64 = 1.239_841_984e-6;

/// Errors from wavefront construction and grid replacement.
#[derive(Clone, Debug, PartialEq)]
pub enum WavefrontError {
    /// Mesh dimensions or extents are not usable.
    InvalidMesh {
        /// What is wrong with the mesh.
        reason: String,
    },
    /// A field buffer does not match the mesh.
    FieldLength {
        /// Expected buffer length (`2 * nx * ny`).
        expected: usize,
        /// Supplied buffer length.
        got: usize,
    },
}

impl fmt::Display for WavefrontError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidMesh { reason } => write!(f, "invalid mesh: {reason}"),
            Self::FieldLength { expected, got } => {
                write!(f, "field buffer has {got} values, mesh needs {expected}")
            }
        }
    }
}

impl std::error::Error for WavefrontError {}

/// Transverse sampling grid, coordinates in metres.
#[derive(Clone, Debug, PartialEq)]
pub struct Mesh {
    /// Horizontal sample count.
    pub nx: usize,
    /// First horizontal coordinate.
    pub x_start: f64,
    /// Last horizontal coordinate.
    pub x_end: f64,
    /// Vertical sample count.
    pub ny: usize,
    /// First vertical coordinate.
    pub y_start: f64,
    /// Last vertical coordinate.
    pub y_end: f64,
}

impl Mesh {
    /// Create a mesh, checking counts and extents.
    pub fn new(
        nx: usize,
        x_start: f64,
        x_end: f64,
        ny: usize,
        y_start: f64,
        y_end: f64,
    ) -> Result<Self, WavefrontError> {
        if nx == 0 || ny == 0 {
            return Err(WavefrontError::InvalidMesh {
                reason: format!("sample counts must be positive, got {nx}x{ny}"),
            });
        }
        for (name, v) in [
            ("x_start", x_start),
            ("x_end", x_end),
            ("y_start", y_start),
            ("y_end", y_end),
        ] {
            if !v.is_finite() {
                return Err(WavefrontError::InvalidMesh {
                    reason: format!("{name} must be finite, got {v}"),
                });
            }
        }
        if x_end < x_start || y_end < y_start {
            return Err(WavefrontError::InvalidMesh {
                reason: "mesh end precedes start".to_string(),
            });
        }
        Ok(Self {
            nx,
            x_start,
            x_end,
            ny,
            y_start,
            y_end,
        })
    }

    /// A mesh centred on the axis with the given full ranges.
    pub fn centered(
        nx: usize,
        x_range: f64,
        ny: usize,
        y_range: f64,
    ) -> Result<Self, WavefrontError> {
        Self::new(
            nx,
            -0.5 * x_range,
            0.5 * x_range,
            ny,
            -0.5 * y_range,
            0.5 * y_range,
        )
    }

    /// Total number of sample points.
    pub fn sample_count(&self) -> usize {
        self.nx * self.ny
    }

    /// Horizontal step; zero for a single column.
    pub fn x_step(&self) -> f64 {
        if self.nx > 1 {
            (self.x_end - self.x_start) / (self.nx - 1) as f64
        } else {
            0.0
        }
    }

    /// Vertical step; zero for a single row.
    pub fn y_step(&self) -> f64 {
        if self.ny > 1 {
            (self.y_end - self.y_start) / (self.ny - 1) as f64
        } else {
            0.0
        }
    }

    /// Horizontal coordinate of column `ix`.
    pub fn x_at(&self, ix: usize) -> f64 {
        self.x_start + ix as f64 * self.x_step()
    }

    /// Vertical coordinate of row `iy`.
    pub fn y_at(&self, iy: usize) -> f64 {
        self.y_start + iy as f64 * self.y_step()
    }

    /// Horizontal centre.
    pub fn x_center(&self) -> f64 {
        0.5 * (self.x_start + self.x_end)
    }

    /// Vertical centre.
    pub fn y_center(&self) -> f64 {
        0.5 * (self.y_start + self.y_end)
    }

    /// Horizontal extent.
    pub fn x_range(&self) -> f64 {
        self.x_end - self.x_start
    }

    /// Vertical extent.
    pub fn y_range(&self) -> f64 {
        self.y_end - self.y_start
    }

    /// The same sample counts with extents stretched about the centre.
    pub fn stretched(&self, fx: f64, fy: f64) -> Self {
        let (xc, yc) = (self.x_center(), self.y_center());
        let (hx, hy) = (0.5 * self.x_range() * fx, 0.5 * self.y_range() * fy);
        Self {
            nx: self.nx,
            x_start: xc - hx,
            x_end: xc + hx,
            ny: self.ny,
            y_start: yc - hy,
            y_end: yc + hy,
        }
    }
}

/// Radiation wavefront mutated in place as it moves down a beamline.
#[derive(Clone, Debug, PartialEq)]
pub struct Wavefront {
    /// Photon energy in eV.
    pub photon_energy: f64,
    /// Longitudinal position in metres.
    pub position: f64,
    /// Horizontal radius of curvature in metres (`INFINITY` for a plane wave).
    pub radius_x: f64,
    /// Vertical radius of curvature in metres.
    pub radius_y: f64,
    mesh: Mesh,
    ex: Vec<f32>,
    ey: Vec<f32>,
}

impl Wavefront {
    /// A zero-field plane wavefront at position 0.
    pub fn new(photon_energy: f64, mesh: Mesh) -> Self {
        let len = 2 * mesh.sample_count();
        Self {
            photon_energy,
            position: 0.0,
            radius_x: f64::INFINITY,
            radius_y: f64::INFINITY,
            mesh,
            ex: vec![0.0; len],
            ey: vec![0.0; len],
        }
    }

    /// A copy of the header without field samples.
    pub fn header_only(&self) -> Self {
        Self {
            photon_energy: self.photon_energy,
            position: self.position,
            radius_x: self.radius_x,
            radius_y: self.radius_y,
            mesh: self.mesh.clone(),
            ex: Vec::new(),
            ey: Vec::new(),
        }
    }

    /// Overwrite this wavefront's header with `other`'s and drop field samples.
    pub fn copy_header_from(&mut self, other: &Wavefront) {
        self.photon_energy = other.photon_energy;
        self.position = other.position;
        self.radius_x = other.radius_x;
        self.radius_y = other.radius_y;
        self.mesh = other.mesh.clone();
        self.ex.clear();
        self.ey.clear();
    }

    /// Whether the wavefront carries no field samples.
    pub fn is_header_only(&self) -> bool {
        self.ex.is_empty()
    }

    /// The sampling grid.
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Wavelength in metres.
    pub fn wavelength(&self) -> f64 {
        WAVELENGTH_EV_M / self.photon_energy
    }

    /// Wave number `2π/λ` in 1/m.
    pub fn wave_number(&self) -> f64 {
        2.0 * std::f64::consts::PI / self.wavelength()
    }

    /// Horizontal component, interleaved `(re, im)`.
    pub fn ex(&self) -> &[f32] {
        &self.ex
    }

    /// Vertical component, interleaved `(re, im)`.
    pub fn ey(&self) -> &[f32] {
        &self.ey
    }

    /// Mutable horizontal component.
    pub fn ex_mut(&mut self) -> &mut [f32] {
        &mut self.ex
    }

    /// Mutable vertical component.
    pub fn ey_mut(&mut self) -> &mut [f32] {
        &mut self.ey
    }

    /// Replace both field components on the current mesh.
    pub fn set_field(&mut self, ex: Vec<f32>, ey: Vec<f32>) -> Result<(), WavefrontError> {
        let expected = 2 * self.mesh.sample_count();
        for got in [ex.len(), ey.len()] {
            if got != expected {
                return Err(WavefrontError::FieldLength { expected, got });
            }
        }
        self.ex = ex;
        self.ey = ey;
        Ok(())
    }

    /// Replace mesh and field together (used by grid resizers).
    pub fn replace_grid(
        &mut self,
        mesh: Mesh,
        ex: Vec<f32>,
        ey: Vec<f32>,
    ) -> Result<(), WavefrontError> {
        let expected = 2 * mesh.sample_count();
        for got in [ex.len(), ey.len()] {
            if got != expected {
                return Err(WavefrontError::FieldLength { expected, got });
            }
        }
        self.mesh = mesh;
        self.ex = ex;
        self.ey = ey;
        Ok(())
    }

    /// Stretch mesh extents about the centre; sample counts are unchanged.
    pub fn stretch_mesh(&mut self, fx: f64, fy: f64) {
        self.mesh = self.mesh.stretched(fx, fy);
    }

    /// Multiply both components by a complex transmission `t(x, y) = (re, im)`.
    pub fn apply_transmission<F>(&mut self, mut t: F)
    where
        F: FnMut(f64, f64) -> (f64, f64),
    {
        if self.is_header_only() {
            return;
        }
        let nx = self.mesh.nx;
        for iy in 0..self.mesh.ny {
            let y = self.mesh.y_at(iy);
            for ix in 0..nx {
                let x = self.mesh.x_at(ix);
                let (tr, ti) = t(x, y);
                let k = 2 * (iy * nx + ix);
                for comp in [&mut self.ex, &mut self.ey] {
                    let (re, im) = (comp[k] as f64, comp[k + 1] as f64);
                    comp[k] = (re * tr - im * ti) as f32;
                    comp[k + 1] = (re * ti + im * tr) as f32;
                }
            }
        }
    }

    /// Multiply all samples by a real factor.
    pub fn scale_amplitude(&mut self, factor: f64) {
        for v in self.ex.iter_mut().chain(self.ey.iter_mut()) {
            *v = (*v as f64 * factor) as f32;
        }
    }

    /// Sum of `|Ex|² + |Ey|²` over all samples.
    pub fn total_intensity(&self) -> f64 {
        self.ex
            .iter()
            .chain(self.ey.iter())
            .map(|&v| (v as f64) * (v as f64))
            .sum()
    }

    /// Intensity at sample `(ix, iy)`, or `None` outside the mesh or for
    /// a header-only wavefront.
    pub fn intensity_at(&self, ix: usize, iy: usize) -> Option<f64> {
        if ix >= self.mesh.nx || iy >= self.mesh.ny || self.is_header_only() {
            return None;
        }
        let k = 2 * (iy * self.mesh.nx + ix);
        let sq = |c: &[f32]| (c[k] as f64).powi(2) + (c[k + 1] as f64).powi(2);
        Some(sq(&self.ex) + sq(&self.ey))
    }

    /// Complex sample of the horizontal component at `(ix, iy)`.
    pub fn ex_at(&self, ix: usize, iy: usize) -> Option<(f32, f32)> {
        if ix >= self.mesh.nx || iy >= self.mesh.ny || self.is_header_only() {
            return None;
        }
        let k = 2 * (iy * self.mesh.nx + ix);
        Some((self.ex[k], self.ex[k + 1]))
    }
}
