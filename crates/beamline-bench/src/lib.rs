//! Benchmark profiles and utilities for beamline propagation.
//!
//! Provides pre-built beamline descriptions for benchmarking:
//!
//! - [`focusing_profile`]: slit, lens and drift with a resolution
//!   increase in front of the lens
//! - [`kb_profile`]: Kirkpatrick-Baez style pair of crossed ellipsoidal
//!   mirrors inside a nested container
//! - [`probe_wavefront`]: Gaussian test beam at 1 keV

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use beamline_container::{ContainerDesc, ElementDesc};
use beamline_core::{Mesh, Wavefront};
use beamline_elements::{
    ApertureParams, DriftParams, MirrorEllipsoidParams, MirrorGeometry, ThinLensParams,
};

/// Slit, lens, drift. The junction in front of the lens doubles the
/// resolution on both axes, so every run exercises the resizer.
pub fn focusing_profile() -> ContainerDesc {
    ContainerDesc::new()
        .push(
            "aperture",
            ElementDesc::Aperture(ApertureParams {
                shape: 'r',
                kind: 'a',
                dx: 0.8e-3,
                dy: 0.8e-3,
                x: 0.0,
                y: 0.0,
            }),
        )
        .push(
            "lens",
            ElementDesc::Lens(ThinLensParams {
                fx: 10.0,
                fy: 10.0,
                x: 0.0,
                y: 0.0,
            }),
        )
        .push("drift", ElementDesc::Drift(DriftParams { length: 5.0 }))
        .with_properties(vec![
            vec![],
            vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 2.0, 1.0, 2.0],
        ])
}

fn kb_mirror(deflection: char, p: f64, q: f64) -> ElementDesc {
    ElementDesc::MirrorEllipsoid(MirrorEllipsoidParams {
        p,
        q,
        geometry: MirrorGeometry {
            ap_shape: 'r',
            deflection,
            grazing_angle: 3e-3,
            size_tangential: 0.3,
            size_sagittal: 0.02,
            reflectivity: 0.95,
            x: 0.0,
            y: 0.0,
        },
    })
}

/// Crossed ellipsoidal mirrors nested in their own container, followed
/// by a drift short of the focus.
pub fn kb_profile() -> ContainerDesc {
    let mirrors = ContainerDesc::new()
        .push("mirror: ellipsoid", kb_mirror('v', 30.0, 1.0))
        .push("mirror: ellipsoid", kb_mirror('h', 30.5, 0.5));
    ContainerDesc::new()
        .push("container", ElementDesc::Container(Box::new(mirrors)))
        .push("drift", ElementDesc::Drift(DriftParams { length: 0.2 }))
}

/// An `n × n` Gaussian beam at 1 keV on a 1 mm mesh.
pub fn probe_wavefront(n: usize) -> Wavefront {
    let mesh = match Mesh::centered(n.max(1), 1e-3, n.max(1), 1e-3) {
        Ok(mesh) => mesh,
        Err(e) => panic!("probe mesh: {e}"),
    };
    let sigma = 0.2e-3;
    let mut ex = vec![0.0f32; 2 * mesh.sample_count()];
    for iy in 0..mesh.ny {
        for ix in 0..mesh.nx {
            let (x, y) = (mesh.x_at(ix), mesh.y_at(iy));
            ex[2 * (iy * mesh.nx + ix)] = (-(x * x + y * y) / (4.0 * sigma * sigma)).exp() as f32;
        }
    }
    let ey = vec![0.0f32; ex.len()];
    let mut wfr = Wavefront::new(1000.0, mesh);
    if let Err(e) = wfr.set_field(ex, ey) {
        panic!("probe field: {e}");
    }
    wfr
}
