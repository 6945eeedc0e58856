//! Physical invariants of the leaf elements.

use beamline_core::{OpticalElement, PrecisionParams, ResizeList, Wavefront};
use beamline_elements::{Aperture, ApertureParams, Drift, DriftParams, ThinLens, ThinLensParams};
use beamline_test_utils::fixtures::gaussian_wavefront;
use proptest::prelude::*;

fn run(element: &dyn OpticalElement, wfr: &mut Wavefront) {
    element
        .propagate(wfr, &PrecisionParams::plain(0.5), &mut ResizeList::new())
        .unwrap();
}

fn power(wfr: &Wavefront) -> f64 {
    wfr.total_intensity() * wfr.mesh().x_step() * wfr.mesh().y_step()
}

fn close(a: f64, b: f64, rel: f64) -> bool {
    (a - b).abs() <= rel * a.abs().max(b.abs())
}

proptest! {
    #[test]
    fn aperture_and_obstacle_split_the_beam(
        shape in prop_oneof![Just('r'), Just('c')],
        dx in 0.05e-3f64..2e-3,
        dy in 0.05e-3f64..2e-3,
        x in -0.3e-3f64..0.3e-3,
        y in -0.3e-3f64..0.3e-3,
    ) {
        let source = gaussian_wavefront(24, 1e-3, 0.2e-3);
        let params = |kind| ApertureParams { shape, kind, dx, dy, x, y };

        let mut passed = source.clone();
        run(&Aperture::new(&params('a')).unwrap(), &mut passed);
        let mut blocked = source.clone();
        run(&Aperture::new(&params('o')).unwrap(), &mut blocked);

        let sum = passed.total_intensity() + blocked.total_intensity();
        prop_assert!(close(sum, source.total_intensity(), 1e-9));
    }

    #[test]
    fn drift_conserves_power(radius in 1.0f64..100.0, length in 0.1f64..10.0) {
        let mut wfr = gaussian_wavefront(32, 1e-3, 0.15e-3);
        wfr.radius_x = radius;
        wfr.radius_y = 2.0 * radius;
        let before = power(&wfr);

        run(&Drift::new(&DriftParams { length }).unwrap(), &mut wfr);

        prop_assert!(close(power(&wfr), before, 1e-5));
        prop_assert!(close(wfr.radius_x, radius + length, 1e-12));
        prop_assert_eq!(wfr.position, length);
    }

    #[test]
    fn lens_only_changes_phase(fx in 0.5f64..100.0, fy in 0.5f64..100.0) {
        let mut wfr = gaussian_wavefront(16, 1e-3, 0.2e-3);
        let before = wfr.total_intensity();

        run(&ThinLens::new(&ThinLensParams { fx, fy, x: 0.0, y: 0.0 }).unwrap(), &mut wfr);

        prop_assert!(close(wfr.total_intensity(), before, 1e-5));
        prop_assert!(close(wfr.radius_x, -fx, 1e-12));
        prop_assert!(close(wfr.radius_y, -fy, 1e-12));
    }
}

#[test]
fn plane_wave_drift_keeps_the_mesh() {
    let mut wfr = gaussian_wavefront(8, 1e-3, 0.2e-3);
    let mesh = wfr.mesh().clone();
    run(&Drift::new(&DriftParams { length: 3.0 }).unwrap(), &mut wfr);
    assert_eq!(wfr.mesh(), &mesh);
    assert!(wfr.radius_x.is_infinite());
}
