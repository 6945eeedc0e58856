//! Integration tests for the structural check and guided propagation.
//!
//! Chains are assembled from mock elements so calls can be counted;
//! the last section runs a real aperture-lens-drift beamline.

use std::sync::Arc;

use beamline_container::{CompositeOpticalElement, ContainerConfig, ContainerDesc, ElementDesc};
use beamline_core::{
    ElementHandle, ElementKind, OpticsStatus, PropagationError,
    PropagationInstruction, PropagationMethod, UnderSampling,
};
use beamline_elements::{ApertureParams, DriftParams, ThinLensParams};
use beamline_test_utils::fixtures::{
    gaussian_wavefront, header_wavefront, uniform_wavefront, FailingElement, RecordingElement,
};
use beamline_test_utils::MockResizer;
use proptest::prelude::*;

fn recorders(kinds: &[ElementKind]) -> Vec<Arc<RecordingElement>> {
    kinds
        .iter()
        .enumerate()
        .map(|(i, &k)| Arc::new(RecordingElement::new(format!("e{i}"), k).advancing(1.0)))
        .collect()
}

fn handles(elements: &[Arc<RecordingElement>]) -> Vec<ElementHandle> {
    elements
        .iter()
        .map(|e| Arc::clone(e) as ElementHandle)
        .collect()
}

fn assemble(
    elements: Vec<ElementHandle>,
    instructions: Vec<PropagationInstruction>,
    resizer: &Arc<MockResizer>,
) -> CompositeOpticalElement {
    CompositeOpticalElement::builder()
        .resizer(resizer.clone())
        .build_parts("test", elements, instructions)
        .unwrap()
}

fn scaled(index: usize, value: f64) -> PropagationInstruction {
    let mut row = PropagationInstruction::default().to_row();
    row[index] = value;
    PropagationInstruction::from_row(&row).unwrap()
}

// ── Drift placement ────────────────────────────────────────────────

proptest! {
    #[test]
    fn two_or_more_drifts_fail(
        drift_flags in proptest::collection::vec(any::<bool>(), 2..10),
    ) {
        prop_assume!(drift_flags.iter().filter(|&&d| d).count() >= 2);
        let kinds: Vec<_> = drift_flags
            .iter()
            .map(|&d| if d { ElementKind::Drift } else { ElementKind::ThinLens })
            .collect();
        let elements = recorders(&kinds);
        let c = assemble(handles(&elements), vec![], &Arc::new(MockResizer::new()));
        let input = header_wavefront(4, 1e-3);
        let mut out = input.clone();
        let err = c.propagation_test(&input, &mut out).unwrap_err();
        prop_assert_eq!(err.code(), OpticsStatus::StructuralConstraintViolation as i32);
        let is_placement = matches!(
            err,
            PropagationError::DriftPlacement { drift_count, .. } if drift_count >= 2
        );
        prop_assert!(is_placement);
        prop_assert!(elements.iter().all(|e| e.test_calls() == 0));
    }
}

#[test]
fn lone_drift_moved_last_passes() {
    let resizer = Arc::new(MockResizer::new());
    let input = header_wavefront(4, 1e-3);

    let bad = recorders(&[ElementKind::Drift, ElementKind::ThinLens, ElementKind::Aperture]);
    let c = assemble(handles(&bad), vec![], &resizer);
    let mut out = input.clone();
    assert!(matches!(
        c.propagation_test(&input, &mut out),
        Err(PropagationError::DriftPlacement {
            drift_count: 1,
            first_drift: 0,
            element_count: 3
        })
    ));

    let good = recorders(&[ElementKind::ThinLens, ElementKind::Aperture, ElementKind::Drift]);
    let c = assemble(handles(&good), vec![], &resizer);
    let mut out = input.clone();
    c.propagation_test(&input, &mut out).unwrap();
    assert!(good.iter().all(|e| e.test_calls() == 1));
    assert_eq!(out.position, 3.0);
    assert!(out.is_header_only());
}

#[test]
fn no_drift_passes() {
    let elements = recorders(&[ElementKind::ThinLens, ElementKind::Grating]);
    let c = assemble(handles(&elements), vec![], &Arc::new(MockResizer::new()));
    let input = header_wavefront(4, 1e-3);
    let mut out = input.clone();
    assert!(c.propagation_test(&input, &mut out).is_ok());
}

#[test]
fn element_check_failure_is_returned_unchanged() {
    let elements: Vec<ElementHandle> = vec![
        Arc::new(RecordingElement::new("ok", ElementKind::ThinLens)) as ElementHandle,
        Arc::new(FailingElement::new("bad", -42).failing_test()) as ElementHandle,
    ];
    let c = assemble(elements, vec![], &Arc::new(MockResizer::new()));
    let input = header_wavefront(4, 1e-3);
    let mut out = input.clone();
    assert_eq!(c.propagation_test(&input, &mut out).unwrap_err().code(), -42);
}

// ── Tolerance gate ─────────────────────────────────────────────────

proptest! {
    #[test]
    fn unit_scale_factors_never_resize(
        resize_before in any::<bool>(),
        resize_after in any::<bool>(),
        precision in 0.1f64..10.0,
        n in 1usize..6,
    ) {
        let instruction = PropagationInstruction {
            resize_before,
            resize_after,
            precision,
            ..Default::default()
        };
        let resizer = Arc::new(MockResizer::new());
        let elements = recorders(&vec![ElementKind::ThinLens; n]);
        let c = assemble(handles(&elements), vec![instruction; n + 1], &resizer);
        let mut w = uniform_wavefront(4, 1e-3);
        c.propagate_guided(&mut w).unwrap();
        prop_assert_eq!(resizer.call_count(), 0);
        prop_assert!(elements.iter().all(|e| e.calls() == 1));
    }
}

#[test]
fn each_scale_factor_is_gated() {
    for index in 5..=8 {
        let resizer = Arc::new(MockResizer::new());
        let elements = recorders(&[ElementKind::ThinLens, ElementKind::Aperture]);
        let c = assemble(
            handles(&elements),
            vec![scaled(index, 1.00005), scaled(index, 1.0002)],
            &resizer,
        );
        let mut w = uniform_wavefront(4, 1e-3);
        c.propagate_guided(&mut w).unwrap();
        let calls = resizer.calls();
        assert_eq!(calls.len(), 1, "field {index}");
        assert_eq!(calls[0].instruction.to_row()[index], 1.0002);
        // resized in front of element 1, after element 0 advanced the beam
        assert_eq!(calls[0].position, 1.0);
    }
}

#[test]
fn tolerance_follows_config() {
    let resizer = Arc::new(MockResizer::new());
    let config = ContainerConfig {
        resize_tolerance: 1e-2,
        ..Default::default()
    };
    let elements = recorders(&[ElementKind::ThinLens]);
    let c = CompositeOpticalElement::builder()
        .config(config)
        .resizer(resizer.clone())
        .build_parts("loose", handles(&elements), vec![scaled(5, 1.005), scaled(6, 1.05)])
        .unwrap();
    let mut w = uniform_wavefront(4, 1e-3);
    c.propagate_guided(&mut w).unwrap();
    let calls = resizer.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].instruction.scale_x_after, 1.05);
}

// ── Failures ───────────────────────────────────────────────────────

proptest! {
    #[test]
    fn resize_status_is_verbatim_and_stops_the_chain(
        status in any::<i32>().prop_filter("non-zero", |s| *s != 0),
    ) {
        let resizer = Arc::new(MockResizer::new().fail_on_call(0, status));
        let elements =
            recorders(&[ElementKind::ThinLens, ElementKind::Aperture, ElementKind::Grating]);
        let c = assemble(
            handles(&elements),
            vec![PropagationInstruction::default(), scaled(7, 2.0)],
            &resizer,
        );
        let mut w = uniform_wavefront(4, 1e-3);
        let err = c.propagate_guided(&mut w).unwrap_err();
        prop_assert_eq!(err.code(), status);
        let at_junction_one = matches!(err, PropagationError::ResizeFailed { position: 1, .. });
        prop_assert!(at_junction_one);
        prop_assert_eq!(elements[0].calls(), 1);
        prop_assert_eq!(elements[1].calls(), 0);
        prop_assert_eq!(elements[2].calls(), 0);
    }
}

#[test]
fn element_failure_stops_the_chain() {
    let first = Arc::new(RecordingElement::new("first", ElementKind::ThinLens));
    let failing = Arc::new(FailingElement::new("bad", 99));
    let last = Arc::new(RecordingElement::new("last", ElementKind::Drift));
    let resizer = Arc::new(MockResizer::new());
    let c = assemble(
        vec![
            first.clone() as ElementHandle,
            failing.clone() as ElementHandle,
            last.clone() as ElementHandle,
        ],
        vec![PropagationInstruction::default(); 4],
        &resizer,
    );
    let mut w = uniform_wavefront(4, 1e-3);
    let err = c.propagate_guided(&mut w).unwrap_err();
    assert_eq!(err.code(), 99);
    assert_eq!((first.calls(), failing.calls(), last.calls()), (1, 1, 0));
}

// ── Precision parameters ───────────────────────────────────────────

#[test]
fn instructions_drive_precision_params() {
    let resizer = Arc::new(MockResizer::new());
    let config = ContainerConfig {
        under_sampling_threshold: 0.25,
        ..Default::default()
    };
    let auto = PropagationInstruction {
        resize_after: true,
        precision: 3.0,
        under_sampling: UnderSampling::Allow,
        ..Default::default()
    };
    let elements = recorders(&[ElementKind::ThinLens, ElementKind::Aperture]);
    let c = CompositeOpticalElement::builder()
        .config(config)
        .resizer(resizer.clone())
        .build_parts("bl", handles(&elements), vec![auto])
        .unwrap();
    let mut w = uniform_wavefront(4, 1e-3);
    c.propagate_guided(&mut w).unwrap();

    let first = elements[0].seen_params()[0];
    assert_eq!(first.method, PropagationMethod::AutoResize);
    assert!(first.resize_after && !first.resize_before);
    assert_eq!(first.precision, 3.0);
    assert_eq!(first.under_sampling, UnderSampling::Allow);
    assert_eq!(first.under_sampling_threshold, 0.25);

    let second = elements[1].seen_params()[0];
    assert_eq!(second.method, PropagationMethod::Plain);
    assert_eq!(second.precision, 1.0);
    assert_eq!(second.under_sampling_threshold, 0.25);
}

// ── Trailing junction ──────────────────────────────────────────────

#[test]
fn trailing_instruction_resizes_after_the_chain() {
    let resizer = Arc::new(MockResizer::new());
    let elements = recorders(&[ElementKind::ThinLens, ElementKind::Drift]);
    let c = assemble(
        handles(&elements),
        vec![
            PropagationInstruction::default(),
            PropagationInstruction::default(),
            scaled(8, 0.5),
        ],
        &resizer,
    );
    let mut w = uniform_wavefront(4, 1e-3);
    c.propagate_guided(&mut w).unwrap();
    let calls = resizer.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].position, 2.0);
}

#[test]
fn missing_trailing_row_equals_default_row() {
    let rows = vec![vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0]];
    let base = ContainerDesc::new()
        .push(
            "lens",
            ElementDesc::Lens(ThinLensParams {
                fx: 2.0,
                fy: 2.0,
                x: 0.0,
                y: 0.0,
            }),
        )
        .push("drift", ElementDesc::Drift(DriftParams { length: 1.0 }));
    let without = base.clone().with_properties(rows.clone());
    let mut with_rows = rows;
    with_rows.push(PropagationInstruction::default().to_row().to_vec());
    let with = base.with_properties(with_rows);

    let run = |desc: &ContainerDesc| {
        let resizer = Arc::new(MockResizer::new());
        let c = CompositeOpticalElement::builder()
            .resizer(resizer.clone())
            .build_desc(desc)
            .unwrap();
        let mut w = gaussian_wavefront(8, 1e-3, 0.2e-3);
        c.propagate_guided(&mut w).unwrap();
        (c.instructions().to_vec(), w, resizer.call_count())
    };
    let (instr_a, wfr_a, calls_a) = run(&without);
    let (instr_b, wfr_b, calls_b) = run(&with);
    assert_eq!(instr_a, instr_b);
    assert_eq!(wfr_a, wfr_b);
    assert_eq!((calls_a, calls_b), (0, 0));
}

// ── Sharing ────────────────────────────────────────────────────────

#[test]
fn shared_leaf_serves_two_composites() {
    let lens = Arc::new(RecordingElement::new("shared", ElementKind::ThinLens));
    let resizer = Arc::new(MockResizer::new());
    let a = assemble(vec![lens.clone() as ElementHandle], vec![], &resizer);
    let b = assemble(vec![lens.clone() as ElementHandle], vec![], &resizer);
    let mut w = uniform_wavefront(4, 1e-3);
    a.propagate_guided(&mut w).unwrap();
    b.propagate_guided(&mut w).unwrap();
    assert_eq!(lens.calls(), 2);
    drop(a);
    drop(b);
    assert_eq!(Arc::strong_count(&lens), 1);
}

#[test]
fn too_many_instructions_are_rejected() {
    let elements = recorders(&[ElementKind::ThinLens]);
    let result = CompositeOpticalElement::builder().build_parts(
        "bl",
        handles(&elements),
        vec![PropagationInstruction::default(); 3],
    );
    assert!(result.is_err());
}

// ── End to end ─────────────────────────────────────────────────────

#[test]
fn focusing_beamline_with_linear_resizer() {
    let desc = ContainerDesc::new()
        .push(
            "aperture",
            ElementDesc::Aperture(ApertureParams {
                shape: 'c',
                kind: 'a',
                dx: 0.8e-3,
                dy: 0.0,
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
        ]);
    let c = CompositeOpticalElement::from_desc(&desc).unwrap();

    let mut w = gaussian_wavefront(16, 1e-3, 0.2e-3);
    let mut predicted = w.header_only();
    c.propagation_test(&w, &mut predicted).unwrap();
    c.propagate_guided(&mut w).unwrap();

    assert_eq!(w.mesh().nx, 32);
    assert_eq!(w.position, 5.0);
    assert_eq!(predicted.position, 5.0);
    // converging beam: R = -10 after the lens, -5 after five metres
    assert!((w.radius_x + 5.0).abs() < 1e-9);
    assert!((w.mesh().x_range() - 0.5e-3).abs() < 1e-12);
    assert!(w.total_intensity().is_finite() && w.total_intensity() > 0.0);
}

proptest! {
    #[test]
    fn oversized_scale_factors_fail_with_status(
        index in 5usize..=8,
        factor in 1e8f64..1e300,
    ) {
        let mut row = PropagationInstruction::default().to_row().to_vec();
        row[index] = factor;
        let desc = ContainerDesc::new()
            .push(
                "lens",
                ElementDesc::Lens(ThinLensParams { fx: 1.0, fy: 1.0, x: 0.0, y: 0.0 }),
            )
            .with_properties(vec![row]);
        let c = CompositeOpticalElement::from_desc(&desc).unwrap();

        let mut w = uniform_wavefront(4, 2e-3);
        let err = c.propagate_guided(&mut w).unwrap_err();
        let is_resize_failure = matches!(
            err,
            PropagationError::ResizeFailed { position: 0, status, .. }
                if status == OpticsStatus::ResizeFailed as i32
        );
        prop_assert!(is_resize_failure);
        prop_assert_eq!(w.mesh().nx, 4);
    }
}
