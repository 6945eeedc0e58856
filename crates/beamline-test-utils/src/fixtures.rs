//! Reusable element and wavefront fixtures.
//!
//! - [`uniform_wavefront`] / [`gaussian_wavefront`]: 1 keV test beams.
//! - [`RecordingElement`]: counts calls and records the precision
//!   parameters it was handed.
//! - [`FailingElement`]: fails deterministically with a given status.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use beamline_core::{
    ElementKind, Mesh, OpticalElement, PrecisionParams, PropagationError, ResizeList, Wavefront,
};

/// Photon energy of every fixture wavefront, eV.
pub const FIXTURE_ENERGY_EV: f64 = 1000.0;

/// An `n × n` plane wave of unit horizontal amplitude on a centred
/// square mesh of full width `range` metres.
pub fn uniform_wavefront(n: usize, range: f64) -> Wavefront {
    gaussian_like(n, range, |_, _| 1.0)
}

/// An `n × n` Gaussian beam of rms width `sigma` on a centred square
/// mesh of full width `range` metres.
pub fn gaussian_wavefront(n: usize, range: f64, sigma: f64) -> Wavefront {
    gaussian_like(n, range, |x, y| {
        (-(x * x + y * y) / (4.0 * sigma * sigma)).exp()
    })
}

fn gaussian_like(n: usize, range: f64, amplitude: impl Fn(f64, f64) -> f64) -> Wavefront {
    let mesh = Mesh::centered(n, range, n, range).expect("fixture mesh");
    let mut ex = vec![0.0f32; 2 * n * n];
    for iy in 0..n {
        for ix in 0..n {
            ex[2 * (iy * n + ix)] = amplitude(mesh.x_at(ix), mesh.y_at(iy)) as f32;
        }
    }
    let mut wfr = Wavefront::new(FIXTURE_ENERGY_EV, mesh);
    wfr.set_field(ex, vec![0.0; 2 * n * n])
        .expect("fixture field matches mesh");
    wfr
}

/// A header-only 1 keV wavefront on an `n × n` mesh.
pub fn header_wavefront(n: usize, range: f64) -> Wavefront {
    let mesh = Mesh::centered(n, range, n, range).expect("fixture mesh");
    Wavefront::new(FIXTURE_ENERGY_EV, mesh).header_only()
}

/// Records every `propagate()` call and otherwise does nothing except
/// advance the wavefront position by `advance` metres.
///
/// The element kind is configurable, so a `RecordingElement` with
/// [`ElementKind::Drift`] takes part in drift-placement checks.
#[derive(Debug)]
pub struct RecordingElement {
    pub name: String,
    pub kind: ElementKind,
    pub advance: f64,
    calls: AtomicUsize,
    test_calls: AtomicUsize,
    params: Mutex<Vec<PrecisionParams>>,
}

impl RecordingElement {
    pub fn new(name: impl Into<String>, kind: ElementKind) -> Self {
        Self {
            name: name.into(),
            kind,
            advance: 0.0,
            calls: AtomicUsize::new(0),
            test_calls: AtomicUsize::new(0),
            params: Mutex::new(Vec::new()),
        }
    }

    /// A recording element that reports itself as a drift.
    pub fn drift(name: impl Into<String>) -> Self {
        Self::new(name, ElementKind::Drift)
    }

    /// Advance the wavefront by `metres` on each propagation.
    pub fn advancing(mut self, metres: f64) -> Self {
        self.advance = metres;
        self
    }

    /// How many times `propagate()` has been called.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    /// How many times `propagate_test()` has been called.
    pub fn test_calls(&self) -> usize {
        self.test_calls.load(Ordering::Relaxed)
    }

    /// Precision parameters received, in call order.
    pub fn seen_params(&self) -> Vec<PrecisionParams> {
        self.params
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl OpticalElement for RecordingElement {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ElementKind {
        self.kind
    }

    fn propagate(
        &self,
        wfr: &mut Wavefront,
        params: &PrecisionParams,
        _resize: &mut ResizeList,
    ) -> Result<(), PropagationError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.params
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(*params);
        wfr.position += self.advance;
        Ok(())
    }

    fn propagate_test(
        &self,
        input: &Wavefront,
        output: &mut Wavefront,
    ) -> Result<(), PropagationError> {
        self.test_calls.fetch_add(1, Ordering::Relaxed);
        output.copy_header_from(input);
        output.position += self.advance;
        Ok(())
    }
}

/// Fails every `propagate()` call with `status`. With
/// [`failing_test`](FailingElement::failing_test) set, `propagate_test()`
/// fails too.
#[derive(Debug)]
pub struct FailingElement {
    pub name: String,
    pub status: i32,
    pub failing_test: bool,
    calls: AtomicUsize,
}

impl FailingElement {
    pub fn new(name: impl Into<String>, status: i32) -> Self {
        Self {
            name: name.into(),
            status,
            failing_test: false,
            calls: AtomicUsize::new(0),
        }
    }

    /// Also fail the structural pre-flight check.
    pub fn failing_test(mut self) -> Self {
        self.failing_test = true;
        self
    }

    /// How many times `propagate()` has been called.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    fn error(&self) -> PropagationError {
        PropagationError::ElementFailed {
            element: self.name.clone(),
            status: self.status,
            reason: "deliberate failure".to_string(),
        }
    }
}

impl OpticalElement for FailingElement {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ElementKind {
        ElementKind::Transmission
    }

    fn propagate(
        &self,
        _wfr: &mut Wavefront,
        _params: &PrecisionParams,
        _resize: &mut ResizeList,
    ) -> Result<(), PropagationError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        Err(self.error())
    }

    fn propagate_test(
        &self,
        input: &Wavefront,
        output: &mut Wavefront,
    ) -> Result<(), PropagationError> {
        if self.failing_test {
            return Err(self.error());
        }
        output.copy_header_from(input);
        Ok(())
    }
}
