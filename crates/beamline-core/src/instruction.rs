//! Per-junction propagation and resizing instructions.
//!
//! A [`PropagationInstruction`] tells the composite how to treat the
//! wavefront grid immediately before an element (or, for the optional
//! trailing instruction, after the last one). Instructions arrive as
//! 12-value numeric rows; [`PropagationInstruction::from_row`] decodes
//! them with the fixed index layout below.
//!
//! | Index | Field |
//! |-------|-------|
//! | 0 | `resize_before` (non-zero = on) |
//! | 1 | `resize_after` (non-zero = on) |
//! | 2 | `precision` |
//! | 3 | `under_sampling` (non-zero = allow) |
//! | 4 | `other_side_fft` (non-zero = on) |
//! | 5 | `scale_x_before` |
//! | 6 | `scale_x_after` |
//! | 7 | `scale_z_before` |
//! | 8 | `scale_z_after` |
//! | 9 | `shift_type` (truncated, wrapped to a byte) |
//! | 10 | `center_shift_x` |
//! | 11 | `center_shift_z` |

use smallvec::SmallVec;

use crate::error::BuildError;

/// Number of values in a property row.
pub const INSTRUCTION_FIELDS: usize = 12;

/// Under-sampling treatment allowed during propagation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UnderSampling {
    /// Always resample to full sampling.
    #[default]
    Off,
    /// Allow the semi-analytical under-sampled treatment.
    Allow,
}

impl UnderSampling {
    /// Numeric policy value (0 or 1).
    pub fn as_u8(self) -> u8 {
        match self {
            Self::Off => 0,
            Self::Allow => 1,
        }
    }
}

/// Propagation method selector handed to each element.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PropagationMethod {
    /// Propagate on the incoming grid.
    #[default]
    Plain,
    /// Let the element resize its grid automatically.
    AutoResize,
}

impl PropagationMethod {
    /// Numeric method number (0 plain, 2 auto-resize).
    pub fn number(self) -> u8 {
        match self {
            Self::Plain => 0,
            Self::AutoResize => 2,
        }
    }
}

/// Resizing and precision directives for one junction of a beamline.
///
/// `scale_x_*` act on the horizontal axis and `scale_z_*` on the
/// vertical transverse axis. The `*_before` factors scale the grid range
/// and the `*_after` factors its resolution. `Default` means no resizing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PropagationInstruction {
    /// Auto-resize before propagating through the element.
    pub resize_before: bool,
    /// Auto-resize after propagating through the element.
    pub resize_after: bool,
    /// Precision factor for automatic resizing.
    pub precision: f64,
    /// Under-sampling policy.
    pub under_sampling: UnderSampling,
    /// Propagate via the far-side FFT. Carried, not interpreted here.
    pub other_side_fft: bool,
    /// Horizontal range scale factor.
    pub scale_x_before: f64,
    /// Horizontal resolution scale factor.
    pub scale_x_after: f64,
    /// Vertical range scale factor.
    pub scale_z_before: f64,
    /// Vertical resolution scale factor.
    pub scale_z_after: f64,
    /// Shift-before-resize selector.
    pub shift_type: u8,
    /// Horizontal centre shift in metres.
    pub center_shift_x: f64,
    /// Vertical centre shift in metres.
    pub center_shift_z: f64,
}

impl Default for PropagationInstruction {
    fn default() -> Self {
        Self {
            resize_before: false,
            resize_after: false,
            precision: 1.0,
            under_sampling: UnderSampling::Off,
            other_side_fft: false,
            scale_x_before: 1.0,
            scale_x_after: 1.0,
            scale_z_before: 1.0,
            scale_z_after: 1.0,
            shift_type: 0,
            center_shift_x: 0.0,
            center_shift_z: 0.0,
        }
    }
}

impl PropagationInstruction {
    /// Decode a property row.
    ///
    /// Missing trailing values keep their defaults; values past index 11
    /// are ignored. Flags are on when the value truncates to a non-zero
    /// integer. Non-finite scale factors are rejected.
    pub fn from_row(row: &[f64]) -> Result<Self, BuildError> {
        let mut p = Self::default();
        let get = |i: usize| row.get(i).copied();
        let flag = |v: f64| v.trunc() != 0.0;

        if let Some(v) = get(0) {
            p.resize_before = flag(v);
        }
        if let Some(v) = get(1) {
            p.resize_after = flag(v);
        }
        if let Some(v) = get(2) {
            p.precision = v;
        }
        if let Some(v) = get(3) {
            p.under_sampling = if flag(v) {
                UnderSampling::Allow
            } else {
                UnderSampling::Off
            };
        }
        if let Some(v) = get(4) {
            p.other_side_fft = flag(v);
        }
        if let Some(v) = get(5) {
            p.scale_x_before = v;
        }
        if let Some(v) = get(6) {
            p.scale_x_after = v;
        }
        if let Some(v) = get(7) {
            p.scale_z_before = v;
        }
        if let Some(v) = get(8) {
            p.scale_z_after = v;
        }
        if let Some(v) = get(9) {
            // wraps modulo 256, so -1 stays a non-zero selector
            p.shift_type = v as i64 as u8;
        }
        if let Some(v) = get(10) {
            p.center_shift_x = v;
        }
        if let Some(v) = get(11) {
            p.center_shift_z = v;
        }

        for (name, v) in p.scale_factors() {
            if !v.is_finite() {
                return Err(BuildError::unknown(format!(
                    "property row {name} must be finite, got {v}"
                )));
            }
        }
        Ok(p)
    }

    /// Encode back into the 12-value row layout.
    pub fn to_row(&self) -> [f64; INSTRUCTION_FIELDS] {
        let b = |v: bool| if v { 1.0 } else { 0.0 };
        [
            b(self.resize_before),
            b(self.resize_after),
            self.precision,
            self.under_sampling.as_u8() as f64,
            b(self.other_side_fft),
            self.scale_x_before,
            self.scale_x_after,
            self.scale_z_before,
            self.scale_z_after,
            self.shift_type as f64,
            self.center_shift_x,
            self.center_shift_z,
        ]
    }

    fn scale_factors(&self) -> [(&'static str, f64); 4] {
        [
            ("scale_x_before", self.scale_x_before),
            ("scale_x_after", self.scale_x_after),
            ("scale_z_before", self.scale_z_before),
            ("scale_z_after", self.scale_z_after),
        ]
    }

    /// Whether any scale factor differs from 1.0 by more than `tolerance`.
    ///
    /// A non-finite factor always counts as a resize request so the
    /// resizer gets to reject it.
    pub fn needs_resize(&self, tolerance: f64) -> bool {
        self.scale_factors()
            .iter()
            .any(|&(_, s)| !s.is_finite() || (s - 1.0).abs() > tolerance)
    }

    /// Whether a centre shift before resizing was requested.
    pub fn requests_shift(&self) -> bool {
        self.shift_type != 0 || self.center_shift_x != 0.0 || self.center_shift_z != 0.0
    }

    /// Method selector implied by the resize flags.
    pub fn method(&self) -> PropagationMethod {
        if self.resize_before || self.resize_after {
            PropagationMethod::AutoResize
        } else {
            PropagationMethod::Plain
        }
    }
}

/// Precision bundle passed to each element's `propagate`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PrecisionParams {
    /// Propagation method selector.
    pub method: PropagationMethod,
    /// Auto-resize before propagation.
    pub resize_before: bool,
    /// Auto-resize after propagation.
    pub resize_after: bool,
    /// Precision factor.
    pub precision: f64,
    /// Under-sampling threshold.
    pub under_sampling_threshold: f64,
    /// Under-sampling policy.
    pub under_sampling: UnderSampling,
}

impl PrecisionParams {
    /// Plain propagation with the given under-sampling threshold.
    pub fn plain(under_sampling_threshold: f64) -> Self {
        Self {
            method: PropagationMethod::Plain,
            resize_before: false,
            resize_after: false,
            precision: 1.0,
            under_sampling_threshold,
            under_sampling: UnderSampling::Off,
        }
    }

    /// Parameters derived from a junction instruction.
    pub fn from_instruction(
        instruction: &PropagationInstruction,
        under_sampling_threshold: f64,
    ) -> Self {
        Self {
            method: instruction.method(),
            resize_before: instruction.resize_before,
            resize_after: instruction.resize_after,
            precision: instruction.precision,
            under_sampling_threshold,
            under_sampling: instruction.under_sampling,
        }
    }
}

/// Auxiliary resize list handed to element propagation.
pub type ResizeList = SmallVec<[PropagationInstruction; 2]>;
