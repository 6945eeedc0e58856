//! The composite optical element.
//!
//! [`CompositeOpticalElement`] owns an ordered chain of shared element
//! handles and the per-junction instructions that go with it. Junction
//! `i` sits in front of element `i`; an optional extra instruction sits
//! after the last element.
//!
//! Construction goes through a [`CompositeBuilder`], which fixes the
//! [`ContainerConfig`] and the [`GridResizer`] for the whole tree.
//! Nested containers share both with their parent.
//!
//! ```
//! use beamline_container::{CompositeOpticalElement, ContainerDesc, ElementDesc};
//! use beamline_elements::{DriftParams, ThinLensParams};
//!
//! let desc = ContainerDesc::new()
//!     .push("lens", ElementDesc::Lens(ThinLensParams { fx: 2.0, fy: 2.0, x: 0.0, y: 0.0 }))
//!     .push("drift", ElementDesc::Drift(DriftParams { length: 2.0 }));
//! let beamline = CompositeOpticalElement::from_desc(&desc).unwrap();
//! assert_eq!(beamline.len(), 2);
//! ```

use std::fmt;
use std::sync::Arc;

use log::{debug, trace, warn};

use beamline_core::{
    BuildError, ElementHandle, ElementKind, ElementResolver, GridResizer, OpticalElement,
    PrecisionParams, PropagationError, PropagationInstruction, ResizeList, ResolvedElement,
    Wavefront,
};

use crate::config::ContainerConfig;
use crate::desc::{ContainerDesc, ElementDesc};
use crate::dispatch;
use crate::resize::LinearResizer;

/// Resizer shared by a composite and everything nested in it.
pub type SharedResizer = Arc<dyn GridResizer + Send + Sync>;

// ── Builder ────────────────────────────────────────────────────────

/// Configures and runs composite construction.
pub struct CompositeBuilder {
    config: ContainerConfig,
    resizer: SharedResizer,
}

impl CompositeBuilder {
    /// Default config and a [`LinearResizer`].
    pub fn new() -> Self {
        Self {
            config: ContainerConfig::default(),
            resizer: Arc::new(LinearResizer),
        }
    }

    /// Use `config` for the whole tree.
    pub fn config(mut self, config: ContainerConfig) -> Self {
        self.config = config;
        self
    }

    /// Use `resizer` for every junction resize in the tree.
    pub fn resizer(mut self, resizer: SharedResizer) -> Self {
        self.resizer = resizer;
        self
    }

    /// Build from a flat typed description.
    pub fn build_desc(&self, desc: &ContainerDesc) -> Result<CompositeOpticalElement, BuildError> {
        self.config.validate()?;
        CompositeOpticalElement::assemble_desc(desc, &self.context())
    }

    /// Build from a named-member description.
    ///
    /// `tokens[0]` names the container, `tokens[1..]` are member
    /// identifiers looked up through `resolver`, in order.
    pub fn build_named<S, R>(
        &self,
        tokens: &[S],
        resolver: &R,
    ) -> Result<CompositeOpticalElement, BuildError>
    where
        S: AsRef<str>,
        R: ElementResolver + ?Sized,
    {
        self.config.validate()?;
        CompositeOpticalElement::assemble_named(tokens, resolver, &self.context())
    }

    /// Assemble a composite from existing element handles.
    ///
    /// Handles are shared, not copied, so one leaf may sit in several
    /// composites. At most `elements.len() + 1` instructions are allowed.
    pub fn build_parts(
        &self,
        name: &str,
        elements: Vec<ElementHandle>,
        instructions: Vec<PropagationInstruction>,
    ) -> Result<CompositeOpticalElement, BuildError> {
        self.config.validate()?;
        if instructions.len() > elements.len() + 1 {
            return Err(BuildError::unknown(format!(
                "{} instructions for {} elements, at most one trailing instruction is allowed",
                instructions.len(),
                elements.len()
            )));
        }
        let mut out = CompositeOpticalElement::empty(name, &self.context());
        out.elements = elements;
        out.instructions = instructions;
        Ok(out)
    }

    fn context(&self) -> BuildContext<'_> {
        BuildContext {
            config: &self.config,
            resizer: &self.resizer,
            depth: 0,
        }
    }
}

impl Default for CompositeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CompositeBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeBuilder")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// State threaded through one (possibly recursive) construction.
pub(crate) struct BuildContext<'a> {
    config: &'a ContainerConfig,
    resizer: &'a SharedResizer,
    depth: usize,
}

impl BuildContext<'_> {
    /// Context for a container nested one level deeper.
    pub(crate) fn nested(&self) -> Result<Self, BuildError> {
        let depth = self.depth + 1;
        let limit = self.config.max_nesting_depth;
        if depth > limit {
            return Err(BuildError::NestingTooDeep { depth, limit });
        }
        Ok(Self {
            config: self.config,
            resizer: self.resizer,
            depth,
        })
    }
}

// ── CompositeOpticalElement ────────────────────────────────────────

/// An ordered chain of optical elements with per-junction instructions.
///
/// Structurally immutable once built. Implements [`OpticalElement`]
/// (kind [`ElementKind::Container`]), so a composite can be nested in
/// another one; nesting is acyclic because every nested container is
/// built fresh.
pub struct CompositeOpticalElement {
    name: String,
    elements: Vec<ElementHandle>,
    instructions: Vec<PropagationInstruction>,
    resizer: SharedResizer,
    resize_tolerance: f64,
    under_sampling_threshold: f64,
}

impl CompositeOpticalElement {
    /// A builder with default config and resizer.
    pub fn builder() -> CompositeBuilder {
        CompositeBuilder::new()
    }

    /// Build from a flat typed description with default config.
    pub fn from_desc(desc: &ContainerDesc) -> Result<Self, BuildError> {
        CompositeBuilder::new().build_desc(desc)
    }

    /// Build from a flat typed description with an explicit config.
    pub fn from_desc_with_config(
        desc: &ContainerDesc,
        config: &ContainerConfig,
    ) -> Result<Self, BuildError> {
        CompositeBuilder::new()
            .config(config.clone())
            .build_desc(desc)
    }

    /// Build from a named-member description with default config.
    pub fn from_named<S, R>(tokens: &[S], resolver: &R) -> Result<Self, BuildError>
    where
        S: AsRef<str>,
        R: ElementResolver + ?Sized,
    {
        CompositeBuilder::new().build_named(tokens, resolver)
    }

    /// Build from a named-member description with an explicit config.
    pub fn from_named_with_config<S, R>(
        tokens: &[S],
        resolver: &R,
        config: &ContainerConfig,
    ) -> Result<Self, BuildError>
    where
        S: AsRef<str>,
        R: ElementResolver + ?Sized,
    {
        CompositeBuilder::new()
            .config(config.clone())
            .build_named(tokens, resolver)
    }

    fn empty(name: &str, ctx: &BuildContext<'_>) -> Self {
        Self {
            name: name.to_string(),
            elements: Vec::new(),
            instructions: Vec::new(),
            resizer: Arc::clone(ctx.resizer),
            resize_tolerance: ctx.config.resize_tolerance,
            under_sampling_threshold: ctx.config.under_sampling_threshold,
        }
    }

    /// Flat-array construction.
    ///
    /// Runs `element_count + 1` iterations: every iteration but the last
    /// builds one element, and every iteration decodes one property row
    /// (or pushes the default instruction when the row is missing) if a
    /// property array was supplied.
    pub(crate) fn assemble_desc(
        desc: &ContainerDesc,
        ctx: &BuildContext<'_>,
    ) -> Result<Self, BuildError> {
        let count = desc.element_count;
        if count == 0 {
            return Err(BuildError::unknown("element count must be positive"));
        }
        let descriptors = desc
            .descriptors
            .as_ref()
            .ok_or_else(|| BuildError::unknown("descriptor array is absent"))?;
        let tags = desc
            .type_tags
            .as_ref()
            .ok_or_else(|| BuildError::unknown("type tag array is absent"))?;

        let mut out = Self::empty("Container", ctx);
        out.elements.reserve(count);
        for i in 0..=count {
            if i < count {
                let element = descriptors
                    .get(i)
                    .and_then(Option::as_ref)
                    .ok_or_else(|| BuildError::unknown(format!("descriptor {i} is absent")))?;
                let tag = tags
                    .get(i)
                    .ok_or_else(|| BuildError::unknown(format!("type tag {i} is absent")))?;
                out.elements.push(dispatch::build(tag, element, ctx)?);
            }
            if let Some(rows) = &desc.properties {
                let instruction = match rows.get(i) {
                    Some(row) => PropagationInstruction::from_row(row)?,
                    None => PropagationInstruction::default(),
                };
                out.instructions.push(instruction);
            }
        }
        debug!(
            "built container: {} elements, {} instructions, depth {}",
            out.elements.len(),
            out.instructions.len(),
            ctx.depth
        );
        Ok(out)
    }

    /// Named-member construction. Produces no instructions.
    fn assemble_named<S, R>(
        tokens: &[S],
        resolver: &R,
        ctx: &BuildContext<'_>,
    ) -> Result<Self, BuildError>
    where
        S: AsRef<str>,
        R: ElementResolver + ?Sized,
    {
        let (name, members) = tokens
            .split_first()
            .ok_or_else(|| BuildError::unknown("named description is empty"))?;
        let mut out = Self::empty(name.as_ref(), ctx);
        for member in members {
            let member = member.as_ref();
            let resolved = resolver.resolve(member).map_err(|code| {
                warn!("resolver failed for member '{member}' with code {code}");
                BuildError::Resolver {
                    member: member.to_string(),
                    code,
                }
            })?;
            check_limits(member, &resolved, ctx.config)?;
            let tag = resolved.tokens.first().map(|t| t.trim()).ok_or_else(|| {
                BuildError::unknown(format!("description of '{member}' has no type tag"))
            })?;
            let handle: ElementHandle = if dispatch::is_container_tag(tag) {
                Arc::new(Self::assemble_named(&resolved.tokens, resolver, &ctx.nested()?)?)
            } else {
                let desc = ElementDesc::from_tokens(&resolved.tokens, &resolved.payload)?;
                dispatch::build(tag, &desc, ctx)?
            };
            out.elements.push(handle);
        }
        debug!(
            "built container '{}': {} members, depth {}",
            out.name,
            out.elements.len(),
            ctx.depth
        );
        Ok(out)
    }

    /// Elements in beamline order.
    pub fn elements(&self) -> &[ElementHandle] {
        &self.elements
    }

    /// Junction instructions. Empty, or at most one longer than the
    /// element sequence.
    pub fn instructions(&self) -> &[PropagationInstruction] {
        &self.instructions
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the chain has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Tolerance used by the junction resize gate.
    pub fn resize_tolerance(&self) -> f64 {
        self.resize_tolerance
    }

    /// Structural validity check.
    ///
    /// At most one drift is allowed, and a lone drift must be the last
    /// element. If the rule holds, every element's `propagate_test` runs
    /// in order on header-only wavefronts, each element seeing the
    /// previous one's predicted output; the final header lands in
    /// `output`. The first failure is returned unchanged.
    pub fn propagation_test(
        &self,
        input: &Wavefront,
        output: &mut Wavefront,
    ) -> Result<(), PropagationError> {
        let drifts: Vec<usize> = self
            .elements
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_drift())
            .map(|(i, _)| i)
            .collect();
        let last = self.elements.len().saturating_sub(1);
        match drifts.as_slice() {
            [] => {}
            [only] if *only == last => {}
            _ => {
                return Err(PropagationError::DriftPlacement {
                    drift_count: drifts.len(),
                    first_drift: drifts[0],
                    element_count: self.elements.len(),
                })
            }
        }

        let mut current = input.header_only();
        let mut next = input.header_only();
        for element in &self.elements {
            element.propagate_test(&current, &mut next)?;
            std::mem::swap(&mut current, &mut next);
        }
        output.copy_header_from(&current);
        Ok(())
    }

    /// Propagate `wfr` through every element in order.
    ///
    /// Before element `i`, instruction `i` (if any) supplies the
    /// precision parameters and, when a scale factor is outside the
    /// tolerance, a grid resize. After the chain, a trailing instruction
    /// gets the same gated resize. The wavefront is mutated in place and
    /// is not rolled back on failure.
    pub fn propagate_guided(&self, wfr: &mut Wavefront) -> Result<(), PropagationError> {
        let mut processed = 0;
        for (i, element) in self.elements.iter().enumerate() {
            let params = match self.instructions.get(i) {
                Some(instruction) => {
                    self.gated_resize(wfr, instruction, i)?;
                    PrecisionParams::from_instruction(instruction, self.under_sampling_threshold)
                }
                None => PrecisionParams::plain(self.under_sampling_threshold),
            };
            debug!(
                "propagating through element {i} '{}' ({:?})",
                element.name(),
                params.method
            );
            let mut aux = ResizeList::new();
            element.propagate(wfr, &params, &mut aux)?;
            processed += 1;
        }
        if let Some(trailing) = self.instructions.get(processed) {
            self.gated_resize(wfr, trailing, processed)?;
        }
        Ok(())
    }

    fn gated_resize(
        &self,
        wfr: &mut Wavefront,
        instruction: &PropagationInstruction,
        position: usize,
    ) -> Result<(), PropagationError> {
        if !instruction.needs_resize(self.resize_tolerance) {
            trace!("junction {position}: scale factors within tolerance, resize skipped");
            return Ok(());
        }
        if instruction.requests_shift() {
            debug!(
                "junction {position}: shift request (type {}, {}, {}) ignored",
                instruction.shift_type, instruction.center_shift_x, instruction.center_shift_z
            );
        }
        debug!(
            "junction {position}: resizing (range {}x{}, resolution {}x{})",
            instruction.scale_x_before,
            instruction.scale_z_before,
            instruction.scale_x_after,
            instruction.scale_z_after
        );
        self.resizer
            .resize(wfr, instruction)
            .map_err(|e| PropagationError::ResizeFailed {
                position,
                status: e.status,
                reason: e.reason,
            })
    }
}

/// Fail-fast limits on a resolved description. Nothing is truncated.
fn check_limits(
    member: &str,
    resolved: &ResolvedElement,
    config: &ContainerConfig,
) -> Result<(), BuildError> {
    let count = resolved.tokens.len();
    if count > config.max_description_tokens {
        return Err(BuildError::DescriptionTooLarge {
            member: member.to_string(),
            reason: format!(
                "{count} tokens, limit is {}",
                config.max_description_tokens
            ),
        });
    }
    if let Some((i, tok)) = resolved
        .tokens
        .iter()
        .enumerate()
        .find(|(_, t)| t.len() > config.max_token_len)
    {
        return Err(BuildError::DescriptionTooLarge {
            member: member.to_string(),
            reason: format!(
                "token {i} is {} bytes, limit is {}",
                tok.len(),
                config.max_token_len
            ),
        });
    }
    Ok(())
}

impl fmt::Debug for CompositeOpticalElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeOpticalElement")
            .field("name", &self.name)
            .field("elements", &self.elements)
            .field("instructions", &self.instructions.len())
            .field("resize_tolerance", &self.resize_tolerance)
            .finish_non_exhaustive()
    }
}

impl OpticalElement for CompositeOpticalElement {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> ElementKind {
        ElementKind::Container
    }

    fn members(&self) -> Option<&[ElementHandle]> {
        Some(&self.elements)
    }

    /// Runs [`propagate_guided`](Self::propagate_guided) with this
    /// container's own instructions; the caller's parameters and resize
    /// list are not consulted.
    fn propagate(
        &self,
        wfr: &mut Wavefront,
        _params: &PrecisionParams,
        _resize: &mut ResizeList,
    ) -> Result<(), PropagationError> {
        self.propagate_guided(wfr)
    }

    fn propagate_test(
        &self,
        input: &Wavefront,
        output: &mut Wavefront,
    ) -> Result<(), PropagationError> {
        self.propagation_test(input, output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beamline_core::OpticsStatus;
    use beamline_elements::{ApertureParams, DriftParams, ThinLensParams};
    use beamline_test_utils::fixtures::{header_wavefront, uniform_wavefront};
    use beamline_test_utils::{MockResizer, MockResolver};

    fn drift(length: f64) -> ElementDesc {
        ElementDesc::Drift(DriftParams { length })
    }

    fn lens(f: f64) -> ElementDesc {
        ElementDesc::Lens(ThinLensParams {
            fx: f,
            fy: f,
            x: 0.0,
            y: 0.0,
        })
    }

    fn slit() -> ElementDesc {
        ElementDesc::Aperture(ApertureParams {
            shape: 'r',
            kind: 'a',
            dx: 1e-3,
            dy: 1e-3,
            x: 0.0,
            y: 0.0,
        })
    }

    fn row_with_scale(sx_before: f64) -> Vec<f64> {
        vec![0.0, 0.0, 1.0, 0.0, 0.0, sx_before, 1.0, 1.0, 1.0]
    }

    // ── Construction ───────────────────────────────────────────────

    #[test]
    fn flat_build_keeps_order() {
        let desc = ContainerDesc::new()
            .push("aperture", slit())
            .push("lens", lens(2.0))
            .push("drift", drift(2.0));
        let c = CompositeOpticalElement::from_desc(&desc).unwrap();
        let kinds: Vec<_> = c.elements().iter().map(|e| e.kind()).collect();
        assert_eq!(
            kinds,
            [ElementKind::Aperture, ElementKind::ThinLens, ElementKind::Drift]
        );
        assert!(c.instructions().is_empty());
    }

    #[test]
    fn property_rows_fill_every_junction() {
        let desc = ContainerDesc::new()
            .push("lens", lens(2.0))
            .push("drift", drift(1.0))
            .with_properties(vec![row_with_scale(2.0)]);
        let c = CompositeOpticalElement::from_desc(&desc).unwrap();
        assert_eq!(c.instructions().len(), 3);
        assert_eq!(c.instructions()[0].scale_x_before, 2.0);
        assert_eq!(c.instructions()[1], PropagationInstruction::default());
        assert_eq!(c.instructions()[2], PropagationInstruction::default());
    }

    #[test]
    fn count_below_array_lengths_ignores_the_rest() {
        let mut desc = ContainerDesc::new()
            .push("lens", lens(2.0))
            .push("drift", drift(1.0));
        desc.element_count = 1;
        let c = CompositeOpticalElement::from_desc(&desc).unwrap();
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn count_above_array_lengths_fails() {
        let mut desc = ContainerDesc::new().push("lens", lens(2.0));
        desc.element_count = 2;
        assert!(matches!(
            CompositeOpticalElement::from_desc(&desc),
            Err(BuildError::UnknownOpticalElement { .. })
        ));
    }

    #[test]
    fn empty_descriptor_slot_fails() {
        let mut desc = ContainerDesc::new().push("lens", lens(2.0));
        desc.descriptors = Some(vec![None]);
        let err = CompositeOpticalElement::from_desc(&desc).unwrap_err();
        assert_eq!(err.code(), OpticsStatus::UnknownOpticalElement as i32);
    }

    #[test]
    fn tag_and_variant_must_agree() {
        let desc = ContainerDesc::new().push("lens", drift(1.0));
        assert!(CompositeOpticalElement::from_desc(&desc).is_err());
    }

    #[test]
    fn invalid_config_is_reported() {
        let desc = ContainerDesc::new().push("lens", lens(2.0));
        let config = ContainerConfig {
            resize_tolerance: f64::NAN,
            ..Default::default()
        };
        let err = CompositeOpticalElement::from_desc_with_config(&desc, &config).unwrap_err();
        assert_eq!(err.code(), OpticsStatus::ConfigError as i32);
    }

    #[test]
    fn flat_nesting_is_capped() {
        let mut desc = ContainerDesc::new().push("lens", lens(2.0));
        for _ in 0..3 {
            desc = ContainerDesc::new().push("container", ElementDesc::Container(Box::new(desc)));
        }
        let config = ContainerConfig {
            max_nesting_depth: 2,
            ..Default::default()
        };
        assert_eq!(
            CompositeOpticalElement::from_desc_with_config(&desc, &config).unwrap_err(),
            BuildError::NestingTooDeep { depth: 3, limit: 2 }
        );
    }

    #[test]
    fn named_build_resolves_in_order() {
        let resolver = MockResolver::new()
            .with("S1", ["aperture", "r", "a", "1e-3", "1e-3", "0", "0"])
            .with("L1", ["lens", "2", "2", "0", "0"])
            .with("D1", ["drift", "2"]);
        let c = CompositeOpticalElement::from_named(&["BL", "S1", "L1", "D1"], &resolver).unwrap();
        assert_eq!(c.name(), "BL");
        assert_eq!(c.len(), 3);
        assert!(c.instructions().is_empty());
        assert_eq!(resolver.lookups(), 3);
        assert!(c.elements()[2].is_drift());
    }

    #[test]
    fn named_limits_fail_fast() {
        let long = "9".repeat(300);
        let resolver = MockResolver::new().with("D1", ["drift", long.as_str()]);
        let err = CompositeOpticalElement::from_named(&["BL", "D1"], &resolver).unwrap_err();
        assert!(matches!(
            err,
            BuildError::DescriptionTooLarge { ref member, .. } if member == "D1"
        ));

        let config = ContainerConfig {
            max_description_tokens: 1,
            ..Default::default()
        };
        let resolver = MockResolver::new().with("D1", ["drift", "1"]);
        assert_eq!(
            CompositeOpticalElement::from_named_with_config(&["BL", "D1"], &resolver, &config)
                .unwrap_err()
                .code(),
            OpticsStatus::DescriptionTooLarge as i32
        );
    }

    // ── Structural check ───────────────────────────────────────────

    #[test]
    fn propagation_test_chains_headers() {
        let desc = ContainerDesc::new()
            .push("lens", lens(4.0))
            .push("drift", drift(2.0));
        let c = CompositeOpticalElement::from_desc(&desc).unwrap();
        let input = header_wavefront(8, 1e-3);
        let mut out = input.clone();
        c.propagation_test(&input, &mut out).unwrap();
        assert_eq!(out.position, 2.0);
        // R = -4 after the lens, -2 after two metres
        assert!((out.radius_x + 2.0).abs() < 1e-12);
        assert!((out.mesh().x_range() - 0.5e-3).abs() < 1e-12);
    }

    #[test]
    fn lone_drift_must_be_last() {
        let desc = ContainerDesc::new()
            .push("drift", drift(1.0))
            .push("lens", lens(2.0));
        let c = CompositeOpticalElement::from_desc(&desc).unwrap();
        let w = header_wavefront(4, 1e-3);
        let mut out = w.clone();
        assert_eq!(
            c.propagation_test(&w, &mut out),
            Err(PropagationError::DriftPlacement {
                drift_count: 1,
                first_drift: 0,
                element_count: 2
            })
        );
    }

    // ── Guided propagation ─────────────────────────────────────────

    #[test]
    fn gate_decides_resize() {
        let mock = Arc::new(MockResizer::new());
        let desc = ContainerDesc::new()
            .push("aperture", slit())
            .push("lens", lens(2.0))
            .with_properties(vec![row_with_scale(1.00005), row_with_scale(1.0002)]);
        let c = CompositeOpticalElement::builder()
            .resizer(mock.clone())
            .build_desc(&desc)
            .unwrap();
        let mut w = uniform_wavefront(4, 2e-3);
        c.propagate_guided(&mut w).unwrap();
        let calls = mock.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].instruction.scale_x_before, 1.0002);
    }

    #[test]
    fn resize_failure_status_is_verbatim() {
        let mock = Arc::new(MockResizer::new().fail_on_call(0, 1234));
        let desc = ContainerDesc::new()
            .push("lens", lens(2.0))
            .with_properties(vec![vec![], row_with_scale(3.0)]);
        let c = CompositeOpticalElement::builder()
            .resizer(mock.clone())
            .build_desc(&desc)
            .unwrap();
        let mut w = uniform_wavefront(4, 2e-3);
        let err = c.propagate_guided(&mut w).unwrap_err();
        assert_eq!(err.code(), 1234);
        assert!(matches!(err, PropagationError::ResizeFailed { position: 1, .. }));
    }

    #[test]
    fn nested_container_runs_its_own_instructions() {
        let mock = Arc::new(MockResizer::new());
        let inner = ContainerDesc::new()
            .push("lens", lens(2.0))
            .with_properties(vec![row_with_scale(0.5)]);
        let desc = ContainerDesc::new()
            .push("container", ElementDesc::Container(Box::new(inner)))
            .push("drift", drift(1.0));
        let c = CompositeOpticalElement::builder()
            .resizer(mock.clone())
            .build_desc(&desc)
            .unwrap();
        assert_eq!(c.elements()[0].members().map(<[_]>::len), Some(1));
        let mut w = uniform_wavefront(4, 2e-3);
        c.propagate_guided(&mut w).unwrap();
        assert_eq!(mock.call_count(), 1);
        assert_eq!(w.position, 1.0);
    }
}
