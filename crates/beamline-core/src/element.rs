//! The [`OpticalElement`] capability set and [`ElementKind`] tag.
//!
//! Every beamline component, leaf or composite, implements
//! [`OpticalElement`]. Elements are shared through [`ElementHandle`]s
//! (`Arc<dyn OpticalElement>`), so the same leaf can sit in several
//! containers and is dropped with its last handle.

use std::fmt;
use std::sync::Arc;

use crate::error::PropagationError;
use crate::instruction::{PrecisionParams, ResizeList};
use crate::wavefront::Wavefront;

/// Closed set of element variants.
///
/// Used for introspection (drift counting, nesting checks) instead of
/// runtime type inspection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// Free-space drift.
    Drift,
    /// Aperture (rectangular or circular).
    Aperture,
    /// Obstacle (rectangular or circular).
    Obstacle,
    /// Thin lens.
    ThinLens,
    /// Fresnel zone plate.
    ZonePlate,
    /// Rectangular waveguide.
    Waveguide,
    /// Planar grating.
    Grating,
    /// Generic thin transmission.
    Transmission,
    /// Ellipsoidal mirror.
    MirrorEllipsoid,
    /// Toroidal mirror.
    MirrorToroid,
    /// Composite of other elements.
    Container,
}

impl ElementKind {
    /// Canonical type tag.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Drift => "drift",
            Self::Aperture => "aperture",
            Self::Obstacle => "obstacle",
            Self::ThinLens => "lens",
            Self::ZonePlate => "zp",
            Self::Waveguide => "waveguide",
            Self::Grating => "grating",
            Self::Transmission => "transmission",
            Self::MirrorEllipsoid => "mirror: ellipsoid",
            Self::MirrorToroid => "mirror: toroid",
            Self::Container => "container",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Shared handle to an element.
pub type ElementHandle = Arc<dyn OpticalElement>;

/// A beamline component that transforms a wavefront.
///
/// # Contract
///
/// - `propagate()` mutates the wavefront in place. On error the
///   wavefront may be partially transformed; callers must not assume
///   rollback.
/// - `&self`: built-in elements hold no interior state, so one element
///   may propagate several wavefronts concurrently. Third-party
///   implementations must be reentrant to be shared that way.
/// - `propagate_test()` works on headers only and never reads field
///   samples.
///
/// # Object safety
///
/// This trait is object-safe; containers store elements as
/// [`ElementHandle`]s.
pub trait OpticalElement: Send + Sync + fmt::Debug + 'static {
    /// Human-readable name for error reporting and logging.
    fn name(&self) -> &str;

    /// Variant tag.
    fn kind(&self) -> ElementKind;

    /// Whether this element is a free-space drift.
    fn is_drift(&self) -> bool {
        self.kind() == ElementKind::Drift
    }

    /// Member elements, for composites. `None` for leaves.
    fn members(&self) -> Option<&[ElementHandle]> {
        None
    }

    /// Propagate the wavefront through this element.
    ///
    /// `resize` is an auxiliary list of resize instructions the element
    /// may consult or extend.
    fn propagate(
        &self,
        wfr: &mut Wavefront,
        params: &PrecisionParams,
        resize: &mut ResizeList,
    ) -> Result<(), PropagationError>;

    /// Check that this element can act on `input`, writing the predicted
    /// output header to `output`.
    ///
    /// Default: the header passes through unchanged.
    fn propagate_test(
        &self,
        input: &Wavefront,
        output: &mut Wavefront,
    ) -> Result<(), PropagationError> {
        output.copy_header_from(input);
        Ok(())
    }
}
