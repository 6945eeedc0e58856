//! Beamline: composite optical elements and guided wavefront propagation
//! for synchrotron-radiation beamlines.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all beamline sub-crates. For most users, adding `beamline` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use beamline::prelude::*;
//! use beamline::elements::{ApertureParams, DriftParams, ThinLensParams};
//!
//! // Slit, focusing lens, then a drift to the focus.
//! let desc = ContainerDesc::new()
//!     .push("aperture", ElementDesc::Aperture(ApertureParams {
//!         shape: 'r', kind: 'a', dx: 0.8e-3, dy: 0.8e-3, x: 0.0, y: 0.0,
//!     }))
//!     .push("lens", ElementDesc::Lens(ThinLensParams { fx: 8.0, fy: 8.0, x: 0.0, y: 0.0 }))
//!     .push("drift", ElementDesc::Drift(DriftParams { length: 4.0 }));
//! let beamline = CompositeOpticalElement::from_desc(&desc).unwrap();
//!
//! let mesh = Mesh::centered(32, 1e-3, 32, 1e-3).unwrap();
//! let mut wfr = Wavefront::new(1000.0, mesh);
//! let mut predicted = wfr.header_only();
//! beamline.propagation_test(&wfr, &mut predicted).unwrap();
//! beamline.propagate_guided(&mut wfr).unwrap();
//! assert_eq!(wfr.position, 4.0);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `beamline-core` | Wavefront, instructions, element and collaborator traits, errors |
//! | [`elements`] | `beamline-elements` | Leaf optical elements and their parameter blocks |
//! | [`container`] | `beamline-container` | Composite element, descriptions, config, reference resizer |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, traits, and status codes (`beamline-core`).
///
/// Contains the [`types::Wavefront`], the per-junction
/// [`types::PropagationInstruction`], and the [`types::OpticalElement`],
/// [`types::GridResizer`] and [`types::ElementResolver`] traits.
pub use beamline_core as types;

/// Leaf optical elements (`beamline-elements`).
///
/// Drift, apertures and obstacles, thin lens, zone plate, waveguide,
/// grating, thin transmission, and grazing-incidence mirrors.
pub use beamline_elements as elements;

/// The composite optical element (`beamline-container`).
///
/// Build a [`container::CompositeOpticalElement`] from a
/// [`container::ContainerDesc`] or a named-member list, then run
/// [`propagation_test`](container::CompositeOpticalElement::propagation_test)
/// and [`propagate_guided`](container::CompositeOpticalElement::propagate_guided).
pub use beamline_container as container;

/// Common imports for typical beamline usage.
///
/// ```rust
/// use beamline::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use beamline_core::{
        ElementHandle, ElementKind, ElementResolver, GridResizer, Mesh, OpticalElement,
        PrecisionParams, PropagationInstruction, ResolvedElement, Wavefront,
    };

    // Errors
    pub use beamline_core::{BuildError, OpticsStatus, PropagationError, ResizeError};

    // Container
    pub use beamline_container::{
        CompositeBuilder, CompositeOpticalElement, ContainerConfig, ContainerDesc, ElementDesc,
        LinearResizer,
    };
}
