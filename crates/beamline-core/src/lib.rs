//! Core types and traits for beamline wavefront propagation.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the wavefront, the per-junction propagation instruction, the
//! [`OpticalElement`] capability set shared by every element variant,
//! the external collaborator traits ([`GridResizer`], [`ElementResolver`]),
//! error types and ABI-stable status codes.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod element;
pub mod error;
pub mod instruction;
pub mod status;
pub mod traits;
pub mod wavefront;

pub use element::{ElementHandle, ElementKind, OpticalElement};
pub use error::{BuildError, PropagationError, ResizeError};
pub use instruction::{
    PrecisionParams, PropagationInstruction, PropagationMethod, ResizeList, UnderSampling,
    INSTRUCTION_FIELDS,
};
pub use status::OpticsStatus;
pub use traits::{ElementResolver, GridResizer, ResolvedElement};
pub use wavefront::{Mesh, Wavefront, WavefrontError};
