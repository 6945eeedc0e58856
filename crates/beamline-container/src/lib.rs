//! Composite optical element for beamline wavefront propagation.
//!
//! A [`CompositeOpticalElement`] is an ordered chain of elements plus
//! per-junction [`PropagationInstruction`](beamline_core::PropagationInstruction)s.
//! It is built either from a flat typed description ([`ContainerDesc`])
//! or from a named-member description resolved through an
//! [`ElementResolver`](beamline_core::ElementResolver), and it drives a
//! wavefront through the chain with tolerance-gated grid resizing
//! between stages.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod composite;
pub mod config;
pub mod desc;
pub mod dispatch;
pub mod resize;
mod tokens;

pub use composite::{CompositeBuilder, CompositeOpticalElement, SharedResizer};
pub use config::{ConfigError, ContainerConfig};
pub use desc::{ContainerDesc, ElementDesc};
pub use resize::LinearResizer;
