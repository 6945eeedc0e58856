//! Leaf optical elements for beamline wavefront propagation.
//!
//! Each element is built from a typed parameter block (the same blocks
//! the flat-array container description carries) and implements
//! [`OpticalElement`](beamline_core::OpticalElement) with a compact
//! thin-element / paraxial model:
//!
//! - [`Drift`]: spherical-wave magnification of the mesh and radii.
//! - [`Aperture`]: rectangular or circular aperture or obstacle.
//! - [`ThinLens`], [`ZonePlate`]: quadratic phase and radius update.
//! - [`Waveguide`]: entrance aperture followed by a drift.
//! - [`Grating`]: linear phase ramp for the selected order.
//! - [`Transmission`]: tabulated amplitude and optical path difference.
//! - [`MirrorEllipsoid`], [`MirrorToroid`]: projected aperture plus
//!   tangential and sagittal focusing.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod aperture;
pub mod drift;
pub mod grating;
pub mod lens;
pub mod mirror;
pub mod thin;
pub mod transmission;
pub mod waveguide;
pub mod zone_plate;

pub use aperture::{Aperture, ApertureParams, ApertureShape};
pub use drift::{Drift, DriftParams};
pub use grating::{Grating, GratingParams};
pub use lens::{ThinLens, ThinLensParams};
pub use mirror::{
    MirrorEllipsoid, MirrorEllipsoidParams, MirrorGeometry, MirrorToroid, MirrorToroidParams,
};
pub use transmission::{Transmission, TransmissionParams};
pub use waveguide::{Waveguide, WaveguideParams};
pub use zone_plate::{ZonePlate, ZonePlateParams};
