//! Typed construction input for the flat-array path.
//!
//! A [`ContainerDesc`] mirrors the flat description handed to the
//! container: a declared element count, a parallel pair of descriptor
//! and type-tag arrays, and an optional array of 12-value property rows.
//! Any array may be absent and any descriptor slot may be empty; the
//! builder reports those as construction errors rather than the type
//! system ruling them out.

use beamline_elements::{
    ApertureParams, DriftParams, GratingParams, MirrorEllipsoidParams, MirrorToroidParams,
    ThinLensParams, TransmissionParams, WaveguideParams, ZonePlateParams,
};

/// Parameter block for one element, one variant per element family.
#[derive(Clone, Debug, PartialEq)]
pub enum ElementDesc {
    /// Free-space drift.
    Drift(DriftParams),
    /// Aperture or obstacle; the kind selector decides which.
    Aperture(ApertureParams),
    /// Thin lens.
    Lens(ThinLensParams),
    /// Fresnel zone plate.
    ZonePlate(ZonePlateParams),
    /// Rectangular waveguide.
    Waveguide(WaveguideParams),
    /// Planar grating.
    Grating(GratingParams),
    /// Tabulated thin transmission.
    Transmission(TransmissionParams),
    /// Ellipsoidal mirror.
    MirrorEllipsoid(MirrorEllipsoidParams),
    /// Toroidal mirror.
    MirrorToroid(MirrorToroidParams),
    /// Nested container.
    Container(Box<ContainerDesc>),
}

impl ElementDesc {
    /// Short name of the variant, for error messages.
    pub fn variant(&self) -> &'static str {
        match self {
            Self::Drift(_) => "Drift",
            Self::Aperture(_) => "Aperture",
            Self::Lens(_) => "Lens",
            Self::ZonePlate(_) => "ZonePlate",
            Self::Waveguide(_) => "Waveguide",
            Self::Grating(_) => "Grating",
            Self::Transmission(_) => "Transmission",
            Self::MirrorEllipsoid(_) => "MirrorEllipsoid",
            Self::MirrorToroid(_) => "MirrorToroid",
            Self::Container(_) => "Container",
        }
    }
}

/// Flat description of a container.
///
/// Slot `i` of `descriptors` and `type_tags` describes element `i`.
/// Row `i` of `properties` is the instruction applied before element
/// `i`; row `element_count`, if present, is applied after the last one.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ContainerDesc {
    /// Declared number of elements.
    pub element_count: usize,
    /// Element descriptors.
    pub descriptors: Option<Vec<Option<ElementDesc>>>,
    /// Type tags, one per descriptor.
    pub type_tags: Option<Vec<String>>,
    /// Per-junction property rows.
    pub properties: Option<Vec<Vec<f64>>>,
}

impl ContainerDesc {
    /// An empty description with both arrays present.
    pub fn new() -> Self {
        Self {
            element_count: 0,
            descriptors: Some(Vec::new()),
            type_tags: Some(Vec::new()),
            properties: None,
        }
    }

    /// Append an element, bumping `element_count`.
    pub fn push(mut self, tag: &str, desc: ElementDesc) -> Self {
        self.element_count += 1;
        self.descriptors.get_or_insert_with(Vec::new).push(Some(desc));
        self.type_tags.get_or_insert_with(Vec::new).push(tag.to_string());
        self
    }

    /// Attach property rows.
    pub fn with_properties(mut self, rows: Vec<Vec<f64>>) -> Self {
        self.properties = Some(rows);
        self
    }
}
