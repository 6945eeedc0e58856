//! Type-tag dispatch table.
//!
//! Maps each wire-level type tag to the constructor that turns an
//! [`ElementDesc`] into an [`ElementHandle`]. The table is built once
//! and shared; lookup replaces a chain of string comparisons.

use std::sync::{Arc, OnceLock};

use indexmap::IndexMap;

use beamline_core::{BuildError, ElementHandle};
use beamline_elements::{
    Aperture, Drift, Grating, MirrorEllipsoid, MirrorToroid, ThinLens, Transmission, Waveguide,
    ZonePlate,
};

use crate::composite::{BuildContext, CompositeOpticalElement};
use crate::desc::ElementDesc;

/// Builds one element from its descriptor.
type Constructor = fn(&ElementDesc, &BuildContext<'_>) -> Result<ElementHandle, BuildError>;

/// Every recognised type tag, in table order.
pub const TYPE_TAGS: [&str; 12] = [
    "drift",
    "aperture",
    "obstacle",
    "lens",
    "zp",
    "ZP",
    "waveguide",
    "grating",
    "transmission",
    "mirror: ellipsoid",
    "mirror: toroid",
    "container",
];

fn table() -> &'static IndexMap<&'static str, Constructor> {
    static TABLE: OnceLock<IndexMap<&'static str, Constructor>> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut t: IndexMap<&'static str, Constructor> = IndexMap::new();
        t.insert("drift", build_drift);
        t.insert("aperture", build_aperture);
        t.insert("obstacle", build_aperture);
        t.insert("lens", build_lens);
        t.insert("zp", build_zone_plate);
        t.insert("ZP", build_zone_plate);
        t.insert("waveguide", build_waveguide);
        t.insert("grating", build_grating);
        t.insert("transmission", build_transmission);
        t.insert("mirror: ellipsoid", build_mirror_ellipsoid);
        t.insert("mirror: toroid", build_mirror_toroid);
        t.insert("container", build_container);
        t
    })
}

/// Whether `tag` names a known element family.
pub fn is_known_tag(tag: &str) -> bool {
    table().contains_key(tag)
}

/// Whether `tag` introduces a nested container.
pub fn is_container_tag(tag: &str) -> bool {
    tag == "container"
}

/// Build the element `desc` under type tag `tag`.
pub(crate) fn build(
    tag: &str,
    desc: &ElementDesc,
    ctx: &BuildContext<'_>,
) -> Result<ElementHandle, BuildError> {
    let ctor = table()
        .get(tag)
        .ok_or_else(|| BuildError::unknown(format!("unrecognised type tag {tag:?}")))?;
    ctor(desc, ctx)
}

fn mismatch(tag: &str, desc: &ElementDesc) -> BuildError {
    BuildError::unknown(format!(
        "{} descriptor given for type tag {tag:?}",
        desc.variant()
    ))
}

fn build_drift(desc: &ElementDesc, _ctx: &BuildContext<'_>) -> Result<ElementHandle, BuildError> {
    match desc {
        ElementDesc::Drift(p) => Ok(Arc::new(Drift::new(p)?)),
        other => Err(mismatch("drift", other)),
    }
}

fn build_aperture(
    desc: &ElementDesc,
    _ctx: &BuildContext<'_>,
) -> Result<ElementHandle, BuildError> {
    match desc {
        ElementDesc::Aperture(p) => Ok(Arc::new(Aperture::new(p)?)),
        other => Err(mismatch("aperture", other)),
    }
}

fn build_lens(desc: &ElementDesc, _ctx: &BuildContext<'_>) -> Result<ElementHandle, BuildError> {
    match desc {
        ElementDesc::Lens(p) => Ok(Arc::new(ThinLens::new(p)?)),
        other => Err(mismatch("lens", other)),
    }
}

fn build_zone_plate(
    desc: &ElementDesc,
    _ctx: &BuildContext<'_>,
) -> Result<ElementHandle, BuildError> {
    match desc {
        ElementDesc::ZonePlate(p) => Ok(Arc::new(ZonePlate::new(p)?)),
        other => Err(mismatch("zp", other)),
    }
}

fn build_waveguide(
    desc: &ElementDesc,
    _ctx: &BuildContext<'_>,
) -> Result<ElementHandle, BuildError> {
    match desc {
        ElementDesc::Waveguide(p) => Ok(Arc::new(Waveguide::new(p)?)),
        other => Err(mismatch("waveguide", other)),
    }
}

fn build_grating(desc: &ElementDesc, _ctx: &BuildContext<'_>) -> Result<ElementHandle, BuildError> {
    match desc {
        ElementDesc::Grating(p) => Ok(Arc::new(Grating::new(p)?)),
        other => Err(mismatch("grating", other)),
    }
}

fn build_transmission(
    desc: &ElementDesc,
    _ctx: &BuildContext<'_>,
) -> Result<ElementHandle, BuildError> {
    match desc {
        ElementDesc::Transmission(p) => Ok(Arc::new(Transmission::new(p)?)),
        other => Err(mismatch("transmission", other)),
    }
}

fn build_mirror_ellipsoid(
    desc: &ElementDesc,
    _ctx: &BuildContext<'_>,
) -> Result<ElementHandle, BuildError> {
    match desc {
        ElementDesc::MirrorEllipsoid(p) => Ok(Arc::new(MirrorEllipsoid::new(p)?)),
        other => Err(mismatch("mirror: ellipsoid", other)),
    }
}

fn build_mirror_toroid(
    desc: &ElementDesc,
    _ctx: &BuildContext<'_>,
) -> Result<ElementHandle, BuildError> {
    match desc {
        ElementDesc::MirrorToroid(p) => Ok(Arc::new(MirrorToroid::new(p)?)),
        other => Err(mismatch("mirror: toroid", other)),
    }
}

fn build_container(
    desc: &ElementDesc,
    ctx: &BuildContext<'_>,
) -> Result<ElementHandle, BuildError> {
    match desc {
        ElementDesc::Container(inner) => Ok(Arc::new(CompositeOpticalElement::assemble_desc(
            inner,
            &ctx.nested()?,
        )?)),
        other => Err(mismatch("container", other)),
    }
}
