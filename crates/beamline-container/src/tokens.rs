//! Text-token grammar for element descriptions.
//!
//! A resolved description is a list of tokens: token 0 is the type tag,
//! the rest are the descriptor fields in declaration order. Selectors
//! are single-character tokens, integer fields are numbers truncated
//! toward zero and must fit their field type. The transmission table
//! comes from the numeric payload.

use std::slice;

use beamline_core::BuildError;
use beamline_elements::{
    ApertureParams, DriftParams, GratingParams, MirrorEllipsoidParams, MirrorGeometry,
    MirrorToroidParams, ThinLensParams, TransmissionParams, WaveguideParams, ZonePlateParams,
};

use crate::desc::ElementDesc;
use crate::dispatch;

/// Sequential reader over the field tokens of one description.
struct Fields<'a> {
    tag: &'a str,
    tokens: slice::Iter<'a, String>,
    read: usize,
}

impl<'a> Fields<'a> {
    fn new(tag: &'a str, tokens: &'a [String]) -> Self {
        Self {
            tag,
            tokens: tokens.iter(),
            read: 0,
        }
    }

    fn next(&mut self, field: &str) -> Result<&'a str, BuildError> {
        self.read += 1;
        self.tokens.next().map(|s| s.trim()).ok_or_else(|| {
            BuildError::unknown(format!(
                "{:?} description is missing field {} ({field})",
                self.tag, self.read
            ))
        })
    }

    fn number(&mut self, field: &str) -> Result<f64, BuildError> {
        let tag = self.tag;
        let tok = self.next(field)?;
        tok.parse::<f64>().map_err(|_| {
            BuildError::unknown(format!("{tag:?} field {field}: {tok:?} is not a number"))
        })
    }

    /// Integer field: the number truncated toward zero, then range-checked
    /// against the target type.
    fn integer<T: TryFrom<i64>>(&mut self, field: &str) -> Result<T, BuildError> {
        let v = self.number(field)?.trunc();
        // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive
        let in_range = v >= i64::MIN as f64 && v < i64::MAX as f64;
        in_range
            .then(|| v as i64)
            .and_then(|i| T::try_from(i).ok())
            .ok_or_else(|| {
                BuildError::unknown(format!(
                    "{:?} field {field}: {v} is out of range",
                    self.tag
                ))
            })
    }

    fn selector(&mut self, field: &str) -> Result<char, BuildError> {
        let tag = self.tag;
        let tok = self.next(field)?;
        let mut chars = tok.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(BuildError::unknown(format!(
                "{tag:?} field {field}: expected one character, got {tok:?}"
            ))),
        }
    }

    fn finish(mut self) -> Result<(), BuildError> {
        let extra = self.tokens.by_ref().count();
        if extra > 0 {
            return Err(BuildError::unknown(format!(
                "{:?} description has {extra} unexpected trailing field(s)",
                self.tag
            )));
        }
        Ok(())
    }

    fn mirror_geometry(&mut self) -> Result<MirrorGeometry, BuildError> {
        Ok(MirrorGeometry {
            ap_shape: self.selector("ap_shape")?,
            deflection: self.selector("deflection")?,
            grazing_angle: self.number("grazing_angle")?,
            size_tangential: self.number("size_tangential")?,
            size_sagittal: self.number("size_sagittal")?,
            reflectivity: self.number("reflectivity")?,
            x: self.number("x")?,
            y: self.number("y")?,
        })
    }
}

impl ElementDesc {
    /// Parse a leaf description from its tokens and numeric payload.
    ///
    /// Token 0 must be a known type tag other than `"container"`;
    /// containers are built from member names by the named-member
    /// constructor, which needs a resolver.
    pub fn from_tokens(tokens: &[String], payload: &[f64]) -> Result<Self, BuildError> {
        let (tag, rest) = tokens
            .split_first()
            .ok_or_else(|| BuildError::unknown("empty element description"))?;
        let tag = tag.trim();
        if !dispatch::is_known_tag(tag) {
            return Err(BuildError::unknown(format!("unrecognised type tag {tag:?}")));
        }
        if dispatch::is_container_tag(tag) {
            return Err(BuildError::unknown(
                "container descriptions list member names and need a resolver",
            ));
        }

        let mut f = Fields::new(tag, rest);
        let desc = match tag {
            "drift" => ElementDesc::Drift(DriftParams {
                length: f.number("length")?,
            }),
            "aperture" | "obstacle" => ElementDesc::Aperture(ApertureParams {
                shape: f.selector("shape")?,
                kind: f.selector("kind")?,
                dx: f.number("dx")?,
                dy: f.number("dy")?,
                x: f.number("x")?,
                y: f.number("y")?,
            }),
            "lens" => ElementDesc::Lens(ThinLensParams {
                fx: f.number("fx")?,
                fy: f.number("fy")?,
                x: f.number("x")?,
                y: f.number("y")?,
            }),
            "zp" | "ZP" => ElementDesc::ZonePlate(ZonePlateParams {
                zones: f.integer("zones")?,
                outer_radius: f.number("outer_radius")?,
                thickness: f.number("thickness")?,
                atten_len_1: f.number("atten_len_1")?,
                atten_len_2: f.number("atten_len_2")?,
                delta_1: f.number("delta_1")?,
                delta_2: f.number("delta_2")?,
                x: f.number("x")?,
                y: f.number("y")?,
            }),
            "waveguide" => ElementDesc::Waveguide(WaveguideParams {
                length: f.number("length")?,
                dx: f.number("dx")?,
                dy: f.number("dy")?,
                x: f.number("x")?,
                y: f.number("y")?,
            }),
            "grating" => ElementDesc::Grating(GratingParams {
                groove_density: f.number("groove_density")?,
                dispersion_plane: f.selector("dispersion_plane")?,
                angle: f.number("angle")?,
                order: f.integer("order")?,
                reflectivity: f.number("reflectivity")?,
            }),
            "transmission" => ElementDesc::Transmission(TransmissionParams {
                nx: f.integer("nx")?,
                ny: f.integer("ny")?,
                x_range: f.number("x_range")?,
                y_range: f.number("y_range")?,
                x: f.number("x")?,
                y: f.number("y")?,
                ext_transmission: f.integer("ext_transmission")?,
                fx: f.number("fx")?,
                fy: f.number("fy")?,
                data: payload.to_vec(),
            }),
            "mirror: ellipsoid" => ElementDesc::MirrorEllipsoid(MirrorEllipsoidParams {
                p: f.number("p")?,
                q: f.number("q")?,
                geometry: f.mirror_geometry()?,
            }),
            "mirror: toroid" => ElementDesc::MirrorToroid(MirrorToroidParams {
                tangential_radius: f.number("tangential_radius")?,
                sagittal_radius: f.number("sagittal_radius")?,
                geometry: f.mirror_geometry()?,
            }),
            other => {
                return Err(BuildError::unknown(format!(
                    "no token grammar for type tag {other:?}"
                )))
            }
        };
        f.finish()?;
        Ok(desc)
    }
}
