//! External collaborator traits: the grid resizer and the name registry.

use crate::error::ResizeError;
use crate::instruction::PropagationInstruction;
use crate::wavefront::Wavefront;

/// Resamples a wavefront grid according to an instruction.
///
/// Implementations must leave the wavefront consistent (mesh and field
/// lengths agree) whether they succeed or fail.
pub trait GridResizer {
    /// Resize `wfr` in place.
    fn resize(
        &self,
        wfr: &mut Wavefront,
        instruction: &PropagationInstruction,
    ) -> Result<(), ResizeError>;
}

/// An element description returned by an [`ElementResolver`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResolvedElement {
    /// Description tokens; token 0 is the type tag.
    pub tokens: Vec<String>,
    /// Auxiliary numeric data (transmission tables, reflectivities).
    pub payload: Vec<f64>,
}

impl ResolvedElement {
    /// Build a description from string-like tokens with no payload.
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
            payload: Vec::new(),
        }
    }

    /// Attach an auxiliary numeric payload.
    pub fn with_payload(mut self, payload: Vec<f64>) -> Self {
        self.payload = payload;
        self
    }
}

/// Resolves member identifiers to element descriptions.
///
/// Must always return and must not have side effects visible to the
/// container. The error value is an opaque failure code that the
/// container surfaces unchanged.
pub trait ElementResolver {
    /// Look up the description for `name`.
    fn resolve(&self, name: &str) -> Result<ResolvedElement, i32>;
}

impl<R: ElementResolver + ?Sized> ElementResolver for &R {
    fn resolve(&self, name: &str) -> Result<ResolvedElement, i32> {
        (**self).resolve(name)
    }
}

impl<G: GridResizer + ?Sized> GridResizer for &G {
    fn resize(
        &self,
        wfr: &mut Wavefront,
        instruction: &PropagationInstruction,
    ) -> Result<(), ResizeError> {
        (**self).resize(wfr, instruction)
    }
}
