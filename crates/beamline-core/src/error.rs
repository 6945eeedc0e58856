//! Error types for beamline construction and propagation.
//!
//! Organized by phase: [`BuildError`] for composite construction,
//! [`PropagationError`] for the structural check and guided propagation,
//! and [`ResizeError`] for the external grid-resize collaborator. Every
//! error maps to an integer status via `code()`; codes produced by
//! external collaborators are carried through unchanged.

use std::error::Error;
use std::fmt;

use crate::status::OpticsStatus;

/// Errors from building a composite element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BuildError {
    /// Malformed or unrecognized construction input
    /// (`UNKNOWN_OPTICAL_ELEMENT`).
    UnknownOpticalElement {
        /// What was wrong with the input.
        reason: String,
    },
    /// The name registry could not resolve a member.
    ///
    /// `code` is the resolver's own failure code, meaningful only to
    /// the caller that supplied the resolver.
    Resolver {
        /// The member identifier that failed to resolve.
        member: String,
        /// The resolver's failure code, unchanged.
        code: i32,
    },
    /// A resolved description exceeds the configured token limits.
    DescriptionTooLarge {
        /// The member whose description was rejected.
        member: String,
        /// Which limit was exceeded.
        reason: String,
    },
    /// Named containers nest deeper than the configured limit.
    NestingTooDeep {
        /// Depth at which construction was refused.
        depth: usize,
        /// The configured limit.
        limit: usize,
    },
    /// The container configuration failed validation.
    InvalidConfig {
        /// Which setting is invalid.
        reason: String,
    },
}

impl BuildError {
    /// Shorthand for [`BuildError::UnknownOpticalElement`].
    pub fn unknown(reason: impl Into<String>) -> Self {
        Self::UnknownOpticalElement {
            reason: reason.into(),
        }
    }

    /// Integer status code for this error.
    ///
    /// Resolver failures return the resolver's code verbatim, unless the
    /// resolver reported 0, which would read as success.
    pub fn code(&self) -> i32 {
        match self {
            Self::Resolver { code, .. } if *code != 0 => *code,
            other => OpticsStatus::from(other) as i32,
        }
    }
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownOpticalElement { reason } => {
                write!(f, "unknown optical element: {reason}")
            }
            Self::Resolver { member, code } => {
                write!(f, "could not resolve member '{member}' (code {code})")
            }
            Self::DescriptionTooLarge { member, reason } => {
                write!(f, "description of '{member}' too large: {reason}")
            }
            Self::NestingTooDeep { depth, limit } => {
                write!(f, "container nesting depth {depth} exceeds limit {limit}")
            }
            Self::InvalidConfig { reason } => write!(f, "invalid container config: {reason}"),
        }
    }
}

impl Error for BuildError {}

/// Errors from the structural check and from propagation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PropagationError {
    /// The drift-placement rule was violated: more than one drift, or a
    /// single drift that is not the last element
    /// (`PROP_TEST_CONSTRAINTS`).
    DriftPlacement {
        /// Number of drift elements in the chain.
        drift_count: usize,
        /// Position of the first drift element.
        first_drift: usize,
        /// Number of elements in the chain.
        element_count: usize,
    },
    /// An element's propagation routine failed.
    ElementFailed {
        /// Name of the failing element.
        element: String,
        /// The element's status code, unchanged.
        status: i32,
        /// Human-readable description of the failure.
        reason: String,
    },
    /// The grid-resize collaborator failed at a junction.
    ResizeFailed {
        /// Junction index: `i` resizes before element `i`, the element
        /// count denotes the trailing junction.
        position: usize,
        /// The resizer's status code, unchanged.
        status: i32,
        /// The resizer's description of the failure.
        reason: String,
    },
    /// An element cannot act on the given wavefront with its parameters.
    InvalidParameters {
        /// Name of the element.
        element: String,
        /// What is wrong.
        reason: String,
    },
}

impl PropagationError {
    /// Integer status code for this error.
    ///
    /// Element and resize failures return the collaborator's status
    /// verbatim. A zero status falls back to the status table so a
    /// failure never reports success.
    pub fn code(&self) -> i32 {
        match self {
            Self::ElementFailed { status, .. } | Self::ResizeFailed { status, .. }
                if *status != 0 =>
            {
                *status
            }
            other => OpticsStatus::from(other) as i32,
        }
    }
}

impl fmt::Display for PropagationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DriftPlacement {
                drift_count,
                first_drift,
                element_count,
            } => {
                if *drift_count > 1 {
                    write!(
                        f,
                        "{drift_count} drift elements in chain, at most one is supported"
                    )
                } else {
                    write!(
                        f,
                        "drift at position {first_drift} must be the last of \
                         {element_count} elements"
                    )
                }
            }
            Self::ElementFailed {
                element,
                status,
                reason,
            } => write!(f, "element '{element}' failed (status {status}): {reason}"),
            Self::ResizeFailed {
                position,
                status,
                reason,
            } => write!(
                f,
                "resize at junction {position} failed (status {status}): {reason}"
            ),
            Self::InvalidParameters { element, reason } => {
                write!(f, "element '{element}' has invalid parameters: {reason}")
            }
        }
    }
}

impl Error for PropagationError {}

/// Failure reported by a [`GridResizer`](crate::GridResizer).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResizeError {
    /// Non-zero status code.
    pub status: i32,
    /// Human-readable description.
    pub reason: String,
}

impl ResizeError {
    /// Create a resize error with the given status and description.
    pub fn new(status: i32, reason: impl Into<String>) -> Self {
        Self {
            status,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ResizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "resize failed (status {}): {}", self.status, self.reason)
    }
}

impl Error for ResizeError {}
