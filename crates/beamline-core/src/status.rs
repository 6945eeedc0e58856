//! Integer status codes for the error taxonomy.
//!
//! [`OpticsStatus`] is a `repr(i32)` enum: `Ok` = 0, every error is
//! negative. Values are ABI-stable. Codes produced by external
//! collaborators (resolver, resizer, leaf elements) are not remapped;
//! see [`BuildError::code`] and [`PropagationError::code`].

use crate::error::{BuildError, PropagationError};

/// Status code returned across the integer-status boundary.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpticsStatus {
    /// Success.
    Ok = 0,
    /// Malformed or unrecognized construction input.
    UnknownOpticalElement = -1,
    /// The name registry failed to resolve a member.
    ResolverFailed = -2,
    /// A resolved description exceeds the configured limits.
    DescriptionTooLarge = -3,
    /// Named containers nest too deeply.
    NestingTooDeep = -4,
    /// The drift-placement rule was violated.
    StructuralConstraintViolation = -5,
    /// A leaf element's propagation failed.
    PropagationFailed = -6,
    /// The grid-resize collaborator failed.
    ResizeFailed = -7,
    /// An element's parameters cannot be applied to the wavefront.
    InvalidParameters = -8,
    /// Container configuration failed validation.
    ConfigError = -9,
}

impl From<&BuildError> for OpticsStatus {
    fn from(e: &BuildError) -> Self {
        match e {
            BuildError::UnknownOpticalElement { .. } => OpticsStatus::UnknownOpticalElement,
            BuildError::Resolver { .. } => OpticsStatus::ResolverFailed,
            BuildError::DescriptionTooLarge { .. } => OpticsStatus::DescriptionTooLarge,
            BuildError::NestingTooDeep { .. } => OpticsStatus::NestingTooDeep,
            BuildError::InvalidConfig { .. } => OpticsStatus::ConfigError,
        }
    }
}

impl From<&PropagationError> for OpticsStatus {
    fn from(e: &PropagationError) -> Self {
        match e {
            PropagationError::DriftPlacement { .. } => {
                OpticsStatus::StructuralConstraintViolation
            }
            PropagationError::ElementFailed { .. } => OpticsStatus::PropagationFailed,
            PropagationError::ResizeFailed { .. } => OpticsStatus::ResizeFailed,
            PropagationError::InvalidParameters { .. } => OpticsStatus::InvalidParameters,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_code_values_are_stable() {
        assert_eq!(OpticsStatus::Ok as i32, 0);
        assert_eq!(OpticsStatus::UnknownOpticalElement as i32, -1);
        assert_eq!(OpticsStatus::ResolverFailed as i32, -2);
        assert_eq!(OpticsStatus::DescriptionTooLarge as i32, -3);
        assert_eq!(OpticsStatus::NestingTooDeep as i32, -4);
        assert_eq!(OpticsStatus::StructuralConstraintViolation as i32, -5);
        assert_eq!(OpticsStatus::PropagationFailed as i32, -6);
        assert_eq!(OpticsStatus::ResizeFailed as i32, -7);
        assert_eq!(OpticsStatus::InvalidParameters as i32, -8);
        assert_eq!(OpticsStatus::ConfigError as i32, -9);
    }

    #[test]
    fn build_error_to_status() {
        assert_eq!(
            OpticsStatus::from(&BuildError::unknown("x")),
            OpticsStatus::UnknownOpticalElement
        );
        assert_eq!(
            OpticsStatus::from(&BuildError::Resolver {
                member: "m".into(),
                code: 12
            }),
            OpticsStatus::ResolverFailed
        );
        assert_eq!(
            OpticsStatus::from(&BuildError::NestingTooDeep { depth: 4, limit: 3 }),
            OpticsStatus::NestingTooDeep
        );
        assert_eq!(
            OpticsStatus::from(&BuildError::InvalidConfig {
                reason: "r".into()
            }),
            OpticsStatus::ConfigError
        );
    }

    #[test]
    fn propagation_error_to_status() {
        assert_eq!(
            OpticsStatus::from(&PropagationError::ElementFailed {
                element: "e".into(),
                status: 5,
                reason: "r".into(),
            }),
            OpticsStatus::PropagationFailed
        );
        assert_eq!(
            OpticsStatus::from(&PropagationError::InvalidParameters {
                element: "e".into(),
                reason: "r".into(),
            }),
            OpticsStatus::InvalidParameters
        );
    }
}
