//! Container configuration, validation, and error types.
//!
//! [`ContainerConfig`] carries the tolerance-gate threshold, the
//! under-sampling threshold handed to every element, and the limits
//! applied to named-member descriptions. Builders call
//! [`validate()`](ContainerConfig::validate) before constructing
//! anything.

use std::error::Error;
use std::fmt;

use beamline_core::BuildError;

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`ContainerConfig::validate()`].
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// `resize_tolerance` is NaN, infinite, or negative.
    InvalidTolerance {
        /// The invalid value.
        value: f64,
    },
    /// `under_sampling_threshold` is NaN, infinite, or not positive.
    InvalidUnderSamplingThreshold {
        /// The invalid value.
        value: f64,
    },
    /// A count limit is zero.
    ZeroLimit {
        /// Name of the offending setting.
        setting: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTolerance { value } => {
                write!(f, "resize_tolerance must be finite and non-negative, got {value}")
            }
            Self::InvalidUnderSamplingThreshold { value } => write!(
                f,
                "under_sampling_threshold must be finite and positive, got {value}"
            ),
            Self::ZeroLimit { setting } => write!(f, "{setting} must be at least 1"),
        }
    }
}

impl Error for ConfigError {}

impl From<ConfigError> for BuildError {
    fn from(e: ConfigError) -> Self {
        BuildError::InvalidConfig {
            reason: e.to_string(),
        }
    }
}

// ── ContainerConfig ────────────────────────────────────────────────

/// Settings shared by a composite and every container nested in it.
#[derive(Clone, Debug, PartialEq)]
pub struct ContainerConfig {
    /// A junction resize runs only if some scale factor differs from 1.0
    /// by strictly more than this. Default: `1e-4`.
    pub resize_tolerance: f64,
    /// Under-sampling threshold passed to every element. Default: 0.5.
    pub under_sampling_threshold: f64,
    /// Maximum tokens in one resolved description. Default: 200.
    pub max_description_tokens: usize,
    /// Maximum byte length of one resolved token. Default: 256.
    pub max_token_len: usize,
    /// Maximum container nesting depth. Default: 32.
    pub max_nesting_depth: usize,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            resize_tolerance: 1e-4,
            under_sampling_threshold: 0.5,
            max_description_tokens: 200,
            max_token_len: 256,
            max_nesting_depth: 32,
        }
    }
}

impl ContainerConfig {
    /// Validate all settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let tol = self.resize_tolerance;
        if !tol.is_finite() || tol < 0.0 {
            return Err(ConfigError::InvalidTolerance { value: tol });
        }
        let us = self.under_sampling_threshold;
        if !us.is_finite() || us <= 0.0 {
            return Err(ConfigError::InvalidUnderSamplingThreshold { value: us });
        }
        for (setting, v) in [
            ("max_description_tokens", self.max_description_tokens),
            ("max_token_len", self.max_token_len),
            ("max_nesting_depth", self.max_nesting_depth),
        ] {
            if v == 0 {
                return Err(ConfigError::ZeroLimit { setting });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beamline_core::OpticsStatus;

    #[test]
    fn defaults_are_valid() {
        let c = ContainerConfig::default();
        assert!(c.validate().is_ok());
        assert_eq!(c.resize_tolerance, 1e-4);
        assert_eq!(c.max_nesting_depth, 32);
    }

    #[test]
    fn rejects_bad_tolerance() {
        for value in [f64::NAN, f64::INFINITY, -1e-6] {
            let c = ContainerConfig {
                resize_tolerance: value,
                ..Default::default()
            };
            assert!(matches!(
                c.validate(),
                Err(ConfigError::InvalidTolerance { .. })
            ));
        }
    }

    #[test]
    fn rejects_zero_limits() {
        let c = ContainerConfig {
            max_token_len: 0,
            ..Default::default()
        };
        assert_eq!(
            c.validate(),
            Err(ConfigError::ZeroLimit {
                setting: "max_token_len"
            })
        );
    }

    #[test]
    fn converts_to_build_error() {
        let e: BuildError = ConfigError::InvalidUnderSamplingThreshold { value: 0.0 }.into();
        assert_eq!(e.code(), OpticsStatus::ConfigError as i32);
    }
}
