//! Error types returned by the integrators.

use std::fmt;

/// Result type used throughout this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// A failure reported by an integrand while it was evaluated at a point.
///
/// Integrands that can fail return this from [`Integrand::call`](crate::core::Integrand::call);
/// the integration is aborted and the error is handed back to the caller unchanged.
#[derive(Clone, Debug, PartialEq)]
pub struct IntegrandError {
    message: String,
}

impl IntegrandError {
    /// Creates a new error with a human-readable `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the message this error was created with.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for IntegrandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for IntegrandError {}

/// Errors that can occur while setting up or running an integration.
#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    /// The integration domain has no dimensions.
    EmptyDomain,

    /// Domain and subdivision vector have different lengths.
    DimensionMismatch {
        /// Number of `(low, high)` pairs.
        domain: usize,
        /// Number of subdivision counts.
        subdivisions: usize,
    },

    /// The subdivision count of dimension `dim` is zero.
    ZeroSubdivisions {
        /// Offending dimension.
        dim: usize,
    },

    /// The bounds of dimension `dim` are inverted, degenerate or not finite.
    InvalidBounds {
        /// Offending dimension.
        dim: usize,
    },

    /// A derived count does not fit into the index type.
    Overflow {
        /// Name of the quantity that overflowed.
        quantity: &'static str,
    },

    /// The integrand failed at some point of the grid.
    Integrand(IntegrandError),

    /// The configuration cannot be used.
    InvalidConfig(String),

    /// A configuration or an estimate could not be (de)serialized or written.
    Serialization(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyDomain => write!(f, "Integration domain must have at least one dimension"),
            Self::DimensionMismatch {
                domain,
                subdivisions,
            } => write!(
                f,
                "Dimension mismatch: domain has {} dimensions, subdivisions has {}",
                domain, subdivisions
            ),
            Self::ZeroSubdivisions { dim } => {
                write!(f, "Subdivision count of dimension {} must be positive", dim)
            }
            Self::InvalidBounds { dim } => write!(
                f,
                "Bounds of dimension {} must be finite with low < high",
                dim
            ),
            Self::Overflow { quantity } => {
                write!(f, "Overflow: {} exceeds the representable range", quantity)
            }
            Self::Integrand(err) => write!(f, "Integrand failed: {}", err),
            Self::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            Self::Serialization(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Integrand(err) => Some(err),
            _ => None,
        }
    }
}

impl From<IntegrandError> for Error {
    fn from(err: IntegrandError) -> Self {
        Self::Integrand(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_display() {
        assert_eq!(
            Error::DimensionMismatch {
                domain: 2,
                subdivisions: 3
            }
            .to_string(),
            "Dimension mismatch: domain has 2 dimensions, subdivisions has 3"
        );
        assert_eq!(
            Error::ZeroSubdivisions { dim: 1 }.to_string(),
            "Subdivision count of dimension 1 must be positive"
        );
        assert_eq!(
            Error::Overflow { quantity: "cells" }.to_string(),
            "Overflow: cells exceeds the representable range"
        );
    }

    #[test]
    fn test_integrand_error_is_source() {
        let err = Error::from(IntegrandError::new("log of a negative number"));
        assert_eq!(err.to_string(), "Integrand failed: log of a negative number");
        assert_eq!(
            err.source().map(|s| s.to_string()),
            Some("log of a negative number".to_string())
        );
    }
}
