use celestial_models::ModelError;
use thiserror::Error;

pub type WcsResult<T> = Result<T, WcsError>;

#[derive(Debug, Error)]
pub enum WcsError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Inversion unavailable: {message}")]
    InversionUnavailable { message: String },

    #[error("Frame '{frame}' is a bare label and has no unit")]
    UnitAccess { frame: String },

    #[error("Frame mismatch: {message}")]
    FrameMismatch { message: String },

    #[error("Coordinate out of bounds: {message}")]
    OutOfBounds { message: String },

    #[error("Invalid parameter: {message}")]
    InvalidParameter { message: String },

    #[error("Convergence failure: {message}")]
    ConvergenceFailure { message: String },

    #[error("Transform error: {source}")]
    Model {
        #[from]
        source: ModelError,
    },
}

/// Why a sub-chain lookup found nothing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LookupError {
    #[error("no path between '{from}' and '{to}' in either direction")]
    NotFound { from: String, to: String },

    #[error("path '{to}' -> '{from}' exists but is not invertible: {source}")]
    NotInvertible {
        from: String,
        to: String,
        source: ModelError,
    },
}

impl WcsError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn transform_not_set() -> Self {
        Self::configuration("forward transform not set")
    }

    pub fn inversion_unavailable(message: impl Into<String>) -> Self {
        Self::InversionUnavailable {
            message: message.into(),
        }
    }

    pub fn unit_access(frame: impl Into<String>) -> Self {
        Self::UnitAccess {
            frame: frame.into(),
        }
    }

    pub fn frame_mismatch(message: impl Into<String>) -> Self {
        Self::FrameMismatch {
            message: message.into(),
        }
    }

    pub fn out_of_bounds(message: impl Into<String>) -> Self {
        Self::OutOfBounds {
            message: message.into(),
        }
    }

    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            message: message.into(),
        }
    }

    pub fn convergence_failure(message: impl Into<String>) -> Self {
        Self::ConvergenceFailure {
            message: message.into(),
        }
    }

    /// The chain-level "frame not found" condition, if that is what this is.
    pub fn is_frame_not_found(&self) -> bool {
        matches!(self, Self::Model { source } if source.is_frame_not_found())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_not_set() {
        let err = WcsError::transform_not_set();
        assert!(matches!(err, WcsError::Configuration { .. }));
        assert!(err.to_string().contains("forward transform not set"));
    }

    #[test]
    fn test_unit_access() {
        let err = WcsError::unit_access("sky");
        assert!(err.to_string().contains("sky"));
    }

    #[test]
    fn test_inversion_unavailable() {
        let err = WcsError::inversion_unavailable("no iterative inverter installed");
        assert!(err.to_string().contains("no iterative inverter"));
    }

    #[test]
    fn test_from_model_error() {
        let err: WcsError = ModelError::frame_not_found("a", "b").into();
        assert!(err.is_frame_not_found());
        assert!(err.to_string().contains("'a' -> 'b'"));
    }

    #[test]
    fn test_lookup_error_messages() {
        let err = LookupError::NotFound {
            from: "a".into(),
            to: "b".into(),
        };
        assert!(err.to_string().contains("either direction"));

        let err = LookupError::NotInvertible {
            from: "a".into(),
            to: "b".into(),
            source: ModelError::no_inverse("Polynomial2D"),
        };
        assert!(err.to_string().contains("Polynomial2D"));
    }

    #[test]
    fn test_convergence_failure() {
        let err = WcsError::convergence_failure("Newton-Raphson did not converge");
        assert!(err.to_string().contains("did not converge"));
    }
}
