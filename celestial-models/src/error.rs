use thiserror::Error;

pub type ModelResult<T> = Result<T, ModelError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("Frame range '{from}' -> '{to}' not found in transform chain")]
    FrameNotFound { from: String, to: String },

    #[error("No analytical inverse for model '{model}'")]
    NoInverse { model: String },

    #[error("Dimension mismatch: expected {expected} axes, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("Axis arrays cannot be broadcast: {message}")]
    ShapeMismatch { message: String },

    #[error("Duplicate frame '{frame}' in transform chain")]
    DuplicateFrame { frame: String },

    #[error("Singularity in transformation: {message}")]
    Singularity { message: String },

    #[error("Invalid parameter: {message}")]
    InvalidParameter { message: String },

    #[error("Non-invertible matrix (determinant = {determinant})")]
    NonInvertibleMatrix { determinant: f64 },
}

impl ModelError {
    pub fn frame_not_found(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::FrameNotFound {
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn no_inverse(model: impl Into<String>) -> Self {
        Self::NoInverse {
            model: model.into(),
        }
    }

    pub fn dimension_mismatch(expected: usize, found: usize) -> Self {
        Self::DimensionMismatch { expected, found }
    }

    pub fn shape_mismatch(message: impl Into<String>) -> Self {
        Self::ShapeMismatch {
            message: message.into(),
        }
    }

    pub fn duplicate_frame(frame: impl Into<String>) -> Self {
        Self::DuplicateFrame {
            frame: frame.into(),
        }
    }

    pub fn singularity(message: impl Into<String>) -> Self {
        Self::Singularity {
            message: message.into(),
        }
    }

    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            message: message.into(),
        }
    }

    pub fn non_invertible_matrix(determinant: f64) -> Self {
        Self::NonInvertibleMatrix { determinant }
    }

    /// True for the two conditions a chain lookup treats as "range absent".
    pub fn is_frame_not_found(&self) -> bool {
        matches!(self, Self::FrameNotFound { .. })
    }

    pub fn is_no_inverse(&self) -> bool {
        matches!(self, Self::NoInverse { .. })
    }
}
