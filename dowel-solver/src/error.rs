//! Error types for the dowel solver

use serde::Serialize;
use thiserror::Error;

/// Broad class of a [`DowelError`], used to decide between refusing an
/// analysis and falling back to the classical model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed or out-of-range input. Fatal to the requested analysis.
    InputValidation,
    /// FE solve problems. Recovered by falling back to the classical model.
    NumericalFailure,
    /// Unsupported mode or missing parameter combination.
    Configuration,
    /// Anything else (I/O, serialization, stage failures).
    Internal,
}

/// Main error type for dowel analysis
#[derive(Error, Debug)]
pub enum DowelError {
    #[error("Invalid input for '{field}' ({value}): {reason}")]
    InvalidInput {
        field: String,
        value: f64,
        reason: String,
    },

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Invalid material: {0}")]
    InvalidMaterial(String),

    #[error("Input validation failed: {0}")]
    Validation(String),

    #[error("Singular stiffness matrix - mesh may be unsupported")]
    SingularMatrix,

    #[error("Convergence failed after {0} iterations")]
    ConvergenceFailed(usize),

    #[error("Ill-conditioned mesh: {0}")]
    IllConditionedMesh(String),

    #[error("Non-finite value in {0}")]
    NonFinite(String),

    #[error("Finite element path unavailable: {0}")]
    Unavailable(String),

    #[error("Unsupported analysis mode '{0}'")]
    UnsupportedMode(String),

    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    #[error("Analysis failed during {stage}: {reason}")]
    AnalysisFailed { stage: String, reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl DowelError {
    /// Shorthand for an [`DowelError::InvalidInput`] error
    pub fn invalid(field: &str, value: f64, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.to_string(),
            value,
            reason: reason.into(),
        }
    }

    /// Wrap an error with the name of the pipeline stage that produced it
    pub fn at_stage(stage: &str, err: impl std::fmt::Display) -> Self {
        Self::AnalysisFailed {
            stage: stage.to_string(),
            reason: err.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput { .. }
            | Self::InvalidGeometry(_)
            | Self::InvalidMaterial(_)
            | Self::Validation(_) => ErrorKind::InputValidation,
            Self::SingularMatrix
            | Self::ConvergenceFailed(_)
            | Self::IllConditionedMesh(_)
            | Self::NonFinite(_)
            | Self::Unavailable(_) => ErrorKind::NumericalFailure,
            Self::UnsupportedMode(_) | Self::MissingParameter(_) => ErrorKind::Configuration,
            Self::AnalysisFailed { .. } | Self::IoError(_) | Self::SerializationError(_) => {
                ErrorKind::Internal
            }
        }
    }

    /// True when the classical model may stand in for the failed solve
    pub fn is_numerical(&self) -> bool {
        self.kind() == ErrorKind::NumericalFailure
    }
}

/// Result type for dowel operations
pub type DowelResult<T> = Result<T, DowelError>;
