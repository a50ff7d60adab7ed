use thiserror::Error;

/// Error types for the langmuir-fit library.
///
/// Every variant is recoverable at the call boundary. `SingularJacobian` and
/// `DegenerateSeries` call for different remedies (more distinct pressures vs.
/// data with some variance) and are never folded into each other.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FitError {
    /// Array lengths mismatch, non-finite values, too few observations, or an
    /// initial guess that violates the non-negativity bound.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The Jacobian is rank-deficient at a step.
    #[error("Singular Jacobian: {0}")]
    SingularJacobian(String),

    /// The optimizer ran out of iterations (or time) without converging.
    #[error("Fit diverged: {0}")]
    FitDivergence(String),

    /// The observed series has zero variance, so R² is undefined.
    #[error("Degenerate series: {0}")]
    DegenerateSeries(String),
}

impl FitError {
    /// Short, stable name of the variant, used in logs and flat records.
    pub fn kind(&self) -> &'static str {
        match self {
            FitError::InvalidInput(_) => "InvalidInput",
            FitError::SingularJacobian(_) => "SingularJacobian",
            FitError::FitDivergence(_) => "FitDivergence",
            FitError::DegenerateSeries(_) => "DegenerateSeries",
        }
    }
}

impl From<crate::parameters::BoundsError> for FitError {
    fn from(err: crate::parameters::BoundsError) -> Self {
        FitError::InvalidInput(format!("{}", err))
    }
}

/// Result type alias for langmuir-fit operations.
pub type Result<T> = std::result::Result<T, FitError>;
