use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConvergenceError>;

#[derive(Error, Debug)]
pub enum ConvergenceError {
    /// Too few analysis passes to evaluate. Recoverable: the caller should
    /// wait for more iterations, not surface this to the user.
    #[error("insufficient history: need {required} iterations, have {actual}")]
    InsufficientHistory { required: usize, actual: usize },

    /// Composite weights are unusable (negative components or zero sum).
    /// Fatal to the call that supplied them.
    #[error("invalid weights: {0}")]
    InvalidWeights(String),
}
