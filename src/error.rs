//! Error types shared by every algorithm and the generational driver.

/// Errors raised while configuring or running an optimizer.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// A configuration value is outside its declared domain.
    ///
    /// Raised before any generation executes.
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// The objective function failed to produce a usable fitness.
    #[error("evaluation failed: {reason}")]
    Evaluation { reason: String },

    /// An internal invariant (such as population size conservation) broke.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}

impl Error {
    /// Shorthand for [`Error::InvalidParameter`].
    pub fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
