use thiserror::Error;

/// Errors raised by the Monte Carlo integrator before any sampling happens.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IntegrationError {
    /// Bounds are not strictly increasing, not finite, or too far apart to subtract.
    #[error("invalid integration bounds: lower = {lower}, upper = {upper}")]
    InvalidBounds { lower: f64, upper: f64 },

    /// The bounding rectangle height evaluated to NaN or infinity.
    #[error("bounding rectangle height is not finite: {height}")]
    NonFiniteHeight { height: f64 },

    /// Width times height overflowed.
    #[error("bounding rectangle area is not finite: width = {width}, height = {height}")]
    NonFiniteArea { width: f64, height: f64 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl IntegrationError {
    pub fn invalid_bounds(lower: f64, upper: f64) -> Self {
        Self::InvalidBounds { lower, upper }
    }

    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, IntegrationError>;
