//! Bounding rectangle construction.
//!
//! The rectangle spans `[lower, upper]` horizontally and `[0, height]`
//! vertically. With [`HeightStrategy::Endpoints`] the height is
//! `max(f(lower), f(upper))`, which only dominates the curve when the function
//! never exceeds its endpoint values inside the interval. Non-monotone
//! integrands such as `sin(x)` over `[0, π]` are clipped and the estimate is
//! biased low. [`HeightStrategy::Scan`] evaluates a regular grid instead and
//! takes its maximum, which tightens the bound for smooth functions at the
//! cost of extra evaluations.

use log::debug;

use crate::error::{IntegrationError, Result};

/// How the height of the bounding rectangle is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeightStrategy {
    /// Maximum of the function at the two bounds.
    #[default]
    Endpoints,
    /// Maximum over `points + 1` evenly spaced abscissae, endpoints included.
    Scan { points: usize },
}

/// Axis-aligned rectangle the samples are drawn from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingRectangle {
    pub lower: f64,
    pub upper: f64,
    pub height: f64,
}

impl BoundingRectangle {
    /// Builds the rectangle for `f` over `[lower, upper]`.
    ///
    /// Bounds are validated before `f` is called. Errors returned by `f`
    /// are passed through untouched.
    pub fn try_new<F, E>(
        f: &mut F,
        lower: f64,
        upper: f64,
        strategy: HeightStrategy,
    ) -> std::result::Result<Self, E>
    where
        F: FnMut(f64) -> std::result::Result<f64, E>,
        E: From<IntegrationError>,
    {
        validate_bounds(lower, upper)?;

        let height = match strategy {
            HeightStrategy::Endpoints => {
                let f_lower = f(lower)?;
                let f_upper = f(upper)?;
                f_lower.max(f_upper)
            }
            HeightStrategy::Scan { points } => {
                if points == 0 {
                    return Err(IntegrationError::invalid_config(
                        "height scan needs at least one interval",
                    )
                    .into());
                }
                let step = (upper - lower) / points as f64;
                let mut height = f64::NEG_INFINITY;
                for i in 0..=points {
                    // Pin the last abscissa to `upper` so rounding never skips it.
                    let x = if i == points {
                        upper
                    } else {
                        lower + step * i as f64
                    };
                    height = height.max(f(x)?);
                }
                height
            }
        };

        if !height.is_finite() {
            return Err(IntegrationError::NonFiniteHeight { height }.into());
        }
        let width = upper - lower;
        if !(width * height).is_finite() {
            return Err(IntegrationError::NonFiniteArea { width, height }.into());
        }

        debug!(
            "bounding rectangle [{}, {}] x [0, {}] via {:?}",
            lower, upper, height, strategy
        );

        Ok(Self {
            lower,
            upper,
            height,
        })
    }

    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    /// Signed area; negative when both endpoint values are negative.
    pub fn area(&self) -> f64 {
        self.width() * self.height
    }
}

/// Bounds must be finite, strictly increasing and a finite distance apart.
pub fn validate_bounds(lower: f64, upper: f64) -> Result<()> {
    if lower.is_finite()
        && upper.is_finite()
        && lower < upper
        && (upper - lower).is_finite()
    {
        Ok(())
    } else {
        Err(IntegrationError::invalid_bounds(lower, upper))
    }
}
