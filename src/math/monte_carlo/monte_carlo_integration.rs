use log::{debug, trace};
use rand::Rng;

use crate::error::{IntegrationError, Result};
use crate::math::monte_carlo::bounding::{BoundingRectangle, HeightStrategy};
use crate::math::monte_carlo::sample::{Classification, Sample};

/// Sample count used by [`integrate`] and [`MonteCarloConfig::default`].
pub const DEFAULT_SAMPLE_COUNT: usize = 100_000;

/// Configuration for [`estimate_integral_with`].
#[derive(Debug, Clone, PartialEq)]
pub struct MonteCarloConfig {
    /// Number of random trials; standard error shrinks as `1 / sqrt(sample_count)`
    pub sample_count: usize,
    /// Keep the classified samples alongside the area
    pub dense_output: bool,
    /// How the bounding rectangle height is picked
    pub height: HeightStrategy,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            sample_count: DEFAULT_SAMPLE_COUNT,
            dense_output: false,
            height: HeightStrategy::Endpoints,
        }
    }
}

/// Outcome of one integration.
#[derive(Debug, Clone, PartialEq)]
pub enum Estimate {
    /// Scalar area estimate only.
    Area(f64),
    /// Area estimate plus every sample, split by classification, in generation order.
    Dense {
        area: f64,
        under: Vec<Sample>,
        over: Vec<Sample>,
    },
}

impl Estimate {
    pub fn area(&self) -> f64 {
        match self {
            Estimate::Area(area) => *area,
            Estimate::Dense { area, .. } => *area,
        }
    }

    /// Samples under the curve, or `None` for a scalar estimate.
    pub fn under(&self) -> Option<&[Sample]> {
        match self {
            Estimate::Area(_) => None,
            Estimate::Dense { under, .. } => Some(under),
        }
    }

    /// Samples on or above the curve, or `None` for a scalar estimate.
    pub fn over(&self) -> Option<&[Sample]> {
        match self {
            Estimate::Area(_) => None,
            Estimate::Dense { over, .. } => Some(over),
        }
    }

    /// Splits a dense estimate into `(area, under, over)`.
    pub fn into_dense(self) -> Option<(f64, Vec<Sample>, Vec<Sample>)> {
        match self {
            Estimate::Area(_) => None,
            Estimate::Dense { area, under, over } => Some((area, under, over)),
        }
    }
}

/// Estimates the integral of `f` over `[lower, upper]` by rejection sampling.
///
/// Points are drawn uniformly from the rectangle `[lower, upper] x [0, h]`
/// where `h = max(f(lower), f(upper))`. The estimate is the rectangle area
/// scaled by the fraction of points strictly below the curve.
///
/// The rectangle only dominates the curve when `f` stays below its endpoint
/// values inside the interval. Functions that peak in the interior are
/// clipped and the estimate is biased low; use [`estimate_integral_with`]
/// with [`HeightStrategy::Scan`] for those.
///
/// # Arguments
///
/// * `f` - The function to integrate
/// * `lower` - Lower bound, must be finite and strictly less than `upper`
/// * `upper` - Upper bound, must be finite
/// * `sample_count` - Number of random trials; zero yields an estimate of `0.0`
/// * `dense_output` - Return the classified samples as well as the area
/// * `rng` - Generator the samples are drawn from; seed it for reproducible runs
///
/// # Errors
///
/// * [`IntegrationError::InvalidBounds`] when `lower >= upper`, either bound is not finite,
///   or `upper - lower` overflows
/// * [`IntegrationError::NonFiniteHeight`] when the endpoint values give a NaN or infinite height
/// * [`IntegrationError::NonFiniteArea`] when the rectangle area overflows
///
/// # Examples
///
/// ```
/// use montecarlo::math::monte_carlo::estimate_integral;
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha20Rng;
///
/// let mut rng = ChaCha20Rng::seed_from_u64(7);
/// let quarter_disc = |x: f64| (1.0 - x * x).sqrt();
/// let estimate = estimate_integral(quarter_disc, 0.0, 1.0, 200_000, false, &mut rng).unwrap();
/// assert!((estimate.area() - std::f64::consts::FRAC_PI_4).abs() < 0.01);
/// ```
///
/// # Complexity
/// * Time: O(n) evaluations of `f` for `n = sample_count`
/// * Space: O(1), or O(n) with `dense_output`
pub fn estimate_integral<F, R>(
    f: F,
    lower: f64,
    upper: f64,
    sample_count: usize,
    dense_output: bool,
    rng: &mut R,
) -> Result<Estimate>
where
    F: Fn(f64) -> f64,
    R: Rng + ?Sized,
{
    let config = MonteCarloConfig {
        sample_count,
        dense_output,
        height: HeightStrategy::Endpoints,
    };
    estimate_integral_with(f, lower, upper, &config, rng)
}

/// Same as [`estimate_integral`] with every knob taken from `config`.
pub fn estimate_integral_with<F, R>(
    f: F,
    lower: f64,
    upper: f64,
    config: &MonteCarloConfig,
    rng: &mut R,
) -> Result<Estimate>
where
    F: Fn(f64) -> f64,
    R: Rng + ?Sized,
{
    try_estimate_integral(
        |x| Ok::<f64, IntegrationError>(f(x)),
        lower,
        upper,
        config,
        rng,
    )
}

/// Integrates a fallible function.
///
/// The first error returned by `f` aborts the run and is handed back to the
/// caller as is. The caller's error type must be able to carry the
/// integrator's own [`IntegrationError`]s as well.
///
/// # Examples
///
/// ```
/// use montecarlo::error::IntegrationError;
/// use montecarlo::math::monte_carlo::{try_estimate_integral, MonteCarloConfig};
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha20Rng;
///
/// #[derive(Debug)]
/// enum MyError {
///     Domain(f64),
///     Integration(IntegrationError),
/// }
///
/// impl From<IntegrationError> for MyError {
///     fn from(e: IntegrationError) -> Self {
///         MyError::Integration(e)
///     }
/// }
///
/// let checked_sqrt = |x: f64| if x < 0.0 { Err(MyError::Domain(x)) } else { Ok(x.sqrt()) };
/// let mut rng = ChaCha20Rng::seed_from_u64(1);
/// let result = try_estimate_integral(checked_sqrt, -1.0, 1.0, &MonteCarloConfig::default(), &mut rng);
/// assert!(matches!(result, Err(MyError::Domain(_))));
/// ```
pub fn try_estimate_integral<F, E, R>(
    mut f: F,
    lower: f64,
    upper: f64,
    config: &MonteCarloConfig,
    rng: &mut R,
) -> std::result::Result<Estimate, E>
where
    F: FnMut(f64) -> std::result::Result<f64, E>,
    E: From<IntegrationError>,
    R: Rng + ?Sized,
{
    let rect = BoundingRectangle::try_new(&mut f, lower, upper, config.height)?;
    let width = rect.width();
    let n = config.sample_count;

    let (mut under, mut over) = if config.dense_output {
        (Vec::with_capacity(n / 2), Vec::with_capacity(n / 2))
    } else {
        (Vec::new(), Vec::new())
    };

    let mut under_count = 0usize;
    for _ in 0..n {
        // x first, then y, so a seeded generator always yields the same points
        let x = rect.lower + rng.gen::<f64>() * width;
        let y = rng.gen::<f64>() * rect.height;
        let sample = Sample::new(x, y);

        match Classification::of(sample, f(x)?) {
            Classification::Under => {
                under_count += 1;
                if config.dense_output {
                    under.push(sample);
                }
            }
            Classification::Over => {
                if config.dense_output {
                    over.push(sample);
                }
            }
        }
    }

    trace!("{} of {} samples under the curve", under_count, n);

    let area = if n == 0 {
        0.0
    } else {
        rect.area() * (under_count as f64 / n as f64)
    };

    debug!(
        "monte carlo estimate over [{}, {}] with {} samples: {}",
        lower, upper, n, area
    );

    if config.dense_output {
        Ok(Estimate::Dense { area, under, over })
    } else {
        Ok(Estimate::Area(area))
    }
}

/// Integrates `f` over `[lower, upper]` with [`DEFAULT_SAMPLE_COUNT`] samples.
pub fn integrate<F, R>(f: F, lower: f64, upper: f64, rng: &mut R) -> Result<f64>
where
    F: Fn(f64) -> f64,
    R: Rng + ?Sized,
{
    estimate_integral_with(f, lower, upper, &MonteCarloConfig::default(), rng).map(|e| e.area())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use std::f64::consts::{FRAC_PI_4, PI};

    fn quarter_disc(x: f64) -> f64 {
        (1.0 - x * x).sqrt()
    }

    #[test]
    fn test_quarter_disc_matches_pi_over_four() {
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        let estimate = estimate_integral(quarter_disc, 0.0, 1.0, 200_000, false, &mut rng).unwrap();
        assert!((estimate.area() - FRAC_PI_4).abs() < 0.01);
    }

    #[test]
    fn test_linear_function() {
        // Integrate f(x) = x over [0,1]. The exact value is 0.5.
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let result = integrate(|x| x, 0.0, 1.0, &mut rng).unwrap();
        assert!((result - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_shifted_interval() {
        // x^2 over [1, 2] is 7/3 and increasing, so the endpoint height is exact.
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let result = integrate(|x| x * x, 1.0, 2.0, &mut rng).unwrap();
        assert!((result - 7.0 / 3.0).abs() < 0.05);
    }

    #[test]
    fn test_reversed_bounds_rejected() {
        let mut rng = ChaCha20Rng::seed_from_u64(0);
        let err = estimate_integral(quarter_disc, 1.0, 0.0, 1000, false, &mut rng).unwrap_err();
        assert_eq!(err, IntegrationError::invalid_bounds(1.0, 0.0));
    }

    #[test]
    fn test_invalid_bounds_do_not_touch_rng() {
        let mut rng = ChaCha20Rng::seed_from_u64(5);
        let mut untouched = rng.clone();
        assert!(estimate_integral(|x| x, 0.0, 0.0, 10, false, &mut rng).is_err());
        assert_eq!(rng.gen::<u64>(), untouched.gen::<u64>());
    }

    #[test]
    fn test_overflowing_width_rejected_before_sampling() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let err = estimate_integral(|_| 1.0, -1e308, 1e308, 1000, true, &mut rng).unwrap_err();
        assert_eq!(err, IntegrationError::invalid_bounds(-1e308, 1e308));
    }

    #[test]
    fn test_wide_finite_interval_keeps_samples_inside() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let (area, under, over) = estimate_integral(|_| 1.0, -1e307, 1e307, 1000, true, &mut rng)
            .unwrap()
            .into_dense()
            .unwrap();
        assert!(area.is_finite());
        for s in under.iter().chain(over.iter()) {
            assert!(s.x >= -1e307 && s.x <= 1e307);
        }
    }

    #[test]
    fn test_negative_height_estimate_between_area_and_zero() {
        let mut rng = ChaCha20Rng::seed_from_u64(6);
        let f = |x: f64| -1.0 - x;
        let rect_area = 2.0 * -1.0;
        let area = estimate_integral(f, 0.0, 2.0, 5_000, false, &mut rng).unwrap().area();
        assert!(area >= rect_area && area <= 0.0);
    }

    #[test]
    fn test_estimate_within_rectangle() {
        let mut rng = ChaCha20Rng::seed_from_u64(9);
        for &(a, b) in &[(0.0, 1.0), (-2.0, 0.5), (3.0, 10.0)] {
            let f = |x: f64| x.exp();
            let rect_area = (b - a) * f(a).max(f(b));
            let area = estimate_integral(f, a, b, 5_000, false, &mut rng).unwrap().area();
            assert!(area >= 0.0);
            assert!(area <= rect_area);
        }
    }

    #[test]
    fn test_dense_counts_sum_to_sample_count() {
        let mut rng = ChaCha20Rng::seed_from_u64(21);
        let estimate = estimate_integral(quarter_disc, 0.0, 1.0, 12_345, true, &mut rng).unwrap();
        let (area, under, over) = estimate.clone().into_dense().unwrap();
        assert_eq!(under.len() + over.len(), 12_345);
        assert_relative_eq!(area, under.len() as f64 / 12_345.0);
        assert_eq!(estimate.under().map(<[Sample]>::len), Some(under.len()));
        assert_eq!(estimate.over().map(<[Sample]>::len), Some(over.len()));
    }

    #[test]
    fn test_dense_samples_lie_in_rectangle_and_are_classified() {
        let mut rng = ChaCha20Rng::seed_from_u64(8);
        let f = |x: f64| 2.0 * x + 1.0;
        let (_, under, over) = estimate_integral(f, 1.0, 3.0, 2_000, true, &mut rng)
            .unwrap()
            .into_dense()
            .unwrap();
        for s in &under {
            assert!(s.x >= 1.0 && s.x <= 3.0);
            assert!(s.y >= 0.0 && s.y <= 7.0);
            assert!(s.y < f(s.x));
        }
        for s in &over {
            assert!(s.x >= 1.0 && s.x <= 3.0);
            assert!(s.y >= 0.0 && s.y <= 7.0);
            assert!(s.y >= f(s.x));
        }
    }

    #[test]
    fn test_sparse_output_has_no_samples() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let estimate = estimate_integral(quarter_disc, 0.0, 1.0, 100, false, &mut rng).unwrap();
        assert!(matches!(estimate, Estimate::Area(_)));
        assert!(estimate.under().is_none());
        assert!(estimate.into_dense().is_none());
    }

    #[test]
    fn test_zero_function_is_exactly_zero() {
        let mut rng = ChaCha20Rng::seed_from_u64(13);
        for &n in &[0usize, 1, 10, 10_000] {
            let area = estimate_integral(|_| 0.0, -3.0, 4.0, n, false, &mut rng).unwrap().area();
            assert_eq!(area, 0.0);
        }
    }

    #[test]
    fn test_zero_samples_yield_zero() {
        let mut rng = ChaCha20Rng::seed_from_u64(13);
        let estimate = estimate_integral(quarter_disc, 0.0, 1.0, 0, true, &mut rng).unwrap();
        assert_eq!(estimate.area(), 0.0);
        let (_, under, over) = estimate.into_dense().unwrap();
        assert!(under.is_empty() && over.is_empty());
    }

    #[test]
    fn test_reproducible_with_same_seed() {
        let run = |seed| {
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            estimate_integral(quarter_disc, 0.0, 1.0, 10_000, true, &mut rng).unwrap()
        };
        assert_eq!(run(99), run(99));
        assert_ne!(run(99).area(), run(100).area());
    }

    #[test]
    fn test_endpoint_heuristic_is_biased_for_interior_peak() {
        // sin over [0, pi] has zero endpoint height, so nothing falls under it.
        let mut rng = ChaCha20Rng::seed_from_u64(4);
        let area = estimate_integral(f64::sin, 0.0, PI, 10_000, false, &mut rng).unwrap().area();
        assert!(area < 1e-6);
    }

    #[test]
    fn test_scan_height_fixes_interior_peak() {
        let mut rng = ChaCha20Rng::seed_from_u64(4);
        let config = MonteCarloConfig {
            sample_count: 200_000,
            height: HeightStrategy::Scan { points: 256 },
            ..MonteCarloConfig::default()
        };
        let area = estimate_integral_with(f64::sin, 0.0, PI, &config, &mut rng).unwrap().area();
        assert!((area - 2.0).abs() < 0.03);
    }

    #[derive(Debug, PartialEq)]
    enum EvalError {
        Domain(f64),
        Integration(IntegrationError),
    }

    impl From<IntegrationError> for EvalError {
        fn from(e: IntegrationError) -> Self {
            EvalError::Integration(e)
        }
    }

    #[test]
    fn test_integrand_error_propagates_unchanged() {
        let mut rng = ChaCha20Rng::seed_from_u64(2);
        let f = |x: f64| {
            if x > 0.5 {
                Err(EvalError::Domain(x))
            } else {
                Ok(x)
            }
        };
        // The upper endpoint already fails.
        let err = try_estimate_integral(f, 0.0, 1.0, &MonteCarloConfig::default(), &mut rng)
            .unwrap_err();
        assert_eq!(err, EvalError::Domain(1.0));
    }

    #[test]
    fn test_integrand_error_during_sampling() {
        let mut rng = ChaCha20Rng::seed_from_u64(2);
        let mut calls = 0usize;
        let f = |x: f64| {
            calls += 1;
            if calls > 10 {
                Err(EvalError::Domain(x))
            } else {
                Ok(1.0)
            }
        };
        let err = try_estimate_integral(f, 0.0, 1.0, &MonteCarloConfig::default(), &mut rng)
            .unwrap_err();
        assert!(matches!(err, EvalError::Domain(_)));
        assert_eq!(calls, 11);
    }

    #[test]
    fn test_integration_error_wrapped_for_fallible_path() {
        let mut rng = ChaCha20Rng::seed_from_u64(2);
        let err = try_estimate_integral(
            |x: f64| Ok::<f64, EvalError>(x),
            1.0,
            -1.0,
            &MonteCarloConfig::default(),
            &mut rng,
        )
        .unwrap_err();
        assert_eq!(
            err,
            EvalError::Integration(IntegrationError::invalid_bounds(1.0, -1.0))
        );
    }

    #[test]
    fn test_default_config() {
        let config = MonteCarloConfig::default();
        assert_eq!(config.sample_count, DEFAULT_SAMPLE_COUNT);
        assert!(!config.dense_output);
        assert_eq!(config.height, HeightStrategy::Endpoints);
    }
}
