pub mod bounding;
pub mod monte_carlo_integration;
pub mod sample;

pub use bounding::{BoundingRectangle, HeightStrategy};
pub use monte_carlo_integration::{
    estimate_integral, estimate_integral_with, integrate, try_estimate_integral, Estimate,
    MonteCarloConfig, DEFAULT_SAMPLE_COUNT,
};
pub use sample::{Classification, Sample};
