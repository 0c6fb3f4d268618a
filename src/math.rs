pub mod monte_carlo;

pub use monte_carlo::{
    estimate_integral, estimate_integral_with, integrate, try_estimate_integral, Estimate,
    HeightStrategy, MonteCarloConfig, Sample,
};
