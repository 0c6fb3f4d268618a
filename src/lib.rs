pub mod error;
pub mod math;
pub mod plot;

pub use error::{IntegrationError, Result};
pub use math::monte_carlo;
