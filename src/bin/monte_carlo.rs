use std::error::Error;
use std::fs;

use log::info;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tracing_subscriber::EnvFilter;

use montecarlo::math::monte_carlo::estimate_integral;
use montecarlo::plot::{CurveStyle, Figure, PointStyle, SvgFigure, DEFAULT_CURVE_RESOLUTION};

const USAGE: &str = "usage: monte_carlo [--samples N] [--seed S] [--svg PATH]";

#[derive(Debug, Clone, PartialEq)]
struct CliConfig {
    samples: usize,
    seed: Option<u64>,
    svg: Option<String>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            samples: 10_000,
            seed: None,
            svg: None,
        }
    }
}

impl CliConfig {
    fn from_args<I>(mut args: I) -> Result<Self, String>
    where
        I: Iterator<Item = String>,
    {
        let mut config = Self::default();
        while let Some(arg) = args.next() {
            let mut value = || args.next().ok_or_else(|| format!("missing value for {arg}"));
            match arg.as_str() {
                "--samples" => {
                    config.samples = value()?
                        .parse()
                        .map_err(|e| format!("bad --samples: {e}"))?
                }
                "--seed" => {
                    config.seed = Some(value()?.parse().map_err(|e| format!("bad --seed: {e}"))?)
                }
                "--svg" => config.svg = Some(value()?),
                other => return Err(format!("unknown argument {other}\n{USAGE}")),
            }
        }
        Ok(config)
    }
}

/// The quarter unit disc; its area over [0, 1] is pi / 4.
fn f_at_x(x: f64) -> f64 {
    (1.0 - x * x).sqrt()
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let config = CliConfig::from_args(std::env::args().skip(1))?;
    let mut rng = match config.seed {
        Some(seed) => ChaCha20Rng::seed_from_u64(seed),
        None => ChaCha20Rng::from_entropy(),
    };
    info!("running with {:?}", config);

    let estimate = estimate_integral(f_at_x, 0.0, 1.0, config.samples, true, &mut rng)?;
    println!("Area under the curve = {:.5}.", estimate.area());

    if let Some(path) = &config.svg {
        let mut fig = SvgFigure::new(600, 600);
        fig.draw_curve(f_at_x, 0.0, 1.0, DEFAULT_CURVE_RESOLUTION, &CurveStyle::new("black"));
        if let (Some(under), Some(over)) = (estimate.under(), estimate.over()) {
            fig.scatter(under, &PointStyle::new("green", 1.5));
            fig.scatter(over, &PointStyle::new("red", 1.5));
        }
        fig.set_title("Integrating f(x) via Monte Carlo");
        fig.set_labels("x", "f(x)");
        fs::write(path, fig.render())?;
        info!("figure written to {}", path);
    }

    Ok(())
}
