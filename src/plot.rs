//! # Plotting
//!
//! A small drawing surface for looking at an integration run: the curve
//! itself plus the samples that landed under and over it.
//!
//! The integrator never draws anything. It hands back [`Sample`]s and the
//! caller feeds them to a [`Figure`]. [`SvgFigure`] is the bundled backend and
//! renders a standalone SVG document with equal scaling on both axes, so a
//! quarter disc looks like a quarter disc.
//!
//! # Usage
//!
//! ```rust
//! use montecarlo::math::monte_carlo::estimate_integral;
//! use montecarlo::plot::{CurveStyle, Figure, PointStyle, SvgFigure};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha20Rng;
//!
//! let f = |x: f64| (1.0 - x * x).sqrt();
//! let mut rng = ChaCha20Rng::seed_from_u64(0);
//! let estimate = estimate_integral(f, 0.0, 1.0, 500, true, &mut rng).unwrap();
//!
//! let mut fig = SvgFigure::new(400, 400);
//! fig.draw_curve(f, 0.0, 1.0, 100, &CurveStyle::new("black"));
//! fig.scatter(estimate.under().unwrap(), &PointStyle::new("green", 1.5));
//! fig.scatter(estimate.over().unwrap(), &PointStyle::new("red", 1.5));
//! let svg = fig.render();
//! assert!(svg.starts_with("<svg"));
//! ```

use std::fmt;

use log::debug;

use crate::math::monte_carlo::Sample;

/// Default number of intervals a curve is split into.
pub const DEFAULT_CURVE_RESOLUTION: usize = 100;

const MARGIN: f64 = 40.0;

#[derive(Debug, Clone, PartialEq)]
pub struct CurveStyle {
    pub color: String,
    pub stroke_width: f64,
}

impl CurveStyle {
    pub fn new<S: Into<String>>(color: S) -> Self {
        Self {
            color: color.into(),
            stroke_width: 1.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointStyle {
    pub color: String,
    pub radius: f64,
}

impl PointStyle {
    pub fn new<S: Into<String>>(color: S, radius: f64) -> Self {
        Self {
            color: color.into(),
            radius,
        }
    }
}

/// A drawing surface for curves and scattered points in data coordinates.
pub trait Figure {
    /// Plots `f` at `resolution + 1` evenly spaced points of `[lower, upper]`.
    /// Non-finite values are dropped.
    fn draw_curve<F>(&mut self, f: F, lower: f64, upper: f64, resolution: usize, style: &CurveStyle)
    where
        F: Fn(f64) -> f64;

    fn scatter(&mut self, points: &[Sample], style: &PointStyle);

    fn set_title(&mut self, title: &str);

    fn set_labels(&mut self, x_label: &str, y_label: &str);

    /// Produces the finished figure.
    fn render(&self) -> String;
}

#[derive(Debug, Clone)]
enum Layer {
    Curve(Vec<(f64, f64)>, CurveStyle),
    Points(Vec<(f64, f64)>, PointStyle),
}

impl Layer {
    fn coords(&self) -> &[(f64, f64)] {
        match self {
            Layer::Curve(c, _) => c,
            Layer::Points(p, _) => p,
        }
    }
}

/// SVG backend for [`Figure`].
#[derive(Debug, Clone)]
pub struct SvgFigure {
    width: u32,
    height: u32,
    title: Option<String>,
    x_label: Option<String>,
    y_label: Option<String>,
    layers: Vec<Layer>,
}

impl SvgFigure {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            title: None,
            x_label: None,
            y_label: None,
            layers: Vec::new(),
        }
    }

    /// Data-space bounding box of everything drawn so far.
    fn data_bounds(&self) -> (f64, f64, f64, f64) {
        let mut x_min = f64::INFINITY;
        let mut x_max = f64::NEG_INFINITY;
        let mut y_min = f64::INFINITY;
        let mut y_max = f64::NEG_INFINITY;
        for &(x, y) in self.layers.iter().flat_map(|l| l.coords()) {
            x_min = x_min.min(x);
            x_max = x_max.max(x);
            y_min = y_min.min(y);
            y_max = y_max.max(y);
        }
        if x_min > x_max {
            return (0.0, 1.0, 0.0, 1.0);
        }
        if x_max - x_min == 0.0 {
            x_min -= 0.5;
            x_max += 0.5;
        }
        if y_max - y_min == 0.0 {
            y_min -= 0.5;
            y_max += 0.5;
        }
        (x_min, x_max, y_min, y_max)
    }

    /// Writes the SVG document for everything drawn so far.
    pub fn write_svg<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        let w = self.width as f64;
        let h = self.height as f64;
        let (x_min, x_max, y_min, y_max) = self.data_bounds();

        // One scale for both axes keeps the aspect ratio equal.
        let scale = ((w - 2.0 * MARGIN) / (x_max - x_min))
            .min((h - 2.0 * MARGIN) / (y_max - y_min))
            .max(0.0);
        let px = |x: f64| MARGIN + (x - x_min) * scale;
        let py = |y: f64| h - MARGIN - (y - y_min) * scale;

        writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
            self.width, self.height, self.width, self.height
        )?;
        writeln!(out, r#"<rect width="100%" height="100%" fill="white"/>"#)?;

        if let Some(title) = &self.title {
            writeln!(out, "<title>{}</title>", escape(title))?;
            writeln!(
                out,
                r#"<text x="{:.2}" y="{:.2}" text-anchor="middle" font-size="16">{}</text>"#,
                w / 2.0,
                MARGIN / 2.0,
                escape(title)
            )?;
        }

        // Axes along the bottom and left edges of the data box.
        writeln!(
            out,
            r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="gray"/>"#,
            px(x_min),
            py(y_min),
            px(x_max),
            py(y_min)
        )?;
        writeln!(
            out,
            r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="gray"/>"#,
            px(x_min),
            py(y_min),
            px(x_min),
            py(y_max)
        )?;

        for layer in &self.layers {
            match layer {
                Layer::Curve(coords, style) => {
                    let points = coords
                        .iter()
                        .map(|&(x, y)| format!("{:.2},{:.2}", px(x), py(y)))
                        .collect::<Vec<_>>()
                        .join(" ");
                    writeln!(
                        out,
                        r#"<polyline fill="none" stroke="{}" stroke-width="{}" points="{}"/>"#,
                        escape(&style.color),
                        style.stroke_width,
                        points
                    )?;
                }
                Layer::Points(coords, style) => {
                    let color = escape(&style.color);
                    for &(x, y) in coords {
                        writeln!(
                            out,
                            r#"<circle cx="{:.2}" cy="{:.2}" r="{}" fill="{}"/>"#,
                            px(x),
                            py(y),
                            style.radius,
                            color
                        )?;
                    }
                }
            }
        }

        if let Some(label) = &self.x_label {
            writeln!(
                out,
                r#"<text x="{:.2}" y="{:.2}" text-anchor="middle">{}</text>"#,
                w / 2.0,
                h - MARGIN / 4.0,
                escape(label)
            )?;
        }
        if let Some(label) = &self.y_label {
            writeln!(
                out,
                r#"<text x="{:.2}" y="{:.2}" text-anchor="middle" transform="rotate(-90 {:.2} {:.2})">{}</text>"#,
                MARGIN / 2.0,
                h / 2.0,
                MARGIN / 2.0,
                h / 2.0,
                escape(label)
            )?;
        }

        writeln!(out, "</svg>")
    }
}

impl fmt::Display for SvgFigure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_svg(f)
    }
}

impl Default for SvgFigure {
    fn default() -> Self {
        Self::new(640, 480)
    }
}

impl Figure for SvgFigure {
    fn draw_curve<F>(&mut self, f: F, lower: f64, upper: f64, resolution: usize, style: &CurveStyle)
    where
        F: Fn(f64) -> f64,
    {
        let resolution = resolution.max(1);
        let step = (upper - lower) / resolution as f64;
        let coords = (0..=resolution)
            .map(|i| {
                if i == resolution {
                    upper
                } else {
                    lower + step * i as f64
                }
            })
            .map(|x| (x, f(x)))
            .filter(|&(x, y)| x.is_finite() && y.is_finite())
            .collect();
        self.layers.push(Layer::Curve(coords, style.clone()));
    }

    fn scatter(&mut self, points: &[Sample], style: &PointStyle) {
        let coords = points
            .iter()
            .filter(|s| s.x.is_finite() && s.y.is_finite())
            .map(|s| (s.x, s.y))
            .collect();
        self.layers.push(Layer::Points(coords, style.clone()));
    }

    fn set_title(&mut self, title: &str) {
        self.title = Some(title.to_string());
    }

    fn set_labels(&mut self, x_label: &str, y_label: &str) {
        self.x_label = Some(x_label.to_string());
        self.y_label = Some(y_label.to_string());
    }

    fn render(&self) -> String {
        let svg = self.to_string();
        debug!(
            "rendered svg figure with {} layers, {} bytes",
            self.layers.len(),
            svg.len()
        );
        svg
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
