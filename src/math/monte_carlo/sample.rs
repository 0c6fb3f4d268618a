/// A point drawn uniformly from the bounding rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub x: f64,
    pub y: f64,
}

impl Sample {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Sample {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<Sample> for (f64, f64) {
    fn from(sample: Sample) -> Self {
        (sample.x, sample.y)
    }
}

/// Which side of the curve a sample landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Under,
    Over,
}

impl Classification {
    /// A sample is under the curve only when its ordinate is strictly below `f(x)`.
    /// A NaN `f(x)` therefore classifies as over.
    pub fn of(sample: Sample, fx: f64) -> Self {
        if sample.y < fx {
            Classification::Under
        } else {
            Classification::Over
        }
    }
}
