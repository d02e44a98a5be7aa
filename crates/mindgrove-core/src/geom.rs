use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

pub fn point(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

/// Measured size of a rendered node.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Replaces a missing or non-positive component with the matching fallback component.
    pub fn or_default_components(dims: Option<Dimensions>, fallback: Dimensions) -> Dimensions {
        let Some(dims) = dims else {
            return fallback;
        };
        let pick = |v: f64, d: f64| if v.is_finite() && v > 0.0 { v } else { d };
        Dimensions {
            width: pick(dims.width, fallback.width),
            height: pick(dims.height, fallback.height),
        }
    }
}
