use std::ops::Bound;

use nalgebra::{Point3, Vector3};

use crate::picture::Color;

/// Strictly positive distances along a ray.
pub const FORWARD: (Bound<f64>, Bound<f64>) = (Bound::Excluded(0.0), Bound::Unbounded);

#[derive(Clone, Debug, PartialEq)]
pub struct Ray {
    pub origin: Point3<f64>,
    pub direction: Vector3<f64>,
}

impl Ray {
    pub fn new(origin: Point3<f64>, direction: Vector3<f64>) -> Self {
        Self { origin, direction }
    }

    pub fn at(&self, t: f64) -> Point3<f64> {
        self.origin + self.direction * t
    }

    /// The same ray expressed relative to `position`.
    pub fn local(&self, position: &Point3<f64>) -> Ray {
        Ray::new(Point3::from(self.origin - position), self.direction)
    }
}

/// Nearest surface intersection along a ray. A miss is `None`, never a sentinel distance.
#[derive(Clone, Debug, PartialEq)]
pub struct Hit {
    pub point: Point3<f64>,
    pub normal: Vector3<f64>,
    pub color: Color,
    pub shadowed: bool,
    pub t: f64,
}
