use nalgebra::{point, vector, Point3, Rotation3, Vector3};
use serde::Deserialize;

use crate::ray::Ray;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Camera {
    pub position: Point3<f64>,
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
    pub focal_length: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Camera::new(point![0.0, 0.0, -3.0], 1.0)
    }
}

impl Camera {
    pub fn new(position: Point3<f64>, focal_length: f64) -> Self {
        Camera {
            position,
            roll: 0.0,
            pitch: 0.0,
            yaw: 0.0,
            focal_length,
        }
    }

    pub fn viewport(&self, width: u32, height: u32) -> Viewport {
        let rotation = Rotation3::from_axis_angle(&Vector3::y_axis(), self.yaw) *
            Rotation3::from_axis_angle(&Vector3::x_axis(), self.pitch) *
            Rotation3::from_axis_angle(&Vector3::z_axis(), self.roll);

        Viewport {
            origin: self.position,
            image_width: width as f64,
            image_height: height as f64,
            rotation,
            focal_length: self.focal_length,
        }
    }
}

/// Camera resolved against one image size.
pub struct Viewport {
    pub origin: Point3<f64>,
    pub image_width: f64,
    pub image_height: f64,
    pub rotation: Rotation3<f64>,
    pub focal_length: f64,
}

impl Viewport {
    /// Primary ray through pixel `(x, y)`; both axes map onto `[-1, 1)` regardless of aspect.
    pub fn emit_ray(&self, x: u32, y: u32) -> Ray {
        let nx = (2.0 * x as f64 - self.image_width) / self.image_width;
        let ny = (2.0 * y as f64 - self.image_height) / self.image_height;
        let direction = self.rotation * vector![nx, ny, self.focal_length];
        Ray::new(self.origin, direction.normalize())
    }
}
