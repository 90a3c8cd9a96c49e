use nalgebra::Vector3;

use crate::math::reflect;
use crate::picture::Color;
use crate::ray::Hit;

const AMBIENT: f64 = 0.1;
const DIFFUSE: f64 = 0.5;
/// Fraction of the base color left in shadow.
const SHADOW: f32 = 0.5;

#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub color: Color,
    /// Whether the surface receives hard shadows from the rest of the scene.
    pub shadowed: bool,
}

impl Material {
    pub fn matte(color: Color) -> Material {
        Material { color, shadowed: false }
    }

    pub fn shadowed(color: Color) -> Material {
        Material { color, shadowed: true }
    }
}

/// Diffuse with an ambient floor plus an unexponentiated specular term.
pub fn shade(hit: &Hit, direction: &Vector3<f64>, light: &Vector3<f64>, in_shadow: bool) -> Color {
    let base = if in_shadow { hit.color * SHADOW } else { hit.color };

    let diffuse = light.dot(&hit.normal).max(0.0) * DIFFUSE + AMBIENT;
    let reflected = reflect(direction, &hit.normal);
    let specular = reflected.dot(light).max(0.0);

    base * (diffuse + specular) as f32
}
