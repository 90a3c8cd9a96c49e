use std::ops::RangeBounds;

use float_ord::FloatOrd;
use log::debug;
use nalgebra::{Point3, Vector3};

use crate::material::Material;
use crate::primitive::{self, nearest};
use crate::quartic;
use crate::ray::{Hit, Ray, FORWARD};

/// Offset along the normal for shadow rays, so they do not re-hit their own surface.
pub const SHADOW_BIAS: f64 = 1e-4;

#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    /// `dot(p, normal) + offset = 0`, `normal` unit length.
    Plane { normal: Vector3<f64>, offset: f64 },
    Sphere { center: Point3<f64>, radius: f64 },
    Cuboid { center: Point3<f64>, half_extents: Vector3<f64> },
    Capsule { a: Point3<f64>, b: Point3<f64>, radius: f64 },
    /// `x⁴ + y⁴ + z⁴ = r⁴` around `center`.
    Blob { center: Point3<f64>, radius: f64 },
    /// `x⁴ + y⁴ + z⁴ + ka − kb·|p|² = 0` around `center`.
    Goursat { center: Point3<f64>, ka: f64, kb: f64 },
}

impl Shape {
    /// Nearest root in `t_rng`.
    pub fn intersect<R>(&self, ray: &Ray, t_rng: &R) -> Option<f64>
        where R: RangeBounds<f64> {
        match self {
            Shape::Plane { normal, offset } => nearest(primitive::plane(ray, normal, *offset), t_rng),
            Shape::Sphere { center, radius } => {
                let (near, far) = primitive::sphere(&ray.local(center), *radius)?;
                nearest([near, far], t_rng)
            }
            Shape::Cuboid { center, half_extents } => {
                let (near, far) = primitive::cuboid(&ray.local(center), half_extents)?;
                nearest([near, far], t_rng)
            }
            Shape::Capsule { a, b, radius } => nearest(primitive::capsule(ray, a, b, *radius), t_rng),
            Shape::Blob { center, radius } => {
                let (near, far) = quartic::blob(&ray.local(center), *radius)?;
                nearest([near, far], t_rng)
            }
            Shape::Goursat { center, ka, kb } => nearest(quartic::goursat(&ray.local(center), *ka, *kb), t_rng),
        }
    }

    /// Unit normal at a point on the surface, in world space.
    pub fn normal(&self, point: &Point3<f64>) -> Vector3<f64> {
        match self {
            Shape::Plane { normal, .. } => *normal,
            Shape::Sphere { center, radius } => primitive::sphere_normal(&local(point, center), *radius),
            Shape::Cuboid { center, half_extents } => primitive::cuboid_normal(&local(point, center), half_extents),
            Shape::Capsule { a, b, radius } => primitive::capsule_normal(point, a, b, *radius),
            Shape::Blob { center, .. } => quartic::blob_normal(&local(point, center)),
            Shape::Goursat { center, kb, .. } => quartic::goursat_normal(&local(point, center), *kb),
        }
    }
}

fn local(point: &Point3<f64>, center: &Point3<f64>) -> Point3<f64> {
    Point3::from(point - center)
}

#[derive(Clone, Debug, PartialEq)]
pub struct Object {
    pub shape: Shape,
    pub material: Material,
}

impl Object {
    pub fn new(shape: Shape, material: Material) -> Self {
        Object { shape, material }
    }

    pub fn hit<R>(&self, ray: &Ray, t_rng: &R) -> Option<Hit>
        where R: RangeBounds<f64> {
        let t = self.shape.intersect(ray, t_rng)?;
        let point = ray.at(t);
        Some(Hit {
            point,
            normal: self.shape.normal(&point),
            color: self.material.color,
            shadowed: self.material.shadowed,
            t,
        })
    }
}

/// Fixed, ordered set of objects. Order decides ties between equally distant hits.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    objects: Vec<Object>,
}

impl Scene {
    pub fn new(objects: Vec<Object>) -> Self {
        debug!(target: "app", "Scene with {} objects", objects.len());
        Scene { objects }
    }

    pub fn objects(&self) -> &[Object] {
        &self.objects
    }

    /// Nearest hit over all objects; the first object wins a tie.
    pub fn hit<R>(&self, ray: &Ray, t_rng: R) -> Option<Hit>
        where R: RangeBounds<f64> {
        self.objects.iter()
            .filter_map(|obj| obj.hit(ray, &t_rng))
            .min_by_key(|hit| FloatOrd(hit.t))
    }

    /// Whether anything lies along the ray.
    pub fn occluded(&self, ray: &Ray) -> bool {
        self.objects.iter().any(|obj| obj.shape.intersect(ray, &FORWARD).is_some())
    }

    /// Hard shadow test from a hit towards a directional light.
    pub fn in_shadow(&self, hit: &Hit, incoming: &Vector3<f64>, light: &Vector3<f64>) -> bool {
        // lift off the side the ray arrived from
        let normal = if hit.normal.dot(incoming) > 0.0 { -hit.normal } else { hit.normal };
        let origin = hit.point + normal * SHADOW_BIAS;
        self.occluded(&Ray::new(origin, *light))
    }
}
