//! Closed-form ray intersections for the quadric primitives.
//!
//! Except for the plane and the capsule, every function expects the ray in the
//! primitive's local frame, i.e. with the primitive centered at the origin (see
//! [`Ray::local`]). Functions that return several roots leave the choice of root
//! to the caller; none of them ever returns NaN.

use std::ops::RangeBounds;

use float_ord::FloatOrd;
use nalgebra::{Point3, Vector3};

use crate::math::checked_sqrt;
use crate::ray::{Ray, FORWARD};

/// Rays with `1 − cos²` to the capsule axis below this only meet the end caps.
const PARALLEL_EPSILON: f64 = 1e-12;

/// Smallest finite root inside `t_rng`.
pub fn nearest<I, R>(roots: I, t_rng: &R) -> Option<f64>
    where I: IntoIterator<Item=f64>,
          R: RangeBounds<f64> {
    roots.into_iter()
        .filter(|t| t.is_finite() && t_rng.contains(t))
        .min_by_key(|&t| FloatOrd(t))
}

/// Plane `dot(p, normal) + offset = 0`, in world space.
pub fn plane(ray: &Ray, normal: &Vector3<f64>, offset: f64) -> Option<f64> {
    let t = -(ray.origin.coords.dot(normal) + offset) / ray.direction.dot(normal);
    t.is_finite().then_some(t)
}

/// Near and far roots of a sphere centered at the origin. Expects a unit direction.
pub fn sphere(ray: &Ray, radius: f64) -> Option<(f64, f64)> {
    let o = &ray.origin.coords;
    let b = o.dot(&ray.direction);
    let c = o.dot(o) - radius * radius;
    let h = checked_sqrt(b * b - c)?;
    Some((-b - h, -b + h))
}

pub fn sphere_normal(p: &Point3<f64>, radius: f64) -> Vector3<f64> {
    p.coords / radius
}

/// Entry and exit distances of an axis-aligned box, slab by slab.
pub fn cuboid(ray: &Ray, half_extents: &Vector3<f64>) -> Option<(f64, f64)> {
    let mut near = f64::NEG_INFINITY;
    let mut far = f64::INFINITY;
    for axis in 0..3 {
        let o = ray.origin[axis];
        let d = ray.direction[axis];
        let size = half_extents[axis];
        if d == 0.0 {
            // parallel to this slab: either always inside it or never
            if o.abs() > size {
                return None;
            }
            continue;
        }
        let m = 1.0 / d;
        let k = m.abs() * size;
        near = near.max(-m * o - k);
        far = far.min(-m * o + k);
    }
    if near > far || far < 0.0 {
        return None;
    }
    Some((near, far))
}

/// Outward normal of the face the point lies on.
pub fn cuboid_normal(p: &Point3<f64>, half_extents: &Vector3<f64>) -> Vector3<f64> {
    let scaled = p.coords.component_div(half_extents);
    let axis = scaled.iamax();
    let mut normal = Vector3::zeros();
    normal[axis] = scaled[axis].signum();
    normal
}

/// Capsule with end-cap centers `a` and `b`, in world space. Expects a unit direction.
///
/// Candidates are the body roots that project inside the segment and the cap
/// roots that lie beyond their own end, so a ray from inside finds its exit.
pub fn capsule(ray: &Ray, a: &Point3<f64>, b: &Point3<f64>, radius: f64) -> Option<f64> {
    let ba = b - a;
    let oa = ray.origin - a;
    let d = &ray.direction;
    let baba = ba.dot(&ba);
    let bard = ba.dot(d);
    let baoa = ba.dot(&oa);
    let rdoa = d.dot(&oa);
    let oaoa = oa.dot(&oa);
    // position along the axis, scaled by |ba|²
    let axial = |t: f64| baoa + t * bard;

    let mut roots = [f64::NAN; 6];
    let qa = baba - bard * bard;
    if qa.abs() > PARALLEL_EPSILON * baba {
        let qb = baba * rdoa - baoa * bard;
        let qc = baba * oaoa - baoa * baoa - radius * radius * baba;
        // missing the infinite cylinder means missing the caps too
        let h = checked_sqrt(qb * qb - qa * qc)?;
        for (slot, t) in roots[..2].iter_mut().zip([(-qb - h) / qa, (-qb + h) / qa]) {
            let y = axial(t);
            if y > 0.0 && y < baba {
                *slot = t;
            }
        }
    }

    if let Some((near, far)) = sphere(&ray.local(a), radius) {
        for (slot, t) in roots[2..4].iter_mut().zip([near, far]) {
            if axial(t) <= 0.0 {
                *slot = t;
            }
        }
    }
    if let Some((near, far)) = sphere(&ray.local(b), radius) {
        for (slot, t) in roots[4..].iter_mut().zip([near, far]) {
            if axial(t) >= baba {
                *slot = t;
            }
        }
    }

    nearest(roots, &FORWARD)
}

pub fn capsule_normal(p: &Point3<f64>, a: &Point3<f64>, b: &Point3<f64>, radius: f64) -> Vector3<f64> {
    let ba = b - a;
    let pa = p - a;
    let h = (pa.dot(&ba) / ba.dot(&ba)).clamp(0.0, 1.0);
    (pa - h * ba) / radius
}
