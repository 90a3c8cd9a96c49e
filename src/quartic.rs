//! Quartic surfaces solved in closed form.
//!
//! Both surfaces reduce the ray equation to a monic quartic
//! `t⁴ + 4·k3·t³ + 6·k2·t² + 4·k1·t + k0`, depress it with `t = x − k3` into
//! `x⁴ + 6·c2·x² + 4·c1·x + c0` and recover its real roots from the resolvent
//! cubic. Rays are expected in the surface's local frame.

use nalgebra::{Point3, Vector3};

use crate::math::{checked_sqrt, cube};
use crate::primitive::nearest;
use crate::ray::{Ray, FORWARD};

/// When `|c1| < DEGENERACY_RATIO·|c2|` the Goursat solve switches to the reciprocal
/// polynomial. Empirical: keeps the cube-root branch away from `c1 ≈ 0`.
pub const DEGENERACY_RATIO: f64 = 0.1;

/// Depressed form of a monic quartic given as `(k3, k2, k1, k0)`.
pub(crate) fn depress(k3: f64, k2: f64, k1: f64, k0: f64) -> (f64, f64, f64) {
    let c2 = k2 - k3 * k3;
    let c1 = k1 + k3 * (2.0 * k3 * k3 - 3.0 * k2);
    let c0 = k0 + k3 * (k3 * (c2 + k2) * 3.0 - 4.0 * k1);
    (c2, c1, c0)
}

/// Monic coefficients of `x⁴ + y⁴ + z⁴ + ka − kb·|p|²` along the ray.
fn goursat_coefficients(ray: &Ray, ka: f64, kb: f64) -> (f64, f64, f64, f64) {
    let o = &ray.origin.coords;
    let d = &ray.direction;
    let o2 = o.component_mul(o);
    let d2 = d.component_mul(d);

    let k4 = d2.dot(&d2);
    let k3 = o.dot(&cube(d)) / k4;
    let k2 = (o2.dot(&d2) - kb * d.dot(d) / 6.0) / k4;
    let k1 = (cube(o).dot(d) - kb * d.dot(o) / 2.0) / k4;
    let k0 = (o2.dot(&o2) + ka - kb * o.dot(o)) / k4;
    (k3, k2, k1, k0)
}

/// Whether the reciprocal polynomial is the better conditioned one to solve.
fn inverts(c2: f64, c1: f64, k0: f64) -> bool {
    c1.abs() < DEGENERACY_RATIO * c2.abs() && k0 != 0.0
}

/// Quartic "box-sphere" `x⁴ + y⁴ + z⁴ = r⁴`. Returns both real roots, near first.
///
/// The surface is convex, so a ray crosses it at most twice and the resolvent
/// cubic must have a single real root; anything else is a miss.
pub fn blob(ray: &Ray, radius: f64) -> Option<(f64, f64)> {
    let o = &ray.origin.coords;
    let d = &ray.direction;
    let o2 = o.component_mul(o);
    let d2 = d.component_mul(d);
    let r2 = radius * radius;

    let ka = 1.0 / d2.dot(&d2);
    let k3 = ka * o.dot(&cube(d));
    let k2 = ka * o2.dot(&d2);
    let k1 = ka * cube(o).dot(d);
    let k0 = ka * (o2.dot(&o2) - r2 * r2);
    let (c2, c1, c0) = depress(k3, k2, k1, k0);

    let p = c2 * c2 + c0 / 3.0;
    let q = c2 * c2 * c2 - c2 * c0 + c1 * c1;
    let sh = checked_sqrt(q * q - p * p * p)?;
    let s = (q + sh).cbrt();
    let u = (q - sh).cbrt();

    let vx = (s + u + c2 * 4.0) * 0.5;
    let vy = (s - u) * 3f64.sqrt() * 0.5;
    let r = vx.hypot(vy);
    let spread = vy.abs() / checked_sqrt(r + vx)?;
    let mid = -c1 / r - k3;
    let (near, far) = (mid - spread, mid + spread);
    (near.is_finite() && far.is_finite()).then_some((near, far))
}

pub fn blob_normal(p: &Point3<f64>) -> Vector3<f64> {
    cube(&p.coords).normalize()
}

/// Goursat surface `x⁴ + y⁴ + z⁴ + ka − kb·|p|² = 0`. Returns the smallest positive root.
///
/// The direction does not need to be normalized.
pub fn goursat(ray: &Ray, ka: f64, kb: f64) -> Option<f64> {
    let (mut k3, mut k2, mut k1, mut k0) = goursat_coefficients(ray, ka, kb);
    let (mut c2, mut c1, mut c0) = depress(k3, k2, k1, k0);

    // Roots of the reciprocal polynomial are 1/t.
    let inverted = inverts(c2, c1, k0);
    if inverted {
        std::mem::swap(&mut k1, &mut k3);
        k0 = 1.0 / k0;
        k1 *= k0;
        k2 *= k0;
        k3 *= k0;
        (c2, c1, c0) = depress(k3, k2, k1, k0);
    }

    c0 /= 3.0;
    let q = c2 * c2 + c0;
    let r = c2 * c2 * c2 - 3.0 * c0 * c2 + c1 * c1;
    let h = r * r - q * q * q;

    let mut roots = [f64::NAN; 4];
    if h > 0.0 {
        // two real roots
        let h = h.sqrt();
        let s = (r + h).cbrt();
        let u = (r - h).cbrt();
        let x = s + u + 4.0 * c2;
        let y = s - u;
        let ks = x * x + y * y * 3.0;
        let k = ks.sqrt();
        let spread = 0.5 * y.abs() * checked_sqrt(6.0 / (k + x))?;
        let mid = -2.0 * c1 / k - k3;
        roots[0] = mid - spread;
        roots[1] = mid + spread;
    } else {
        // up to four real roots
        let sq = checked_sqrt(q)?;
        let w = sq * ((-r / (sq * q)).clamp(-1.0, 1.0).acos() / 3.0).cos();
        let d1 = checked_sqrt(-w - c2)?;
        if d1 == 0.0 {
            return None;
        }
        if let Some(h1) = checked_sqrt(w - 2.0 * c2 + c1 / d1) {
            roots[0] = -d1 - h1 - k3;
            roots[1] = -d1 + h1 - k3;
        }
        if let Some(h2) = checked_sqrt(w - 2.0 * c2 - c1 / d1) {
            roots[2] = d1 - h2 - k3;
            roots[3] = d1 + h2 - k3;
        }
    }

    if inverted {
        for t in roots.iter_mut() {
            *t = t.recip();
        }
    }
    nearest(roots, &FORWARD)
}

pub fn goursat_normal(p: &Point3<f64>, kb: f64) -> Vector3<f64> {
    (4.0 * cube(&p.coords) - 2.0 * kb * p.coords).normalize()
}

#[cfg(test)]
mod tests {
    use nalgebra::{point, vector};

    use super::*;
    use crate::primitive::sphere;

    fn goursat_field(p: &Point3<f64>, ka: f64, kb: f64) -> f64 {
        let c = &p.coords;
        c.component_mul(c).norm_squared() + ka - kb * c.norm_squared()
    }

    /// First sign change of the implicit function along the ray, refined by bisection.
    fn march(ray: &Ray, ka: f64, kb: f64) -> Option<f64> {
        let f = |t: f64| goursat_field(&ray.at(t), ka, kb);
        let step = 1e-3;
        let mut t = 1e-9;
        let mut prev = f(t);
        while t < 20.0 {
            let next = t + step;
            let value = f(next);
            if (prev > 0.0) != (value > 0.0) {
                let (mut lo, mut hi) = (t, next);
                for _ in 0..100 {
                    let mid = 0.5 * (lo + hi);
                    if (f(lo) > 0.0) != (f(mid) > 0.0) {
                        hi = mid;
                    } else {
                        lo = mid;
                    }
                }
                return Some(lo);
            }
            prev = value;
            t = next;
        }
        None
    }

    #[test]
    fn goursat_matches_sphere_along_axes() {
        // with ka = 0 and kb = r² the surface meets every coordinate axis at ±r,
        // exactly where a sphere of radius r does
        let cases = [
            (point![0.0, 0.0, -3.0], vector![0.0, 0.0, 1.0], 1.0),
            (point![0.0, 0.0, -3.0], vector![0.0, 0.0, 1.0], 0.5),
            (point![0.0, -2.5, 0.0], vector![0.0, 1.0, 0.0], 0.9),
        ];
        for (origin, direction, radius) in cases {
            let ray = Ray::new(origin, direction);
            let (expected, _) = sphere(&ray, radius).unwrap();
            let t = goursat(&ray, 0.0, radius * radius).unwrap();
            assert!((t - expected).abs() < 1e-4, "{} vs {}", t, expected);
        }
    }

    #[test]
    fn goursat_unnormalized_direction() {
        let ray = Ray::new(point![0.0, 0.0, -3.0], vector![0.0, 0.0, 2.0]);
        let t = goursat(&ray, 0.0, 1.0).unwrap();
        assert!((t - 1.0).abs() < 1e-4);
    }

    #[test]
    fn goursat_agrees_with_marching() {
        fastrand::seed(3);
        let mut disagreements = 0;
        for _ in 0..200 {
            let origin = point![
                fastrand::f64() * 6.0 - 3.0,
                fastrand::f64() * 6.0 - 3.0,
                fastrand::f64() * 6.0 - 3.0
            ];
            let direction = vector![
                fastrand::f64() * 2.0 - 1.0,
                fastrand::f64() * 2.0 - 1.0,
                fastrand::f64() * 2.0 - 1.0
            ];
            if direction.norm() < 0.1 {
                continue;
            }
            let ray = Ray::new(origin, direction.normalize());
            let ka = fastrand::f64() * 2.0 - 1.0;
            let kb = 0.5 + fastrand::f64() * 2.5;
            let agree = match (goursat(&ray, ka, kb), march(&ray, ka, kb)) {
                (Some(t), Some(expected)) => (t - expected).abs() < 5e-3,
                (None, None) => true,
                // grazing hits can fall between two marching steps
                _ => false,
            };
            if !agree {
                disagreements += 1;
            }
        }
        assert!(disagreements <= 2, "{} disagreements", disagreements);
    }

    #[test]
    fn goursat_degeneracy_boundary() {
        let (ka, kb) = (0.5, 2.0);
        let direction = vector![0.6, 0.0, 0.8];
        let mut inverted = 0;
        let mut direct = 0;
        for i in 0..=20 {
            let origin = point![-1.8 + 0.01 * i as f64, 0.3, -2.5];
            let ray = Ray::new(origin, direction);
            let (k3, k2, k1, k0) = goursat_coefficients(&ray, ka, kb);
            let (c2, c1, _) = depress(k3, k2, k1, k0);
            if inverts(c2, c1, k0) {
                inverted += 1;
            } else {
                direct += 1;
            }
            let t = goursat(&ray, ka, kb).unwrap();
            let expected = march(&ray, ka, kb).unwrap();
            assert!((t - expected).abs() < 1e-6, "x = {}: {} vs {}", origin.x, t, expected);
        }
        // the sweep has to cross the threshold for this test to mean anything
        assert!(inverted > 0 && direct > 0);
    }

    #[test]
    fn goursat_miss() {
        let ray = Ray::new(point![3.0, 3.0, -3.0], vector![0.0, 0.0, 1.0]);
        assert_eq!(goursat(&ray, 0.5, 2.0), None);
    }

    #[test]
    fn goursat_behind() {
        let ray = Ray::new(point![0.0, 0.0, 3.0], vector![0.0, 0.0, 1.0]);
        assert_eq!(goursat(&ray, 0.0, 1.0), None);
    }

    #[test]
    fn goursat_normal_on_axis() {
        let n = goursat_normal(&point![0.0, 0.0, -1.0], 1.0);
        // 4z³ − 2z at z = −1
        assert!((n - vector![0.0, 0.0, -1.0]).norm() < 1e-12);
    }

    #[test]
    fn blob_axis_roots() {
        let ray = Ray::new(point![0.0, 0.0, -3.0], vector![0.0, 0.0, 1.0]);
        let (near, far) = blob(&ray, 1.0).unwrap();
        assert!((near - 2.0).abs() < 1e-9);
        assert!((far - 4.0).abs() < 1e-9);
    }

    #[test]
    fn blob_is_boxier_than_sphere() {
        // off-axis the blob bulges past the sphere of the same radius
        let ray = Ray::new(point![0.5, 0.5, -3.0], vector![0.0, 0.0, 1.0]);
        let (near, _) = blob(&ray, 1.0).unwrap();
        let (sphere_near, _) = sphere(&ray, 1.0).unwrap();
        assert!(near < sphere_near);
        let p = ray.at(near).coords;
        let field = p.component_mul(&p).norm_squared();
        assert!((field - 1.0).abs() < 1e-9);
    }

    #[test]
    fn blob_from_inside() {
        let ray = Ray::new(point![0.0, 0.0, 0.0], vector![0.0, 0.0, 1.0]);
        let (near, far) = blob(&ray, 1.0).unwrap();
        assert!((near + 1.0).abs() < 1e-9);
        assert!((far - 1.0).abs() < 1e-9);
    }

    #[test]
    fn blob_miss() {
        let ray = Ray::new(point![2.0, 2.0, -3.0], vector![0.0, 0.0, 1.0]);
        assert_eq!(blob(&ray, 1.0), None);
    }

    #[test]
    fn blob_normal_is_axis_aligned_on_faces() {
        let n = blob_normal(&point![1.0, 0.0, 0.0]);
        assert_eq!(n, vector![1.0, 0.0, 0.0]);
    }
}
