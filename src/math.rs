use nalgebra::Vector3;

/// Mirrors `v` about the plane with normal `n`. `n` must be unit length.
pub fn reflect(v: &Vector3<f64>, n: &Vector3<f64>) -> Vector3<f64> {
    v - 2.0 * v.dot(n) * n
}

/// Component-wise cube, `p * p * p`.
pub fn cube(p: &Vector3<f64>) -> Vector3<f64> {
    p.component_mul(p).component_mul(p)
}

/// Square root that refuses negative radicands instead of producing NaN.
pub fn checked_sqrt(x: f64) -> Option<f64> {
    if x >= 0.0 {
        Some(x.sqrt())
    } else {
        None
    }
}
