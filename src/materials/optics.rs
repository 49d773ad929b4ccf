// Copyright @yucwang 2026

use crate::math::constants::{Float, Vector3f};

/// Mirror `v` about `n`.
pub fn reflect(v: &Vector3f, n: &Vector3f) -> Vector3f {
    *v - *n * (2.0 * v.dot(n))
}

/// Snell refraction of `v` through a surface with normal `n` facing the
/// incoming side. `None` on total internal reflection.
pub fn refract(v: &Vector3f, n: &Vector3f, ni_over_nt: Float) -> Option<Vector3f> {
    let uv = v.normalize();
    let dt = uv.dot(n);
    let discriminant = 1.0 - ni_over_nt * ni_over_nt * (1.0 - dt * dt);
    if discriminant > 0.0 {
        Some((uv - *n * dt) * ni_over_nt - *n * discriminant.sqrt())
    } else {
        None
    }
}

/// Schlick's approximation of the Fresnel reflectance.
pub fn schlick(cosine: Float, ior: Float) -> Float {
    let r0 = (1.0 - ior) / (1.0 + ior);
    let r0 = r0 * r0;
    // Index-matched interface: nothing to reflect off.
    if r0 <= 0.0 {
        return 0.0;
    }
    r0 + (1.0 - r0) * (1.0 - cosine).max(0.0).powi(5)
}
