// Copyright @yucwang 2023

use super::constants::{ PI, Float, Vector2f, Vector3f };

pub fn sample_uniform_sphere(u: &Vector2f) -> Vector3f {
    let z: Float = 1.0 - 2.0 * u.x;
    let r: Float = (1.0 - z * z).max(0.0).sqrt();
    let phi: Float = 2.0 * PI * u.y;

    Vector3f::new(r * phi.cos(), r * phi.sin(), z)
}

/// Uniform point inside the unit ball: a sphere direction scaled by the
/// cube root of the third variate.
pub fn sample_uniform_ball(u: &Vector3f) -> Vector3f {
    let dir = sample_uniform_sphere(&Vector2f::new(u.x, u.y));
    dir * u.z.cbrt()
}

pub fn sample_uniform_disk_concentric(u: &Vector2f) -> Vector2f {
    let r1: Float = 2.0 * u.x - 1.0;
    let r2: Float = 2.0 * u.y - 1.0;

    let phi: Float;
    let r:   Float;

    if r1 == 0. && r2 == 0. {
        r = 0.0;
        phi = 0.0;
    } else if r1 * r1 > r2 * r2 {
        r = r1;
        phi = (PI / 4.0) * (r2 / r1);
    } else {
        r = r2;
        phi = (PI / 2.0) - (r1 / r2) * (PI / 4.0);
    }

    let (sin_phi, cos_phi) = phi.sin_cos();

    Vector2f::new(r * cos_phi, r * sin_phi)
}

pub fn sample_cosine_hemisphere(u: &Vector2f) -> Vector3f {
    let p = sample_uniform_disk_concentric(u);
    let z = (1. - p.x * p.x - p.y * p.y).max(0.0).sqrt();

    Vector3f::new(p.x, p.y, z)
}

/// Uniform point on the centred square `[-0.5, 0.5]^2`.
pub fn square_to_centered_square(u: &Vector2f) -> Vector2f {
    Vector2f::new(u.x - 0.5, u.y - 0.5)
}
