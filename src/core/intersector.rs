// Copyright @yucwang 2026

use crate::core::interaction::SurfaceHit;
use crate::math::ray::Ray3f;

/// Nearest-hit query over an immutable scene. Must be deterministic for a
/// given scene and ray.
pub trait Intersector: Sync {
    fn intersect(&self, ray: &Ray3f) -> Option<SurfaceHit<'_>>;
}
