// Copyright @yucwang 2026

use super::optics::{reflect, refract, schlick};
use crate::core::bsdf::{ScatterEvent, ScatterResult, BSDF};
use crate::core::rng::LcgRng;
use crate::math::constants::{Float, Vector3f};
use crate::math::spectrum::RGBSpectrum;

/// Smooth glass. `ior` must be non-zero.
pub struct DielectricBSDF {
    albedo: RGBSpectrum,
    ior: Float,
}

impl DielectricBSDF {
    pub fn new(albedo: RGBSpectrum, ior: Float) -> Self {
        Self { albedo, ior }
    }
}

impl BSDF for DielectricBSDF {
    fn scatter(&self, incident: &Vector3f, normal: &Vector3f, rng: &mut LcgRng) -> ScatterResult {
        debug_assert!(self.ior != 0.0);
        let unit = if incident.norm_squared() > 0.0 { incident.normalize() } else { *incident };
        let d_dot_n = unit.dot(normal);

        // Leaving the medium when travelling along the normal.
        let (outward_normal, ni_over_nt, cosine) = if d_dot_n > 0.0 {
            (-*normal, self.ior, self.ior * d_dot_n)
        } else {
            (*normal, 1.0 / self.ior, -d_dot_n)
        };

        let direction = match refract(&unit, &outward_normal, ni_over_nt) {
            Some(refracted) => {
                let reflectance = schlick(cosine, self.ior);
                if rng.next_f32() < reflectance {
                    reflect(&unit, normal)
                } else {
                    refracted
                }
            }
            None => reflect(&unit, normal),
        };

        let direction = if direction.norm_squared() > 0.0 { direction.normalize() } else { direction };
        ScatterResult::new(ScatterEvent::Refraction, direction, self.albedo, outward_normal)
    }
}
