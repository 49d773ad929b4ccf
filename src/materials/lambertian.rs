// Copyright @yucwang 2026

use crate::core::bsdf::{ScatterEvent, ScatterResult, BSDF};
use crate::core::rng::LcgRng;
use crate::math::constants::{Float, Vector3f};
use crate::math::spectrum::RGBSpectrum;
use crate::math::warp::sample_uniform_sphere;

const DEGENERATE_SCATTER: Float = 1e-8;

pub struct LambertianBSDF {
    albedo: RGBSpectrum,
}

impl LambertianBSDF {
    pub fn new(albedo: RGBSpectrum) -> Self {
        Self { albedo }
    }
}

impl BSDF for LambertianBSDF {
    fn scatter(&self, incident: &Vector3f, normal: &Vector3f, rng: &mut LcgRng) -> ScatterResult {
        let mut n = if incident.dot(normal) > 0.0 { -*normal } else { *normal };
        if n.norm_squared() > 0.0 {
            n = n.normalize();
        }

        let candidate = n + sample_uniform_sphere(&rng.next_2d());
        let direction = if candidate.norm_squared() < DEGENERATE_SCATTER {
            n
        } else {
            candidate.normalize()
        };

        ScatterResult::new(ScatterEvent::ReflectedDiffuse, direction, self.albedo, n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lambertian_scatter_stays_in_hemisphere() {
        let bsdf = LambertianBSDF::new(RGBSpectrum::new(0.2, 0.4, 0.6));
        let mut rng = LcgRng::new(11);
        let normal = Vector3f::new(0.0, 0.0, 1.0);
        for i in 0..2000 {
            // Alternate front and back facing hits.
            let incident = if i % 2 == 0 {
                Vector3f::new(0.3, 0.1, -1.0)
            } else {
                Vector3f::new(0.3, 0.1, 1.0)
            };
            let result = bsdf.scatter(&incident, &normal, &mut rng);
            assert_eq!(result.event, ScatterEvent::ReflectedDiffuse);
            assert!(result.direction.dot(&result.normal) >= -1e-6);
            assert!(result.normal.dot(&incident) <= 0.0);
            assert!((result.direction.norm() - 1.0).abs() < 1e-4);
            assert_eq!(result.attenuation, RGBSpectrum::new(0.2, 0.4, 0.6));
        }
    }
}
