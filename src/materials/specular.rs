// Copyright @yucwang 2026

use super::optics::reflect;
use crate::core::bsdf::{ScatterEvent, ScatterResult, BSDF};
use crate::core::rng::LcgRng;
use crate::math::constants::{Float, Vector3f};
use crate::math::spectrum::RGBSpectrum;
use crate::math::warp::sample_uniform_ball;

/// Mirror with an optional fuzzed lobe.
pub struct SpecularBSDF {
    albedo: RGBSpectrum,
    reflectivity: Float,
}

impl SpecularBSDF {
    pub fn new(albedo: RGBSpectrum, reflectivity: Float) -> Self {
        Self { albedo, reflectivity }
    }

    fn fuzz(&self) -> Float {
        (1.0 - self.reflectivity).max(0.0).min(1.0)
    }
}

impl BSDF for SpecularBSDF {
    fn scatter(&self, incident: &Vector3f, normal: &Vector3f, rng: &mut LcgRng) -> ScatterResult {
        let n = if incident.dot(normal) > 0.0 { -*normal } else { *normal };
        let unit = if incident.norm_squared() > 0.0 { incident.normalize() } else { *incident };

        let reflected = reflect(&unit, &n);
        let fuzzed = reflected + sample_uniform_ball(&rng.next_3d()) * self.fuzz();

        // Fuzz pushed the ray below the surface: the energy is lost.
        if fuzzed.dot(&n) <= 0.0 {
            return ScatterResult::absorbed(n);
        }

        ScatterResult::new(ScatterEvent::ReflectedSpecular, fuzzed.normalize(), self.albedo, n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_mirror_straight_down() {
        let bsdf = SpecularBSDF::new(RGBSpectrum::splat(1.0), 1.0);
        let mut rng = LcgRng::new(5);
        let result = bsdf.scatter(&Vector3f::new(0.0, -1.0, 0.0), &Vector3f::new(0.0, 1.0, 0.0), &mut rng);
        assert_eq!(result.event, ScatterEvent::ReflectedSpecular);
        assert_eq!(result.direction, Vector3f::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_fuzzed_mirror_never_goes_below() {
        let bsdf = SpecularBSDF::new(RGBSpectrum::splat(0.8), 0.0);
        let mut rng = LcgRng::new(9);
        let n = Vector3f::new(0.0, 1.0, 0.0);
        let mut absorbed = 0;
        for _ in 0..1000 {
            let result = bsdf.scatter(&Vector3f::new(1.0, -0.05, 0.0), &n, &mut rng);
            match result.event {
                ScatterEvent::ReflectedSpecular => assert!(result.direction.dot(&n) > 0.0),
                ScatterEvent::Absorbed => {
                    absorbed += 1;
                    assert!(result.attenuation.is_black());
                }
                other => panic!("unexpected event {:?}", other),
            }
        }
        assert!(absorbed > 0);
    }
}
