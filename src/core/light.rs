// Copyright @yucwang 2026

use crate::core::rng::LcgRng;
use crate::math::constants::{Float, Vector3f};
use crate::math::frame::Frame;
use crate::math::ray::Ray3f;
use crate::math::spectrum::RGBSpectrum;
use crate::math::warp::{sample_cosine_hemisphere, sample_uniform_sphere, square_to_centered_square};

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum LightShape {
    Point,
    /// Axis-free square of side `side_length` centred on the light position,
    /// emitting into the hemisphere of `normal`.
    Square { normal: Vector3f, side_length: Float },
}

#[derive(Debug, Clone)]
pub struct Light {
    shape: LightShape,
    position: Vector3f,
    power: Float,
    rgb: RGBSpectrum,
    num_photons: usize,
}

impl Light {
    pub fn point(position: Vector3f, power: Float, rgb: RGBSpectrum) -> Self {
        Self { shape: LightShape::Point, position, power, rgb, num_photons: 0 }
    }

    pub fn square(position: Vector3f, normal: Vector3f, side_length: Float,
                  power: Float, rgb: RGBSpectrum) -> Self {
        let normal = if normal.norm_squared() > 0.0 {
            normal.normalize()
        } else {
            Vector3f::new(0.0, -1.0, 0.0)
        };
        Self {
            shape: LightShape::Square { normal, side_length },
            position,
            power,
            rgb,
            num_photons: 0,
        }
    }

    pub fn shape(&self) -> &LightShape {
        &self.shape
    }

    pub fn position(&self) -> Vector3f {
        self.position
    }

    pub fn power(&self) -> Float {
        self.power.max(0.0)
    }

    pub fn rgb(&self) -> RGBSpectrum {
        self.rgb
    }

    pub fn num_photons(&self) -> usize {
        self.num_photons
    }

    /// Power carried by each emitted photon.
    pub fn photon_power(&self) -> RGBSpectrum {
        if self.num_photons == 0 {
            return RGBSpectrum::default();
        }
        self.rgb.clamp(0.0, std::f32::MAX) * (self.power() / self.num_photons as Float)
    }

    /// Origin and direction of one emitted photon.
    pub fn sample_emission(&self, rng: &mut LcgRng) -> Ray3f {
        match self.shape {
            LightShape::Point => {
                let dir = sample_uniform_sphere(&rng.next_2d());
                Ray3f::new(self.position, dir, None, None)
            }
            LightShape::Square { normal, side_length } => {
                let frame = Frame::from_normal(&normal);
                let offset = square_to_centered_square(&rng.next_2d()) * side_length;
                let origin = self.position + frame.x * offset.x + frame.y * offset.y;
                let local = sample_cosine_hemisphere(&rng.next_2d());
                let dir = frame.from_local(local);
                Ray3f::spawn(origin, normal, dir)
            }
        }
    }

    pub fn describe(&self) -> String {
        match self.shape {
            LightShape::Point => format!(
                "PointLight [position={:?}, power={}, photons={}]",
                self.position.as_slice(), self.power, self.num_photons),
            LightShape::Square { side_length, .. } => format!(
                "SquareLight [position={:?}, side={}, power={}, photons={}]",
                self.position.as_slice(), side_length, self.power, self.num_photons),
        }
    }
}

/// Split `budget` photons between `lights` in proportion to their power.
/// Returns the number of photons actually assigned, never more than `budget`.
pub fn assign_photon_quotas(lights: &mut [Light], budget: usize) -> usize {
    let total_power: Float = lights.iter().map(|l| l.power()).sum();
    if !(total_power > 0.0) {
        log::warn!("Scene lights carry no power; no photons will be emitted.");
        for light in lights.iter_mut() {
            light.num_photons = 0;
        }
        return 0;
    }

    let mut assigned = 0usize;
    for light in lights.iter_mut() {
        let quota = (light.power() as f64 * budget as f64 / total_power as f64).floor() as usize;
        light.num_photons = quota.min(budget - assigned);
        assigned += light.num_photons;
    }
    assigned
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quotas_follow_power() {
        let white = RGBSpectrum::splat(1.0);
        let mut lights = vec![
            Light::point(Vector3f::zeros(), 30.0, white),
            Light::point(Vector3f::zeros(), 10.0, white),
            Light::square(Vector3f::zeros(), Vector3f::new(0.0, -1.0, 0.0), 1.0, 60.0, white),
        ];
        let assigned = assign_photon_quotas(&mut lights, 1000);
        assert_eq!(lights[0].num_photons(), 300);
        assert_eq!(lights[1].num_photons(), 100);
        assert_eq!(lights[2].num_photons(), 600);
        assert!(assigned <= 1000);
    }

    #[test]
    fn test_quotas_never_exceed_budget() {
        let white = RGBSpectrum::splat(1.0);
        let mut lights: Vec<Light> = (0..7)
            .map(|i| Light::point(Vector3f::zeros(), 1.0 + i as Float, white))
            .collect();
        let assigned = assign_photon_quotas(&mut lights, 1001);
        let total: usize = lights.iter().map(|l| l.num_photons()).sum();
        assert_eq!(assigned, total);
        assert!(total <= 1001);
        assert!(total >= 1001 - lights.len());
    }

    #[test]
    fn test_zero_power_emits_nothing() {
        let mut lights = vec![Light::point(Vector3f::zeros(), 0.0, RGBSpectrum::splat(1.0))];
        assert_eq!(assign_photon_quotas(&mut lights, 100), 0);
        assert_eq!(lights[0].num_photons(), 0);
        assert!(lights[0].photon_power().is_black());
    }

    #[test]
    fn test_square_light_emits_into_its_hemisphere() {
        let normal = Vector3f::new(0.0, -1.0, 0.0);
        let light = Light::square(Vector3f::new(0.0, 5.0, 0.0), normal, 2.0, 1.0, RGBSpectrum::splat(1.0));
        let mut rng = LcgRng::new(4);
        for _ in 0..500 {
            let ray = light.sample_emission(&mut rng);
            assert!(ray.dir().dot(&normal) >= -1e-5);
            let o = ray.origin();
            assert!(o.x.abs() <= 1.0 + 1e-4 && o.z.abs() <= 1.0 + 1e-4);
            assert!(o.y < 5.0);
        }
    }
}
