// Copyright @yucwang 2026

use super::radiance::RadianceEstimator;
use crate::core::bsdf::ScatterEvent;
use crate::core::config::PhotonMappingConfig;
use crate::core::integrator::Integrator;
use crate::core::intersector::Intersector;
use crate::core::photon_map::PhotonMap;
use crate::core::rng::LcgRng;
use crate::core::scene::Scene;
use crate::core::sensor::Sensor;
use crate::math::constants::{Float, Vector2f, Vector3f};
use crate::math::ray::Ray3f;
use crate::math::spectrum::RGBSpectrum;

/// State of one camera path between bounces.
#[derive(Debug, Clone)]
pub struct PathState {
    pub ray: Ray3f,
    pub color: RGBSpectrum,
    pub attenuation: RGBSpectrum,
    pub event: ScatterEvent,
    /// Shading normal at the diffuse hit that ended the path.
    pub normal: Option<Vector3f>,
    pub depth: u32,
}

impl PathState {
    pub fn new(ray: Ray3f) -> Self {
        Self {
            ray,
            color: RGBSpectrum::default(),
            attenuation: RGBSpectrum::splat(1.0),
            event: ScatterEvent::Missed,
            normal: None,
            depth: 0,
        }
    }
}

/// Second pass: follows camera rays through mirrors and glass and reads the
/// frozen photon map at the first diffuse surface.
pub struct PhotonMappingIntegrator {
    photon_map: PhotonMap,
    estimator: RadianceEstimator,
    max_depth: u32,
    samples_per_pixel: u32,
    background: RGBSpectrum,
}

impl PhotonMappingIntegrator {
    pub fn new(photon_map: PhotonMap,
               estimator: RadianceEstimator,
               max_depth: u32,
               samples_per_pixel: u32,
               background: RGBSpectrum) -> Self {
        Self { photon_map, estimator, max_depth, samples_per_pixel, background }
    }

    pub fn from_config(photon_map: PhotonMap, config: &PhotonMappingConfig) -> Self {
        Self::new(photon_map,
                  RadianceEstimator::new(config.cone_filter),
                  config.max_depth,
                  config.samples_per_pixel,
                  config.background)
    }

    /// Walk one camera ray to completion.
    pub fn trace_path<I: Intersector>(&self, oracle: &I, ray: Ray3f, rng: &mut LcgRng) -> PathState {
        let mut state = PathState::new(ray);

        while state.depth < self.max_depth {
            let hit = match oracle.intersect(&state.ray) {
                Some(hit) => hit,
                None => {
                    state.event = ScatterEvent::Missed;
                    state.color += state.attenuation * self.background;
                    break;
                }
            };

            let scatter = hit.material.scatter(&state.ray.dir(), &hit.normal, rng);
            state.event = scatter.event;
            match scatter.event {
                ScatterEvent::ReflectedDiffuse => {
                    state.normal = Some(scatter.normal);
                    let radiance = self.estimator.estimate(&self.photon_map, &hit.p, hit.material.diffuse_brdf());
                    state.color += state.attenuation * radiance;
                    break;
                }
                ScatterEvent::ReflectedSpecular | ScatterEvent::Refraction => {
                    state.attenuation *= scatter.attenuation;
                    state.ray = Ray3f::spawn(hit.p, hit.normal, scatter.direction);
                    state.depth += 1;
                }
                ScatterEvent::Absorbed | ScatterEvent::Missed => break,
            }
        }

        state
    }

    pub fn radiance<I: Intersector>(&self, oracle: &I, ray: Ray3f, rng: &mut LcgRng) -> RGBSpectrum {
        self.trace_path(oracle, ray, rng).color
    }
}

impl Integrator for PhotonMappingIntegrator {
    fn trace_ray_forward(&self, scene: &Scene, sensor: &dyn Sensor, pixel: Vector2f, rng: &mut LcgRng) -> RGBSpectrum {
        let jitter = if self.samples_per_pixel > 1 {
            rng.next_2d()
        } else {
            Vector2f::new(0.5, 0.5)
        };
        let u = Vector2f::new((pixel.x + jitter.x) / sensor.width().max(1) as Float,
                              (pixel.y + jitter.y) / sensor.height().max(1) as Float);
        let ray = sensor.sample_ray(&u);
        self.radiance(scene, ray, rng)
    }

    fn samples_per_pixel(&self) -> u32 {
        self.samples_per_pixel
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::material::Material;
    use crate::core::photon::{Photon, PhotonBuffer};
    use crate::shapes::rectangle::Rectangle;

    fn uniform_photons(power: Float) -> PhotonBuffer {
        let mut photons = Vec::new();
        for i in 0..21 {
            for j in 0..21 {
                let x = -1.0 + 0.1 * i as Float;
                let z = -1.0 + 0.1 * j as Float;
                photons.push(Photon::new(Vector3f::new(x, 0.0, z), Vector3f::new(0.0, -1.0, 0.0), RGBSpectrum::splat(power)));
            }
        }
        PhotonBuffer::from_photons(photons)
    }

    fn integrator(max_depth: u32) -> PhotonMappingIntegrator {
        let map = PhotonMap::build(&uniform_photons(0.01), 16, 5.0);
        PhotonMappingIntegrator::new(map, RadianceEstimator::new(1.1), max_depth, 1, RGBSpectrum::new(0.1, 0.2, 0.3))
    }

    fn scene_with(material: Material) -> Scene {
        let mut scene = Scene::new();
        let id = scene.add_material(material);
        scene.add_triangles(Rectangle::horizontal(Vector3f::zeros(), 4.0).triangles().to_vec(), id);
        scene.build_bvh();
        scene
    }

    #[test]
    fn test_miss_returns_background() {
        let scene = scene_with(Material::lambertian(RGBSpectrum::splat(1.0)));
        let ray = Ray3f::new(Vector3f::new(0.0, 1.0, 0.0), Vector3f::new(0.0, 1.0, 0.0), None, None);
        let mut rng = LcgRng::new(0);
        let state = integrator(8).trace_path(&scene, ray, &mut rng);
        assert_eq!(state.event, ScatterEvent::Missed);
        assert_eq!(state.color, RGBSpectrum::new(0.1, 0.2, 0.3));
    }

    #[test]
    fn test_diffuse_hit_gathers_photons() {
        let scene = scene_with(Material::lambertian(RGBSpectrum::splat(1.0)));
        let ray = Ray3f::new(Vector3f::new(0.02, 1.0, 0.03), Vector3f::new(0.0, -1.0, 0.0), None, None);
        let mut rng = LcgRng::new(0);
        let state = integrator(8).trace_path(&scene, ray, &mut rng);
        assert_eq!(state.event, ScatterEvent::ReflectedDiffuse);
        assert!(state.color.r() > 0.0);
        assert!(state.color.is_non_negative());
        let normal = state.normal.expect("diffuse hit records its normal");
        assert!(normal.y > 0.99);
    }

    #[test]
    fn test_mirror_sees_the_sky_tinted() {
        let scene = scene_with(Material::specular(RGBSpectrum::splat(0.5), 1.0));
        let ray = Ray3f::new(Vector3f::new(0.0, 1.0, 0.0), Vector3f::new(0.0, -1.0, 0.0), None, None);
        let mut rng = LcgRng::new(0);
        let state = integrator(8).trace_path(&scene, ray, &mut rng);
        assert_eq!(state.depth, 1);
        assert!((state.color.b() - 0.15).abs() < 1e-6);
    }

    #[test]
    fn test_depth_cap_keeps_accumulated_colour() {
        let scene = scene_with(Material::specular(RGBSpectrum::splat(0.5), 1.0));
        let ray = Ray3f::new(Vector3f::new(0.0, 1.0, 0.0), Vector3f::new(0.0, -1.0, 0.0), None, None);
        let mut rng = LcgRng::new(0);
        let state = integrator(1).trace_path(&scene, ray, &mut rng);
        assert_eq!(state.depth, 1);
        assert!(state.color.is_black());
    }
}
