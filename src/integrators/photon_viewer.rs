// Copyright @yucwang 2026

use crate::core::integrator::Integrator;
use crate::core::intersector::Intersector;
use crate::core::photon_map::PhotonMap;
use crate::core::rng::LcgRng;
use crate::core::scene::Scene;
use crate::core::sensor::Sensor;
use crate::math::constants::{Float, Vector2f};
use crate::math::ray::Ray3f;
use crate::math::spectrum::RGBSpectrum;

const SURFACE_SHADE: Float = 0.2;

/// Debug view of a photon map: every visible point takes the colour of
/// the closest stored photon, or a dim surface shade when none is near.
pub struct PhotonViewerIntegrator {
    photon_map: PhotonMap,
    view_radius: Float,
    background: RGBSpectrum,
}

impl PhotonViewerIntegrator {
    pub fn new(photon_map: PhotonMap, view_radius: Float, background: RGBSpectrum) -> Self {
        Self { photon_map, view_radius, background }
    }

    pub fn shade<I: Intersector>(&self, oracle: &I, ray: &Ray3f) -> RGBSpectrum {
        let hit = match oracle.intersect(ray) {
            Some(hit) => hit,
            None => return self.background,
        };

        match self.photon_map.nearest(&hit.p, self.view_radius) {
            Some(neighbour) => {
                let power = neighbour.photon.power.clamp(0.0, std::f32::MAX);
                let peak = power.max_component();
                if peak > 0.0 { power / peak } else { power }
            }
            None => hit.material.albedo * SURFACE_SHADE,
        }
    }
}

impl Integrator for PhotonViewerIntegrator {
    fn trace_ray_forward(&self, scene: &Scene, sensor: &dyn Sensor, pixel: Vector2f, _rng: &mut LcgRng) -> RGBSpectrum {
        let u = Vector2f::new((pixel.x + 0.5) / sensor.width().max(1) as Float,
                              (pixel.y + 0.5) / sensor.height().max(1) as Float);
        self.shade(scene, &sensor.sample_ray(&u))
    }

    fn samples_per_pixel(&self) -> u32 {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::material::Material;
    use crate::core::photon::{Photon, PhotonBuffer};
    use crate::math::constants::Vector3f;
    use crate::shapes::rectangle::Rectangle;

    #[test]
    fn test_viewer_colours() {
        let mut scene = Scene::new();
        let id = scene.add_material(Material::lambertian(RGBSpectrum::splat(1.0)));
        scene.add_triangles(Rectangle::horizontal(Vector3f::zeros(), 4.0).triangles().to_vec(), id);
        scene.build_bvh();

        let photon = Photon::new(Vector3f::zeros(), Vector3f::new(0.0, -1.0, 0.0), RGBSpectrum::new(0.2, 0.1, 0.0));
        let map = PhotonMap::build(&PhotonBuffer::from_photons(vec![photon]), 1, 1.0);
        let viewer = PhotonViewerIntegrator::new(map, 0.1, RGBSpectrum::splat(0.7));

        let down = Vector3f::new(0.0, -1.0, 0.0);
        let near = viewer.shade(&scene, &Ray3f::new(Vector3f::new(0.01, 1.0, 0.0), down, None, None));
        assert_eq!(near, RGBSpectrum::new(1.0, 0.5, 0.0));

        let far = viewer.shade(&scene, &Ray3f::new(Vector3f::new(1.0, 1.0, 1.0), down, None, None));
        assert_eq!(far, RGBSpectrum::splat(SURFACE_SHADE));

        let sky = viewer.shade(&scene, &Ray3f::new(Vector3f::new(0.0, 1.0, 0.0), -down, None, None));
        assert_eq!(sky, RGBSpectrum::splat(0.7));
    }
}
