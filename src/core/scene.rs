// Copyright @yucwang 2026

use crate::core::bvh::BVH;
use crate::core::interaction::{SurfaceHit, SurfaceIntersection};
use crate::core::intersector::Intersector;
use crate::core::light::{assign_photon_quotas, Light};
use crate::core::material::Material;
use crate::core::sensor::Sensor;
use crate::math::bounds::Bounds3f;
use crate::math::ray::Ray3f;
use crate::shapes::triangle::Triangle;

/// A world-space triangle tagged with the index of its material.
#[derive(Debug, Copy, Clone)]
pub struct SceneTriangle {
    pub triangle: Triangle,
    pub material: usize,
}

/// Immutable geometry, materials and lights consumed by both passes.
pub struct Scene {
    triangles: Vec<SceneTriangle>,
    materials: Vec<Material>,
    lights: Vec<Light>,
    sensors: Vec<Box<dyn Sensor>>,
    base_dir: std::path::PathBuf,
    bvh: Option<BVH>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self {
            triangles: Vec::new(),
            materials: Vec::new(),
            lights: Vec::new(),
            sensors: Vec::new(),
            base_dir: std::path::PathBuf::new(),
            bvh: None,
        }
    }

    pub fn add_material(&mut self, material: Material) -> usize {
        self.materials.push(material);
        self.materials.len() - 1
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    /// Attach triangles to an existing material. Degenerate triangles are
    /// dropped; unknown material ids fall back to a new default material.
    pub fn add_triangles<I>(&mut self, triangles: I, material: usize)
    where
        I: IntoIterator<Item = Triangle>,
    {
        let material = if material < self.materials.len() {
            material
        } else {
            log::warn!("Unknown material id {}; using a default diffuse material.", material);
            self.add_material(Material::default())
        };
        self.triangles.extend(
            triangles
                .into_iter()
                .filter(|t| !t.is_degenerate())
                .map(|triangle| SceneTriangle { triangle, material }),
        );
        self.bvh = None;
    }

    pub fn triangles(&self) -> &[SceneTriangle] {
        &self.triangles
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// Distribute the photon budget over the lights. Returns the photons
    /// assigned in total.
    pub fn assign_photon_quotas(&mut self, budget: usize) -> usize {
        let assigned = assign_photon_quotas(&mut self.lights, budget);
        for light in &self.lights {
            log::info!("{}", light.describe());
        }
        assigned
    }

    pub fn add_sensor(&mut self, sensor: Box<dyn Sensor>) {
        self.sensors.push(sensor);
    }

    pub fn camera(&self, camera_id: usize) -> Option<&dyn Sensor> {
        self.sensors.get(camera_id).map(|s| s.as_ref())
    }

    pub fn sensor_count(&self) -> usize {
        self.sensors.len()
    }

    pub fn set_base_dir(&mut self, base_dir: std::path::PathBuf) {
        self.base_dir = base_dir;
    }

    pub fn base_dir(&self) -> &std::path::Path {
        &self.base_dir
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn build_bvh(&mut self) {
        let prim_bounds: Vec<Bounds3f> = self.triangles.iter().map(|t| t.triangle.bounding_box()).collect();
        let mut scene_bounds = Bounds3f::empty();
        for b in &prim_bounds {
            scene_bounds.union(b);
        }

        self.bvh = Some(BVH::build(&prim_bounds));
        log::info!("BVH built over {} triangles, {} materials, {} lights.",
                   self.triangles.len(), self.materials.len(), self.lights.len());
        log::debug!("Scene extent {:?} to {:?}.", scene_bounds.lo, scene_bounds.hi);
    }

    fn hit_record(&self, idx: usize, intersection: &SurfaceIntersection) -> Option<SurfaceHit<'_>> {
        let tri = &self.triangles[idx];
        let material = self.materials.get(tri.material)?;
        Some(intersection.with_material(material, tri.material))
    }
}

impl Intersector for Scene {
    fn intersect(&self, ray: &Ray3f) -> Option<SurfaceHit<'_>> {
        match &self.bvh {
            Some(bvh) => {
                let (idx, hit) = bvh.closest_hit(ray, |prim_idx, ray| {
                    self.triangles[prim_idx].triangle.ray_intersection(ray).map(|h| (h, h.t()))
                })?;
                self.hit_record(idx, &hit)
            }
            None => {
                // Not yet built: brute force over all triangles.
                let mut ray = *ray;
                let mut closest: Option<(usize, SurfaceIntersection)> = None;
                for (idx, tri) in self.triangles.iter().enumerate() {
                    if let Some(hit) = tri.triangle.ray_intersection(&ray) {
                        if ray.update(hit.t()) {
                            closest = Some((idx, hit));
                        }
                    }
                }
                let (idx, hit) = closest?;
                self.hit_record(idx, &hit)
            }
        }
    }
}
