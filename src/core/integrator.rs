// Copyright @yucwang 2026

use crate::core::scene::Scene;
use crate::core::rng::LcgRng;
use crate::core::sensor::Sensor;
use crate::math::constants::Vector2f;
use crate::math::spectrum::RGBSpectrum;

/// Per-pixel estimator driven by a renderer.
pub trait Integrator: Sync {
    /// One sample of pixel `pixel` (integer film coordinates).
    fn trace_ray_forward(&self, scene: &Scene, sensor: &dyn Sensor, pixel: Vector2f, rng: &mut LcgRng) -> RGBSpectrum;
    fn samples_per_pixel(&self) -> u32;
}
