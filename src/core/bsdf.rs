// Copyright @yucwang 2023

use crate::core::rng::LcgRng;
use crate::math::constants::Vector3f;
use crate::math::spectrum::RGBSpectrum;

/// Classification of what happened to a ray at a surface (or in the void).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ScatterEvent {
    Missed,
    Absorbed,
    ReflectedDiffuse,
    ReflectedSpecular,
    Refraction,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScatterResult {
    pub event: ScatterEvent,
    /// Unit scattered direction; zero when absorbed.
    pub direction: Vector3f,
    /// Energy multiplier for the event.
    pub attenuation: RGBSpectrum,
    /// Shading normal after back-face correction (faces the incident ray).
    pub normal: Vector3f,
}

impl ScatterResult {
    pub fn new(event: ScatterEvent, direction: Vector3f,
               attenuation: RGBSpectrum, normal: Vector3f) -> Self {
        Self { event, direction, attenuation, normal }
    }

    pub fn absorbed(normal: Vector3f) -> Self {
        Self {
            event: ScatterEvent::Absorbed,
            direction: Vector3f::zeros(),
            attenuation: RGBSpectrum::default(),
            normal,
        }
    }
}

pub trait BSDF: Send + Sync {
    /// Scatter a ray arriving along `incident` (pointing towards the surface)
    /// at a surface with geometric normal `normal`. Total over all inputs.
    fn scatter(&self, incident: &Vector3f, normal: &Vector3f, rng: &mut LcgRng) -> ScatterResult;
}
