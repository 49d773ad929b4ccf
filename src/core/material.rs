// Copyright @yucwang 2026

use crate::core::bsdf::{ScatterResult, BSDF};
use crate::core::rng::LcgRng;
use crate::materials::dielectric::DielectricBSDF;
use crate::materials::lambertian::LambertianBSDF;
use crate::materials::specular::SpecularBSDF;
use crate::math::constants::{Float, Vector3f};
use crate::math::spectrum::RGBSpectrum;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MaterialType {
    Lambertian,
    Specular,
    Dielectric,
}

/// Surface description shared by all triangles that reference it.
///
/// `diffuse + specular + transmission` is expected to stay at or below one;
/// nothing here renormalises it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Material {
    pub kind: MaterialType,
    pub albedo: RGBSpectrum,
    pub diffuse: Float,
    pub specular: Float,
    pub transmission: Float,
    pub ior: Float,
}

impl Material {
    pub fn lambertian(albedo: RGBSpectrum) -> Self {
        Self {
            kind: MaterialType::Lambertian,
            albedo,
            diffuse: 1.0,
            specular: 0.0,
            transmission: 0.0,
            ior: 1.0,
        }
    }

    /// `reflectivity` of one gives a perfect mirror; lower values fuzz the lobe.
    pub fn specular(albedo: RGBSpectrum, reflectivity: Float) -> Self {
        Self {
            kind: MaterialType::Specular,
            albedo,
            diffuse: 0.0,
            specular: reflectivity,
            transmission: 0.0,
            ior: 1.0,
        }
    }

    pub fn dielectric(albedo: RGBSpectrum, ior: Float) -> Self {
        Self {
            kind: MaterialType::Dielectric,
            albedo,
            diffuse: 0.0,
            specular: 0.0,
            transmission: 1.0,
            ior,
        }
    }

    /// Material described only by its coefficients. The dominant coefficient
    /// picks the behaviour; ties favour diffuse, then specular.
    pub fn from_coefficients(albedo: RGBSpectrum,
                             diffuse: Float,
                             specular: Float,
                             transmission: Float,
                             ior: Float) -> Self {
        let kind = if diffuse >= specular && diffuse >= transmission {
            MaterialType::Lambertian
        } else if specular >= transmission {
            MaterialType::Specular
        } else {
            MaterialType::Dielectric
        };
        Self { kind, albedo, diffuse, specular, transmission, ior }
    }

    /// Coefficient fed to the radiance estimate at a diffuse hit.
    pub fn diffuse_brdf(&self) -> RGBSpectrum {
        self.albedo * self.diffuse
    }

    /// Chance that a photon keeps going after a diffuse hit: the reflected
    /// share of its energy, capped by the brightest albedo channel.
    pub fn survival_probability(&self) -> Float {
        (self.diffuse * self.albedo.max_component()).max(0.0).min(1.0)
    }

    pub fn scatter(&self, incident: &Vector3f, normal: &Vector3f, rng: &mut LcgRng) -> ScatterResult {
        match self.kind {
            MaterialType::Lambertian => LambertianBSDF::new(self.albedo).scatter(incident, normal, rng),
            MaterialType::Specular => SpecularBSDF::new(self.albedo, self.specular).scatter(incident, normal, rng),
            MaterialType::Dielectric => DielectricBSDF::new(self.albedo, self.ior).scatter(incident, normal, rng),
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Material::lambertian(RGBSpectrum::splat(0.5))
    }
}
