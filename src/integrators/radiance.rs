// Copyright @yucwang 2026

use crate::core::photon_map::PhotonMap;
use crate::math::constants::{Float, Vector3f, PI};
use crate::math::spectrum::RGBSpectrum;

/// Density estimate of diffusely reflected radiance from the k nearest
/// photons, weighted with a cone filter.
pub struct RadianceEstimator {
    cone_filter: Float,
    normalisation: Float,
}

impl RadianceEstimator {
    /// `cone_filter` must be greater than 2/3.
    pub fn new(cone_filter: Float) -> Self {
        Self {
            cone_filter,
            normalisation: 1.0 - 2.0 / (3.0 * cone_filter),
        }
    }

    pub fn estimate(&self, map: &PhotonMap, point: &Vector3f, diffuse_brdf: RGBSpectrum) -> RGBSpectrum {
        let neighbours = map.query(point);
        let r2 = match neighbours.last() {
            Some(furthest) => furthest.distance_squared,
            None => return RGBSpectrum::default(),
        };
        if !(r2 > 0.0) || !(self.normalisation > 0.0) {
            return RGBSpectrum::default();
        }

        let r = r2.sqrt();
        let mut flux = RGBSpectrum::default();
        for neighbour in &neighbours {
            let d = neighbour.distance_squared.sqrt();
            let weight = (1.0 - d / (r * self.cone_filter)).max(0.0);
            flux += neighbour.photon.power.clamp(0.0, std::f32::MAX) * weight;
        }

        diffuse_brdf.clamp(0.0, std::f32::MAX) * flux / (self.normalisation * 2.0 * PI * r2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::photon::{Photon, PhotonBuffer};

    fn ring_map(power: Float) -> PhotonMap {
        let mut photons = Vec::new();
        for i in 0..16 {
            let angle = i as Float * PI / 8.0;
            let radius = 0.1 + 0.05 * (i % 4) as Float;
            photons.push(Photon::new(Vector3f::new(radius * angle.cos(), 0.0, radius * angle.sin()),
                                     Vector3f::new(0.0, -1.0, 0.0),
                                     RGBSpectrum::splat(power)));
        }
        PhotonMap::build(&PhotonBuffer::from_photons(photons), 8, 10.0)
    }

    #[test]
    fn test_empty_neighbourhood_is_black() {
        let map = PhotonMap::build(&PhotonBuffer::with_capacity(4), 8, 1.0);
        let estimator = RadianceEstimator::new(1.1);
        assert!(estimator.estimate(&map, &Vector3f::zeros(), RGBSpectrum::splat(1.0)).is_black());

        let far = ring_map(1.0);
        let tight = PhotonMap::build(&PhotonBuffer::from_photons(far.photons().to_vec()), 8, 0.01);
        assert!(estimator.estimate(&tight, &Vector3f::zeros(), RGBSpectrum::splat(1.0)).is_black());
    }

    #[test]
    fn test_estimate_is_linear_in_power_and_repeatable() {
        let estimator = RadianceEstimator::new(1.1);
        let brdf = RGBSpectrum::new(1.0, 0.5, 0.25);
        let one = estimator.estimate(&ring_map(1.0), &Vector3f::zeros(), brdf);
        let two = estimator.estimate(&ring_map(2.0), &Vector3f::zeros(), brdf);
        assert!(one.r() > 0.0);
        assert!((two.r() - 2.0 * one.r()).abs() < 1e-4 * one.r());
        assert!((one.g() - 0.5 * one.r()).abs() < 1e-5 * one.r());

        let map = ring_map(1.0);
        let a = estimator.estimate(&map, &Vector3f::new(0.01, 0.0, 0.02), brdf);
        let b = estimator.estimate(&map, &Vector3f::new(0.01, 0.0, 0.02), brdf);
        assert_eq!(a, b);
    }

    #[test]
    fn test_single_photon_matches_closed_form() {
        let photon = Photon::new(Vector3f::new(0.5, 0.0, 0.0), Vector3f::new(0.0, -1.0, 0.0), RGBSpectrum::splat(3.0));
        let map = PhotonMap::build(&PhotonBuffer::from_photons(vec![photon]), 4, 10.0);
        let estimator = RadianceEstimator::new(2.0);
        let value = estimator.estimate(&map, &Vector3f::zeros(), RGBSpectrum::splat(1.0));
        // d == r: weight 1 - 1/k, area 2*pi*r^2, correction 1 - 2/(3k)
        let expected = 3.0 * 0.5 / ((1.0 - 1.0 / 3.0) * 2.0 * PI * 0.25);
        assert!((value.r() - expected).abs() < 1e-4);
    }
}
