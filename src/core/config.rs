// Copyright @yucwang 2026

use crate::math::constants::Float;
use crate::math::spectrum::RGBSpectrum;

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    ZeroPhotonBudget,
    ZeroNeighbours,
    ZeroCapacity,
    InvalidSearchRadius(Float),
    InvalidConeFilter(Float),
    NegativeBackground,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroPhotonBudget => write!(f, "photon budget must be positive"),
            ConfigError::ZeroNeighbours => write!(f, "nearest neighbour count must be positive"),
            ConfigError::ZeroCapacity => write!(f, "photon capacity must be positive"),
            ConfigError::InvalidSearchRadius(r) => write!(f, "search radius must be positive, got {}", r),
            ConfigError::InvalidConeFilter(k) => write!(f, "cone filter constant must exceed 2/3, got {}", k),
            ConfigError::NegativeBackground => write!(f, "background colour must be non-negative"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Runtime knobs of both passes.
#[derive(Debug, Clone, PartialEq)]
pub struct PhotonMappingConfig {
    /// Total photons emitted across all lights.
    pub photon_count: usize,
    pub max_photon_bounces: u32,
    /// Stored photon slots; further diffuse hits are dropped.
    pub photon_capacity: usize,
    /// The capacity was set on its own and no longer follows the budget.
    pub fixed_capacity: bool,
    /// Specular/refractive bounces per camera path.
    pub max_depth: u32,
    pub nearest_neighbours: usize,
    pub max_search_radius: Float,
    pub cone_filter: Float,
    pub samples_per_pixel: u32,
    pub background: RGBSpectrum,
    pub seed: u64,
}

pub const SKY_BLUE: (Float, Float, Float) = (42.0 / 255.0, 169.0 / 255.0, 238.0 / 255.0);

impl Default for PhotonMappingConfig {
    fn default() -> Self {
        let photon_count = 100_000;
        Self {
            photon_count,
            max_photon_bounces: 200,
            photon_capacity: photon_count * 8,
            fixed_capacity: false,
            max_depth: 16,
            nearest_neighbours: 32,
            max_search_radius: 50.0,
            cone_filter: 1.1,
            samples_per_pixel: 1,
            background: RGBSpectrum::new(SKY_BLUE.0, SKY_BLUE.1, SKY_BLUE.2),
            seed: 0,
        }
    }
}

impl PhotonMappingConfig {
    /// Change the budget. Unless the capacity was fixed with
    /// `with_photon_capacity`, it follows at eight slots per photon.
    pub fn with_photon_count(mut self, photon_count: usize) -> Self {
        self.photon_count = photon_count;
        if !self.fixed_capacity {
            self.photon_capacity = photon_count.saturating_mul(8);
        }
        self
    }

    pub fn with_photon_capacity(mut self, photon_capacity: usize) -> Self {
        self.photon_capacity = photon_capacity;
        self.fixed_capacity = true;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.photon_count == 0 {
            return Err(ConfigError::ZeroPhotonBudget);
        }
        if self.photon_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.nearest_neighbours == 0 {
            return Err(ConfigError::ZeroNeighbours);
        }
        if !(self.max_search_radius > 0.0) {
            return Err(ConfigError::InvalidSearchRadius(self.max_search_radius));
        }
        if !(self.cone_filter > 2.0 / 3.0) {
            return Err(ConfigError::InvalidConeFilter(self.cone_filter));
        }
        if !self.background.is_non_negative() {
            return Err(ConfigError::NegativeBackground);
        }
        Ok(())
    }
}
