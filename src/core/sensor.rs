// Copyright @yucwang 2026

use crate::math::constants::Vector2f;
use crate::math::ray::Ray3f;

pub trait Sensor: Send + Sync {
    /// Primary ray through normalised film coordinates `u` in `[0, 1]^2`,
    /// `(0, 0)` being the top-left corner.
    fn sample_ray(&self, u: &Vector2f) -> Ray3f;
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn describe(&self) -> String {
        String::from("Sensor")
    }
}
