// Copyright 2020 @TwoCookingMice

use super::constants::{Float, Vector3f};

use std::ops;

/// Linear RGB triple used for albedo, photon power and radiance.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RGBSpectrum {
    rgb: Vector3f
}

impl Default for RGBSpectrum {
    fn default() -> Self {
        Self { rgb: Vector3f::new(0.0f32, 0.0f32, 0.0f32) }
    }
}

impl RGBSpectrum {
    pub fn new(r: Float, g: Float, b: Float) -> Self {
        Self { rgb: Vector3f::new(r, g, b) }
    }

    pub fn splat(v: Float) -> Self {
        Self::new(v, v, v)
    }

    pub fn from_vector(v: Vector3f) -> Self {
        Self { rgb: v }
    }

    pub fn to_vector(&self) -> Vector3f {
        self.rgb
    }

    pub fn r(&self) -> Float { self.rgb.x }
    pub fn g(&self) -> Float { self.rgb.y }
    pub fn b(&self) -> Float { self.rgb.z }

    pub fn is_black(&self) -> bool {
        self.rgb.iter().all(|c| *c == 0.0)
    }

    pub fn is_non_negative(&self) -> bool {
        self.rgb.iter().all(|c| *c >= 0.0)
    }

    pub fn max_component(&self) -> Float {
        self.rgb.x.max(self.rgb.y).max(self.rgb.z)
    }

    /// Clamp every channel into `[lo, hi]`.
    pub fn clamp(&self, lo: Float, hi: Float) -> Self {
        Self::new(self.rgb.x.max(lo).min(hi),
                  self.rgb.y.max(lo).min(hi),
                  self.rgb.z.max(lo).min(hi))
    }
}

impl ops::Index<usize> for RGBSpectrum {
    type Output = Float;

    fn index(&self, idx: usize) -> &Float {
        &self.rgb[idx]
    }
}

impl ops::Add for RGBSpectrum {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self { rgb: self.rgb + rhs.rgb }
    }
}

impl ops::AddAssign for RGBSpectrum {
    fn add_assign(&mut self, rhs: Self) {
        self.rgb += rhs.rgb;
    }
}

impl ops::Mul for RGBSpectrum {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self { rgb: self.rgb.component_mul(&rhs.rgb) }
    }
}

impl ops::MulAssign for RGBSpectrum {
    fn mul_assign(&mut self, rhs: Self) {
        self.rgb.component_mul_assign(&rhs.rgb);
    }
}

impl ops::Mul<Float> for RGBSpectrum {
    type Output = Self;

    fn mul(self, rhs: Float) -> Self {
        Self { rgb: self.rgb * rhs }
    }
}

impl ops::Div<Float> for RGBSpectrum {
    type Output = Self;

    fn div(self, rhs: Float) -> Self {
        Self { rgb: self.rgb / rhs }
    }
}

/* Tests for RGBSpectrum */

#[cfg(test)]
mod tests {
    use super::RGBSpectrum;

    #[test]
    fn test_spectrum_arithmetic() {
        let a = RGBSpectrum::new(1.0, 0.5, 0.25);
        let b = RGBSpectrum::splat(2.0);

        assert_eq!(a * b, RGBSpectrum::new(2.0, 1.0, 0.5));
        assert_eq!(a + b, RGBSpectrum::new(3.0, 2.5, 2.25));
        assert_eq!(a * 4.0, RGBSpectrum::new(4.0, 2.0, 1.0));
        assert_eq!((a / 0.5)[0], 2.0);
        assert_eq!(a.max_component(), 1.0);
    }

    #[test]
    fn test_spectrum_black() {
        assert!(RGBSpectrum::default().is_black());
        assert!(!RGBSpectrum::new(0.0, 0.0, 1e-6).is_black());
        assert!(!RGBSpectrum::new(0.0, -1.0, 0.0).is_non_negative());
    }
}
