// Copyright 2020 @TwoCookingMice

use super::constants::{ Float, Vector3f };

use std::ops;
use std::vec::Vec;

/// Row-major linear RGB framebuffer.
#[derive(Debug, Clone)]
pub struct Bitmap {
    data: Vec<Vector3f>,
    height: usize,
    width: usize
}

impl ops::Index<(usize, usize)> for Bitmap {
    type Output = Vector3f;

    fn index(&self, index: (usize, usize)) -> &Vector3f {
        let transformed_index = index.0 + self.width * index.1;
        &self.data[transformed_index]
    }
}

impl ops::IndexMut<(usize, usize)> for Bitmap {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut Vector3f {
        let transformed_index = index.0 + self.width * index.1;
        &mut self.data[transformed_index]
    }
}

impl Bitmap {
    pub fn new(width: usize, height: usize) -> Self {
        let pixel_number = width * height;
        Self { data: vec!(Vector3f::new(0.0, 0.0, 0.0);
                          pixel_number),
               width: width,
               height: height }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn raw_copy(&self) -> Vec<(Float, Float, Float)> {
        self.data.iter().map(|p| (p.x, p.y, p.z)).collect()
    }

    /// Flat `width * height * 4` RGBA8 buffer, gamma encoded with the sRGB
    /// curve and an opaque alpha channel.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.data.len() * 4);
        for p in &self.data {
            out.push(encode_srgb(p.x));
            out.push(encode_srgb(p.y));
            out.push(encode_srgb(p.z));
            out.push(255u8);
        }
        out
    }
}

fn encode_srgb(linear: Float) -> u8 {
    let c = if linear.is_finite() { linear.max(0.0).min(1.0) } else { 0.0 };
    let encoded = if c <= 0.0031308 {
        12.92 * c
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    };
    (encoded * 255.0 + 0.5) as u8
}

/* Test for Bitmap */
#[cfg(test)]
mod tests {
    use super::Bitmap;
    use super::{ Vector3f };

    #[test]
    fn test_bitmap_basic_functions() {
        let mut bitmap = Bitmap::new(256usize, 256usize);
        assert_eq!(bitmap.width(), 256);
        assert_eq!(bitmap.height(), 256);

        bitmap[(5, 6)] = Vector3f::new(1.0, 0.5, 0.6);
        assert!((bitmap[(5, 6)][0] - 1.0).abs() < 1e-6);
        assert!((bitmap[(2, 6)][0] - 0.0).abs() < 1e-6);
        assert_eq!(bitmap.raw_copy()[5 + 256 * 6], (1.0, 0.5, 0.6));
    }

    #[test]
    fn test_bitmap_rgba8() {
        let mut bitmap = Bitmap::new(2, 1);
        bitmap[(0, 0)] = Vector3f::new(1.0, 0.0, 4.0);
        bitmap[(1, 0)] = Vector3f::new(-1.0, std::f32::NAN, 0.5);

        let rgba = bitmap.to_rgba8();
        assert_eq!(rgba.len(), 8);
        assert_eq!(&rgba[0..4], &[255, 0, 255, 255]);
        assert_eq!(rgba[4], 0);
        assert_eq!(rgba[5], 0);
        assert_eq!(rgba[6], 188);
        assert_eq!(rgba[7], 255);
    }
}
