// Copyright @yucwang 2026

use crate::math::constants::{Float, Vector2f, Vector3f};

/// Per-task pseudo random stream. Never shared between rays or photons.
#[derive(Debug, Clone)]
pub struct LcgRng {
    state: u64,
}

impl LcgRng {
    pub fn new(seed: u64) -> Self {
        // Scramble so that neighbouring seeds do not start on correlated states.
        Self { state: mix_seed(seed) }
    }

    /// Stream keyed by a pass seed and two task coordinates
    /// (pixel x/y, or light index/photon index).
    pub fn for_task(seed: u64, a: u64, b: u64) -> Self {
        Self::new(seed ^ mix_seed(a.wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ b))
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (self.state >> 32) as u32
    }

    /// Uniform float in `[0, 1)`.
    pub fn next_f32(&mut self) -> Float {
        (self.next_u32() >> 8) as Float * (1.0 / 16777216.0)
    }

    pub fn next_2d(&mut self) -> Vector2f {
        let x = self.next_f32();
        let y = self.next_f32();
        Vector2f::new(x, y)
    }

    pub fn next_3d(&mut self) -> Vector3f {
        let x = self.next_f32();
        let y = self.next_f32();
        let z = self.next_f32();
        Vector3f::new(x, y, z)
    }
}

// splitmix64 finaliser
fn mix_seed(seed: u64) -> u64 {
    let mut z = seed.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
