/* Copyright 2020 @Yuchen Wong */

use nalgebra as na;

pub type Float = f32;

pub type Vector2f = na::Vector2<Float>;
pub type Vector3f = na::Vector3<Float>;

pub const EPSILON: Float = 1e-4;
pub const PI: Float = 3.14159265359;

// Offset applied along the geometric normal when spawning secondary rays.
pub const RAY_OFFSET: Float = 1e-3;
