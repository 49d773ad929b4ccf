// Copyright @yucwang 2026

pub mod rectangle;
pub mod triangle;
pub mod triangle_mesh;
