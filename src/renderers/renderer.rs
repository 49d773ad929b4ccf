// Copyright @yucwang 2021

use crate::core::scene::Scene;
use crate::math::bitmap::Bitmap;

use std::fmt;

#[derive(Debug, PartialEq, Eq)]
pub enum RenderError {
    MissingCamera(usize),
    EmptyFilm,
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::MissingCamera(id) => write!(f, "scene has no camera with index {}", id),
            RenderError::EmptyFilm => write!(f, "camera film has zero pixels"),
        }
    }
}

impl std::error::Error for RenderError {}

pub trait Renderer {
    fn render(&self, scene: &Scene) -> Result<Bitmap, RenderError>;
}
