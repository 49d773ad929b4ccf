// Copyright @yucwang 2026

pub mod exr_utils;
pub mod obj_utils;
pub mod photon_io;
pub mod png_utils;

use std::fmt;
use std::path::Path;

use crate::math::bitmap::Bitmap;

#[derive(Debug)]
pub enum ImageWriteError {
    Exr(exr::error::Error),
    Png(image::ImageError),
    UnsupportedFormat(String),
}

impl From<exr::error::Error> for ImageWriteError {
    fn from(err: exr::error::Error) -> Self {
        ImageWriteError::Exr(err)
    }
}

impl From<image::ImageError> for ImageWriteError {
    fn from(err: image::ImageError) -> Self {
        ImageWriteError::Png(err)
    }
}

impl fmt::Display for ImageWriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageWriteError::Exr(err) => write!(f, "exr write error: {}", err),
            ImageWriteError::Png(err) => write!(f, "png write error: {}", err),
            ImageWriteError::UnsupportedFormat(ext) => write!(f, "unsupported image extension: '{}'", ext),
        }
    }
}

impl std::error::Error for ImageWriteError {}

/// Write `bitmap` in the format named by the file extension.
pub fn write_image<P: AsRef<Path>>(bitmap: &Bitmap, path: P) -> Result<(), ImageWriteError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "exr" => exr_utils::write_exr(bitmap, path),
        "png" => png_utils::write_png(bitmap, path),
        _ => Err(ImageWriteError::UnsupportedFormat(extension)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_extension_is_rejected() {
        let bitmap = Bitmap::new(1, 1);
        let result = write_image(&bitmap, std::env::temp_dir().join("praline_out.tiff"));
        assert!(matches!(result, Err(ImageWriteError::UnsupportedFormat(ref ext)) if ext == "tiff"));
    }
}
