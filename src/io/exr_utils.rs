/* Copyright 2020 @TwoCookingMice */

use super::ImageWriteError;
use crate::math::bitmap::Bitmap;

use exr::prelude::*;
use std::path::Path;

/// Linear HDR output, one 32-bit float per channel.
pub fn write_exr<P: AsRef<Path>>(bitmap: &Bitmap, path: P) -> std::result::Result<(), ImageWriteError> {
    let path = path.as_ref();
    log::info!("Starting writing openexr image: {}.", path.display());

    write_rgb_file(path, bitmap.width(), bitmap.height(), |x, y| {
        let p = bitmap[(x, y)];
        (p.x, p.y, p.z)
    })?;

    log::info!("EXR written to: {}.", path.display());
    Ok(())
}
