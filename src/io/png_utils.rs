// Copyright @yucwang 2026

use super::ImageWriteError;
use crate::math::bitmap::Bitmap;

use std::path::Path;

pub fn write_png<P: AsRef<Path>>(bitmap: &Bitmap, path: P) -> Result<(), ImageWriteError> {
    let path = path.as_ref();
    image::save_buffer(path,
                       &bitmap.to_rgba8(),
                       bitmap.width() as u32,
                       bitmap.height() as u32,
                       image::ColorType::Rgba8)?;
    log::info!("PNG written to: {}.", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::constants::Vector3f;

    #[test]
    fn test_write_png_then_read_back() {
        let mut bitmap = Bitmap::new(2, 2);
        bitmap[(1, 0)] = Vector3f::new(1.0, 0.0, 0.0);
        let path = std::env::temp_dir().join("praline_png_utils_test.png");
        write_png(&bitmap, &path).expect("write failed");

        let decoded = image::open(&path).expect("read failed").to_rgba8();
        assert_eq!(decoded.dimensions(), (2, 2));
        assert_eq!(decoded.get_pixel(1, 0).0, [255, 0, 0, 255]);
        assert_eq!(decoded.get_pixel(0, 1).0, [0, 0, 0, 255]);
        let _ = std::fs::remove_file(&path);
    }
}
