// Copyright @yucwang 2021

use crate::core::integrator::Integrator;
use crate::core::rng::LcgRng;
use crate::core::scene::Scene;
use crate::core::sensor::Sensor;
use crate::math::bitmap::Bitmap;
use crate::math::constants::{Float, Vector2f, Vector3f};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;

pub use super::renderer::{RenderError, Renderer};

const BLOCK_SIZE: usize = 32;

/// Tile-parallel renderer: worker threads pull pixel blocks from a shared
/// counter and send finished tiles back to the caller.
pub struct SimpleRenderer {
    integrator: Box<dyn Integrator>,
    camera_id: usize,
    seed: u64,
}

impl Renderer for SimpleRenderer {
    fn render(&self, scene: &Scene) -> Result<Bitmap, RenderError> {
        let sensor = scene
            .camera(self.camera_id)
            .ok_or(RenderError::MissingCamera(self.camera_id))?;

        let (width, height) = (sensor.width(), sensor.height());
        if width == 0 || height == 0 {
            return Err(RenderError::EmptyFilm);
        }
        log::info!("Rendering {} with {}x{} pixels.", sensor.describe(), width, height);

        let spp = match self.integrator.samples_per_pixel() {
            0 => 1,
            v => v,
        };
        let inv_spp = 1.0 / (spp as Float);

        let blocks_x = (width + BLOCK_SIZE - 1) / BLOCK_SIZE;
        let blocks_y = (height + BLOCK_SIZE - 1) / BLOCK_SIZE;
        let total_blocks = blocks_x * blocks_y;
        let integrator_ref: &dyn Integrator = self.integrator.as_ref();

        let progress = ProgressBar::new(total_blocks as u64);
        progress.set_style(
            ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} blocks")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        let next_block = AtomicUsize::new(0);
        let thread_count = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let (tx, rx) = mpsc::channel::<(usize, usize, usize, usize, Vec<Vector3f>)>();
        let mut bitmap = Bitmap::new(width, height);

        thread::scope(|scope| {
            for _ in 0..thread_count {
                let next_block = &next_block;
                let tx = tx.clone();
                scope.spawn(move || {
                    loop {
                        let block_index = next_block.fetch_add(1, Ordering::Relaxed);
                        if block_index >= total_blocks {
                            break;
                        }

                        let x0 = (block_index % blocks_x) * BLOCK_SIZE;
                        let y0 = (block_index / blocks_x) * BLOCK_SIZE;
                        let x1 = (x0 + BLOCK_SIZE).min(width);
                        let y1 = (y0 + BLOCK_SIZE).min(height);

                        let mut block = Vec::with_capacity((x1 - x0) * (y1 - y0));
                        for y in y0..y1 {
                            for x in x0..x1 {
                                block.push(self.render_pixel(scene, sensor, integrator_ref, x, y, spp) * inv_spp);
                            }
                        }
                        if tx.send((x0, y0, x1, y1, block)).is_err() {
                            break;
                        }
                    }
                });
            }

            drop(tx);
            for _ in 0..total_blocks {
                if let Ok((x0, y0, x1, y1, block)) = rx.recv() {
                    let block_width = x1 - x0;
                    for y in y0..y1 {
                        for x in x0..x1 {
                            bitmap[(x, y)] = block[(x - x0) + block_width * (y - y0)];
                        }
                    }
                    progress.inc(1);
                }
            }
        });
        progress.finish_and_clear();
        log::info!("Render finished.");

        Ok(bitmap)
    }
}

impl SimpleRenderer {
    pub fn new(integrator: Box<dyn Integrator>, camera_id: usize, seed: u64) -> Self {
        Self {
            integrator,
            camera_id,
            seed,
        }
    }

    fn render_pixel(&self,
                    scene: &Scene,
                    sensor: &dyn Sensor,
                    integrator: &dyn Integrator,
                    x: usize,
                    y: usize,
                    spp: u32) -> Vector3f {
        let pixel = Vector2f::new(x as Float, y as Float);
        let mut rng = LcgRng::for_task(self.seed, x as u64, y as u64);
        let mut color = Vector3f::zeros();
        for _sample in 0..spp {
            color += integrator.trace_ray_forward(scene, sensor, pixel, &mut rng).to_vector();
        }
        color
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::ray::Ray3f;
    use crate::math::spectrum::RGBSpectrum;

    struct Gradient;

    impl Integrator for Gradient {
        fn trace_ray_forward(&self, _scene: &Scene, _sensor: &dyn Sensor, pixel: Vector2f, rng: &mut LcgRng) -> RGBSpectrum {
            RGBSpectrum::new(pixel.x, pixel.y, rng.next_f32())
        }

        fn samples_per_pixel(&self) -> u32 {
            4
        }
    }

    struct Film {
        width: usize,
        height: usize,
    }

    impl Sensor for Film {
        fn sample_ray(&self, _u: &Vector2f) -> Ray3f {
            Ray3f::new(Vector3f::zeros(), Vector3f::new(0.0, 0.0, 1.0), None, None)
        }

        fn width(&self) -> usize {
            self.width
        }

        fn height(&self) -> usize {
            self.height
        }
    }

    #[test]
    fn test_render_fills_every_pixel_deterministically() {
        let mut scene = Scene::new();
        scene.add_sensor(Box::new(Film { width: 70, height: 40 }));

        let renderer = SimpleRenderer::new(Box::new(Gradient), 0, 5);
        let a = renderer.render(&scene).expect("render failed");
        let b = renderer.render(&scene).expect("render failed");
        assert_eq!(a.width(), 70);
        assert_eq!(a.height(), 40);
        assert!((a[(69, 39)].x - 69.0).abs() < 1e-4);
        assert!((a[(3, 17)].y - 17.0).abs() < 1e-4);
        assert_eq!(a.raw_copy(), b.raw_copy());
    }

    #[test]
    fn test_missing_camera() {
        let scene = Scene::new();
        let renderer = SimpleRenderer::new(Box::new(Gradient), 0, 0);
        assert!(matches!(renderer.render(&scene), Err(RenderError::MissingCamera(0))));
    }
}
