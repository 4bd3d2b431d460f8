//! Frame driver.
//!
//! Owns the worker pool and the output raster. Each frame generates one
//! primary ray per pixel, cuts the rays into tasks, hands them to the pool
//! and blocks until every worker is idle again.

use std::sync::Arc;
use std::time::{Duration, Instant};

use lumen_core::Camera;
use lumen_math::Ray;
use thiserror::Error;

use crate::context::RenderContext;
use crate::frame::{Frame, SharedRaster};
use crate::pool::{PoolError, ThreadPool};
use crate::raygen::generate_rays;
use crate::task::{build_tasks, RenderWorker};

/// Something that shows finished frames.
pub trait Display {
    fn present(&mut self, frame: &Frame) -> anyhow::Result<()>;
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Thread pool error: {0}")]
    Pool(#[from] PoolError),

    #[error("Invalid resolution {width}x{height}")]
    InvalidResolution { width: u32, height: u32 },
}

/// Summary of one produced frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    pub rays: usize,
    pub tasks: usize,
    pub elapsed: Duration,
}

impl FrameStats {
    /// Rays traced per second, 0 for an instant frame.
    pub fn rays_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.rays as f64 / secs
        } else {
            0.0
        }
    }
}

/// Multithreaded frame renderer.
pub struct Renderer {
    pool: ThreadPool<RenderWorker>,
    raster: SharedRaster,
    frames: u64,
}

impl Renderer {
    /// Start a renderer with `context.config.threads` workers.
    pub fn new(context: RenderContext, width: u32, height: u32) -> Result<Self, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidResolution { width, height });
        }

        let threads = context.config.threads;
        let worker = RenderWorker::new(Arc::new(context));
        let pool = ThreadPool::new("render", threads, worker)?;

        log::info!("Renderer ready: {}x{}, {} threads", width, height, threads);

        Ok(Self {
            pool,
            raster: SharedRaster::new(width, height),
            frames: 0,
        })
    }

    pub fn context(&self) -> &RenderContext {
        self.pool.handler().context()
    }

    pub fn width(&self) -> u32 {
        self.raster.width()
    }

    pub fn height(&self) -> u32 {
        self.raster.height()
    }

    /// Frames produced so far.
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Render one frame from `camera` into the raster.
    ///
    /// Returns once every task has completed.
    pub fn produce_frame(&mut self, camera: &Camera) -> FrameStats {
        let start = Instant::now();

        let rays: Arc<[Ray]> = generate_rays(camera, self.width(), self.height()).into();
        let task_size = self.context().config.task_size;
        let tasks = build_tasks(Arc::clone(&rays), &self.raster, task_size);
        let task_count = tasks.len();

        self.raster.clear();
        let dispatch = self.pool.add_tasks(tasks);
        if dispatch.rejected > 0 {
            log::error!("Frame {}: {} tasks rejected", self.frames, dispatch.rejected);
        }
        self.pool.wait_idle();

        self.frames += 1;
        let stats = FrameStats {
            rays: rays.len(),
            tasks: task_count,
            elapsed: start.elapsed(),
        };
        log::debug!(
            "Frame {}: {} rays in {} tasks, {:.2?}",
            self.frames,
            stats.rays,
            stats.tasks,
            stats.elapsed
        );
        stats
    }

    /// Copy of the most recently produced frame.
    pub fn frame(&self) -> Frame {
        self.raster.snapshot()
    }

    /// Hand the current frame to `display`.
    pub fn display_frame(&self, display: &mut dyn Display) -> anyhow::Result<()> {
        display.present(&self.frame())
    }

    /// Stop and join the worker threads. Later frames render nothing.
    pub fn shutdown(&mut self) {
        self.pool.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::RenderConfig;
    use crate::frame::pack_rgba;
    use lumen_core::{Light, Material, MaterialId, MaterialTable, Object, Scene};
    use lumen_math::{DVec3, Rotation};

    struct Capture {
        frames: Vec<Frame>,
    }

    impl Display for Capture {
        fn present(&mut self, frame: &Frame) -> anyhow::Result<()> {
            self.frames.push(frame.clone());
            Ok(())
        }
    }

    fn context(threads: usize, task_size: usize) -> RenderContext {
        let mut scene = Scene::new("renderer");
        let mut materials = MaterialTable::new();
        materials.insert(MaterialId(1), Material::diffuse(DVec3::new(0.0, 0.0, 255.0)));
        materials.insert(MaterialId(2), Material::new(DVec3::new(255.0, 50.0, 200.0), 0.3, 0.3));
        scene.add_object(Object::sphere(DVec3::new(0.0, 0.0, -5.0), MaterialId(1)));
        scene.add_object(Object::sphere(DVec3::new(1.5, 1.0, -7.0), MaterialId(2)));
        scene.add_light(Light::new(DVec3::ZERO));

        let config = RenderConfig {
            threads,
            task_size,
            ..RenderConfig::default()
        };
        RenderContext::new(scene, materials, config)
    }

    fn camera() -> Camera {
        Camera::new(DVec3::ZERO, Rotation::IDENTITY, 90.0)
    }

    #[test]
    fn test_single_pixel_is_deterministic() {
        let _ = env_logger::builder().is_test(true).try_init();

        let mut colors = Vec::new();
        for threads in [1, 4] {
            let mut renderer = Renderer::new(context(threads, 1), 1, 1).unwrap();
            for _ in 0..3 {
                let stats = renderer.produce_frame(&camera());
                assert_eq!(stats.rays, 1);
                assert_eq!(stats.tasks, 1);
                colors.push(renderer.frame().get_pixel(0, 0));
            }
        }

        assert!(colors.iter().all(|c| *c == Some(pack_rgba([0, 0, 255]))));
    }

    #[test]
    fn test_frame_independent_of_threads_and_task_size() {
        let mut single = Renderer::new(context(1, 4096), 32, 24).unwrap();
        single.produce_frame(&camera());
        let reference = single.frame();

        let mut parallel = Renderer::new(context(4, 7), 32, 24).unwrap();
        let stats = parallel.produce_frame(&camera());
        assert_eq!(stats.rays, 32 * 24);
        assert_eq!(stats.tasks, (32 * 24 + 6) / 7);

        assert_eq!(parallel.frame(), reference);
    }

    #[test]
    fn test_every_pixel_written() {
        let mut renderer = Renderer::new(context(3, 10), 16, 9).unwrap();
        renderer.produce_frame(&camera());

        // Every written pixel carries full alpha, even black ones
        let frame = renderer.frame();
        assert!(frame.pixels().iter().all(|p| p & 0xFF == 0xFF));
        assert_eq!(renderer.frame_count(), 1);
    }

    #[test]
    fn test_display_frame() {
        let mut renderer = Renderer::new(context(2, 16), 8, 8).unwrap();
        let mut display = Capture { frames: Vec::new() };

        renderer.produce_frame(&camera());
        renderer.display_frame(&mut display).unwrap();

        assert_eq!(display.frames.len(), 1);
        assert_eq!(display.frames[0], renderer.frame());
        assert_eq!((display.frames[0].width, display.frames[0].height), (8, 8));
    }

    #[test]
    fn test_invalid_setup() {
        assert!(matches!(
            Renderer::new(context(2, 16), 0, 8),
            Err(RenderError::InvalidResolution { width: 0, height: 8 })
        ));
        assert!(matches!(
            Renderer::new(context(0, 16), 8, 8),
            Err(RenderError::Pool(PoolError::EmptyPool))
        ));
    }

    #[test]
    fn test_frames_after_shutdown_are_empty() {
        let _ = env_logger::builder().is_test(true).try_init();

        let mut renderer = Renderer::new(context(2, 16), 4, 4).unwrap();
        renderer.shutdown();

        let stats = renderer.produce_frame(&camera());
        assert_eq!(stats.rays, 16);
        assert!(renderer.frame().pixels().iter().all(|&p| p == 0));
    }
}
