//! Render tasks: contiguous runs of primary rays traced by one worker.

use std::ops::Range;
use std::sync::Arc;

use lumen_math::Ray;

use crate::context::RenderContext;
use crate::frame::{pack_rgba, SharedRaster};
use crate::pool::TaskHandler;
use crate::transport::LightTransport;

/// Default number of rays per task.
pub const DEFAULT_TASK_SIZE: usize = 4096;

/// Split `0..len` into consecutive ranges of at most `task_size` items.
///
/// The last range holds the remainder. A task size of zero is treated as one.
pub fn partition(len: usize, task_size: usize) -> Vec<Range<usize>> {
    let task_size = task_size.max(1);
    (0..len)
        .step_by(task_size)
        .map(|start| start..(start + task_size).min(len))
        .collect()
}

/// A range of primary rays and the raster their colors land in.
///
/// The ray index doubles as the row-major pixel index.
#[derive(Debug, Clone)]
pub struct RenderTask {
    pub range: Range<usize>,
    pub rays: Arc<[Ray]>,
    pub raster: SharedRaster,
}

/// Cut a frame's rays into tasks over disjoint pixel ranges.
pub fn build_tasks(rays: Arc<[Ray]>, raster: &SharedRaster, task_size: usize) -> Vec<RenderTask> {
    partition(rays.len(), task_size)
        .into_iter()
        .map(|range| RenderTask {
            range,
            rays: Arc::clone(&rays),
            raster: raster.clone(),
        })
        .collect()
}

/// Pool handler that traces render tasks against a shared context.
pub struct RenderWorker {
    context: Arc<RenderContext>,
}

impl RenderWorker {
    pub fn new(context: Arc<RenderContext>) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &RenderContext {
        &self.context
    }
}

impl TaskHandler for RenderWorker {
    type Task = RenderTask;

    fn handle(&self, task: RenderTask) -> bool {
        if task.range.end > task.rays.len() || task.range.end > task.raster.len() {
            log::error!(
                "Render task {:?} outside {} rays / {} pixels",
                task.range,
                task.rays.len(),
                task.raster.len()
            );
            return false;
        }

        let transport = LightTransport::new(&self.context);
        let max_depth = self.context.config.max_depth;

        for index in task.range.clone() {
            let rgb = transport.total_light(&task.rays[index], max_depth);
            task.raster.write(index, pack_rgba(rgb));
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::RenderConfig;
    use lumen_core::{Material, MaterialId, MaterialTable, Object, Scene, Light};
    use lumen_math::DVec3;

    #[test]
    fn test_partition_covers_range() {
        let ranges = partition(10_000, DEFAULT_TASK_SIZE);
        assert_eq!(ranges, vec![0..4096, 4096..8192, 8192..10_000]);

        let exact = partition(8, 4);
        assert_eq!(exact, vec![0..4, 4..8]);

        assert!(partition(0, 4).is_empty());
        assert_eq!(partition(3, 0).len(), 3);
    }

    #[test]
    fn test_partition_is_disjoint() {
        let ranges = partition(1000, 7);
        let mut next = 0;
        for range in &ranges {
            assert_eq!(range.start, next);
            assert!(range.len() <= 7 && !range.is_empty());
            next = range.end;
        }
        assert_eq!(next, 1000);
    }

    #[test]
    fn test_worker_writes_its_range() {
        let mut scene = Scene::new("task");
        let mut materials = MaterialTable::new();
        materials.insert(MaterialId(1), Material::diffuse(DVec3::new(0.0, 0.0, 255.0)));
        scene.add_object(Object::sphere(DVec3::new(0.0, 0.0, -5.0), MaterialId(1)));
        scene.add_light(Light::new(DVec3::ZERO));

        let context = Arc::new(RenderContext::new(scene, materials, RenderConfig::default()));
        let worker = RenderWorker::new(context);

        let rays: Arc<[Ray]> = vec![
            Ray::new(DVec3::ZERO, DVec3::Z),
            Ray::new(DVec3::ZERO, DVec3::NEG_Z),
            Ray::new(DVec3::ZERO, DVec3::NEG_Z),
        ]
        .into();
        let raster = SharedRaster::new(3, 1);
        let tasks = build_tasks(rays, &raster, 2);
        assert_eq!(tasks.len(), 2);

        // Only the second task runs; pixel 0 stays untouched
        assert!(worker.handle(tasks[1].clone()));
        let frame = raster.snapshot();
        assert_eq!(frame.pixels(), &[0, 0, pack_rgba([0, 0, 255])]);

        assert!(worker.handle(tasks[0].clone()));
        let frame = raster.snapshot();
        assert_eq!(frame.pixels()[0], pack_rgba([0, 0, 0]));
        assert_eq!(frame.pixels()[1], pack_rgba([0, 0, 255]));
    }

    #[test]
    fn test_out_of_range_task_fails() {
        let _ = env_logger::builder().is_test(true).try_init();

        let context = Arc::new(RenderContext::new(
            Scene::new("empty"),
            MaterialTable::new(),
            RenderConfig::default(),
        ));
        let worker = RenderWorker::new(context);

        let task = RenderTask {
            range: 0..4,
            rays: vec![Ray::default(); 2].into(),
            raster: SharedRaster::new(4, 1),
        };
        assert!(!worker.handle(task));
    }
}
