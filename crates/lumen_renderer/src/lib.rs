//! Lumen Renderer - multithreaded CPU ray tracer.
//!
//! A Whitted-style tracer: every primary ray picks up direct diffuse light
//! from point lights, a mirror reflection and a refraction through the
//! object it hits, recursing to a fixed depth.
//!
//! Frames are produced by a fixed pool of worker threads. The image's rays
//! are split into contiguous tasks; each worker writes its pixels straight
//! into a shared raster.

pub mod context;
pub mod frame;
pub mod intersect;
pub mod pool;
pub mod raygen;
pub mod renderer;
pub mod task;
pub mod transport;

pub use context::{RenderConfig, RenderContext};
pub use frame::{pack_rgba, unpack_rgba, Frame, SharedRaster};
pub use intersect::{first_collision, internal_collision, CollisionInfo, IntersectError};
pub use pool::{Dispatch, PoolError, TaskHandler, TaskId, ThreadPool, WorkerState};
pub use raygen::generate_rays;
pub use renderer::{Display, FrameStats, RenderError, Renderer};
pub use task::{build_tasks, partition, RenderTask, RenderWorker, DEFAULT_TASK_SIZE};
pub use transport::{refract, LightTransport, Rgb};
