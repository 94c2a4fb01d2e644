//! Row-by-row ray tracing driver.
//!
//! A [`RayTracer`] hands out one [`RenderPass`] at a time. The pass borrows
//! the scene and texture registry for its whole lifetime and renders
//! scanlines top to bottom in caller-sized chunks, so a host loop can
//! interleave rendering with other work. A [`CancelHandle`] stops the pass
//! at the next scanline boundary.

use std::cell::Cell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use lumen_core::{Color, FrameBuffer};
use lumen_math::CameraBasis;

use crate::{Ray, RenderError, RenderResult, Scene, TextureRegistry, Vec3};

/// Requests that the active render pass stop.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn request_stop(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// A stop was requested and not yet observed by a pass.
    pub fn is_stop_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Where a pass stands after a call to [`RenderPass::render_rows`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassStatus {
    InProgress,
    Finished,
    Cancelled,
}

/// Summary of a blocking [`RayTracer::render`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderStats {
    pub elapsed_ms: u64,
    /// Scanlines written
    pub rows: u32,
    /// False when the pass was cancelled
    pub completed: bool,
}

/// Owner of the cancel flag; allows one active pass at a time.
#[derive(Debug, Default)]
pub struct RayTracer {
    cancel: Arc<AtomicBool>,
    active: Cell<bool>,
}

impl RayTracer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            flag: Arc::clone(&self.cancel),
        }
    }

    pub fn is_rendering(&self) -> bool {
        self.active.get()
    }

    /// Open a pass over a `width` x `height` image.
    ///
    /// A stop requested while no pass was running is discarded.
    pub fn begin<'a>(
        &'a self,
        scene: &'a Scene,
        textures: &'a TextureRegistry,
        width: u32,
        height: u32,
    ) -> RenderResult<RenderPass<'a>> {
        if self.active.get() {
            return Err(RenderError::RenderInProgress);
        }
        self.active.set(true);
        self.cancel.store(false, Ordering::SeqCst);

        log::debug!(
            "Starting render pass {}x{} ({} shapes, {} lights, depth {})",
            width,
            height,
            scene.shapes.len(),
            scene.lights.len(),
            scene.ray_depth
        );

        Ok(RenderPass::new(self, scene, textures, width, height))
    }

    /// Render the whole image, blocking until finished or cancelled.
    ///
    /// `progress` is called after every scanline with the percentage of
    /// rows completed so far, `rows_done * 100 / height`, so a 3-row image
    /// reports 33, 66 and 100.
    pub fn render(
        &self,
        scene: &Scene,
        textures: &TextureRegistry,
        fb: &mut FrameBuffer,
        mut progress: impl FnMut(u32),
    ) -> RenderResult<RenderStats> {
        let start = Instant::now();
        let mut pass = self.begin(scene, textures, fb.width, fb.height)?;
        let chunk = fb.height.max(1);

        let status = loop {
            match pass.render_rows(fb, chunk, &mut progress)? {
                PassStatus::InProgress => continue,
                done => break done,
            }
        };

        let stats = RenderStats {
            elapsed_ms: start.elapsed().as_millis() as u64,
            rows: pass.rows_done(),
            completed: status == PassStatus::Finished,
        };

        if stats.completed {
            log::info!("Rendered {}x{} in {} ms", fb.width, fb.height, stats.elapsed_ms);
        } else {
            log::info!("Render cancelled after {} rows ({} ms)", stats.rows, stats.elapsed_ms);
        }

        Ok(stats)
    }
}

/// An in-flight render. Dropping it frees the tracer for the next pass.
pub struct RenderPass<'a> {
    tracer: &'a RayTracer,
    scene: &'a Scene,
    textures: &'a TextureRegistry,
    basis: CameraBasis,
    width: u32,
    height: u32,
    half_width: f32,
    half_height: f32,
    next_row: u32,
    cancelled: bool,
}

impl<'a> RenderPass<'a> {
    fn new(tracer: &'a RayTracer, scene: &'a Scene, textures: &'a TextureRegistry, width: u32, height: u32) -> Self {
        let camera = &scene.camera;
        let aspect = if height > 0 { width as f32 / height as f32 } else { 1.0 };
        let half_height = if camera.use_perspective {
            (camera.field_of_view.to_radians() / 2.0).tan()
        } else {
            1.0
        };

        Self {
            tracer,
            scene,
            textures,
            basis: camera.basis(),
            width,
            height,
            half_width: half_height * aspect,
            half_height,
            next_row: 0,
            cancelled: false,
        }
    }

    pub fn rows_done(&self) -> u32 {
        self.next_row
    }

    pub fn is_finished(&self) -> bool {
        self.next_row >= self.height
    }

    /// Camera ray through the center of pixel (`column`, `row`); row 0 is
    /// the top of the image.
    pub fn primary_ray(&self, column: u32, row: u32) -> Ray {
        let u = ((column as f32 + 0.5) / self.width as f32 * 2.0 - 1.0) * self.half_width;
        let v = (1.0 - (row as f32 + 0.5) / self.height as f32 * 2.0) * self.half_height;
        let CameraBasis { right, up, forward } = self.basis;
        let eye = self.scene.camera.eye_position;

        if self.scene.camera.use_perspective {
            Ray::new(eye, (forward + right * u + up * v).normalize())
        } else {
            Ray::new(eye + right * u + up * v, forward)
        }
    }

    /// Render up to `max_rows` scanlines into `fb`.
    ///
    /// The cancel flag is checked before each scanline; observing it
    /// clears it and ends the pass with [`PassStatus::Cancelled`], leaving
    /// the rows already written in place.
    ///
    /// `fb` must have the size given to [`RayTracer::begin`].
    pub fn render_rows(
        &mut self,
        fb: &mut FrameBuffer,
        max_rows: u32,
        progress: &mut dyn FnMut(u32),
    ) -> RenderResult<PassStatus> {
        if fb.width != self.width || fb.height != self.height {
            return Err(RenderError::FrameSizeMismatch {
                width: self.width,
                height: self.height,
                actual_width: fb.width,
                actual_height: fb.height,
            });
        }
        if self.cancelled {
            return Ok(PassStatus::Cancelled);
        }

        for _ in 0..max_rows {
            if self.is_finished() {
                break;
            }
            if self.tracer.cancel.swap(false, Ordering::SeqCst) {
                self.cancelled = true;
                log::debug!("Render pass cancelled at row {}", self.next_row);
                return Ok(PassStatus::Cancelled);
            }

            let row = self.next_row;
            for column in 0..self.width {
                let ray = self.primary_ray(column, row);
                let color: Vec3 = self.scene.trace(&ray, self.textures)?;
                fb.set_pixel(column as i32, row as i32, Color::from_unit(color));
            }

            self.next_row += 1;
            progress((self.next_row as u64 * 100 / self.height as u64) as u32);
        }

        if self.is_finished() {
            log::debug!("Render pass finished ({} rows)", self.next_row);
            Ok(PassStatus::Finished)
        } else {
            Ok(PassStatus::InProgress)
        }
    }
}

impl Drop for RenderPass<'_> {
    fn drop(&mut self) {
        self.tracer.active.set(false);
    }
}
