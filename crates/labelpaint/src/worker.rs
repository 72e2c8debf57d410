//! Background rasterization worker
//!
//! One worker thread lives for the duration of a stroke. Commands are
//! queued over a channel so interactive input never waits on rasterization;
//! the finished touch-mask comes back through a oneshot that `end_stroke`
//! awaits.

use std::sync::mpsc;
use std::thread;

use glam::{DVec3, IVec3};
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::constants::RASTER_THREAD_NAME;
use crate::error::PaintError;
use crate::raster::{BrushPath, Triangle, TouchMask, fill_box, fill_triangles, stamp_ellipsoid};

/// Work queued for the rasterization thread (all coordinates in index space)
#[derive(Debug)]
pub(crate) enum RasterCommand {
    /// Extend the brush path to a point (rounded to the nearest voxel)
    Paint { point: DVec3, radius: DVec3 },
    /// Stamp a single ellipse/ellipsoid
    Ellipse { center: DVec3, scale: DVec3 },
    /// Fill the inclusive box between two voxels
    Rectangle { corner1: IVec3, corner2: IVec3 },
    /// Fill triangles lying across `fixed_axis`
    Triangles {
        triangles: Vec<Triangle>,
        fixed_axis: usize,
    },
    /// Hand back the mask and exit
    Finish(oneshot::Sender<TouchMask>),
}

/// State owned by the worker thread
struct Rasterizer {
    mask: TouchMask,
    brush: BrushPath,
    slice_axis: Option<usize>,
}

impl Rasterizer {
    fn apply(&mut self, command: RasterCommand) -> Option<oneshot::Sender<TouchMask>> {
        let marked = match command {
            RasterCommand::Paint { point, radius } => {
                self.brush
                    .paint_to(&mut self.mask, point, radius, self.slice_axis)
            }
            RasterCommand::Ellipse { center, scale } => {
                stamp_ellipsoid(&mut self.mask, center, scale, self.slice_axis)
            }
            RasterCommand::Rectangle { corner1, corner2 } => {
                fill_box(&mut self.mask, corner1, corner2)
            }
            RasterCommand::Triangles {
                triangles,
                fixed_axis,
            } => fill_triangles(&mut self.mask, &triangles, fixed_axis),
            RasterCommand::Finish(reply) => return Some(reply),
        };
        debug!("raster worker: {} voxels newly touched", marked);
        None
    }

    fn run(mut self, commands: mpsc::Receiver<RasterCommand>) {
        while let Ok(command) = commands.recv() {
            if let Some(reply) = self.apply(command) {
                if reply.send(self.mask).is_err() {
                    warn!("raster worker: stroke dropped before receiving its mask");
                }
                return;
            }
        }
        debug!("raster worker: command channel closed, discarding mask");
    }
}

/// Handle to a running rasterization thread
pub(crate) struct RasterWorker {
    commands: mpsc::Sender<RasterCommand>,
    /// Set once a send fails; the stroke can no longer produce a mask
    broken: bool,
}

impl RasterWorker {
    /// Spawn a worker with a fresh mask sized to `dimensions`
    pub(crate) fn spawn(dimensions: [usize; 3], slice_axis: Option<usize>) -> Result<Self, PaintError> {
        let (commands, receiver) = mpsc::channel();
        let rasterizer = Rasterizer {
            mask: TouchMask::new(dimensions),
            brush: BrushPath::new(),
            slice_axis,
        };
        thread::Builder::new()
            .name(RASTER_THREAD_NAME.to_string())
            .spawn(move || rasterizer.run(receiver))?;
        Ok(Self {
            commands,
            broken: false,
        })
    }

    /// Queue a command; failures are remembered and reported by [`Self::finish`]
    pub(crate) fn send(&mut self, command: RasterCommand) {
        if self.broken {
            return;
        }
        if self.commands.send(command).is_err() {
            warn!("raster worker: channel broken, stroke will fail");
            self.broken = true;
        }
    }

    /// Ask for the final mask and wait for it
    pub(crate) async fn finish(mut self) -> Result<TouchMask, PaintError> {
        let (reply, mask) = oneshot::channel();
        self.send(RasterCommand::Finish(reply));
        if self.broken {
            return Err(PaintError::WorkerDisconnected);
        }
        mask.await.map_err(|_| PaintError::WorkerDisconnected)
    }

    /// Stop the worker without waiting for its mask
    pub(crate) fn cancel(self) {
        // Dropping the sender closes the channel and the thread exits
        drop(self.commands);
    }

    /// A worker whose thread is already gone
    #[cfg(test)]
    pub(crate) fn disconnected() -> Self {
        let (commands, receiver) = mpsc::channel();
        drop(receiver);
        Self {
            commands,
            broken: false,
        }
    }
}
