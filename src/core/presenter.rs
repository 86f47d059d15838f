use std::fmt;

use crate::color::Color;
use crate::core::backend::{BackendFault, DeviceBackend};
use crate::error::{CallSite, GraphicsError, SurfaceError};
use crate::stats::{FrameClock, FrameStats};
use crate::surface::Surface;

/// Vertex count of the fullscreen blit: two triangles, list topology.
pub const QUAD_VERTEX_COUNT: u32 = 6;

/// Frame cycle phase. `Faulted` is terminal for a presenter instance; the
/// caller must tear it down and construct a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameState {
    Idle,
    Recording,
    Faulted,
}

impl fmt::Display for FrameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameState::Idle => write!(f, "idle"),
            FrameState::Recording => write!(f, "recording"),
            FrameState::Faulted => write!(f, "faulted"),
        }
    }
}

/// Orchestrates one rendering cycle per frame: clear, pixel writes, GPU
/// upload, quad draw, overlay, present.
///
/// The presenter exclusively owns its CPU framebuffer and drives the device
/// backend through the `DeviceBackend` seam. Strict `begin_frame` /
/// `end_frame` alternation is enforced; a backend fault during `end_frame`
/// leaves the presenter faulted and every later frame call is rejected
/// without touching the backend.
pub struct FramePresenter<B: DeviceBackend> {
    backend: B,
    surface: Surface,
    stats: FrameStats,
    clock: FrameClock,
    state: FrameState,
    sync_interval: u32,
    overlay_enabled: bool,
}

impl<B: DeviceBackend> FramePresenter<B> {
    /// Build a presenter over an already-initialized backend. Vsync starts
    /// at interval 1 and the overlay starts enabled.
    pub fn new(backend: B, width: u32, height: u32) -> Result<Self, GraphicsError> {
        let surface = Surface::new(width, height)?;
        Ok(Self {
            backend,
            stats: FrameStats::new(width, height),
            clock: FrameClock::new(),
            surface,
            state: FrameState::Idle,
            sync_interval: 1,
            overlay_enabled: true,
        })
    }

    /// Start a frame cycle. Optionally wipes the framebuffer to
    /// `clear_color`. The overlay's new-frame signal is always sent so its
    /// frame-rate bookkeeping stays continuous even while hidden.
    pub fn begin_frame(&mut self, clear: bool, clear_color: Color) -> Result<(), GraphicsError> {
        if self.state != FrameState::Idle {
            return Err(GraphicsError::FrameSequence {
                operation: "begin_frame",
                state: self.state,
            });
        }

        if clear {
            self.surface.clear(clear_color);
        }
        self.backend.new_overlay_frame();
        self.state = FrameState::Recording;
        Ok(())
    }

    /// Finish the frame cycle: upload the framebuffer, draw the quad,
    /// render the overlay if enabled, and present at the configured vsync
    /// interval. Any backend fault transitions the presenter to `Faulted`.
    pub fn end_frame(&mut self) -> Result<(), GraphicsError> {
        if self.state != FrameState::Recording {
            return Err(GraphicsError::FrameSequence {
                operation: "end_frame",
                state: self.state,
            });
        }

        let delta = self.clock.tick();
        self.stats.update(delta);

        if let Err(fault) = self
            .backend
            .upload_full(self.surface.raw_bytes(), self.surface.row_pitch())
        {
            return Err(self.fault(fault, false));
        }

        if let Err(fault) = self.backend.draw(QUAD_VERTEX_COUNT) {
            return Err(self.fault(fault, false));
        }

        if self.overlay_enabled {
            if let Err(fault) = self.backend.render_overlay(self.stats.text()) {
                return Err(self.fault(fault, false));
            }
        }

        match self.backend.present(self.sync_interval) {
            Ok(()) => {
                self.state = FrameState::Idle;
                Ok(())
            }
            Err(fault) => Err(self.fault(fault, true)),
        }
    }

    /// Write one pixel into the framebuffer.
    pub fn put_pixel(&mut self, x: u32, y: u32, color: Color) -> Result<(), SurfaceError> {
        self.surface.put_pixel(x, y, color)
    }

    /// Coordinate-pair convenience over `put_pixel`.
    pub fn put_pixel_at(&mut self, p: (u32, u32), color: Color) -> Result<(), SurfaceError> {
        self.surface.put_pixel(p.0, p.1, color)
    }

    /// Raw-channel convenience over `put_pixel`.
    pub fn put_pixel_rgb(&mut self, x: u32, y: u32, r: u8, g: u8, b: u8) -> Result<(), SurfaceError> {
        self.surface.put_pixel(x, y, Color::new(r, g, b))
    }

    pub fn get_pixel(&self, x: u32, y: u32) -> Result<Color, SurfaceError> {
        self.surface.get_pixel(x, y)
    }

    /// Wipe the framebuffer outside of the begin/end protocol.
    pub fn clear(&mut self, color: Color) {
        self.surface.clear(color);
    }

    pub fn enable_vsync(&mut self) {
        self.sync_interval = 1;
    }

    pub fn disable_vsync(&mut self) {
        self.sync_interval = 0;
    }

    /// Set the interval passed at the next present; no immediate effect.
    pub fn set_vsync_interval(&mut self, interval: u32) {
        self.sync_interval = interval;
    }

    pub fn is_vsync_enabled(&self) -> bool {
        self.sync_interval != 0
    }

    pub fn enable_overlay(&mut self) {
        self.overlay_enabled = true;
    }

    pub fn disable_overlay(&mut self) {
        self.overlay_enabled = false;
    }

    pub fn is_overlay_enabled(&self) -> bool {
        self.overlay_enabled
    }

    /// Most recent frame-timing string; empty before the first `end_frame`.
    pub fn frame_statistics(&self) -> &str {
        self.stats.text()
    }

    pub fn state(&self) -> FrameState {
        self.state
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    #[track_caller]
    fn fault(&mut self, fault: BackendFault, at_present: bool) -> GraphicsError {
        self.state = FrameState::Faulted;
        let at = CallSite::here();
        if fault.device_removed {
            GraphicsError::DeviceRemoved {
                code: fault.code,
                message: fault.message,
                at,
            }
        } else if at_present {
            GraphicsError::Present {
                code: fault.code,
                message: fault.message,
                info: self.backend.take_diagnostics(),
                at,
            }
        } else {
            GraphicsError::Backend {
                code: fault.code,
                message: fault.message,
                info: self.backend.take_diagnostics(),
                at,
            }
        }
    }
}
