/// Fault reported by a device backend call.
///
/// `device_removed` marks the unrecoverable case: the device itself is gone
/// and the whole backend must be discarded and rebuilt by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendFault {
    pub code: u32,
    pub message: String,
    pub device_removed: bool,
}

impl BackendFault {
    pub fn new(code: u32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            device_removed: false,
        }
    }

    pub fn device_removed(code: u32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            device_removed: true,
        }
    }
}

/// Operations the frame presenter consumes from the graphics device backend.
///
/// The production implementation wraps a real device and swap chain; tests
/// substitute a scripted mock. All calls are synchronous and may block the
/// calling thread (presenting with vsync enabled waits on the vblank).
pub trait DeviceBackend {
    /// Full-resource synchronous upload of the CPU framebuffer into the
    /// GPU-visible texture. `row_pitch` is the byte stride of one row.
    fn upload_full(&mut self, bytes: &[u8], row_pitch: u32) -> Result<(), BackendFault>;

    /// Issue the fixed fullscreen-quad draw against already-bound state.
    fn draw(&mut self, vertex_count: u32) -> Result<(), BackendFault>;

    /// Signal the overlay that a new UI frame has started. Called every
    /// frame regardless of overlay visibility so its frame bookkeeping
    /// stays continuous.
    fn new_overlay_frame(&mut self);

    /// Render the diagnostic overlay on top of the frame.
    fn render_overlay(&mut self, stats: &str) -> Result<(), BackendFault>;

    /// Submit the frame for display. `sync_interval` of 0 disables vertical
    /// sync; a nonzero interval waits on the vblank.
    fn present(&mut self, sync_interval: u32) -> Result<(), BackendFault>;

    /// Drain diagnostic lines captured since the previous drain. Populated
    /// only in debug builds; always empty in release.
    fn take_diagnostics(&mut self) -> Vec<String>;
}
