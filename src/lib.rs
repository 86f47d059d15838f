pub mod cli;
pub mod color;
pub mod core;
pub mod error;
pub mod stats;
pub mod surface;

pub use color::Color;
pub use core::{BackendFault, DeviceBackend, FramePresenter, FrameState, WgpuBackend};
pub use error::{CallSite, GraphicsError, SurfaceError};
pub use surface::Surface;
