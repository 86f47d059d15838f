pub mod backend;
pub mod diagnostics;
pub mod gpu_backend;
pub mod overlay;
pub mod presenter;

pub use backend::{BackendFault, DeviceBackend};
pub use diagnostics::DiagnosticLog;
pub use gpu_backend::WgpuBackend;
pub use presenter::{FramePresenter, FrameState, QUAD_VERTEX_COUNT};
