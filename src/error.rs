use std::fmt;
use std::panic::Location;

use crate::core::presenter::FrameState;

/// Failure from a Surface operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceError {
    /// Construction with a zero width or height.
    InvalidDimension { width: u32, height: u32 },
    /// Pixel coordinate outside the buffer extents. Programmer error;
    /// propagated in every build profile, never clamped.
    OutOfBounds { x: u32, y: u32, width: u32, height: u32 },
}

impl fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceError::InvalidDimension { width, height } => {
                write!(f, "invalid surface dimensions {}x{}", width, height)
            }
            SurfaceError::OutOfBounds { x, y, width, height } => {
                write!(f, "pixel ({}, {}) outside {}x{} surface", x, y, width, height)
            }
        }
    }
}

impl std::error::Error for SurfaceError {}

/// Source location of the failing call, captured at error construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite {
    pub file: &'static str,
    pub line: u32,
}

impl CallSite {
    #[track_caller]
    pub fn here() -> Self {
        let loc = Location::caller();
        Self {
            file: loc.file(),
            line: loc.line(),
        }
    }
}

impl fmt::Display for CallSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// Frame pipeline failure, surfaced synchronously at the point of failure.
///
/// Every variant carries enough detail for a top-level handler to print a
/// complete diagnostic without re-querying the backend. `info` lines are
/// backend diagnostics captured around the failing call; they are only
/// populated in debug builds.
#[derive(Debug)]
pub enum GraphicsError {
    /// One-time backend setup failed; the presenter was never constructed.
    BackendInit {
        code: u32,
        message: String,
        info: Vec<String>,
        at: CallSite,
    },
    /// A mid-frame backend call (upload, draw, overlay) failed.
    Backend {
        code: u32,
        message: String,
        info: Vec<String>,
        at: CallSite,
    },
    /// Final submission failed for a reason other than device removal.
    Present {
        code: u32,
        message: String,
        info: Vec<String>,
        at: CallSite,
    },
    /// The device itself is gone. Never retryable in place; the caller must
    /// discard and rebuild the entire backend.
    DeviceRemoved {
        code: u32,
        message: String,
        at: CallSite,
    },
    /// begin_frame/end_frame called out of order, or on a faulted presenter.
    /// The call is rejected and presenter state is unchanged.
    FrameSequence {
        operation: &'static str,
        state: FrameState,
    },
    Surface(SurfaceError),
}

fn write_info(f: &mut fmt::Formatter<'_>, info: &[String]) -> fmt::Result {
    if !info.is_empty() {
        writeln!(f, "\n[Error Info]")?;
        for line in info {
            writeln!(f, "{}", line)?;
        }
    }
    Ok(())
}

impl fmt::Display for GraphicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphicsError::BackendInit { code, message, info, at } => {
                writeln!(f, "backend initialization failure")?;
                writeln!(f, "[Error Code] 0x{:08X} ({})", code, code)?;
                writeln!(f, "[Description] {}", message)?;
                write_info(f, info)?;
                write!(f, "[Origin] {}", at)
            }
            GraphicsError::Backend { code, message, info, at } => {
                writeln!(f, "graphics backend failure")?;
                writeln!(f, "[Error Code] 0x{:08X} ({})", code, code)?;
                writeln!(f, "[Description] {}", message)?;
                write_info(f, info)?;
                write!(f, "[Origin] {}", at)
            }
            GraphicsError::Present { code, message, info, at } => {
                writeln!(f, "frame presentation failure")?;
                writeln!(f, "[Error Code] 0x{:08X} ({})", code, code)?;
                writeln!(f, "[Description] {}", message)?;
                write_info(f, info)?;
                write!(f, "[Origin] {}", at)
            }
            GraphicsError::DeviceRemoved { code, message, at } => {
                writeln!(f, "graphics device removed")?;
                writeln!(f, "[Error Code] 0x{:08X} ({})", code, code)?;
                writeln!(f, "[Description] {}", message)?;
                write!(f, "[Origin] {}", at)
            }
            GraphicsError::FrameSequence { operation, state } => {
                write!(f, "{} is not valid in the {} state", operation, state)
            }
            GraphicsError::Surface(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for GraphicsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GraphicsError::Surface(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SurfaceError> for GraphicsError {
    fn from(e: SurfaceError) -> Self {
        GraphicsError::Surface(e)
    }
}
