/// Collector for backend diagnostic lines, threaded explicitly through
/// backend calls rather than living in ambient global state.
///
/// In debug builds the wgpu backend pushes validation-scope results here;
/// release builds never write to it, so `drain` stays empty. Error paths
/// drain the collector and attach the lines to the raised error.
#[derive(Debug, Default)]
pub struct DiagnosticLog {
    lines: Vec<String>,
}

impl DiagnosticLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Take all accumulated lines, leaving the collector empty.
    pub fn drain(&mut self) -> Vec<String> {
        std::mem::take(&mut self.lines)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
